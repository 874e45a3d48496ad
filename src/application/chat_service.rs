// Chat service - conversation turns around an Assistant, never failing towards the user
use crate::application::assistant::Assistant;
use crate::domain::entity::Domain;
use crate::domain::telemetry::Series;
use serde::Serialize;
use std::sync::Arc;

pub const ERROR_REPLY: &str = "Lo siento, ocurrió un error al conectar con el motor de IA.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub is_error: bool,
}

/// The question as the widget echoes it, followed by the answer.
#[derive(Debug, Clone, Serialize)]
pub struct ChatTurn {
    pub question: ChatMessage,
    pub reply: ChatMessage,
}

/// Opening state of the chat widget.
#[derive(Debug, Clone, Serialize)]
pub struct ChatIntro {
    pub assistant_name: String,
    pub greeting: ChatMessage,
    pub suggestions: Vec<String>,
}

#[derive(Clone)]
pub struct ChatService {
    assistant: Arc<dyn Assistant>,
}

impl ChatService {
    pub fn new(assistant: Arc<dyn Assistant>) -> Self {
        Self { assistant }
    }

    pub fn intro(&self, domain: Domain) -> ChatIntro {
        let vocabulary = &domain.profile().vocabulary;
        ChatIntro {
            assistant_name: vocabulary.assistant_name.to_string(),
            greeting: ChatMessage {
                role: ChatRole::Assistant,
                text: vocabulary.greeting.to_string(),
                query: None,
                is_error: false,
            },
            suggestions: vocabulary.suggestions.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub async fn ask(&self, domain: Domain, question: &str, series: &Series) -> ChatTurn {
        let reply = match self.assistant.answer(domain, question, series).await {
            Ok(reply) => ChatMessage {
                role: ChatRole::Assistant,
                text: reply.answer,
                query: Some(reply.query),
                is_error: false,
            },
            Err(e) => {
                tracing::error!("Assistant failed for {} question {:?}: {}", domain, question, e);
                ChatMessage {
                    role: ChatRole::Assistant,
                    text: ERROR_REPLY.to_string(),
                    query: None,
                    is_error: true,
                }
            }
        };

        ChatTurn {
            question: ChatMessage {
                role: ChatRole::User,
                text: question.to_string(),
                query: None,
                is_error: false,
            },
            reply,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::assistant::{AssistantError, AssistantReply};
    use crate::domain::entity::Entity;
    use crate::domain::telemetry::WindowKind;
    use async_trait::async_trait;

    struct Scripted(bool);

    #[async_trait]
    impl Assistant for Scripted {
        async fn answer(
            &self,
            _domain: Domain,
            query: &str,
            series: &Series,
        ) -> Result<AssistantReply, AssistantError> {
            if self.0 {
                Ok(AssistantReply {
                    answer: format!("eco: {}", query),
                    query: "SELECT 1".to_string(),
                })
            } else {
                Err(AssistantError::EmptySeries {
                    entity: series.entity.id.clone(),
                    metric: "temperature".to_string(),
                })
            }
        }
    }

    fn empty_series() -> Series {
        let entity = Entity::new("MACH-01", "CNC Lathe X1", "Machining", "CNC");
        Series::new(entity, WindowKind::Live, Vec::new())
    }

    #[tokio::test]
    async fn test_reply_is_forwarded() {
        let chat = ChatService::new(Arc::new(Scripted(true)));
        let turn = chat.ask(Domain::Industry, "hola", &empty_series()).await;
        assert_eq!(turn.question.role, ChatRole::User);
        assert_eq!(turn.question.text, "hola");

        let message = turn.reply;
        assert_eq!(message.role, ChatRole::Assistant);
        assert_eq!(message.text, "eco: hola");
        assert_eq!(message.query.as_deref(), Some("SELECT 1"));
        assert!(!message.is_error);
    }

    #[tokio::test]
    async fn test_failure_becomes_apology() {
        let chat = ChatService::new(Arc::new(Scripted(false)));
        let turn = chat.ask(Domain::Industry, "hola", &empty_series()).await;
        assert!(!turn.question.is_error);

        let message = turn.reply;
        assert_eq!(message.text, ERROR_REPLY);
        assert!(message.is_error);
        assert!(message.query.is_none());
    }

    #[test]
    fn test_intro() {
        let chat = ChatService::new(Arc::new(Scripted(true)));
        let intro = chat.intro(Domain::Agriculture);

        assert_eq!(intro.assistant_name, "Agro-Sentinel AI");
        assert!(intro.greeting.text.starts_with("¡Hola!"));
        assert_eq!(intro.suggestions.len(), 4);
    }
}
