// Application state for HTTP handlers - wires the services together
use crate::application::assistant::{AssistantOptions, RuleBasedAssistant};
use crate::application::chat_service::ChatService;
use crate::application::dashboard_service::DashboardService;
use crate::application::entity_registry::EntityRegistry;
use crate::application::generator::SeriesGenerator;
use crate::application::streaming_service::StreamingDashboardService;
use crate::infrastructure::config::{HistorySettings, SentinelConfig, WidgetsConfig};
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub generator: SeriesGenerator,
    pub dashboard_service: DashboardService,
    pub streaming_service: StreamingDashboardService,
    pub chat_service: ChatService,
    pub history: HistorySettings,
}

impl AppState {
    pub fn new(
        registry: Arc<dyn EntityRegistry>,
        config: &SentinelConfig,
        widgets_config: WidgetsConfig,
    ) -> anyhow::Result<Self> {
        // Generation windows from configuration obey the same limits as requests
        config.history.window().check_limits().context("invalid [history] window")?;
        let entity_window = config.assistant.entity_window();
        entity_window
            .check_limits()
            .context("invalid [assistant] entity window")?;

        let generator = SeriesGenerator::new(registry, config.site.utc_offset()?);

        let dashboard_service = DashboardService::new(
            generator.clone(),
            widgets_config,
            config.history.clone(),
            config.map.clone(),
        );
        let streaming_service = StreamingDashboardService::new(dashboard_service.clone());

        let assistant = RuleBasedAssistant::new(
            generator.clone(),
            AssistantOptions {
                delay: Duration::from_millis(config.assistant.delay_ms),
                entity_window,
            },
        );
        let chat_service = ChatService::new(Arc::new(assistant));

        Ok(Self {
            generator,
            dashboard_service,
            streaming_service,
            chat_service,
            history: config.history.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::static_registry::StaticRegistry;

    fn state(config: &SentinelConfig) -> anyhow::Result<AppState> {
        AppState::new(
            Arc::new(StaticRegistry::new()),
            config,
            WidgetsConfig::default(),
        )
    }

    #[test]
    fn test_default_config_is_accepted() {
        assert!(state(&SentinelConfig::default()).is_ok());
    }

    #[test]
    fn test_oversized_windows_are_rejected() {
        let mut config = SentinelConfig::default();
        config.history.days = u32::MAX;
        let err = state(&config).err().unwrap();
        assert!(format!("{:#}", err).contains("[history]"));

        let mut config = SentinelConfig::default();
        config.assistant.entity_readings_per_day = 100_000_000;
        let err = state(&config).err().unwrap();
        assert!(format!("{:#}", err).contains("[assistant]"));
    }
}
