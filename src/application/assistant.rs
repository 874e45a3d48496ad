// Query assistant - keyword intent matching over generated telemetry
use crate::application::classifier;
use crate::application::generator::SeriesGenerator;
use crate::domain::alert::Priority;
use crate::domain::entity::{Domain, Entity};
use crate::domain::metric::MetricSpec;
use crate::domain::profile::DomainProfile;
use crate::domain::telemetry::{Sample, Series, WindowKind};
use crate::infrastructure::config::prepare_query;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssistantReply {
    pub answer: String,
    /// Illustrative query shown under the answer. Never executed.
    pub query: String,
}

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("no {metric} readings to analyse for {entity}")]
    EmptySeries { entity: String, metric: String },
}

/// Seam for a real language-model backend.
#[async_trait]
pub trait Assistant: Send + Sync {
    async fn answer(
        &self,
        domain: Domain,
        query: &str,
        series: &Series,
    ) -> Result<AssistantReply, AssistantError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Alerts,
    Max,
    Min,
    Average,
}

impl Intent {
    const KEYWORDS: [(Intent, &'static [&'static str]); 4] = [
        (Intent::Alerts, &["alarm", "alert", "falla", "riesgo"]),
        (Intent::Max, &["max", "máxima", "máximo", "alta"]),
        (Intent::Min, &["min", "mínima", "mínimo", "baja"]),
        (Intent::Average, &["promedio", "media"]),
    ];

    /// First intent with a keyword in the lowercased question.
    pub fn detect(lowered: &str) -> Option<Intent> {
        Self::KEYWORDS
            .iter()
            .find(|(_, words)| words.iter().any(|w| lowered.contains(w)))
            .map(|(intent, _)| *intent)
    }
}

/// Metric named by the question, or the domain's primary metric.
pub fn detect_metric<'p>(profile: &'p DomainProfile, lowered: &str) -> &'p MetricSpec {
    profile
        .metrics
        .iter()
        .find(|m| m.keywords.iter().any(|k| lowered.contains(k)))
        .unwrap_or_else(|| profile.primary_metric())
}

#[derive(Debug, Clone, Copy)]
pub struct AssistantOptions {
    pub delay: Duration,
    /// Window regenerated when a question names an entity.
    pub entity_window: WindowKind,
}

impl Default for AssistantOptions {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(800),
            entity_window: WindowKind::History {
                days: 30,
                readings_per_day: 12,
            },
        }
    }
}

struct Extremes<'a> {
    max: (f64, &'a Sample),
    min: (f64, &'a Sample),
    average: f64,
}

/// Max and min keep the first sample holding the extreme value.
fn extremes<'a>(series: &'a Series, spec: &MetricSpec) -> Option<Extremes<'a>> {
    let mut readings = series
        .samples
        .iter()
        .filter_map(|s| s.value(spec.key).map(|v| (v, s)));
    let first = readings.next()?;

    let (mut max, mut min, mut sum, mut count) = (first, first, first.0, 1usize);
    for reading in readings {
        if reading.0 > max.0 {
            max = reading;
        }
        if reading.0 < min.0 {
            min = reading;
        }
        sum += reading.0;
        count += 1;
    }

    Some(Extremes {
        max,
        min,
        average: sum / count as f64,
    })
}

#[derive(Clone)]
pub struct RuleBasedAssistant {
    generator: SeriesGenerator,
    options: AssistantOptions,
}

impl RuleBasedAssistant {
    pub fn new(generator: SeriesGenerator, options: AssistantOptions) -> Self {
        Self { generator, options }
    }

    /// Answer without the simulated latency.
    pub fn respond(
        &self,
        domain: Domain,
        query: &str,
        series: &Series,
    ) -> Result<AssistantReply, AssistantError> {
        let profile = domain.profile();
        let vocabulary = &profile.vocabulary;
        let lowered = query.to_lowercase();

        let intent = Intent::detect(&lowered);
        let spec = detect_metric(profile, &lowered);
        let target = self.generator.registry().match_keyword(domain, &lowered);

        if intent.is_none() && target.is_none() {
            return Ok(AssistantReply {
                answer: vocabulary.help.to_string(),
                query: format!("SELECT help_topic FROM {}", vocabulary.help_table),
            });
        }

        let regenerated;
        let (data, scope) = match target {
            Some(entity) => {
                tracing::debug!("Assistant question targets {}", entity.id);
                regenerated = self
                    .generator
                    .generate(domain, self.options.entity_window, &entity.id);
                (&regenerated, format!("{} ({})", entity.name, entity.id))
            }
            None => (series, vocabulary.current_scope.to_string()),
        };

        let stats = extremes(data, spec).ok_or_else(|| AssistantError::EmptySeries {
            entity: data.entity.id.clone(),
            metric: spec.key.to_string(),
        })?;

        let mut vars = HashMap::new();
        vars.insert("metric".to_string(), spec.key.to_string());
        vars.insert("table".to_string(), vocabulary.table.to_string());
        vars.insert("entity".to_string(), data.entity.id.clone());

        let reply = match intent {
            Some(Intent::Alerts) => {
                vars.insert("table".to_string(), vocabulary.alert_table.to_string());
                alert_reply(domain, data, &scope, vocabulary.entity_noun, &vars)
            }
            Some(Intent::Max) => AssistantReply {
                answer: format!(
                    "📈 **Máximo registrado ({})**\n\n📍 **{}**: {}\n📅 **Fecha**: {}\n🔢 **Valor**: {}",
                    spec.label,
                    vocabulary.entity_noun,
                    scope,
                    stats.max.1.display_label,
                    spec.format_value(stats.max.0)
                ),
                query: prepare_query(
                    "SELECT MAX(${metric}) FROM ${table} WHERE entity = '${entity}'",
                    &vars,
                ),
            },
            Some(Intent::Min) => AssistantReply {
                answer: format!(
                    "📉 **Mínimo registrado ({})**\n\n📍 **{}**: {}\n📅 **Fecha**: {}\n🔢 **Valor**: {}",
                    spec.label,
                    vocabulary.entity_noun,
                    scope,
                    stats.min.1.display_label,
                    spec.format_value(stats.min.0)
                ),
                query: prepare_query(
                    "SELECT MIN(${metric}) FROM ${table} WHERE entity = '${entity}'",
                    &vars,
                ),
            },
            Some(Intent::Average) => AssistantReply {
                answer: format!(
                    "📊 **Promedio operativo**\n\n{} promedio en {} durante el periodo analizado: **{:.1}{}** ({} lecturas).",
                    spec.label,
                    scope,
                    stats.average,
                    spec.unit_suffix(),
                    data.samples.len()
                ),
                query: prepare_query(
                    "SELECT AVG(${metric}) FROM ${table} WHERE entity = '${entity}'",
                    &vars,
                ),
            },
            None => {
                // Only reachable with a named entity
                let entity = &data.entity;
                entity_report(domain, entity, data, spec, &stats, &vars)
            }
        };

        Ok(reply)
    }
}

fn alert_reply(
    domain: Domain,
    data: &Series,
    scope: &str,
    noun: &str,
    vars: &HashMap<String, String>,
) -> AssistantReply {
    let events = classifier::scan(domain, data);
    match events.last() {
        Some(last) => AssistantReply {
            answer: format!(
                "⚠️ **Análisis: {}**\nDetecté **{} alertas** en el periodo analizado.\n\nÚltimo incidente:\n📍 **{}**: {}\n🚨 **Tipo**: {} ({:?})\n📅 **Fecha**: {}\n📉 **Valor**: {}\n\nSe requiere revisión técnica.",
                scope,
                events.len(),
                noun,
                data.entity.id,
                last.kind,
                last.priority,
                last.time,
                last.value
            ),
            query: prepare_query(
                "SELECT * FROM ${table} WHERE severity = 'HIGH' AND entity = '${entity}'",
                vars,
            ),
        },
        None => AssistantReply {
            answer: format!(
                "✅ **{}:** No se encontraron anomalías en el periodo analizado. Operación nominal.",
                scope
            ),
            query: prepare_query(
                "SELECT count(*) FROM ${table} WHERE status = 'ACTIVE' AND entity = '${entity}'",
                vars,
            ),
        },
    }
}

fn entity_report(
    domain: Domain,
    entity: &Entity,
    data: &Series,
    spec: &MetricSpec,
    stats: &Extremes<'_>,
    vars: &HashMap<String, String>,
) -> AssistantReply {
    let critical = classifier::scan(domain, data)
        .iter()
        .filter(|e| e.priority == Priority::Critical)
        .count();
    let status = if critical > 0 {
        format!("⚠️ ALERTA ({} eventos críticos)", critical)
    } else {
        "✅ NOMINAL".to_string()
    };

    AssistantReply {
        answer: format!(
            "📝 **Reporte: {}**\n\nHe analizado {} lecturas recientes:\n- **{} prom.**: {:.1}{}\n- **Máximo**: {}\n- **Estado**: {}\n\n¿Quieres ver las alertas específicas?",
            entity.name,
            data.samples.len(),
            spec.label,
            stats.average,
            spec.unit_suffix(),
            spec.format_value(stats.max.0),
            status
        ),
        query: prepare_query(
            "SELECT AVG(${metric}), MAX(${metric}) FROM ${table} WHERE entity = '${entity}'",
            vars,
        ),
    }
}

#[async_trait]
impl Assistant for RuleBasedAssistant {
    async fn answer(
        &self,
        domain: Domain,
        query: &str,
        series: &Series,
    ) -> Result<AssistantReply, AssistantError> {
        tokio::time::sleep(self.options.delay).await;
        self.respond(domain, query, series)
    }
}
