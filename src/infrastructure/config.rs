// Configuration - sentinel.toml, widgets.toml and SENTINEL__ environment overrides
use crate::domain::dashboard::MarkerStyle;
use crate::domain::entity::Domain;
use crate::domain::metric::MetricKey;
use crate::domain::telemetry::WindowKind;
use anyhow::Context;
use chrono::FixedOffset;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SentinelConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub site: SiteSettings,
    #[serde(default)]
    pub history: HistorySettings,
    #[serde(default)]
    pub assistant: AssistantSettings,
    #[serde(default)]
    pub map: MapSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SiteSettings {
    /// Offset of the monitored sites from UTC, east positive.
    pub utc_offset_minutes: i32,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            utc_offset_minutes: -300,
        }
    }
}

impl SiteSettings {
    pub fn utc_offset(&self) -> anyhow::Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).with_context(|| {
            format!("invalid site utc offset: {} minutes", self.utc_offset_minutes)
        })
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HistorySettings {
    pub days: u32,
    pub readings_per_day: u32,
    /// Range shown when a history request carries no dates.
    pub default_range_days: u32,
    pub max_chart_points: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            days: 200,
            readings_per_day: 12,
            default_range_days: 7,
            max_chart_points: 150,
        }
    }
}

impl HistorySettings {
    pub fn window(&self) -> WindowKind {
        WindowKind::History {
            days: self.days,
            readings_per_day: self.readings_per_day,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AssistantSettings {
    pub delay_ms: u64,
    pub entity_days: u32,
    pub entity_readings_per_day: u32,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            delay_ms: 800,
            entity_days: 30,
            entity_readings_per_day: 12,
        }
    }
}

impl AssistantSettings {
    /// Window regenerated when a question names an entity.
    pub fn entity_window(&self) -> WindowKind {
        WindowKind::History {
            days: self.entity_days,
            readings_per_day: self.entity_readings_per_day,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MapSettings {
    pub tile_url: String,
    pub marker: MarkerStyle,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            tile_url: "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png".to_string(),
            marker: MarkerStyle::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct WidgetsConfig {
    #[serde(default)]
    pub charts: Vec<ChartConfig>,
}

/// One chart widget; every dashboard shares this shape.
#[derive(Debug, Deserialize, Clone)]
pub struct ChartConfig {
    pub id: String,
    pub domain: Domain,
    pub metric: MetricKey,
    pub title: String,
    pub color: String,
    pub unit: Option<String>,
}

impl WidgetsConfig {
    pub fn charts_for(&self, domain: Domain) -> impl Iterator<Item = &ChartConfig> {
        self.charts.iter().filter(move |c| c.domain == domain)
    }
}

pub fn load_sentinel_config() -> anyhow::Result<SentinelConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/sentinel").required(false))
        .add_source(config::Environment::with_prefix("SENTINEL").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_widgets_config() -> anyhow::Result<WidgetsConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/widgets").required(false))
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Replace template variables in a query string
pub fn prepare_query(query: &str, vars: &HashMap<String, String>) -> String {
    let mut result = query.to_string();
    for (key, value) in vars {
        let placeholder = format!("${{{}}}", key);
        result = result.replace(&placeholder, value);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_query() {
        let mut vars = HashMap::new();
        vars.insert("metric".to_string(), "temperature".to_string());
        vars.insert("entity".to_string(), "GH-AMB-01".to_string());

        let query = "SELECT MAX(${metric}) FROM sensor_logs WHERE location = '${entity}'";
        let result = prepare_query(query, &vars);

        assert_eq!(
            result,
            "SELECT MAX(temperature) FROM sensor_logs WHERE location = 'GH-AMB-01'"
        );
    }

    #[test]
    fn test_defaults_without_files() {
        let config = SentinelConfig::default();
        assert_eq!(config.server.addr, "0.0.0.0:8080");
        assert_eq!(config.history.days, 200);
        assert_eq!(config.history.max_chart_points, 150);
        assert_eq!(config.assistant.delay_ms, 800);
        assert_eq!(config.site.utc_offset().unwrap().local_minus_utc(), -5 * 3600);
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(
                "[history]\ndays = 30\n\n[map.marker]\nicon_size = [30, 48]\nicon_anchor = [15, 48]\nicon_url = \"/a.png\"\nshadow_url = \"/b.png\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();
        let config: SentinelConfig = settings.try_deserialize().unwrap();

        assert_eq!(config.history.days, 30);
        assert_eq!(config.history.readings_per_day, 12);
        assert_eq!(config.map.marker.icon_size, [30, 48]);
        assert!(config.map.tile_url.contains("cartocdn"));
    }

    #[test]
    fn test_invalid_offset() {
        let site = SiteSettings {
            utc_offset_minutes: 24 * 60,
        };
        assert!(site.utc_offset().is_err());
    }

    #[test]
    fn test_charts_for_domain() {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(
                r##"
[[charts]]
id = "agro-temperature"
domain = "agriculture"
metric = "temperature"
title = "Temperatura"
color = "#f97316"
unit = "°C"

[[charts]]
id = "plant-oee"
domain = "industry"
metric = "oee"
title = "OEE"
color = "#22c55e"
"##,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();
        let widgets: WidgetsConfig = settings.try_deserialize().unwrap();

        let industry: Vec<&ChartConfig> = widgets.charts_for(Domain::Industry).collect();
        assert_eq!(industry.len(), 1);
        assert_eq!(industry[0].metric, MetricKey::Oee);
        assert!(industry[0].unit.is_none());
    }
}
