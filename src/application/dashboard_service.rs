// Dashboard service - Use case for building dashboards
use crate::application::classifier;
use crate::application::generator::SeriesGenerator;
use crate::domain::dashboard::{
    AlertPanel, Dashboard, DashboardMode, MapView, SiteState, SiteStatus,
};
use crate::domain::entity::{Domain, Entity};
use crate::domain::telemetry::{downsample_points, ChartData, Series, TileData, WindowKind};
use crate::infrastructure::config::{ChartConfig, HistorySettings, MapSettings, WidgetsConfig};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use serde::Deserialize;
use thiserror::Error;

/// Optional `yyyy-MM-dd` bounds of a history view, both days inclusive.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DateRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Error)]
pub enum RangeError {
    #[error("invalid date {input:?}: {source}")]
    Parse {
        input: String,
        source: chrono::ParseError,
    },
    #[error("range starts on {start} after it ends on {end}")]
    Inverted { start: NaiveDate, end: NaiveDate },
}

fn parse_day(input: &str) -> Result<NaiveDate, RangeError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|source| RangeError::Parse {
        input: input.to_string(),
        source,
    })
}

fn at_site(day: NaiveDate, time: NaiveTime, offset: FixedOffset) -> DateTime<Utc> {
    // A fixed offset has exactly one mapping for every local time
    let local = NaiveDateTime::new(day, time) - TimeDelta::seconds(offset.local_minus_utc() as i64);
    local.and_utc()
}

/// UTC instants covering `[start 00:00, end 23:59:59.999]` in site time.
///
/// Missing bounds default to the last `default_days` days ending `today`.
pub fn resolve_range(
    range: &DateRange,
    today: NaiveDate,
    default_days: u32,
    offset: FixedOffset,
) -> Result<(DateTime<Utc>, DateTime<Utc>), RangeError> {
    let end = match range.end.as_deref() {
        Some(s) if !s.trim().is_empty() => parse_day(s)?,
        _ => today,
    };
    let start = match range.start.as_deref() {
        Some(s) if !s.trim().is_empty() => parse_day(s)?,
        _ => end - TimeDelta::days(default_days as i64),
    };
    if start > end {
        return Err(RangeError::Inverted { start, end });
    }

    let end_of_day = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    Ok((
        at_site(start, NaiveTime::MIN, offset),
        at_site(end, end_of_day, offset),
    ))
}

/// Chart widget filled from a series, at most `max_points` points.
pub fn build_chart(config: &ChartConfig, series: &Series, max_points: usize) -> ChartData {
    ChartData {
        id: config.id.clone(),
        title: config.title.clone(),
        metric: config.metric,
        unit: config.unit.clone(),
        color: config.color.clone(),
        points: downsample_points(series.points(config.metric), max_points),
    }
}

#[derive(Clone)]
pub struct DashboardService {
    generator: SeriesGenerator,
    widgets_config: WidgetsConfig,
    history: HistorySettings,
    map: MapSettings,
}

impl DashboardService {
    pub fn new(
        generator: SeriesGenerator,
        widgets_config: WidgetsConfig,
        history: HistorySettings,
        map: MapSettings,
    ) -> Self {
        Self {
            generator,
            widgets_config,
            history,
            map,
        }
    }

    pub fn entities(&self, domain: Domain) -> &[Entity] {
        self.generator.registry().list_entities(domain)
    }

    pub fn charts_config(&self, domain: Domain) -> impl Iterator<Item = &ChartConfig> {
        self.widgets_config.charts_for(domain)
    }

    pub fn max_chart_points(&self) -> usize {
        self.history.max_chart_points
    }

    /// Series behind a dashboard view. Bad date ranges yield an empty series.
    pub fn active_series(
        &self,
        domain: Domain,
        entity_id: &str,
        mode: DashboardMode,
        range: &DateRange,
    ) -> Series {
        match mode {
            DashboardMode::Live => self.generator.generate(domain, WindowKind::Live, entity_id),
            DashboardMode::History => {
                let series = self.generator.generate(domain, self.history.window(), entity_id);
                let offset = self.generator.utc_offset();
                let today = Utc::now().with_timezone(&offset).date_naive();

                match resolve_range(range, today, self.history.default_range_days, offset) {
                    Ok((from, to)) => {
                        let filtered = series.retain(|s| s.timestamp >= from && s.timestamp <= to);
                        if filtered.is_empty() {
                            tracing::warn!(
                                "No history for {} between {} and {}",
                                entity_id,
                                from,
                                to
                            );
                        }
                        filtered
                    }
                    Err(e) => {
                        tracing::error!("Invalid history range for {}: {}", entity_id, e);
                        series.retain(|_| false)
                    }
                }
            }
        }
    }

    /// KPI tiles from the latest sample, flagged when that sample raised an alert on the metric.
    pub fn tiles(&self, domain: Domain, series: &Series) -> Vec<TileData> {
        let Some(latest) = series.latest() else {
            return Vec::new();
        };
        let alerts = classifier::sample_alerts(domain, &series.entity, latest);

        domain
            .profile()
            .metrics
            .iter()
            .filter_map(|spec| {
                latest.value(spec.key).map(|value| TileData {
                    metric: spec.key,
                    title: spec.label.to_string(),
                    unit: spec.unit.to_string(),
                    value,
                    precision: spec.precision,
                    alert: alerts.iter().any(|a| a.metric == spec.key),
                })
            })
            .collect()
    }

    pub fn alert_panel(&self, domain: Domain, series: &Series) -> AlertPanel {
        AlertPanel {
            recent: classifier::classify(domain, series),
            counts: classifier::summarize(domain, series),
        }
    }

    /// Located entities with their latest live status. `None` when the domain has no map.
    pub fn map_view(&self, domain: Domain, selected: &str) -> Option<MapView> {
        let sites: Vec<SiteStatus> = self
            .entities(domain)
            .iter()
            .filter_map(|entity| {
                let location = entity.location?;
                let live = self.generator.generate(domain, WindowKind::Live, &entity.id);
                let latest = live.latest().cloned();
                let alerting = latest
                    .as_ref()
                    .is_some_and(|s| !classifier::sample_alerts(domain, entity, s).is_empty());

                Some(SiteStatus {
                    id: entity.id.clone(),
                    name: entity.name.clone(),
                    location,
                    selected: entity.id == selected,
                    latest,
                    status: if alerting { SiteState::Alert } else { SiteState::Ok },
                })
            })
            .collect();

        if sites.is_empty() {
            return None;
        }

        Some(MapView {
            tile_url: self.map.tile_url.clone(),
            marker: self.map.marker.clone(),
            sites,
        })
    }

    pub fn get_dashboard(
        &self,
        domain: Domain,
        entity_id: &str,
        mode: DashboardMode,
        range: &DateRange,
    ) -> Dashboard {
        let series = self.active_series(domain, entity_id, mode, range);
        let title = format!("{} - {}", domain.profile().title, series.entity.name);

        let charts = self
            .charts_config(domain)
            .map(|c| build_chart(c, &series, self.history.max_chart_points))
            .collect();

        tracing::debug!(
            "Dashboard {} built from {} samples",
            series.entity.id,
            series.samples.len()
        );

        Dashboard {
            title,
            mode,
            samples: series.samples.len(),
            tiles: self.tiles(domain, &series),
            charts,
            alerts: self.alert_panel(domain, &series),
            map: self.map_view(domain, &series.entity.id),
            entity: series.entity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metric::MetricKey;
    use crate::infrastructure::static_registry::StaticRegistry;
    use std::sync::Arc;

    fn offset() -> FixedOffset {
        FixedOffset::west_opt(5 * 3600).unwrap()
    }

    fn widgets() -> WidgetsConfig {
        WidgetsConfig {
            charts: vec![
                ChartConfig {
                    id: "agro-temperature".to_string(),
                    domain: Domain::Agriculture,
                    metric: MetricKey::Temperature,
                    title: "Temperatura".to_string(),
                    color: "#f97316".to_string(),
                    unit: Some("°C".to_string()),
                },
                ChartConfig {
                    id: "plant-oee".to_string(),
                    domain: Domain::Industry,
                    metric: MetricKey::Oee,
                    title: "OEE".to_string(),
                    color: "#22c55e".to_string(),
                    unit: Some("%".to_string()),
                },
            ],
        }
    }

    fn service() -> DashboardService {
        let generator = SeriesGenerator::new(Arc::new(StaticRegistry::new()), offset());
        DashboardService::new(
            generator,
            widgets(),
            HistorySettings::default(),
            MapSettings::default(),
        )
    }

    fn range(start: &str, end: &str) -> DateRange {
        DateRange {
            start: Some(start.to_string()),
            end: Some(end.to_string()),
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_resolve_range_bounds() {
        let (from, to) =
            resolve_range(&range("2025-03-01", "2025-03-07"), day(2025, 3, 10), 7, offset())
                .unwrap();

        assert_eq!(from.to_rfc3339(), "2025-03-01T05:00:00+00:00");
        assert_eq!(to - from, TimeDelta::days(7) - TimeDelta::milliseconds(1));
    }

    #[test]
    fn test_resolve_range_defaults() {
        let (from, to) =
            resolve_range(&DateRange::default(), day(2025, 3, 10), 7, offset()).unwrap();

        assert_eq!(from.with_timezone(&offset()).date_naive(), day(2025, 3, 3));
        assert_eq!(to.with_timezone(&offset()).date_naive(), day(2025, 3, 10));
    }

    #[test]
    fn test_resolve_range_errors() {
        let today = day(2025, 3, 10);
        assert!(matches!(
            resolve_range(&range("03/01/2025", "2025-03-07"), today, 7, offset()),
            Err(RangeError::Parse { .. })
        ));
        assert!(matches!(
            resolve_range(&range("2025-03-08", "2025-03-07"), today, 7, offset()),
            Err(RangeError::Inverted { .. })
        ));
    }

    #[test]
    fn test_live_dashboard() {
        let service = service();
        let dashboard = service.get_dashboard(
            Domain::Agriculture,
            "GH-TEN-01",
            DashboardMode::Live,
            &DateRange::default(),
        );

        assert_eq!(dashboard.samples, 24);
        assert_eq!(dashboard.entity.id, "GH-TEN-01");
        assert_eq!(dashboard.charts.len(), 1);
        assert_eq!(dashboard.charts[0].points.len(), 24);
        assert_eq!(dashboard.tiles.len(), 7);
        assert!(dashboard.alerts.recent.len() <= 10);

        let map = dashboard.map.expect("greenhouses are mapped");
        assert_eq!(map.sites.len(), 5);
        assert_eq!(map.sites.iter().filter(|s| s.selected).count(), 1);
        assert!(map.sites.iter().all(|s| s.latest.is_some()));
    }

    #[test]
    fn test_history_dashboard_is_filtered_and_downsampled() {
        let service = service();
        let dashboard = service.get_dashboard(
            Domain::Agriculture,
            "GH-AMB-01",
            DashboardMode::History,
            &DateRange::default(),
        );

        // Seven full days plus today so far, twelve readings a day
        assert!(dashboard.samples > 7 * 12 - 2 && dashboard.samples <= 8 * 12 + 1);
        assert!(dashboard.charts[0].points.len() <= 150);
    }

    #[test]
    fn test_bad_range_degrades_to_empty() {
        let service = service();
        let dashboard = service.get_dashboard(
            Domain::Industry,
            "MACH-01",
            DashboardMode::History,
            &range("yesterday", "today"),
        );

        assert_eq!(dashboard.samples, 0);
        assert!(dashboard.tiles.is_empty());
        assert!(dashboard.charts[0].points.is_empty());
        assert!(dashboard.alerts.recent.is_empty());
        assert!(dashboard.map.is_none());
    }

    #[test]
    fn test_tiles_flag_alerting_metric() {
        let service = service();
        let mut series = service.active_series(
            Domain::Agriculture,
            "GH-AMB-01",
            DashboardMode::Live,
            &DateRange::default(),
        );
        let latest = series.samples.last_mut().unwrap();
        latest.metrics.insert(MetricKey::Temperature, 45.0);
        latest.metrics.insert(MetricKey::Humidity, 60.0);
        latest.metrics.insert(MetricKey::Vpd, 1.0);
        latest.metrics.insert(MetricKey::Co2, 500.0);
        latest.metrics.insert(MetricKey::Battery, 90.0);
        latest.metrics.insert(MetricKey::Rssi, -60.0);

        let tiles = service.tiles(Domain::Agriculture, &series);
        let flagged: Vec<MetricKey> = tiles.iter().filter(|t| t.alert).map(|t| t.metric).collect();
        assert_eq!(flagged, vec![MetricKey::Temperature]);
    }
}
