// Streaming dashboard service - Progressive loading over an NDJSON stream
use crate::application::dashboard_service::{build_chart, DashboardService, DateRange};
use crate::domain::dashboard::{AlertPanel, DashboardMode, MapView};
use crate::domain::entity::{Domain, Entity};
use crate::domain::metric::MetricKey;
use crate::domain::telemetry::{ChartData, TileData};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Serialize)]
pub struct ChartSkeleton {
    pub id: String,
    pub title: String,
    pub metric: MetricKey,
    pub unit: Option<String>,
    pub color: String,
}

/// Everything known before any chart is filled.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSkeleton {
    pub title: String,
    pub entity: Entity,
    pub mode: DashboardMode,
    pub samples: usize,
    pub tiles: Vec<TileData>,
    pub charts: Vec<ChartSkeleton>,
    pub map: Option<MapView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletionEvent {
    pub widgets: usize,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum StreamMessage {
    Skeleton(DashboardSkeleton),
    ChartUpdate(ChartData),
    Alerts(AlertPanel),
    Complete(CompletionEvent),
}

#[derive(Clone)]
pub struct StreamingDashboardService {
    dashboards: DashboardService,
}

impl StreamingDashboardService {
    pub fn new(dashboards: DashboardService) -> Self {
        Self { dashboards }
    }

    pub async fn stream_dashboard(
        &self,
        domain: Domain,
        entity_id: &str,
        mode: DashboardMode,
        range: &DateRange,
    ) -> mpsc::Receiver<StreamMessage> {
        let (tx, rx) = mpsc::channel(100);
        let start_time = Instant::now();

        let series = Arc::new(self.dashboards.active_series(domain, entity_id, mode, range));
        let charts: Vec<_> = self.dashboards.charts_config(domain).cloned().collect();

        // 1. Build and send skeleton immediately
        let skeleton = DashboardSkeleton {
            title: format!("{} - {}", domain.profile().title, series.entity.name),
            entity: series.entity.clone(),
            mode,
            samples: series.samples.len(),
            tiles: self.dashboards.tiles(domain, &series),
            charts: charts
                .iter()
                .map(|c| ChartSkeleton {
                    id: c.id.clone(),
                    title: c.title.clone(),
                    metric: c.metric,
                    unit: c.unit.clone(),
                    color: c.color.clone(),
                })
                .collect(),
            map: self.dashboards.map_view(domain, &series.entity.id),
        };
        // Tiles, charts and the alert panel
        let total_widgets = skeleton.tiles.len() + skeleton.charts.len() + 1;
        let _ = tx.send(StreamMessage::Skeleton(skeleton)).await;

        // 2. Spawn one task per chart
        let max_points = self.dashboards.max_chart_points();
        let mut tasks = Vec::with_capacity(charts.len());
        for chart_config in charts {
            let tx = tx.clone();
            let series = series.clone();

            tasks.push(tokio::spawn(async move {
                let chart = build_chart(&chart_config, &series, max_points);
                tracing::debug!("Chart {} ready with {} points", chart.id, chart.points.len());
                let _ = tx.send(StreamMessage::ChartUpdate(chart)).await;
            }));
        }

        // 3. Alert panel and completion once every chart was sent
        let dashboards = self.dashboards.clone();
        tokio::spawn(async move {
            for task in tasks {
                if let Err(e) = task.await {
                    tracing::error!("Chart task failed: {}", e);
                }
            }

            let panel = dashboards.alert_panel(domain, &series);
            let _ = tx.send(StreamMessage::Alerts(panel)).await;

            let complete = CompletionEvent {
                widgets: total_widgets,
                duration_ms: start_time.elapsed().as_millis() as u64,
            };
            let _ = tx.send(StreamMessage::Complete(complete)).await;
        });

        rx
    }
}
