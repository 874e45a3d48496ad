// HTTP request handlers
use crate::application::chat_service::{ChatIntro, ChatTurn};
use crate::application::classifier;
use crate::application::dashboard_service::DateRange;
use crate::domain::dashboard::{AlertPanel, Dashboard, DashboardMode};
use crate::domain::entity::{Domain, Entity};
use crate::domain::telemetry::{Series, WindowKind};
use crate::infrastructure::config::HistorySettings;
use crate::infrastructure::json_stream::stream_from_receiver;
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowParam {
    #[default]
    Live,
    History,
}

#[derive(Debug, Default, Deserialize)]
pub struct SeriesQuery {
    #[serde(default)]
    pub window: WindowParam,
    pub days: Option<u32>,
    pub readings_per_day: Option<u32>,
}

impl SeriesQuery {
    fn window(&self, defaults: &HistorySettings) -> Result<WindowKind, ApiError> {
        match self.window {
            WindowParam::Live => Ok(WindowKind::Live),
            WindowParam::History => {
                let window = WindowKind::History {
                    days: self.days.unwrap_or(defaults.days),
                    readings_per_day: self.readings_per_day.unwrap_or(defaults.readings_per_day),
                };
                window.check_limits()?;
                Ok(window)
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub mode: DashboardMode,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl DashboardQuery {
    fn range(&self) -> DateRange {
        DateRange {
            start: self.start.clone(),
            end: self.end.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub query: String,
    pub entity_id: Option<String>,
    #[serde(default)]
    pub mode: DashboardMode,
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List the monitored entities of a dashboard
pub async fn list_entities(
    Path(domain): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Entity>>, ApiError> {
    let domain: Domain = domain.parse()?;
    Ok(Json(state.dashboard_service.entities(domain).to_vec()))
}

/// Raw generated series
pub async fn get_series(
    Path((domain, id)): Path<(String, String)>,
    query: Result<Query<SeriesQuery>, QueryRejection>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Series>, ApiError> {
    let domain: Domain = domain.parse()?;
    let Query(query) = query?;
    let window = query.window(&state.history)?;

    Ok(Json(state.generator.generate(domain, window, &id)))
}

/// Classified alerts of a freshly generated series
pub async fn get_alerts(
    Path((domain, id)): Path<(String, String)>,
    query: Result<Query<SeriesQuery>, QueryRejection>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<AlertPanel>, ApiError> {
    let domain: Domain = domain.parse()?;
    let Query(query) = query?;
    let window = query.window(&state.history)?;

    let series = state.generator.generate(domain, window, &id);
    Ok(Json(AlertPanel {
        recent: classifier::classify(domain, &series),
        counts: classifier::summarize(domain, &series),
    }))
}

/// Whole dashboard in one response
pub async fn get_dashboard(
    Path((domain, id)): Path<(String, String)>,
    query: Result<Query<DashboardQuery>, QueryRejection>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Dashboard>, ApiError> {
    let domain: Domain = domain.parse()?;
    let Query(query) = query?;

    Ok(Json(state.dashboard_service.get_dashboard(
        domain,
        &id,
        query.mode,
        &query.range(),
    )))
}

/// Stream dashboard for a specific entity (progressive loading)
pub async fn stream_dashboard(
    Path((domain, id)): Path<(String, String)>,
    query: Result<Query<DashboardQuery>, QueryRejection>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let domain: Domain = domain.parse()?;
    let Query(query) = query?;

    let rx = state
        .streaming_service
        .stream_dashboard(domain, &id, query.mode, &query.range())
        .await;
    Ok(stream_from_receiver(rx))
}

/// Greeting and suggested questions of the chat widget
pub async fn assistant_intro(
    Path(domain): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ChatIntro>, ApiError> {
    let domain: Domain = domain.parse()?;
    Ok(Json(state.chat_service.intro(domain)))
}

/// One chat turn over the series the user is looking at
pub async fn ask_assistant(
    Path(domain): Path<String>,
    State(state): State<Arc<AppState>>,
    request: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatTurn>, ApiError> {
    let domain: Domain = domain.parse()?;
    let Json(request) = request?;
    if request.query.trim().is_empty() {
        return Err(ApiError::BadRequest("query must not be empty".to_string()));
    }

    let entity_id = match &request.entity_id {
        Some(id) => id.clone(),
        None => state
            .generator
            .registry()
            .default_entity(domain)
            .id
            .clone(),
    };
    let range = DateRange {
        start: request.start.clone(),
        end: request.end.clone(),
    };
    let series = state
        .dashboard_service
        .active_series(domain, &entity_id, request.mode, &range);

    Ok(Json(
        state.chat_service.ask(domain, &request.query, &series).await,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_limits() {
        let defaults = HistorySettings::default();

        let live = SeriesQuery::default();
        assert_eq!(live.window(&defaults).unwrap(), WindowKind::Live);

        let history = SeriesQuery {
            window: WindowParam::History,
            ..SeriesQuery::default()
        };
        assert_eq!(
            history.window(&defaults).unwrap(),
            WindowKind::History {
                days: 200,
                readings_per_day: 12
            }
        );

        let too_long = SeriesQuery {
            window: WindowParam::History,
            days: Some(4000),
            readings_per_day: None,
        };
        assert!(too_long.window(&defaults).is_err());

        let too_dense = SeriesQuery {
            window: WindowParam::History,
            days: Some(3650),
            readings_per_day: Some(1440),
        };
        assert!(too_dense.window(&defaults).is_err());
    }
}
