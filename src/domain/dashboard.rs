// Dashboard domain model
use super::alert::{AlertCount, AlertEvent};
use super::entity::{Entity, GeoPoint};
use super::telemetry::{ChartData, Sample, TileData};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardMode {
    #[default]
    #[serde(alias = "LIVE")]
    Live,
    #[serde(alias = "HISTORY")]
    History,
}

/// Marker icon settings handed to the map widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub icon_url: String,
    pub shadow_url: String,
    pub icon_size: [u32; 2],
    pub icon_anchor: [u32; 2],
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            icon_url: "/assets/marker-icon.png".to_string(),
            shadow_url: "/assets/marker-shadow.png".to_string(),
            icon_size: [25, 41],
            icon_anchor: [12, 41],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SiteState {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "ALERTA")]
    Alert,
}

#[derive(Debug, Clone, Serialize)]
pub struct SiteStatus {
    pub id: String,
    pub name: String,
    pub location: GeoPoint,
    pub selected: bool,
    pub latest: Option<Sample>,
    pub status: SiteState,
}

#[derive(Debug, Clone, Serialize)]
pub struct MapView {
    pub tile_url: String,
    pub marker: MarkerStyle,
    pub sites: Vec<SiteStatus>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AlertPanel {
    /// Newest first.
    pub recent: Vec<AlertEvent>,
    pub counts: Vec<AlertCount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub title: String,
    pub entity: Entity,
    pub mode: DashboardMode,
    pub samples: usize,
    pub tiles: Vec<TileData>,
    pub charts: Vec<ChartData>,
    pub alerts: AlertPanel,
    pub map: Option<MapView>,
}
