// Monitored entity domain model (greenhouse, machine, worker)
use super::metric::MetricKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The three branded dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Agriculture,
    Industry,
    Personal,
}

impl Domain {
    pub const ALL: [Domain; 3] = [Domain::Agriculture, Domain::Industry, Domain::Personal];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Agriculture => "agriculture",
            Domain::Industry => "industry",
            Domain::Personal => "personal",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown domain: {0}")]
pub struct UnknownDomain(pub String);

impl FromStr for Domain {
    type Err = UnknownDomain;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.to_ascii_lowercase();
        let name = match name.as_str() {
            "agro" => "agriculture",
            "ehs" => "personal",
            other => other,
        };
        Domain::ALL
            .into_iter()
            .find(|domain| domain.as_str() == name)
            .ok_or_else(|| UnknownDomain(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Entity {
    pub id: String,
    pub name: String,
    /// Region, plant area or department.
    pub group: String,
    /// City, machine type or job role.
    pub kind: String,
    pub location: Option<GeoPoint>,
    pub baseline: BTreeMap<MetricKey, f64>,
    #[serde(skip)]
    pub keywords: Vec<String>,
}

impl Entity {
    pub fn new(id: &str, name: &str, group: &str, kind: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            group: group.to_string(),
            kind: kind.to_string(),
            location: None,
            baseline: BTreeMap::new(),
            keywords: Vec::new(),
        }
    }

    pub fn at(mut self, lat: f64, lng: f64) -> Self {
        self.location = Some(GeoPoint { lat, lng });
        self
    }

    pub fn with_baseline(mut self, key: MetricKey, value: f64) -> Self {
        self.baseline.insert(key, value);
        self
    }

    pub fn with_keywords(mut self, keywords: &[&str]) -> Self {
        self.keywords = keywords.iter().map(|k| k.to_lowercase()).collect();
        self
    }

    pub fn baseline(&self, key: MetricKey) -> Option<f64> {
        self.baseline.get(&key).copied()
    }

    /// First keyword contained in an already lowercased text.
    pub fn matched_keyword(&self, lowered: &str) -> Option<&str> {
        self.keywords
            .iter()
            .find(|k| lowered.contains(k.as_str()))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_parse() {
        assert_eq!("agriculture".parse::<Domain>().unwrap(), Domain::Agriculture);
        assert_eq!("EHS".parse::<Domain>().unwrap(), Domain::Personal);
        assert!("weather".parse::<Domain>().is_err());
    }

    #[test]
    fn test_matched_keyword() {
        let entity = Entity::new("GH-ORO-01", "Bananera El Oro", "COAST", "Machala")
            .with_keywords(&["Oro", "el oro", "machala"]);

        assert_eq!(entity.matched_keyword("alertas en machala"), Some("machala"));
        assert_eq!(entity.matched_keyword("finca el oro"), Some("oro"));
        assert_eq!(entity.matched_keyword("ambato"), None);
    }

    #[test]
    fn test_baseline_lookup() {
        let entity = Entity::new("GH-AMB-01", "Finca Ambato", "SIERRA", "Ambato")
            .with_baseline(MetricKey::Temperature, 15.0);

        assert_eq!(entity.baseline(MetricKey::Temperature), Some(15.0));
        assert_eq!(entity.baseline(MetricKey::Humidity), None);
    }
}
