// Domain profiles - metric schema, fault classes, alarm rules and assistant wording per dashboard
mod agriculture;
mod industry;
mod personal;

use super::alert::AlarmRule;
use super::entity::Domain;
use super::metric::{MetricKey, MetricSpec};
use std::sync::LazyLock;

/// How often a window injects faults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnomalyRate {
    /// Independent probability per tick.
    pub probability: f64,
    /// Every `stride`-th tick is anomalous regardless of the draw.
    pub stride: Option<usize>,
}

impl AnomalyRate {
    pub const fn random(probability: f64) -> Self {
        Self {
            probability,
            stride: None,
        }
    }

    pub const fn with_stride(probability: f64, stride: usize) -> Self {
        Self {
            probability,
            stride: Some(stride),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FaultEffect {
    Set(f64),
    Offset(f64),
    /// Entity baseline plus a margin.
    AboveBaseline(f64),
}

impl FaultEffect {
    pub fn apply(&self, current: f64, baseline: f64) -> f64 {
        match *self {
            FaultEffect::Set(value) => value,
            FaultEffect::Offset(delta) => current + delta,
            FaultEffect::AboveBaseline(margin) => baseline + margin,
        }
    }
}

/// One simulated failure mode; an anomalous tick applies exactly one.
#[derive(Debug, Clone)]
pub struct FaultClass {
    pub name: &'static str,
    pub metric: MetricKey,
    pub history: FaultEffect,
    pub live: FaultEffect,
    /// Physical floor the faulted value never crosses.
    pub floor: Option<f64>,
}

impl FaultClass {
    pub fn new(name: &'static str, metric: MetricKey, effect: FaultEffect) -> Self {
        Self {
            name,
            metric,
            history: effect,
            live: effect,
            floor: None,
        }
    }

    pub fn live(mut self, effect: FaultEffect) -> Self {
        self.live = effect;
        self
    }

    pub fn at_least(mut self, floor: f64) -> Self {
        self.floor = Some(floor);
        self
    }

    pub fn effect(&self, live: bool) -> FaultEffect {
        if live { self.live } else { self.history }
    }

    pub fn apply(&self, live: bool, current: f64, baseline: f64) -> f64 {
        let value = self.effect(live).apply(current, baseline);
        match self.floor {
            Some(floor) => value.max(floor),
            None => value,
        }
    }
}

/// Wording and fake table names used by the query assistant.
#[derive(Debug, Clone)]
pub struct AssistantVocabulary {
    pub assistant_name: &'static str,
    pub greeting: &'static str,
    pub suggestions: &'static [&'static str],
    /// Label for the analysed scope (`Ubicación`, `Máquina`, `Operario`).
    pub entity_noun: &'static str,
    /// Scope shown when no entity was named.
    pub current_scope: &'static str,
    pub table: &'static str,
    pub alert_table: &'static str,
    pub help_table: &'static str,
    pub help: &'static str,
}

#[derive(Debug, Clone)]
pub struct DomainProfile {
    pub domain: Domain,
    pub title: &'static str,
    pub metrics: Vec<MetricSpec>,
    /// Metric the assistant falls back to when the question names none.
    pub primary: MetricKey,
    pub history_anomalies: AnomalyRate,
    pub live_anomalies: AnomalyRate,
    pub faults: Vec<FaultClass>,
    pub rules: Vec<AlarmRule>,
    pub vocabulary: AssistantVocabulary,
}

impl DomainProfile {
    pub fn metric(&self, key: MetricKey) -> Option<&MetricSpec> {
        self.metrics.iter().find(|m| m.key == key)
    }

    pub fn primary_metric(&self) -> &MetricSpec {
        self.metric(self.primary).unwrap_or(&self.metrics[0])
    }

    pub fn anomaly_rate(&self, live: bool) -> AnomalyRate {
        if live { self.live_anomalies } else { self.history_anomalies }
    }

    pub fn generated_metrics(&self) -> impl Iterator<Item = &MetricSpec> {
        self.metrics.iter().filter(|m| !m.is_derived())
    }

    pub fn derived_metrics(&self) -> impl Iterator<Item = &MetricSpec> {
        self.metrics.iter().filter(|m| m.is_derived())
    }
}

static AGRICULTURE: LazyLock<DomainProfile> = LazyLock::new(agriculture::profile);
static INDUSTRY: LazyLock<DomainProfile> = LazyLock::new(industry::profile);
static PERSONAL: LazyLock<DomainProfile> = LazyLock::new(personal::profile);

impl Domain {
    pub fn profile(self) -> &'static DomainProfile {
        match self {
            Domain::Agriculture => &AGRICULTURE,
            Domain::Industry => &INDUSTRY,
            Domain::Personal => &PERSONAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_profiles_are_consistent() {
        for domain in Domain::ALL {
            let profile = domain.profile();
            assert_eq!(profile.domain, domain);
            assert_eq!(profile.primary_metric().key, profile.primary);

            let keys: HashSet<MetricKey> = profile.metrics.iter().map(|m| m.key).collect();
            assert_eq!(keys.len(), profile.metrics.len(), "duplicate metric in {}", domain);

            assert!(!profile.faults.is_empty());
            for fault in &profile.faults {
                assert!(keys.contains(&fault.metric), "{} targets unknown metric", fault.name);
            }
            for rule in &profile.rules {
                assert!(keys.contains(&rule.metric), "{} watches unknown metric", rule.kind);
            }
        }
    }

    #[test]
    fn test_derived_inputs_precede_derivations() {
        use crate::domain::metric::Derivation;

        for domain in Domain::ALL {
            let profile = domain.profile();
            for spec in profile.derived_metrics() {
                let inputs: Vec<MetricKey> = match spec.derivation {
                    Some(Derivation::VaporPressureDeficit {
                        temperature,
                        humidity,
                    }) => vec![temperature, humidity],
                    Some(Derivation::GrowingDegreeDays { temperature, .. }) => vec![temperature],
                    _ => Vec::new(),
                };
                for input in inputs {
                    let source = profile.metric(input).expect("input metric");
                    assert!(!source.is_derived());
                }
            }
        }
    }

    #[test]
    fn test_fault_effects() {
        assert_eq!(FaultEffect::Set(2100.0).apply(450.0, 0.0), 2100.0);
        assert_eq!(FaultEffect::Offset(-30.0).apply(50.0, 0.0), 20.0);
        assert_eq!(FaultEffect::AboveBaseline(20.0).apply(17.0, 15.0), 35.0);
    }

    #[test]
    fn test_dryness_keeps_humidity_non_negative() {
        let profile = Domain::Agriculture.profile();
        let dryness = profile.faults.iter().find(|f| f.name == "dryness").unwrap();

        assert_eq!(dryness.apply(true, 10.0, 50.0), 0.0);
        assert_eq!(dryness.apply(true, 60.0, 50.0), 35.0);
        assert_eq!(dryness.apply(false, 30.0, 50.0), 0.0);
        assert_eq!(dryness.apply(false, 50.0, 50.0), 20.0);
    }
}
