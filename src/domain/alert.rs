// Alarm domain model - threshold rules and the events they raise
use super::metric::MetricKey;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// ISA 18.2 style priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Warning,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Condition {
    Above(f64),
    Below(f64),
    /// Outside the closed range.
    Outside(f64, f64),
    /// Inside the half-open range `[low, high)`.
    Between(f64, f64),
    Equals(f64),
    /// More than `margin` over the entity's own baseline for the metric.
    AboveBaseline(f64),
}

impl Condition {
    pub fn matches(&self, value: f64, baseline: Option<f64>) -> bool {
        match *self {
            Condition::Above(limit) => value > limit,
            Condition::Below(limit) => value < limit,
            Condition::Outside(low, high) => value < low || value > high,
            Condition::Between(low, high) => value >= low && value < high,
            Condition::Equals(target) => value == target,
            Condition::AboveBaseline(margin) => baseline.is_some_and(|b| value > b + margin),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AlarmRule {
    /// Category label shown in the alert panel.
    pub kind: &'static str,
    pub metric: MetricKey,
    pub condition: Condition,
    pub priority: Priority,
}

impl AlarmRule {
    pub fn critical(kind: &'static str, metric: MetricKey, condition: Condition) -> Self {
        Self {
            kind,
            metric,
            condition,
            priority: Priority::Critical,
        }
    }

    pub fn warning(kind: &'static str, metric: MetricKey, condition: Condition) -> Self {
        Self {
            kind,
            metric,
            condition,
            priority: Priority::Warning,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertEvent {
    pub timestamp: DateTime<Utc>,
    /// Display label of the sample that raised it.
    pub time: String,
    pub kind: String,
    pub metric: MetricKey,
    pub value: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertCount {
    pub kind: String,
    pub metric: MetricKey,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conditions() {
        assert!(Condition::Above(40.0).matches(40.1, None));
        assert!(!Condition::Above(40.0).matches(40.0, None));
        assert!(Condition::Outside(0.2, 3.0).matches(0.1, None));
        assert!(!Condition::Outside(0.2, 3.0).matches(3.0, None));
        assert!(Condition::Between(1.0, 60.0).matches(1.0, None));
        assert!(!Condition::Between(1.0, 60.0).matches(60.0, None));
        assert!(Condition::Equals(1.0).matches(1.0, None));
    }

    #[test]
    fn test_above_baseline_needs_baseline() {
        let condition = Condition::AboveBaseline(40.0);
        assert!(condition.matches(90.0, Some(45.0)));
        assert!(!condition.matches(80.0, Some(45.0)));
        assert!(!condition.matches(900.0, None));
    }
}
