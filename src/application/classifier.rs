// Alarm classifier - applies a domain's rule table to every sample of a series
use crate::domain::alert::{AlarmRule, AlertCount, AlertEvent};
use crate::domain::entity::{Domain, Entity};
use crate::domain::profile::DomainProfile;
use crate::domain::telemetry::{Sample, Series};

/// Events kept by the alert panel.
pub const RECENT_ALERT_LIMIT: usize = 10;

fn rule_fires(profile: &DomainProfile, rule: &AlarmRule, entity: &Entity, sample: &Sample) -> bool {
    let Some(value) = sample.value(rule.metric) else {
        return false;
    };
    let baseline = profile
        .metric(rule.metric)
        .map(|spec| spec.resolve_baseline(entity.baseline(rule.metric)));
    rule.condition.matches(value, baseline)
}

fn event(profile: &DomainProfile, rule: &AlarmRule, sample: &Sample) -> AlertEvent {
    let value = sample.value(rule.metric).unwrap_or_default();
    let formatted = match profile.metric(rule.metric) {
        Some(spec) => spec.format_value(value),
        None => value.to_string(),
    };
    AlertEvent {
        timestamp: sample.timestamp,
        time: sample.display_label.clone(),
        kind: rule.kind.to_string(),
        metric: rule.metric,
        value: formatted,
        priority: rule.priority,
    }
}

/// Every rule raised by one sample, in rule-table order.
pub fn sample_alerts(domain: Domain, entity: &Entity, sample: &Sample) -> Vec<AlertEvent> {
    let profile = domain.profile();
    profile
        .rules
        .iter()
        .filter(|rule| rule_fires(profile, rule, entity, sample))
        .map(|rule| event(profile, rule, sample))
        .collect()
}

/// All events of a series, oldest first.
pub fn scan(domain: Domain, series: &Series) -> Vec<AlertEvent> {
    series
        .samples
        .iter()
        .flat_map(|sample| sample_alerts(domain, &series.entity, sample))
        .collect()
}

/// Most recent events first, capped at [`RECENT_ALERT_LIMIT`].
pub fn classify(domain: Domain, series: &Series) -> Vec<AlertEvent> {
    let mut recent = Vec::with_capacity(RECENT_ALERT_LIMIT);
    for sample in series.samples.iter().rev() {
        for event in sample_alerts(domain, &series.entity, sample) {
            if recent.len() == RECENT_ALERT_LIMIT {
                return recent;
            }
            recent.push(event);
        }
    }
    recent
}

/// Per-rule totals over the whole series. Rules that never fired are left out.
pub fn summarize(domain: Domain, series: &Series) -> Vec<AlertCount> {
    let profile = domain.profile();
    profile
        .rules
        .iter()
        .map(|rule| AlertCount {
            kind: rule.kind.to_string(),
            metric: rule.metric,
            count: series
                .samples
                .iter()
                .filter(|sample| rule_fires(profile, rule, &series.entity, sample))
                .count(),
        })
        .filter(|count| count.count > 0)
        .collect()
}
