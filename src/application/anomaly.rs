// Anomaly injection - probabilistic and periodic fault overrides
use crate::domain::entity::Entity;
use crate::domain::metric::MetricKey;
use crate::domain::profile::{AnomalyRate, DomainProfile, FaultClass};
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;

/// Decide whether a tick carries a fault.
///
/// The random draw is taken on every tick so the stride does not shift
/// the rest of the random stream.
pub fn is_anomalous<R: Rng + ?Sized>(rate: AnomalyRate, tick: usize, rng: &mut R) -> bool {
    let drawn = rng.r#gen::<f64>() < rate.probability;
    let periodic = rate
        .stride
        .is_some_and(|stride| stride > 0 && tick % stride == 0);
    drawn || periodic
}

/// Override exactly one metric with a fault chosen uniformly among the domain's classes.
pub fn inject<'p, R: Rng + ?Sized>(
    profile: &'p DomainProfile,
    entity: &Entity,
    live: bool,
    values: &mut BTreeMap<MetricKey, f64>,
    rng: &mut R,
) -> Option<&'p FaultClass> {
    let fault = profile.faults.choose(rng)?;
    let baseline = profile
        .metric(fault.metric)
        .map(|spec| spec.resolve_baseline(entity.baseline(fault.metric)))
        .unwrap_or_default();

    if let Some(value) = values.get_mut(&fault.metric) {
        *value = fault.apply(live, *value, baseline);
    }

    Some(fault)
}
