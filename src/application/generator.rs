// Synthetic series generator - one schema-driven implementation for every dashboard
use crate::application::anomaly;
use crate::application::entity_registry::EntityRegistry;
use crate::domain::derived::{growing_degree_increment, oee_proxy, vapor_pressure_deficit};
use crate::domain::entity::Domain;
use crate::domain::metric::{Derivation, MetricKey, MetricSpec, TickContext};
use crate::domain::profile::DomainProfile;
use crate::domain::telemetry::{Sample, Series, WindowKind};
use chrono::{DateTime, Datelike, FixedOffset, TimeDelta, Timelike, Utc};
use rand::Rng;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// `MMM dd HH:mm`, e.g. `Mar 10 14:00`
pub const DISPLAY_FORMAT: &str = "%b %d %H:%M";

const MILLIS_PER_DAY: i64 = 86_400_000;

#[derive(Clone)]
pub struct SeriesGenerator {
    registry: Arc<dyn EntityRegistry>,
    utc_offset: FixedOffset,
}

impl SeriesGenerator {
    pub fn new(registry: Arc<dyn EntityRegistry>, utc_offset: FixedOffset) -> Self {
        Self {
            registry,
            utc_offset,
        }
    }

    pub fn registry(&self) -> &Arc<dyn EntityRegistry> {
        &self.registry
    }

    pub fn utc_offset(&self) -> FixedOffset {
        self.utc_offset
    }

    /// Generate a series ending now with the thread-local random source
    pub fn generate(&self, domain: Domain, window: WindowKind, entity_id: &str) -> Series {
        self.generate_at(domain, window, entity_id, Utc::now(), &mut rand::thread_rng())
    }

    pub fn generate_at<R: Rng + ?Sized>(
        &self,
        domain: Domain,
        window: WindowKind,
        entity_id: &str,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Series {
        self.generate_with(domain.profile(), window, entity_id, now, rng)
    }

    fn generate_with<R: Rng + ?Sized>(
        &self,
        profile: &DomainProfile,
        window: WindowKind,
        entity_id: &str,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Series {
        let entity = self.registry.resolve(profile.domain, entity_id).clone();
        let count = window.sample_count();
        if count == 0 {
            return Series::new(entity, window, Vec::new());
        }
        let Some((start, step)) = layout(window, now) else {
            tracing::warn!(
                "{:?} reaches past the supported time range, returning an empty series for {}",
                window,
                entity.id
            );
            return Series::new(entity, window, Vec::new());
        };

        let live = window.is_live();
        let readings_per_day = window.readings_per_day();
        let rate = profile.anomaly_rate(live);
        let mut accumulators = seed_accumulators(profile.derived_metrics(), live);
        let mut samples = Vec::with_capacity(count);
        let mut anomalies = 0usize;

        for tick in 0..count {
            let at = start + step * tick as i32;
            let local = at.with_timezone(&self.utc_offset);
            let ctx = TickContext {
                hour: local.hour(),
                day_of_year: local.ordinal(),
                live,
            };

            let mut values = BTreeMap::new();
            for spec in profile.generated_metrics() {
                let baseline = spec.resolve_baseline(entity.baseline(spec.key));
                values.insert(spec.key, spec.evaluate(baseline, ctx, rng));
            }

            let fault = if anomaly::is_anomalous(rate, tick, rng) {
                anomaly::inject(profile, &entity, live, &mut values, rng)
            } else {
                None
            };
            if let Some(fault) = fault {
                tracing::trace!("Tick {} of {}: {}", tick, entity.id, fault.name);
                anomalies += 1;
            }

            // Derived values are computed from the rounded primaries they sit next to
            for spec in profile.generated_metrics() {
                if let Some(value) = values.get_mut(&spec.key) {
                    *value = spec.round(*value);
                }
            }
            for spec in profile.derived_metrics() {
                let value = derive(
                    spec,
                    &values,
                    ctx,
                    readings_per_day,
                    fault.is_some(),
                    &mut accumulators,
                    rng,
                );
                values.insert(spec.key, spec.round(value));
            }

            samples.push(Sample::new(
                at,
                local.format(DISPLAY_FORMAT).to_string(),
                values,
            ));
        }

        tracing::debug!(
            "Generated {} {:?} {} samples for {} ({} anomalous)",
            samples.len(),
            window,
            profile.domain,
            entity.id,
            anomalies
        );

        Series::new(entity, window, samples)
    }
}

/// First timestamp and spacing of a non-empty window ending at `now`.
///
/// `None` when the window starts before the earliest representable instant.
fn layout(window: WindowKind, now: DateTime<Utc>) -> Option<(DateTime<Utc>, TimeDelta)> {
    let (days, step) = match window {
        WindowKind::Live => (1, TimeDelta::hours(1)),
        WindowKind::History {
            days,
            readings_per_day,
        } => {
            // Spacing never collapses below one millisecond
            let millis = (MILLIS_PER_DAY / i64::from(readings_per_day.max(1))).max(1);
            (days, TimeDelta::milliseconds(millis))
        }
    };
    let start = now.checked_sub_signed(TimeDelta::try_days(i64::from(days))?)?;
    Some((start, step))
}

fn seed_accumulators<'a>(
    derived: impl Iterator<Item = &'a MetricSpec>,
    live: bool,
) -> HashMap<MetricKey, f64> {
    derived
        .filter_map(|spec| match spec.derivation {
            Some(Derivation::GrowingDegreeDays { live_seed, .. }) => {
                Some((spec.key, if live { live_seed } else { 0.0 }))
            }
            _ => None,
        })
        .collect()
}

fn derive<R: Rng + ?Sized>(
    spec: &MetricSpec,
    values: &BTreeMap<MetricKey, f64>,
    ctx: TickContext,
    readings_per_day: u32,
    anomalous: bool,
    accumulators: &mut HashMap<MetricKey, f64>,
    rng: &mut R,
) -> f64 {
    match spec.derivation {
        Some(Derivation::VaporPressureDeficit {
            temperature,
            humidity,
        }) => match (values.get(&temperature), values.get(&humidity)) {
            (Some(&t), Some(&rh)) => vapor_pressure_deficit(t, rh),
            _ => 0.0,
        },
        Some(Derivation::GrowingDegreeDays {
            temperature, base, ..
        }) => {
            let increment = values
                .get(&temperature)
                .map(|&t| growing_degree_increment(t, base, readings_per_day))
                .unwrap_or_default();
            let total = accumulators.entry(spec.key).or_default();
            *total += increment;
            *total
        }
        Some(Derivation::EquipmentEffectiveness {
            schedule,
            quality: (low, high),
            anomaly_penalty,
        }) => {
            let draw = low + rng.r#gen::<f64>() * (high - low);
            oee_proxy(schedule.is_active(ctx.hour), draw, anomalous, anomaly_penalty)
        }
        None => 0.0,
    }
}
