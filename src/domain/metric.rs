// Metric schema - one generic description per measured quantity
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// Every quantity the dashboards know about, named for what it measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    Temperature,
    Humidity,
    Vpd,
    Co2,
    Battery,
    Rssi,
    Gdd,
    Vibration,
    Power,
    Rpm,
    Oee,
    HeartRate,
    Fatigue,
    BodyTemperature,
    ManDown,
}

impl MetricKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKey::Temperature => "temperature",
            MetricKey::Humidity => "humidity",
            MetricKey::Vpd => "vpd",
            MetricKey::Co2 => "co2",
            MetricKey::Battery => "battery",
            MetricKey::Rssi => "rssi",
            MetricKey::Gdd => "gdd",
            MetricKey::Vibration => "vibration",
            MetricKey::Power => "power",
            MetricKey::Rpm => "rpm",
            MetricKey::Oee => "oee",
            MetricKey::HeartRate => "heart_rate",
            MetricKey::Fatigue => "fatigue",
            MetricKey::BodyTemperature => "body_temperature",
            MetricKey::ManDown => "man_down",
        }
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the resting level of a metric comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Baseline {
    /// Per-entity parameter keyed by the metric, with a fallback when the entity lacks it.
    Entity { fallback: f64 },
    Fixed(f64),
}

/// Uniform noise added on every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Noise {
    None,
    /// `(u - 0.5) * width`, centred on zero.
    Centered(f64),
    /// `u * width`; a negative width yields a downward offset.
    Offset(f64),
}

impl Noise {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match *self {
            Noise::None => 0.0,
            Noise::Centered(width) => (rng.r#gen::<f64>() - 0.5) * width,
            Noise::Offset(width) => rng.r#gen::<f64>() * width,
        }
    }
}

/// Level used outside a shift schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdleLevel {
    pub value: f64,
    pub noise: Noise,
}

/// Working hours of a machine or a worker. Both ends are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShiftSchedule {
    pub start_hour: u32,
    pub end_hour: u32,
    pub active_offset: f64,
    pub ramp_per_hour: f64,
    /// `None` keeps the baseline outside the shift.
    pub idle: Option<IdleLevel>,
}

impl ShiftSchedule {
    pub fn new(start_hour: u32, end_hour: u32) -> Self {
        Self {
            start_hour,
            end_hour,
            active_offset: 0.0,
            ramp_per_hour: 0.0,
            idle: None,
        }
    }

    pub fn with_offset(mut self, offset: f64) -> Self {
        self.active_offset = offset;
        self
    }

    pub fn with_ramp(mut self, per_hour: f64) -> Self {
        self.ramp_per_hour = per_hour;
        self
    }

    pub fn idle_at(mut self, value: f64, noise: Noise) -> Self {
        self.idle = Some(IdleLevel { value, noise });
        self
    }

    pub fn is_active(&self, hour: u32) -> bool {
        hour >= self.start_hour && hour <= self.end_hour
    }
}

/// Shape of the signal over a day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DailyCycle {
    Flat,
    /// `amplitude * sin(2π (hour - 6) / 24)`: trough near dawn, crest in the afternoon.
    Diurnal { amplitude: f64 },
    Shift(ShiftSchedule),
}

/// Diurnal sine term shared by every metric that follows the sun.
pub fn diurnal_offset(hour: u32, amplitude: f64) -> f64 {
    amplitude * (((hour as f64 - 6.0) / 24.0) * 2.0 * PI).sin()
}

/// Slow yearly drift.
pub fn seasonal_offset(day_of_year: u32, amplitude: f64) -> f64 {
    amplitude * ((day_of_year as f64 / 365.0) * 2.0 * PI).sin()
}

/// Metrics computed from other metrics of the same sample instead of being drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Derivation {
    VaporPressureDeficit {
        temperature: MetricKey,
        humidity: MetricKey,
    },
    GrowingDegreeDays {
        temperature: MetricKey,
        base: f64,
        /// Accumulator the rolling window starts from (season to date).
        live_seed: f64,
    },
    EquipmentEffectiveness {
        schedule: ShiftSchedule,
        quality: (f64, f64),
        anomaly_penalty: f64,
    },
}

/// Tick position handed to [`MetricSpec::evaluate`].
#[derive(Debug, Clone, Copy)]
pub struct TickContext {
    pub hour: u32,
    pub day_of_year: u32,
    pub live: bool,
}

#[derive(Debug, Clone)]
pub struct MetricSpec {
    pub key: MetricKey,
    pub label: &'static str,
    pub unit: &'static str,
    pub precision: u32,
    pub baseline: Baseline,
    pub live_offset: f64,
    pub seasonal_amplitude: f64,
    pub cycle: DailyCycle,
    pub noise: Noise,
    pub live_noise: Noise,
    pub clamp: Option<(f64, f64)>,
    pub live_clamp: Option<(f64, f64)>,
    pub derivation: Option<Derivation>,
    /// Lowercase fragments the assistant matches to pick this metric.
    pub keywords: &'static [&'static str],
}

impl MetricSpec {
    pub fn new(key: MetricKey, label: &'static str, unit: &'static str) -> Self {
        Self {
            key,
            label,
            unit,
            precision: 1,
            baseline: Baseline::Fixed(0.0),
            live_offset: 0.0,
            seasonal_amplitude: 0.0,
            cycle: DailyCycle::Flat,
            noise: Noise::None,
            live_noise: Noise::None,
            clamp: None,
            live_clamp: None,
            derivation: None,
            keywords: &[],
        }
    }

    pub fn precision(mut self, digits: u32) -> Self {
        self.precision = digits;
        self
    }

    pub fn from_entity(mut self, fallback: f64) -> Self {
        self.baseline = Baseline::Entity { fallback };
        self
    }

    pub fn fixed(mut self, value: f64) -> Self {
        self.baseline = Baseline::Fixed(value);
        self
    }

    pub fn live_offset(mut self, offset: f64) -> Self {
        self.live_offset = offset;
        self
    }

    pub fn seasonal(mut self, amplitude: f64) -> Self {
        self.seasonal_amplitude = amplitude;
        self
    }

    pub fn cycle(mut self, cycle: DailyCycle) -> Self {
        self.cycle = cycle;
        self
    }

    /// Same noise for both windows.
    pub fn noise(mut self, noise: Noise) -> Self {
        self.noise = noise;
        self.live_noise = noise;
        self
    }

    pub fn live_noise(mut self, noise: Noise) -> Self {
        self.live_noise = noise;
        self
    }

    /// Same clamp for both windows.
    pub fn clamp(mut self, min: f64, max: f64) -> Self {
        self.clamp = Some((min, max));
        self.live_clamp = Some((min, max));
        self
    }

    pub fn live_clamp(mut self, min: f64, max: f64) -> Self {
        self.live_clamp = Some((min, max));
        self
    }

    pub fn derived(mut self, derivation: Derivation) -> Self {
        self.derivation = Some(derivation);
        self
    }

    pub fn keywords(mut self, keywords: &'static [&'static str]) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn is_derived(&self) -> bool {
        self.derivation.is_some()
    }

    /// Resting level for an entity, before live offset and cycles.
    pub fn resolve_baseline(&self, entity_baseline: Option<f64>) -> f64 {
        match self.baseline {
            Baseline::Entity { fallback } => entity_baseline.unwrap_or(fallback),
            Baseline::Fixed(value) => value,
        }
    }

    /// Draw one clamped value: baseline + seasonal + daily cycle + noise.
    pub fn evaluate<R: Rng + ?Sized>(&self, baseline: f64, tick: TickContext, rng: &mut R) -> f64 {
        let level = if tick.live {
            baseline + self.live_offset
        } else {
            baseline + seasonal_offset(tick.day_of_year, self.seasonal_amplitude)
        };
        let noise = if tick.live { &self.live_noise } else { &self.noise };

        let value = match &self.cycle {
            DailyCycle::Flat => level + noise.sample(rng),
            DailyCycle::Diurnal { amplitude } => {
                level + diurnal_offset(tick.hour, *amplitude) + noise.sample(rng)
            }
            DailyCycle::Shift(shift) => {
                if shift.is_active(tick.hour) {
                    let hours_in = (tick.hour - shift.start_hour) as f64;
                    level + shift.active_offset + shift.ramp_per_hour * hours_in + noise.sample(rng)
                } else {
                    match shift.idle {
                        Some(idle) => idle.value + idle.noise.sample(rng),
                        None => level + noise.sample(rng),
                    }
                }
            }
        };

        let bounds = if tick.live { self.live_clamp } else { self.clamp };
        match bounds {
            Some((min, max)) => value.clamp(min, max),
            None => value,
        }
    }

    pub fn round(&self, value: f64) -> f64 {
        let factor = 10f64.powi(self.precision as i32);
        (value * factor).round() / factor
    }

    /// Unit as appended to a number: `°C` and `%` hug the value, other units are spaced.
    pub fn unit_suffix(&self) -> String {
        match self.unit {
            "" => String::new(),
            "°C" | "%" => self.unit.to_string(),
            unit => format!(" {}", unit),
        }
    }

    /// Value with its unit, the way the dashboards print it (`42.3°C`, `1800 ppm`).
    pub fn format_value(&self, value: f64) -> String {
        format!("{}{}", value, self.unit_suffix())
    }
}
