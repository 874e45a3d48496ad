// Telemetry data domain models
use super::entity::Entity;
use super::metric::MetricKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

pub const MAX_DAYS: u32 = 3650;
pub const MAX_READINGS_PER_DAY: u32 = 1440;
pub const MAX_SAMPLES: usize = 200_000;

/// A history window larger than the service is willing to generate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WindowLimitError {
    #[error("days must be at most {max}, got {0}", max = MAX_DAYS)]
    Days(u32),
    #[error("readings_per_day must be at most {max}, got {0}", max = MAX_READINGS_PER_DAY)]
    ReadingsPerDay(u32),
    #[error("a series holds at most {max} samples, got {0}", max = MAX_SAMPLES)]
    Samples(usize),
}

/// Which slice of time a series covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WindowKind {
    /// Rolling 24 hours at hourly granularity.
    Live,
    History { days: u32, readings_per_day: u32 },
}

impl WindowKind {
    pub const LIVE_READINGS: usize = 24;

    pub fn is_live(&self) -> bool {
        matches!(self, WindowKind::Live)
    }

    pub fn sample_count(&self) -> usize {
        match *self {
            WindowKind::Live => Self::LIVE_READINGS,
            WindowKind::History {
                days,
                readings_per_day,
            } => days as usize * readings_per_day as usize,
        }
    }

    /// Reject windows beyond the generation limits.
    pub fn check_limits(&self) -> Result<(), WindowLimitError> {
        if let WindowKind::History {
            days,
            readings_per_day,
        } = *self
        {
            if days > MAX_DAYS {
                return Err(WindowLimitError::Days(days));
            }
            if readings_per_day > MAX_READINGS_PER_DAY {
                return Err(WindowLimitError::ReadingsPerDay(readings_per_day));
            }
            if self.sample_count() > MAX_SAMPLES {
                return Err(WindowLimitError::Samples(self.sample_count()));
            }
        }
        Ok(())
    }

    /// Readings that make up one day in this window.
    pub fn readings_per_day(&self) -> u32 {
        match *self {
            WindowKind::Live => Self::LIVE_READINGS as u32,
            WindowKind::History {
                readings_per_day, ..
            } => readings_per_day,
        }
    }
}

/// One time-stamped reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub display_label: String,
    pub metrics: BTreeMap<MetricKey, f64>,
}

impl Sample {
    pub fn new(
        timestamp: DateTime<Utc>,
        display_label: String,
        metrics: BTreeMap<MetricKey, f64>,
    ) -> Self {
        Self {
            timestamp,
            display_label,
            metrics,
        }
    }

    pub fn value(&self, key: MetricKey) -> Option<f64> {
        self.metrics.get(&key).copied()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Series {
    pub entity: Entity,
    pub window: WindowKind,
    pub samples: Vec<Sample>,
}

impl Series {
    pub fn new(entity: Entity, window: WindowKind, samples: Vec<Sample>) -> Self {
        Self {
            entity,
            window,
            samples,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// Same entity and window, keeping only the matching samples.
    pub fn retain<F>(&self, keep: F) -> Series
    where
        F: Fn(&Sample) -> bool,
    {
        let samples = self.samples.iter().filter(|s| keep(s)).cloned().collect();
        Series::new(self.entity.clone(), self.window, samples)
    }

    pub fn points(&self, key: MetricKey) -> Vec<TimeSeriesPoint> {
        self.samples
            .iter()
            .filter_map(|s| {
                s.value(key)
                    .map(|v| TimeSeriesPoint::new(s.timestamp.timestamp_millis(), v))
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesPoint {
    pub time_ms: i64,
    pub value: f64,
}

impl TimeSeriesPoint {
    pub fn new(time_ms: i64, value: f64) -> Self {
        Self { time_ms, value }
    }
}

/// Downsample time series points using bucket averaging
pub fn downsample_points(points: Vec<TimeSeriesPoint>, max_points: usize) -> Vec<TimeSeriesPoint> {
    if max_points == 0 || points.len() <= max_points {
        return points;
    }

    let bucket_size = (points.len() as f64 / max_points as f64).ceil() as usize;
    let mut downsampled = Vec::with_capacity(max_points);

    for chunk in points.chunks(bucket_size) {
        // Middle point's timestamp, average value
        let mid_idx = chunk.len() / 2;
        let avg_value = chunk.iter().map(|p| p.value).sum::<f64>() / chunk.len() as f64;
        downsampled.push(TimeSeriesPoint::new(chunk[mid_idx].time_ms, avg_value));
    }

    downsampled
}

/// KPI card showing the latest value of one metric.
#[derive(Debug, Clone, Serialize)]
pub struct TileData {
    pub metric: MetricKey,
    pub title: String,
    pub unit: String,
    pub value: f64,
    pub precision: u32,
    pub alert: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    pub id: String,
    pub title: String,
    pub metric: MetricKey,
    pub unit: Option<String>,
    pub color: String,
    pub points: Vec<TimeSeriesPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_limits() {
        let history = |days, readings_per_day| WindowKind::History {
            days,
            readings_per_day,
        };
        assert_eq!(WindowKind::Live.check_limits(), Ok(()));
        assert_eq!(history(200, 12).check_limits(), Ok(()));
        assert_eq!(history(0, 0).check_limits(), Ok(()));
        assert_eq!(
            history(u32::MAX, 0).check_limits(),
            Err(WindowLimitError::Days(u32::MAX))
        );
        assert_eq!(
            history(1, 1441).check_limits(),
            Err(WindowLimitError::ReadingsPerDay(1441))
        );
        assert_eq!(
            history(3650, 1440).check_limits(),
            Err(WindowLimitError::Samples(5_256_000))
        );
    }

    #[test]
    fn test_window_sizes() {
        assert_eq!(WindowKind::Live.sample_count(), 24);
        let history = WindowKind::History {
            days: 30,
            readings_per_day: 12,
        };
        assert_eq!(history.sample_count(), 360);
        assert_eq!(history.readings_per_day(), 12);
    }

    #[test]
    fn test_downsample_points() {
        let points: Vec<TimeSeriesPoint> = (0..10)
            .map(|i| TimeSeriesPoint::new(i * 1000, i as f64))
            .collect();

        let reduced = downsample_points(points.clone(), 5);
        assert_eq!(reduced.len(), 5);
        assert_eq!(reduced[0], TimeSeriesPoint::new(1000, 0.5));
        assert_eq!(reduced[4], TimeSeriesPoint::new(9000, 8.5));

        assert_eq!(downsample_points(points.clone(), 20), points);
    }
}
