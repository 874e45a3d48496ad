// Derived agronomic and production metrics

/// Saturation vapor pressure in kPa (Magnus-Tetens approximation).
pub fn saturation_vapor_pressure(temp_c: f64) -> f64 {
    0.61078 * ((17.27 * temp_c) / (temp_c + 237.3)).exp()
}

/// Vapor pressure deficit in kPa, never negative.
pub fn vapor_pressure_deficit(temp_c: f64, relative_humidity: f64) -> f64 {
    let svp = saturation_vapor_pressure(temp_c);
    let actual = svp * (relative_humidity / 100.0);
    (svp - actual).max(0.0)
}

/// Growing-degree contribution of a single reading.
///
/// Dividing by the readings per day keeps the contributions of one day
/// summing to a daily degree-day figure.
pub fn growing_degree_increment(temp_c: f64, base_c: f64, readings_per_day: u32) -> f64 {
    if readings_per_day == 0 {
        return 0.0;
    }
    (temp_c - base_c).max(0.0) / readings_per_day as f64
}

/// Simulated OEE percentage for one tick.
///
/// `quality_draw` is the availability × performance × quality product drawn
/// by the caller; anomalous ticks lose `penalty` points.
pub fn oee_proxy(running: bool, quality_draw: f64, anomalous: bool, penalty: f64) -> f64 {
    if !running {
        return 0.0;
    }
    let value = if anomalous { quality_draw - penalty } else { quality_draw };
    value.clamp(0.0, 100.0)
}
