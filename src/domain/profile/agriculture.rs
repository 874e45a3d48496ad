// Greenhouse monitoring (Agro-Sentinel)
use super::{AnomalyRate, AssistantVocabulary, DomainProfile, FaultClass, FaultEffect};
use crate::domain::alert::{AlarmRule, Condition};
use crate::domain::entity::Domain;
use crate::domain::metric::{DailyCycle, Derivation, MetricKey, MetricSpec, Noise, ShiftSchedule};

pub(super) fn profile() -> DomainProfile {
    let metrics = vec![
        MetricSpec::new(MetricKey::Temperature, "Temperatura", "°C")
            .from_entity(20.0)
            .live_offset(2.0)
            .seasonal(2.0)
            .cycle(DailyCycle::Diurnal { amplitude: 5.0 })
            .noise(Noise::Centered(2.0))
            .live_noise(Noise::Centered(1.5))
            .keywords(&["temp"]),
        // Humidity moves against temperature over the day
        MetricSpec::new(MetricKey::Humidity, "Humedad", "%")
            .from_entity(60.0)
            .cycle(DailyCycle::Diurnal { amplitude: -12.5 })
            .noise(Noise::Centered(15.0))
            .live_noise(Noise::Centered(10.0))
            .clamp(30.0, 99.0)
            .live_clamp(10.0, 99.0)
            .keywords(&["humedad", "humidity"]),
        // Plants draw CO2 down in daylight
        MetricSpec::new(MetricKey::Co2, "CO2", "ppm")
            .precision(0)
            .fixed(400.0)
            .cycle(DailyCycle::Shift(
                ShiftSchedule::new(6, 18).idle_at(600.0, Noise::Offset(50.0)),
            ))
            .noise(Noise::Offset(100.0))
            .keywords(&["co2", "carbono"]),
        // Solar-charged node: dips at night
        MetricSpec::new(MetricKey::Battery, "Batería", "%")
            .precision(0)
            .fixed(90.0)
            .cycle(DailyCycle::Diurnal { amplitude: 5.0 })
            .noise(Noise::Offset(-2.0))
            .live_noise(Noise::None)
            .clamp(0.0, 100.0)
            .keywords(&["batería", "bateria", "battery"]),
        MetricSpec::new(MetricKey::Rssi, "Señal RSSI", "dBm")
            .precision(0)
            .fixed(-65.0)
            .live_offset(5.0)
            .noise(Noise::Centered(20.0))
            .live_noise(Noise::Centered(10.0))
            .keywords(&["señal", "senal", "rssi", "signal"]),
        MetricSpec::new(MetricKey::Vpd, "VPD", "kPa")
            .precision(2)
            .derived(Derivation::VaporPressureDeficit {
                temperature: MetricKey::Temperature,
                humidity: MetricKey::Humidity,
            })
            .keywords(&["vpd", "déficit", "deficit"]),
        MetricSpec::new(MetricKey::Gdd, "Grados Día", "GDD")
            .derived(Derivation::GrowingDegreeDays {
                temperature: MetricKey::Temperature,
                base: 10.0,
                live_seed: 1240.0,
            })
            .keywords(&["gdd", "grados día", "grados dia"]),
    ];

    let faults = vec![
        FaultClass::new(
            "heat_spike",
            MetricKey::Temperature,
            FaultEffect::AboveBaseline(20.0),
        )
        .live(FaultEffect::Offset(15.0)),
        FaultClass::new("dryness", MetricKey::Humidity, FaultEffect::Offset(-30.0))
            .live(FaultEffect::Offset(-25.0))
            .at_least(0.0),
        FaultClass::new("gas_leak", MetricKey::Co2, FaultEffect::Set(2100.0)),
        FaultClass::new("battery_critical", MetricKey::Battery, FaultEffect::Set(15.0))
            .live(FaultEffect::Set(12.0)),
        FaultClass::new("signal_lost", MetricKey::Rssi, FaultEffect::Set(-95.0))
            .live(FaultEffect::Set(-92.0)),
    ];

    let rules = vec![
        AlarmRule::critical("CALOR CRÍTICO", MetricKey::Temperature, Condition::Above(40.0)),
        AlarmRule::critical("FUGA CO2", MetricKey::Co2, Condition::Above(2000.0)),
        AlarmRule::warning("SEQUEDAD", MetricKey::Humidity, Condition::Below(20.0)),
        AlarmRule::warning("RIESGO VPD", MetricKey::Vpd, Condition::Outside(0.2, 3.0)),
        AlarmRule::warning("BATERÍA BAJA", MetricKey::Battery, Condition::Below(20.0)),
        AlarmRule::warning("SEÑAL PERDIDA", MetricKey::Rssi, Condition::Below(-90.0)),
    ];

    DomainProfile {
        domain: Domain::Agriculture,
        title: "Agro-Sentinel",
        metrics,
        primary: MetricKey::Temperature,
        history_anomalies: AnomalyRate::with_stride(0.15, 50),
        live_anomalies: AnomalyRate::random(0.20),
        faults,
        rules,
        vocabulary: AssistantVocabulary {
            assistant_name: "Agro-Sentinel AI",
            greeting: "¡Hola! Soy Agro-Sentinel AI. Estoy conectado a los datos en tiempo real. ¡Pídeme buscar alarmas o analizar tendencias!",
            suggestions: &[
                "¿Cuál fue la temperatura máxima?",
                "Muéstrame las alarmas activas",
                "¿Cuál es el promedio de humedad?",
                "¿Cuál fue el VPD mínimo en Cayambe?",
            ],
            entity_noun: "Ubicación",
            current_scope: "Datos actuales",
            table: "sensor_logs",
            alert_table: "alerts",
            help_table: "ai_capabilities",
            help: "Entendido. Puedo buscar datos específicos en el historial global.\n\nPrueba preguntando:\n- \"¿Cuál fue la temperatura máxima en Ambato?\"\n- \"Alertas en Tena\"\n- \"Promedio de humedad en Cayambe\"",
        },
    }
}
