// Machine monitoring (Industry-Sentinel)
use super::{AnomalyRate, AssistantVocabulary, DomainProfile, FaultClass, FaultEffect};
use crate::domain::alert::{AlarmRule, Condition};
use crate::domain::entity::Domain;
use crate::domain::metric::{DailyCycle, Derivation, MetricKey, MetricSpec, Noise, ShiftSchedule};

// Two production shifts, 06:00 to 22:00
fn production() -> ShiftSchedule {
    ShiftSchedule::new(6, 22)
}

pub(super) fn profile() -> DomainProfile {
    let metrics = vec![
        MetricSpec::new(MetricKey::Temperature, "Temperatura", "°C")
            .from_entity(40.0)
            .cycle(DailyCycle::Shift(production().with_offset(15.0)))
            .noise(Noise::Centered(5.0))
            .live_noise(Noise::Centered(2.0))
            .keywords(&["temp", "calor"]),
        MetricSpec::new(MetricKey::Vibration, "Vibración", "mm/s")
            .precision(2)
            .from_entity(1.0)
            .cycle(DailyCycle::Shift(production().idle_at(0.1, Noise::None)))
            .noise(Noise::Offset(0.5))
            .live_noise(Noise::Offset(0.3))
            .keywords(&["vibra"]),
        MetricSpec::new(MetricKey::Power, "Potencia", "W")
            .precision(0)
            .fixed(4000.0)
            .live_offset(100.0)
            .cycle(DailyCycle::Shift(production().idle_at(200.0, Noise::None)))
            .noise(Noise::Offset(500.0))
            .live_noise(Noise::Offset(200.0))
            .keywords(&["potencia", "power", "energ", "consumo"]),
        MetricSpec::new(MetricKey::Rpm, "Velocidad", "RPM")
            .precision(0)
            .fixed(1500.0)
            .cycle(DailyCycle::Shift(production().idle_at(0.0, Noise::None)))
            .noise(Noise::Offset(200.0))
            .keywords(&["rpm", "velocidad", "speed"]),
        MetricSpec::new(MetricKey::Oee, "OEE", "%")
            .precision(0)
            .derived(Derivation::EquipmentEffectiveness {
                schedule: production(),
                quality: (85.0, 95.0),
                anomaly_penalty: 40.0,
            })
            .keywords(&["oee", "eficiencia", "efectividad"]),
    ];

    let faults = vec![
        FaultClass::new("overheat", MetricKey::Temperature, FaultEffect::Offset(30.0)),
        FaultClass::new("bearing_fault", MetricKey::Vibration, FaultEffect::Offset(5.0)),
        FaultClass::new("stall", MetricKey::Rpm, FaultEffect::Set(0.0)),
    ];

    let rules = vec![
        AlarmRule::critical(
            "SOBRECALENTAMIENTO",
            MetricKey::Temperature,
            Condition::AboveBaseline(40.0),
        ),
        AlarmRule::warning(
            "FALLA RODAMIENTO",
            MetricKey::Vibration,
            Condition::AboveBaseline(3.0),
        ),
        AlarmRule::warning("OEE BAJO", MetricKey::Oee, Condition::Between(1.0, 60.0)),
    ];

    DomainProfile {
        domain: Domain::Industry,
        title: "Industry-Sentinel",
        metrics,
        primary: MetricKey::Temperature,
        history_anomalies: AnomalyRate::random(0.05),
        live_anomalies: AnomalyRate::random(0.10),
        faults,
        rules,
        vocabulary: AssistantVocabulary {
            assistant_name: "Industry-Sentinel AI",
            greeting: "¡Hola! Soy Industry-Sentinel AI. Superviso la condición de las máquinas de la planta en tiempo real.",
            suggestions: &[
                "¿Cuál fue la vibración máxima?",
                "Muéstrame las alertas de la prensa",
                "¿Cuál es el promedio de OEE?",
                "Estado del torno CNC",
            ],
            entity_noun: "Máquina",
            current_scope: "Línea actual",
            table: "machine_logs",
            alert_table: "machine_alerts",
            help_table: "ai_plant_manual",
            help: "Superviso la planta en tiempo real. Puedes preguntar:\n- \"¿Cuál fue la vibración máxima de la prensa?\"\n- \"Alertas del torno CNC\"\n- \"Promedio de potencia en el transportador\"",
        },
    }
}
