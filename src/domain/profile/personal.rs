// Worker wearables (Safety-Sentinel)
use super::{AnomalyRate, AssistantVocabulary, DomainProfile, FaultClass, FaultEffect};
use crate::domain::alert::{AlarmRule, Condition};
use crate::domain::entity::Domain;
use crate::domain::metric::{DailyCycle, MetricKey, MetricSpec, Noise, ShiftSchedule};

// Day shift, 08:00 to 17:00
fn working_hours() -> ShiftSchedule {
    ShiftSchedule::new(8, 17)
}

pub(super) fn profile() -> DomainProfile {
    let metrics = vec![
        MetricSpec::new(MetricKey::HeartRate, "Ritmo Cardíaco", "BPM")
            .precision(0)
            .from_entity(75.0)
            .cycle(DailyCycle::Shift(
                working_hours().idle_at(60.0, Noise::Offset(10.0)),
            ))
            .noise(Noise::Offset(20.0))
            .live_noise(Noise::Offset(25.0))
            .keywords(&["ritmo", "cardi", "heart", "pulso"]),
        // Builds up over the shift, resets at rest
        MetricSpec::new(MetricKey::Fatigue, "Nivel Fatiga", "%")
            .precision(0)
            .from_entity(5.0)
            .cycle(DailyCycle::Shift(
                working_hours().with_ramp(5.0).idle_at(0.0, Noise::None),
            ))
            .noise(Noise::Offset(5.0))
            .live_noise(Noise::None)
            .clamp(0.0, 100.0)
            .keywords(&["fatiga", "fatigue", "cansancio"]),
        MetricSpec::new(MetricKey::BodyTemperature, "Temp. Corporal", "°C")
            .fixed(36.5)
            .live_offset(0.1)
            .cycle(DailyCycle::Shift(working_hours().with_offset(0.3)))
            .noise(Noise::Offset(0.5))
            .live_noise(Noise::Offset(0.4))
            .keywords(&["temp", "fieb", "corporal"]),
        MetricSpec::new(MetricKey::ManDown, "Man Down", "")
            .precision(0)
            .fixed(0.0)
            .keywords(&["man down", "caída", "caida"]),
        // Wearable drains during the shift
        MetricSpec::new(MetricKey::Battery, "Batería", "%")
            .precision(0)
            .fixed(90.0)
            .live_offset(10.0)
            .cycle(DailyCycle::Shift(working_hours().with_ramp(-5.0)))
            .clamp(0.0, 100.0)
            .keywords(&["batería", "bateria", "battery"]),
    ];

    let faults = vec![
        FaultClass::new("tachycardia", MetricKey::HeartRate, FaultEffect::Offset(40.0)),
        FaultClass::new(
            "heat_stress",
            MetricKey::BodyTemperature,
            FaultEffect::Offset(2.0),
        ),
        FaultClass::new("exhaustion", MetricKey::Fatigue, FaultEffect::Set(95.0)),
        FaultClass::new("man_down", MetricKey::ManDown, FaultEffect::Set(1.0)),
    ];

    let rules = vec![
        AlarmRule::critical("TAQUICARDIA", MetricKey::HeartRate, Condition::Above(130.0)),
        AlarmRule::critical("FATIGA EXTREMA", MetricKey::Fatigue, Condition::Above(90.0)),
        AlarmRule::critical("MAN DOWN", MetricKey::ManDown, Condition::Equals(1.0)),
        AlarmRule::warning(
            "HIPERTERMIA",
            MetricKey::BodyTemperature,
            Condition::Above(38.5),
        ),
    ];

    DomainProfile {
        domain: Domain::Personal,
        title: "Safety-Sentinel",
        metrics,
        primary: MetricKey::HeartRate,
        history_anomalies: AnomalyRate::random(0.02),
        live_anomalies: AnomalyRate::random(0.10),
        faults,
        rules,
        vocabulary: AssistantVocabulary {
            assistant_name: "Safety-Sentinel AI",
            greeting: "¡Hola! Soy Safety-Sentinel AI. Monitoreo la salud y seguridad de los operarios en tiempo real.",
            suggestions: &[
                "¿Cuál fue la fatiga máxima?",
                "Muéstrame alertas de ritmo cardíaco",
                "¿Hay eventos de Man Down?",
                "¿Cuál es el promedio de temperatura corporal?",
            ],
            entity_noun: "Operario",
            current_scope: "Turno actual",
            table: "worker_logs",
            alert_table: "ehs_alerts",
            help_table: "ai_safety_manual",
            help: "Estoy monitoreando la seguridad del equipo. Puedes preguntar:\n- \"¿Hubo alertas de ritmo cardíaco hoy?\"\n- \"Promedio de fatiga en turno noche\"\n- \"Estado de Perez\"",
        },
    }
}
