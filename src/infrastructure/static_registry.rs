// Compiled-in entity tables for the three dashboards
use crate::application::entity_registry::EntityRegistry;
use crate::domain::entity::{Domain, Entity};
use crate::domain::metric::MetricKey;

#[derive(Debug, Clone)]
pub struct StaticRegistry {
    greenhouses: Vec<Entity>,
    machines: Vec<Entity>,
    workers: Vec<Entity>,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self {
            greenhouses: greenhouses(),
            machines: machines(),
            workers: workers(),
        }
    }
}

impl Default for StaticRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRegistry for StaticRegistry {
    fn list_entities(&self, domain: Domain) -> &[Entity] {
        match domain {
            Domain::Agriculture => &self.greenhouses,
            Domain::Industry => &self.machines,
            Domain::Personal => &self.workers,
        }
    }

    fn default_entity(&self, domain: Domain) -> &Entity {
        // Tables are compiled in and never empty
        &self.list_entities(domain)[0]
    }
}

fn greenhouse(
    id: &str,
    name: &str,
    city: &str,
    region: &str,
    (lat, lng): (f64, f64),
    (temp, humidity): (f64, f64),
) -> Entity {
    Entity::new(id, name, region, city)
        .at(lat, lng)
        .with_baseline(MetricKey::Temperature, temp)
        .with_baseline(MetricKey::Humidity, humidity)
}

fn greenhouses() -> Vec<Entity> {
    vec![
        greenhouse(
            "GH-AMB-01",
            "Finca Ambato",
            "Ambato",
            "SIERRA",
            (-1.2491, -78.6168),
            (15.0, 50.0),
        )
        .with_keywords(&["ambato"]),
        greenhouse(
            "GH-DUR-01",
            "Agro Duran",
            "Duran",
            "COAST",
            (-2.1701, -79.8220),
            (28.0, 75.0),
        )
        .with_keywords(&["duran", "durán"]),
        greenhouse(
            "GH-CAY-01",
            "Flores Cayambe",
            "Cayambe",
            "SIERRA",
            (0.0414, -78.1452),
            (12.0, 55.0),
        )
        .with_keywords(&["cayambe"]),
        greenhouse(
            "GH-ORO-01",
            "Bananera El Oro",
            "Machala",
            "COAST",
            (-3.2581, -79.9605),
            (26.0, 80.0),
        )
        .with_keywords(&["el oro", "oro", "machala"]),
        greenhouse(
            "GH-TEN-01",
            "Selva Viva Tena",
            "Tena",
            "AMAZON",
            (-0.9938, -77.8129),
            (24.0, 90.0),
        )
        .with_keywords(&["tena", "selva"]),
    ]
}

fn machine(id: &str, name: &str, area: &str, kind: &str, temp: f64, vibration: f64) -> Entity {
    Entity::new(id, name, area, kind)
        .with_baseline(MetricKey::Temperature, temp)
        .with_baseline(MetricKey::Vibration, vibration)
}

fn machines() -> Vec<Entity> {
    vec![
        machine("MACH-01", "CNC Lathe X1", "Machining", "CNC", 45.0, 2.5)
            .with_keywords(&["cnc", "torno", "lathe"]),
        machine("MACH-02", "Hydraulic Press", "Stamping", "Press", 55.0, 4.0)
            .with_keywords(&["prensa", "press"]),
        machine("ROBO-01", "Kuka Arm A", "Assembly", "Robot", 35.0, 0.5)
            .with_keywords(&["kuka", "robot", "brazo"]),
        machine("CONV-01", "Main Conveyor", "Logistics", "Motor", 40.0, 1.2)
            .with_keywords(&["conveyor", "transportador", "banda"]),
        machine("INJ-01", "Injection Molder", "Plastics", "Molder", 210.0, 1.8)
            .with_keywords(&["inyectora", "inyección", "molder"]),
    ]
}

fn worker(id: &str, name: &str, area: &str, role: &str, heart_rate: f64, fatigue: f64) -> Entity {
    Entity::new(id, name, area, role)
        .with_baseline(MetricKey::HeartRate, heart_rate)
        .with_baseline(MetricKey::Fatigue, fatigue)
}

fn workers() -> Vec<Entity> {
    vec![
        worker("WRK-001", "J. Perez", "Foundry", "Welder", 85.0, 10.0)
            .with_keywords(&["perez", "pérez"]),
        worker("WRK-002", "M. Rodriguez", "Assembly", "Foreman", 75.0, 5.0)
            .with_keywords(&["rodriguez", "rodríguez"]),
        worker("WRK-003", "A. Smith", "Logistics", "Driver", 72.0, 15.0)
            .with_keywords(&["smith"]),
        worker("WRK-004", "L. Chen", "Chemicals", "Chemist", 68.0, 5.0)
            .with_keywords(&["chen"]),
        worker("WRK-005", "K. Ivanov", "High Voltage", "Electrician", 80.0, 8.0)
            .with_keywords(&["ivanov"]),
    ]
}
