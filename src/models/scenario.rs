use super::task::{Location, TaskType};

/// Escenario fijo del catálogo (configuración, no datos de usuario)
#[derive(Clone, Debug, PartialEq)]
pub struct Scenario {
    pub id: &'static str,
    pub title: &'static str,
    pub location: Location,
    pub task_type: TaskType,
    pub description: &'static str,
    pub icon: &'static str,
}

/// Catálogo estático: dos trayectos y dos listas "vor Ort"
pub const SCENARIOS: &[Scenario] = &[
    Scenario {
        id: "reise-nl-ben",
        title: "Reise Niederlauterbach → Benissa",
        location: Location::Niederlauterbach,
        task_type: TaskType::Reise,
        description: "Checkliste für die Reise von Frankreich nach Spanien (Auto oder Flugzeug)",
        icon: "🧳",
    },
    Scenario {
        id: "reise-ben-nl",
        title: "Reise Benissa → Niederlauterbach",
        location: Location::Benissa,
        task_type: TaskType::Reise,
        description: "Checkliste für die Reise von Spanien nach Frankreich (Auto oder Flugzeug)",
        icon: "🧳",
    },
    Scenario {
        id: "vor-ort-nl",
        title: "Vor Ort in Niederlauterbach",
        location: Location::Niederlauterbach,
        task_type: TaskType::VorOrt,
        description: "To-Do-Liste für Aufgaben während des Aufenthalts in Frankreich",
        icon: "🏡",
    },
    Scenario {
        id: "vor-ort-ben",
        title: "Vor Ort in Benissa",
        location: Location::Benissa,
        task_type: TaskType::VorOrt,
        description: "To-Do-Liste für Aufgaben während des Aufenthalts in Spanien",
        icon: "🏡",
    },
];

pub fn find_scenario(id: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|s| s.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogo_completo() {
        assert_eq!(SCENARIOS.len(), 4);
        assert!(find_scenario("reise-nl-ben").is_some());
        assert!(find_scenario("vor-ort-ben").is_some());
        assert!(find_scenario("no-existe").is_none());
    }
}
