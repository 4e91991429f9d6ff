// ============================================================================
// CATÁLOGO DE CATEGORÍAS Y SUBCATEGORÍAS
// ============================================================================
// Tabla de configuración versionada: tipo de escenario × categoría
// (a veces × propiedad) -> orden canónico de visualización.
// Categorías/subcategorías que aparecen en tareas pero no están aquí
// se ordenan al final (alfabético, estable).
// ============================================================================

use crate::models::task::{Location, TaskType};

pub const CATALOG_VERSION: u32 = 1;

pub const DEFAULT_SUBCATEGORY: &str = "Allgemein";

/// Categorías para escenarios de viaje (Reise/Abfahrt/Abflug)
const CATEGORIES_REISE: &[&str] = &[
    "Spezielles",
    "Vor der Abreise",
    "Am Abreisetag",
    "Hausverwaltung",
    "Haus verschließen",
    "Sicherheit",
    "Aufgaben unterwegs/Flughafen",
    "Bei Ankunft im Zielhaus",
];

/// Categorías para escenarios "Vor Ort"
const CATEGORIES_VOR_ORT: &[&str] = &[
    "Spezielles",
    "Regelmäßige Wartung",
    "Pool & Garten",
    "Haustechnik",
    "Reinigung & Ordnung",
    "Einkaufen & Besorgungen",
    "Reparaturen",
    "Sicherheit",
];

const ROOMS_BENISSA: &[&str] = &[
    "Allgemein",
    "Küche",
    "Schlafzimmer",
    "Wohnzimmer",
    "Balkon",
    "Hauswirtschaftsraum",
    "Gäste WC",
    "Außenbereich",
    "Pool",
    "Garage",
    "Büro",
    "Gäste Appartment",
];

const ROOMS_NIEDERLAUTERBACH: &[&str] = &[
    "Allgemein",
    "Schlafzimmer",
    "Hobbyraum",
    "WC 1. Stock",
    "Badezimmer",
    "Büro",
    "Küche",
    "Ankleidezimmer",
    "Wohnzimmer",
    "Terrasse",
    "Außenbereich",
    "Garage",
    "Treppenhaus Garage",
];

/// Orden canónico de categorías para un tipo de escenario
pub fn category_order(task_type: TaskType) -> &'static [&'static str] {
    if task_type.is_vor_ort() {
        CATEGORIES_VOR_ORT
    } else {
        CATEGORIES_REISE
    }
}

/// Habitaciones de una propiedad
pub fn rooms(location: Location) -> &'static [&'static str] {
    match location {
        Location::Benissa => ROOMS_BENISSA,
        Location::Niederlauterbach => ROOMS_NIEDERLAUTERBACH,
    }
}

/// Orden canónico de subcategorías para (tipo, categoría, propiedad)
pub fn subcategory_order(
    task_type: TaskType,
    category: &str,
    location: Location,
) -> Vec<&'static str> {
    if task_type.is_vor_ort() {
        subcategories_vor_ort(category, location)
    } else {
        subcategories_reise(category, location)
    }
}

fn subcategories_reise(category: &str, location: Location) -> Vec<&'static str> {
    let rooms = rooms(location);

    match category {
        "Spezielles" => vec!["Allgemein", "Wichtige Informationen"],
        // Mismas habitaciones para ambas categorías
        "Vor der Abreise" | "Am Abreisetag" => rooms.to_vec(),
        "Hausverwaltung" => vec![
            "Allgemein",
            "Elektronik",
            "Heizung/Klima",
            "Wasser",
            "Gas",
            "Außenbereich",
            "Pool",
        ],
        "Haus verschließen" => {
            let mut subs = vec!["Allgemein", "Fenster und Türen", "Schlüssel"];
            subs.extend(rooms.iter().filter(|r| **r != "Allgemein"));
            subs
        }
        "Sicherheit" => vec!["Allgemein", "Alarmanlage"],
        "Aufgaben unterwegs/Flughafen" => {
            vec!["Allgemein", "Check-in", "Gepäck", "Sicherheit", "Boarding"]
        }
        "Bei Ankunft im Zielhaus" => vec![
            "Allgemein",
            "Elektronik einschalten",
            "Heizung/Klima",
            "Küche",
            "Sicherheit",
        ],
        _ => vec!["Allgemein"],
    }
}

fn subcategories_vor_ort(category: &str, location: Location) -> Vec<&'static str> {
    let rooms = rooms(location);

    match category {
        "Spezielles" => vec!["Allgemein", "Wichtige Informationen"],
        "Regelmäßige Wartung" => vec![
            "Allgemein",
            "Wöchentlich",
            "Monatlich",
            "Saisonal",
            "Heizung/Klima",
            "Elektronik",
            "Wasser",
        ],
        "Pool & Garten" => {
            if location == Location::Benissa {
                vec![
                    "Allgemein",
                    "Pool Pflege",
                    "Poolchemie",
                    "Rasen",
                    "Pflanzen",
                    "Bewässerung",
                    "Terrasse",
                ]
            } else {
                vec!["Allgemein", "Rasen", "Pflanzen", "Bewässerung", "Terrasse"]
            }
        }
        "Haustechnik" => vec![
            "Allgemein",
            "Heizung/Klima",
            "Elektrik",
            "Wasser/Sanitär",
            "Gas",
            "Alarmanlage",
            "Rollläden",
        ],
        // Todas las habitaciones para limpieza
        "Reinigung & Ordnung" => rooms.to_vec(),
        "Einkaufen & Besorgungen" => {
            if location == Location::Benissa {
                vec![
                    "Allgemein",
                    "Lebensmittel",
                    "Haushalt",
                    "Poolbedarf",
                    "Garten",
                    "Werkzeug",
                ]
            } else {
                vec!["Allgemein", "Lebensmittel", "Haushalt", "Garten", "Werkzeug"]
            }
        }
        "Reparaturen" => vec!["Allgemein", "Dringend", "Geplant", "Kleinreparaturen"],
        "Sicherheit" => vec!["Allgemein", "Alarmanlage", "Schlüssel", "Beleuchtung"],
        _ => vec!["Allgemein"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categorias_por_tipo() {
        assert_eq!(category_order(TaskType::Reise)[0], "Spezielles");
        assert_eq!(category_order(TaskType::Abflug), CATEGORIES_REISE);
        assert!(category_order(TaskType::VorOrt).contains(&"Pool & Garten"));
        assert!(!category_order(TaskType::Reise).contains(&"Pool & Garten"));
    }

    #[test]
    fn subcategorias_dependen_de_la_propiedad() {
        let ben = subcategory_order(TaskType::VorOrt, "Pool & Garten", Location::Benissa);
        let nl = subcategory_order(TaskType::VorOrt, "Pool & Garten", Location::Niederlauterbach);
        assert!(ben.contains(&"Poolchemie"));
        assert!(!nl.contains(&"Poolchemie"));
    }

    #[test]
    fn categoria_desconocida_cae_a_allgemein() {
        assert_eq!(
            subcategory_order(TaskType::Reise, "Sonstiges", Location::Benissa),
            vec!["Allgemein"]
        );
    }

    #[test]
    fn haus_verschliessen_incluye_habitaciones_sin_duplicar_allgemein() {
        let subs = subcategory_order(TaskType::Reise, "Haus verschließen", Location::Benissa);
        assert_eq!(subs[0], "Allgemein");
        assert_eq!(subs.iter().filter(|s| **s == "Allgemein").count(), 1);
        assert!(subs.contains(&"Küche"));
    }
}
