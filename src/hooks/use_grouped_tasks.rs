// ============================================================================
// AGRUPACIÓN Y ORDEN DE LA CHECKLIST
// ============================================================================
// Funciones puras compartidas por la vista y el export PDF. Cualquier
// consumidor de "categorías ordenadas" pasa por aquí - nunca se reordena
// a mano en otro sitio.
// ============================================================================

use std::collections::HashMap;

use crate::models::{ChecklistEntry, Location, TaskType};
use crate::utils::categories::{category_order, subcategory_order};

/// categoría -> subcategoría -> entradas
pub type GroupedTasks = HashMap<String, HashMap<String, Vec<ChecklistEntry>>>;

/// Agrupa por categoría y subcategoría ("Allgemein" cuando falta)
pub fn group_tasks(entries: &[ChecklistEntry]) -> GroupedTasks {
    let mut grouped: GroupedTasks = HashMap::new();
    for entry in entries {
        grouped
            .entry(entry.task.category.clone())
            .or_default()
            .entry(entry.task.subcategory_or_default().to_string())
            .or_default()
            .push(entry.clone());
    }
    grouped
}

/// Categorías presentes, en el orden del catálogo; las desconocidas van
/// después, en orden alfabético estable
pub fn sorted_categories(grouped: &GroupedTasks, task_type: TaskType) -> Vec<String> {
    sort_by_catalog(grouped.keys().cloned().collect(), category_order(task_type))
}

/// Subcategorías presentes de una categoría, ordenadas análogamente con
/// la tabla específica de (tipo, categoría, propiedad)
pub fn sorted_subcategories(
    subgroups: &HashMap<String, Vec<ChecklistEntry>>,
    task_type: TaskType,
    category: &str,
    location: Location,
) -> Vec<String> {
    let order = subcategory_order(task_type, category, location);
    sort_by_catalog(subgroups.keys().cloned().collect(), &order)
}

fn sort_by_catalog(mut keys: Vec<String>, catalog: &[&str]) -> Vec<String> {
    keys.sort_by(|a, b| {
        let pos_a = catalog.iter().position(|c| *c == a.as_str());
        let pos_b = catalog.iter().position(|c| *c == b.as_str());
        match (pos_a, pos_b) {
            (Some(a), Some(b)) => a.cmp(&b),
            // Conocidas siempre antes que desconocidas
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.cmp(b),
        }
    });
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::test_task;

    fn entry(id: &str, category: &str, subcategory: Option<&str>) -> ChecklistEntry {
        ChecklistEntry {
            task: test_task(id, "s1", category, subcategory, 1),
            done: false,
        }
    }

    #[test]
    fn agrupa_con_subcategoria_por_defecto() {
        let entries = vec![
            entry("t1", "Sicherheit", None),
            entry("t2", "Sicherheit", Some("Alarmanlage")),
            entry("t3", "Hausverwaltung", Some("Wasser")),
        ];
        let grouped = group_tasks(&entries);
        assert_eq!(grouped.len(), 2);
        assert!(grouped["Sicherheit"].contains_key("Allgemein"));
        assert!(grouped["Sicherheit"].contains_key("Alarmanlage"));
        assert_eq!(grouped["Hausverwaltung"]["Wasser"].len(), 1);
    }

    #[test]
    fn categorias_del_catalogo_antes_que_desconocidas() {
        // Todas las del catálogo preceden a cualquier desconocida
        let entries = vec![
            entry("t1", "Zusatzaufgaben", None),
            entry("t2", "Sicherheit", None),
            entry("t3", "Bastelprojekte", None),
            entry("t4", "Spezielles", None),
        ];
        let grouped = group_tasks(&entries);
        let sorted = sorted_categories(&grouped, TaskType::Reise);
        assert_eq!(
            sorted,
            vec!["Spezielles", "Sicherheit", "Bastelprojekte", "Zusatzaufgaben"]
        );
    }

    #[test]
    fn orden_deterministico() {
        let entries = vec![
            entry("t1", "Sicherheit", None),
            entry("t2", "Hausverwaltung", None),
            entry("t3", "Spezielles", None),
        ];
        let grouped = group_tasks(&entries);
        let first = sorted_categories(&grouped, TaskType::Reise);
        for _ in 0..10 {
            assert_eq!(sorted_categories(&grouped, TaskType::Reise), first);
        }
    }

    #[test]
    fn subcategorias_ordenadas_por_tabla_especifica() {
        let entries = vec![
            entry("t1", "Sicherheit", Some("Alarmanlage")),
            entry("t2", "Sicherheit", None),
            entry("t3", "Sicherheit", Some("Nachbarn informieren")),
        ];
        let grouped = group_tasks(&entries);
        let sorted = sorted_subcategories(
            &grouped["Sicherheit"],
            TaskType::Reise,
            "Sicherheit",
            Location::Benissa,
        );
        // "Allgemein" y "Alarmanlage" están en la tabla; lo demás al final
        assert_eq!(sorted, vec!["Allgemein", "Alarmanlage", "Nachbarn informieren"]);
    }
}
