use serde::{Deserialize, Serialize};

/// Las dos propiedades fijas de la familia
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    Niederlauterbach,
    Benissa,
}

impl Location {
    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Niederlauterbach => "Niederlauterbach",
            Location::Benissa => "Benissa",
        }
    }
}

/// Tipo de tarea tal como está en la tabla `tasks`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskType {
    Abfahrt,
    Abflug,
    #[serde(rename = "Vor Ort")]
    VorOrt,
    Reise,
}

impl TaskType {
    /// Los catálogos de categorías distinguen solo "Vor Ort" vs. viaje
    pub fn is_vor_ort(&self) -> bool {
        matches!(self, TaskType::VorOrt)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportType {
    Auto,
    Flugzeug,
    #[serde(rename = "Nicht zutreffend")]
    NichtZutreffend,
}

/// Tarea compartida por escenario (NO por usuario).
/// El estado "erledigt" vive en `user_task_status`, nunca aquí.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    #[serde(default)]
    pub subcategory: Option<String>,
    pub location: Location,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub scenario: String,
    pub order: i64,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_urls: Option<Vec<String>>,
    #[serde(default)]
    pub transport_type: Option<TransportType>,
    pub created_at: String,
    pub updated_at: String,
}

impl Task {
    /// Subcategoría efectiva ("Allgemein" cuando falta)
    pub fn subcategory_or_default(&self) -> &str {
        match self.subcategory.as_deref() {
            Some(s) if !s.is_empty() => s,
            _ => crate::utils::categories::DEFAULT_SUBCATEGORY,
        }
    }

    /// Lista de imágenes con compatibilidad para el campo antiguo `image_url`
    pub fn effective_image_urls(&self) -> Vec<String> {
        match &self.image_urls {
            Some(urls) if !urls.is_empty() => urls.clone(),
            _ => self.image_url.clone().into_iter().collect(),
        }
    }

    /// Añade una imagen manteniendo el invariante `image_url == image_urls[0]`
    pub fn push_image_url(&mut self, url: String) {
        let mut urls = self.effective_image_urls();
        urls.push(url);
        self.image_url = urls.first().cloned();
        self.image_urls = Some(urls);
    }

    /// Reemplaza la lista completa manteniendo el invariante
    pub fn set_image_urls(&mut self, urls: Vec<String>) {
        self.image_url = urls.first().cloned();
        self.image_urls = if urls.is_empty() { None } else { Some(urls) };
    }
}

/// Par (tarea, erledigt) que consumen la vista y el export PDF
#[derive(Clone, Debug, PartialEq)]
pub struct ChecklistEntry {
    pub task: Task,
    pub done: bool,
}

#[cfg(test)]
pub fn test_task(id: &str, scenario: &str, category: &str, subcategory: Option<&str>, order: i64) -> Task {
    Task {
        id: id.to_string(),
        title: format!("Aufgabe {}", id),
        description: None,
        category: category.to_string(),
        subcategory: subcategory.map(|s| s.to_string()),
        location: Location::Benissa,
        task_type: TaskType::Reise,
        scenario: scenario.to_string(),
        order,
        link: None,
        notes: None,
        image_url: None,
        image_urls: None,
        transport_type: None,
        created_at: "2024-01-01T00:00:00Z".to_string(),
        updated_at: "2024-01-01T00:00:00Z".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializa_fila_con_campos_legados() {
        // Las filas antiguas traen `done` a nivel de tarea - se ignora
        let json = r#"{
            "id": "t1",
            "title": "Kühlschrank ausschalten",
            "category": "Hausverwaltung",
            "subcategory": "Elektronik",
            "location": "Niederlauterbach",
            "type": "Vor Ort",
            "scenario": "vor-ort-nl",
            "done": true,
            "order": 3,
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-02T10:00:00Z"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.task_type, TaskType::VorOrt);
        assert_eq!(task.location, Location::Niederlauterbach);
        assert_eq!(task.order, 3);
        assert_eq!(task.subcategory_or_default(), "Elektronik");
    }

    #[test]
    fn subcategoria_por_defecto() {
        let task = test_task("t1", "reise-nl-ben", "Sicherheit", None, 1);
        assert_eq!(task.subcategory_or_default(), "Allgemein");
    }

    #[test]
    fn push_image_mantiene_invariante() {
        let mut task = test_task("t1", "reise-nl-ben", "Sicherheit", None, 1);
        task.push_image_url("https://cdn/a.jpg".to_string());
        assert_eq!(task.image_url.as_deref(), Some("https://cdn/a.jpg"));

        task.push_image_url("https://cdn/b.jpg".to_string());
        task.push_image_url("https://cdn/c.jpg".to_string());
        let urls = task.image_urls.clone().unwrap();
        assert_eq!(urls.len(), 3);
        // image_url sigue siendo el primer elemento
        assert_eq!(task.image_url.as_deref(), Some(urls[0].as_str()));
    }

    #[test]
    fn imagenes_efectivas_con_solo_campo_antiguo() {
        let mut task = test_task("t1", "reise-nl-ben", "Sicherheit", None, 1);
        task.image_url = Some("https://cdn/alt.jpg".to_string());
        assert_eq!(task.effective_image_urls(), vec!["https://cdn/alt.jpg".to_string()]);
    }

    #[test]
    fn set_image_urls_vacia_limpia_ambos_campos() {
        let mut task = test_task("t1", "reise-nl-ben", "Sicherheit", None, 1);
        task.push_image_url("https://cdn/a.jpg".to_string());
        task.set_image_urls(Vec::new());
        assert_eq!(task.image_url, None);
        assert_eq!(task.image_urls, None);
    }
}
