use serde::{Deserialize, Serialize};

use super::task::Location;

/// Contacto importante por propiedad (Handwerker, Nachbarn, Verwaltung...)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub role: String,
    pub location: Location,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: String,
}
