use serde::{de::DeserializeOwned, Serialize};
use web_sys::{window, Storage};

pub fn get_local_storage() -> Option<Storage> {
    window()?.local_storage().ok()?
}

pub fn raw_get(key: &str) -> Result<Option<String>, String> {
    let storage = get_local_storage().ok_or("No se pudo acceder a localStorage")?;
    storage
        .get_item(key)
        .map_err(|_| "Error leyendo localStorage".to_string())
}

pub fn raw_set(key: &str, value: &str) -> Result<(), String> {
    let storage = get_local_storage().ok_or("No se pudo acceder a localStorage")?;
    storage
        .set_item(key, value)
        .map_err(|_| "Error guardando en localStorage".to_string())
}

pub fn raw_remove(key: &str) -> Result<(), String> {
    let storage = get_local_storage().ok_or("No se pudo acceder a localStorage")?;
    storage
        .remove_item(key)
        .map_err(|_| "Error eliminando de localStorage".to_string())
}

pub fn save_to_storage<T: Serialize>(key: &str, value: &T) -> Result<(), String> {
    let json = serde_json::to_string(value)
        .map_err(|e| format!("Error serializando datos: {}", e))?;
    raw_set(key, &json)
}

pub fn load_from_storage<T: DeserializeOwned>(key: &str) -> Option<T> {
    let json = raw_get(key).ok()??;
    serde_json::from_str(&json).ok()
}
