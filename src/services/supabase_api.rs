// ============================================================================
// SUPABASE API - SOLO COMUNICACIÓN HTTP (Stateless)
// ============================================================================
// PostgREST (tablas), GoTrue (auth, ver auth_service) y Storage (imágenes).
// NO tiene lógica de negocio, solo hace requests HTTP.
// ============================================================================

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::{Deserialize, Serialize};

use crate::models::{Contact, Location, SyncError, Task, TaskType, TransportType, UserTaskStatus};
use crate::services::remote::ChecklistRemote;
use crate::utils::constants::{SUPABASE_ANON_KEY, SUPABASE_URL, TASK_IMAGES_BUCKET};

#[derive(Clone)]
pub struct SupabaseApi {
    base_url: String,
    anon_key: String,
    access_token: Option<String>,
}

impl SupabaseApi {
    pub fn new(access_token: Option<String>) -> Self {
        Self {
            base_url: SUPABASE_URL.to_string(),
            anon_key: SUPABASE_ANON_KEY.to_string(),
            access_token,
        }
    }

    fn rest(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn with_auth(&self, builder: RequestBuilder) -> RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.anon_key);
        builder
            .header("apikey", &self.anon_key)
            .header("Authorization", &format!("Bearer {}", bearer))
    }

    async fn check(response: Response) -> Result<Response, SyncError> {
        if response.ok() {
            return Ok(response);
        }
        let status = response.status();
        if status == 401 {
            return Err(SyncError::Unauthenticated);
        }
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(SyncError::Http { status, message })
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, SyncError> {
        let response = builder
            .send()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;
        Self::check(response).await
    }

    async fn send_json<B: Serialize>(
        &self,
        builder: RequestBuilder,
        body: &B,
    ) -> Result<Response, SyncError> {
        let request = builder
            .json(body)
            .map_err(|e| SyncError::Network(format!("Request build error: {}", e)))?;
        let response = request
            .send()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;
        Self::check(response).await
    }

    async fn decode<T: for<'de> Deserialize<'de>>(response: Response) -> Result<T, SyncError> {
        response
            .json::<T>()
            .await
            .map_err(|e| SyncError::Decode(e.to_string()))
    }

    // ==========================================
    // TASKS (CRUD compartido, sin restricción de propietario)
    // ==========================================

    /// order actual más alto del escenario (0 si no hay tareas)
    pub async fn max_task_order(&self, scenario_id: &str) -> Result<i64, SyncError> {
        #[derive(Deserialize)]
        struct OrderRow {
            order: i64,
        }
        let url = format!(
            "{}?select=order&scenario=eq.{}&order=order.desc&limit=1",
            self.rest("tasks"),
            scenario_id
        );
        let response = self.send(self.with_auth(Request::get(&url))).await?;
        let rows: Vec<OrderRow> = Self::decode(response).await?;
        Ok(rows.first().map(|r| r.order).unwrap_or(0))
    }

    pub async fn insert_task(&self, task: &TaskInsert) -> Result<Task, SyncError> {
        log::info!("📝 Creando tarea: {}", task.title);
        let url = self.rest("tasks");
        let builder = self
            .with_auth(Request::post(&url))
            .header("Prefer", "return=representation");
        let response = self.send_json(builder, &[task]).await?;
        let mut rows: Vec<Task> = Self::decode(response).await?;
        rows.pop().ok_or_else(|| {
            SyncError::Decode("insert devolvió una respuesta vacía".to_string())
        })
    }

    pub async fn update_task(&self, task_id: &str, update: &TaskUpdate) -> Result<Task, SyncError> {
        let url = format!("{}?id=eq.{}", self.rest("tasks"), task_id);
        let builder = self
            .with_auth(Request::patch(&url))
            .header("Prefer", "return=representation");
        let response = self.send_json(builder, update).await?;
        let mut rows: Vec<Task> = Self::decode(response).await?;
        rows.pop().ok_or_else(|| {
            SyncError::Decode("update devolvió una respuesta vacía".to_string())
        })
    }

    pub async fn delete_task(&self, task_id: &str) -> Result<(), SyncError> {
        let url = format!("{}?id=eq.{}", self.rest("tasks"), task_id);
        self.send(self.with_auth(Request::delete(&url))).await?;
        Ok(())
    }

    // ==========================================
    // CONTACTS
    // ==========================================

    pub async fn fetch_all_contacts(&self) -> Result<Vec<Contact>, SyncError> {
        let url = format!(
            "{}?select=*&order=location.asc,name.asc",
            self.rest("contacts")
        );
        let response = self.send(self.with_auth(Request::get(&url))).await?;
        Self::decode(response).await
    }

    pub async fn fetch_contacts(&self, location: Location) -> Result<Vec<Contact>, SyncError> {
        let url = format!(
            "{}?select=*&location=eq.{}&order=name.asc",
            self.rest("contacts"),
            location.as_str()
        );
        let response = self.send(self.with_auth(Request::get(&url))).await?;
        Self::decode(response).await
    }

    pub async fn insert_contact(&self, contact: &ContactInsert) -> Result<Contact, SyncError> {
        let url = self.rest("contacts");
        let builder = self
            .with_auth(Request::post(&url))
            .header("Prefer", "return=representation");
        let response = self.send_json(builder, &[contact]).await?;
        let mut rows: Vec<Contact> = Self::decode(response).await?;
        rows.pop().ok_or_else(|| {
            SyncError::Decode("insert devolvió una respuesta vacía".to_string())
        })
    }

    pub async fn update_contact(
        &self,
        contact_id: &str,
        update: &ContactInsert,
    ) -> Result<Contact, SyncError> {
        let url = format!("{}?id=eq.{}", self.rest("contacts"), contact_id);
        let builder = self
            .with_auth(Request::patch(&url))
            .header("Prefer", "return=representation");
        let response = self.send_json(builder, update).await?;
        let mut rows: Vec<Contact> = Self::decode(response).await?;
        rows.pop().ok_or_else(|| {
            SyncError::Decode("update devolvió una respuesta vacía".to_string())
        })
    }

    pub async fn delete_contact(&self, contact_id: &str) -> Result<(), SyncError> {
        let url = format!("{}?id=eq.{}", self.rest("contacts"), contact_id);
        self.send(self.with_auth(Request::delete(&url))).await?;
        Ok(())
    }

    // ==========================================
    // STORAGE (imágenes de tareas)
    // ==========================================

    pub async fn upload_task_image(
        &self,
        path: &str,
        file: &web_sys::File,
    ) -> Result<String, SyncError> {
        log::info!("🖼️ Subiendo imagen: {}", path);
        let url = format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url, TASK_IMAGES_BUCKET, path
        );
        let request = self
            .with_auth(Request::post(&url))
            .body(wasm_bindgen::JsValue::from(file.clone()))
            .map_err(|e| SyncError::Network(format!("Request build error: {}", e)))?;
        let response = request
            .send()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;
        Self::check(response).await?;
        Ok(self.public_image_url(path))
    }

    pub async fn remove_task_images(&self, paths: &[String]) -> Result<(), SyncError> {
        #[derive(Serialize)]
        struct RemoveBody<'a> {
            prefixes: &'a [String],
        }
        let url = format!("{}/storage/v1/object/{}", self.base_url, TASK_IMAGES_BUCKET);
        let builder = self.with_auth(Request::delete(&url));
        self.send_json(builder, &RemoveBody { prefixes: paths }).await?;
        Ok(())
    }

    pub fn public_image_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, TASK_IMAGES_BUCKET, path
        )
    }
}

impl ChecklistRemote for SupabaseApi {
    async fn fetch_tasks(&self, scenario_id: &str) -> Result<Vec<Task>, SyncError> {
        let url = format!(
            "{}?select=*&scenario=eq.{}&order=order.asc",
            self.rest("tasks"),
            scenario_id
        );
        let response = self.send(self.with_auth(Request::get(&url))).await?;
        Self::decode(response).await
    }

    async fn fetch_statuses(
        &self,
        user_id: &str,
        task_ids: &[String],
    ) -> Result<Vec<UserTaskStatus>, SyncError> {
        if task_ids.is_empty() {
            return Ok(Vec::new());
        }
        let url = format!(
            "{}?select=*&user_id=eq.{}&task_id=in.({})",
            self.rest("user_task_status"),
            user_id,
            task_ids.join(",")
        );
        let response = self.send(self.with_auth(Request::get(&url))).await?;
        Self::decode(response).await
    }

    async fn upsert_status(&self, status: &UserTaskStatus) -> Result<(), SyncError> {
        let url = format!(
            "{}?on_conflict=user_id,task_id",
            self.rest("user_task_status")
        );
        let builder = self
            .with_auth(Request::post(&url))
            .header("Prefer", "resolution=merge-duplicates,return=minimal");
        self.send_json(builder, &[status]).await?;
        Ok(())
    }

    async fn delete_statuses(&self, user_id: &str, task_ids: &[String]) -> Result<(), SyncError> {
        if task_ids.is_empty() {
            return Ok(());
        }
        let url = format!(
            "{}?user_id=eq.{}&task_id=in.({})",
            self.rest("user_task_status"),
            user_id,
            task_ids.join(",")
        );
        self.send(self.with_auth(Request::delete(&url))).await?;
        Ok(())
    }

    async fn list_active_scenarios(&self, user_id: &str) -> Result<Vec<String>, SyncError> {
        #[derive(Deserialize)]
        struct ScenarioRow {
            scenario_id: String,
        }
        let url = format!(
            "{}?select=scenario_id&user_id=eq.{}&order=created_at.asc",
            self.rest("user_active_scenarios"),
            user_id
        );
        let response = self.send(self.with_auth(Request::get(&url))).await?;
        let rows: Vec<ScenarioRow> = Self::decode(response).await?;
        Ok(rows.into_iter().map(|r| r.scenario_id).collect())
    }

    async fn add_active_scenario(
        &self,
        user_id: &str,
        scenario_id: &str,
    ) -> Result<(), SyncError> {
        #[derive(Serialize)]
        struct ActiveRow<'a> {
            user_id: &'a str,
            scenario_id: &'a str,
            updated_at: String,
        }
        let url = format!(
            "{}?on_conflict=user_id,scenario_id",
            self.rest("user_active_scenarios")
        );
        let builder = self
            .with_auth(Request::post(&url))
            .header("Prefer", "resolution=merge-duplicates,return=minimal");
        self.send_json(
            builder,
            &[ActiveRow {
                user_id,
                scenario_id,
                updated_at: chrono::Utc::now().to_rfc3339(),
            }],
        )
        .await?;
        Ok(())
    }

    async fn remove_active_scenario(
        &self,
        user_id: &str,
        scenario_id: &str,
    ) -> Result<(), SyncError> {
        let url = format!(
            "{}?user_id=eq.{}&scenario_id=eq.{}",
            self.rest("user_active_scenarios"),
            user_id,
            scenario_id
        );
        self.send(self.with_auth(Request::delete(&url))).await?;
        Ok(())
    }

    async fn clear_active_scenarios(&self, user_id: &str) -> Result<(), SyncError> {
        let url = format!(
            "{}?user_id=eq.{}",
            self.rest("user_active_scenarios"),
            user_id
        );
        self.send(self.with_auth(Request::delete(&url))).await?;
        Ok(())
    }
}

/// Payload de creación de tarea (el id y los timestamps los pone la BD)
#[derive(Debug, Serialize)]
pub struct TaskInsert {
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub subcategory: Option<String>,
    pub location: Location,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub scenario: String,
    pub order: i64,
    pub link: Option<String>,
    pub notes: Option<String>,
    pub transport_type: Option<TransportType>,
}

/// Payload de edición de tarea - los campos van siempre completos,
/// un None borra el valor en la fila
#[derive(Debug, Serialize)]
pub struct TaskUpdate {
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub subcategory: Option<String>,
    pub link: Option<String>,
    pub notes: Option<String>,
    pub image_url: Option<String>,
    pub image_urls: Option<Vec<String>>,
    pub updated_at: String,
}

#[derive(Debug, Serialize)]
pub struct ContactInsert {
    pub name: String,
    pub role: String,
    pub location: Location,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}
