pub mod active_scenarios;
pub mod auth_service;
pub mod checklist_sync;
pub mod network_monitor;
pub mod offline_service;
pub mod pdf_generator;
pub mod remote;
pub mod supabase_api;

pub use active_scenarios::ActiveScenarios;
pub use checklist_sync::ChecklistSync;
pub use network_monitor::{Connectivity, NetworkMonitor};
pub use offline_service::{LocalStorageBackend, OfflineStore};
pub use remote::ChecklistRemote;
pub use supabase_api::{ContactInsert, SupabaseApi, TaskInsert, TaskUpdate};

use wasm_bindgen_futures::spawn_local;

use crate::models::SyncError;
use crate::services::auth_service::current_session;

/// Composición de producción de los servicios
pub type AppChecklistSync = ChecklistSync<SupabaseApi, LocalStorageBackend, NetworkMonitor>;
pub type AppActiveScenarios = ActiveScenarios<SupabaseApi, LocalStorageBackend, NetworkMonitor>;

/// API con el token de la sesión guardada (o la clave anónima)
pub fn app_api() -> SupabaseApi {
    SupabaseApi::new(current_session().map(|s| s.access_token))
}

pub fn app_sync() -> Result<AppChecklistSync, SyncError> {
    Ok(ChecklistSync::new(
        app_api(),
        OfflineStore::open(LocalStorageBackend)?,
        NetworkMonitor::new(),
    ))
}

pub fn app_registry() -> Result<AppActiveScenarios, SyncError> {
    Ok(ActiveScenarios::new(
        app_api(),
        OfflineStore::open(LocalStorageBackend)?,
        NetworkMonitor::new(),
    ))
}

/// Vacía la queue pendiente cada vez que vuelve la conexión
pub fn start_auto_drain() {
    let monitor = NetworkMonitor::new();
    monitor.on_online(move || {
        spawn_local(async {
            match app_sync() {
                Ok(sync) => {
                    if let Err(e) = sync.process_pending_queue().await {
                        log::error!("❌ Error procesando queue al reconectar: {}", e);
                    }
                }
                Err(e) => log::error!("❌ Almacén offline no disponible: {}", e),
            }
        });
    });
    log::info!("🚀 Auto-drain activo: la queue se procesará al reconectar");
}
