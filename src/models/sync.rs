use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errores del núcleo de sincronización.
/// "Offline" no es un error - los llamadores consultan el NetworkMonitor
/// y toman la ruta local antes de llegar aquí.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyncError {
    #[error("Netzwerkfehler: {0}")]
    Network(String),
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("Antwort konnte nicht gelesen werden: {0}")]
    Decode(String),
    #[error("Lokaler Speicher nicht verfügbar: {0}")]
    Cache(String),
    #[error("Nicht angemeldet")]
    Unauthenticated,
}

/// Operación pendiente de la queue offline
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum PendingAction {
    UpsertStatus {
        user_id: String,
        task_id: String,
        done: bool,
        updated_at: String,
    },
    DeleteStatuses {
        user_id: String,
        task_ids: Vec<String>,
    },
    AddActiveScenario {
        user_id: String,
        scenario_id: String,
    },
    RemoveActiveScenario {
        user_id: String,
        scenario_id: String,
    },
}

impl PendingAction {
    /// Tabla remota sobre la que opera la acción
    pub fn table(&self) -> &'static str {
        match self {
            PendingAction::UpsertStatus { .. } | PendingAction::DeleteStatuses { .. } => {
                "user_task_status"
            }
            PendingAction::AddActiveScenario { .. }
            | PendingAction::RemoveActiveScenario { .. } => "user_active_scenarios",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PendingOp {
    pub action: PendingAction,
    pub table: String,
    pub timestamp: i64,
}

impl PendingOp {
    pub fn new(action: PendingAction) -> Self {
        let table = action.table().to_string();
        Self {
            action,
            table,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Estado para el indicador de sincronización en la UI
#[derive(Clone, Debug, PartialEq)]
pub enum SyncStatus {
    Synced,
    Pending { count: usize },
    Offline { pending_count: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accion_conoce_su_tabla() {
        let op = PendingOp::new(PendingAction::UpsertStatus {
            user_id: "u1".into(),
            task_id: "t1".into(),
            done: true,
            updated_at: "2024-01-01T00:00:00Z".into(),
        });
        assert_eq!(op.table, "user_task_status");

        let op = PendingOp::new(PendingAction::RemoveActiveScenario {
            user_id: "u1".into(),
            scenario_id: "reise-nl-ben".into(),
        });
        assert_eq!(op.table, "user_active_scenarios");
    }

    #[test]
    fn queue_sobrevive_una_vuelta_por_json() {
        let ops = vec![
            PendingOp::new(PendingAction::UpsertStatus {
                user_id: "u1".into(),
                task_id: "t1".into(),
                done: false,
                updated_at: "2024-01-01T00:00:00Z".into(),
            }),
            PendingOp::new(PendingAction::DeleteStatuses {
                user_id: "u1".into(),
                task_ids: vec!["t1".into(), "t2".into()],
            }),
        ];
        let json = serde_json::to_string(&ops).unwrap();
        let back: Vec<PendingOp> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ops);
    }
}
