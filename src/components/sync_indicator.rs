use yew::prelude::*;

use crate::models::SyncStatus;
use crate::services::app_sync;

/// Badge de estado de sincronización (online/offline + cola pendiente)
#[function_component(SyncIndicator)]
pub fn sync_indicator() -> Html {
    let online = crate::hooks::use_online();

    let status = match app_sync() {
        Ok(sync) => sync.sync_status(),
        Err(_) => SyncStatus::Synced,
    };
    // El hook manda sobre el snapshot del servicio: re-renderiza al cambiar
    let status = if online {
        match status {
            SyncStatus::Offline { pending_count } if pending_count > 0 => {
                SyncStatus::Pending { count: pending_count }
            }
            SyncStatus::Offline { .. } => SyncStatus::Synced,
            other => other,
        }
    } else {
        match status {
            SyncStatus::Pending { count } => SyncStatus::Offline { pending_count: count },
            SyncStatus::Synced => SyncStatus::Offline { pending_count: 0 },
            other => other,
        }
    };

    let (icon, text, class) = match &status {
        SyncStatus::Synced => ("✅", "Synchronisiert".to_string(), "sync-indicator synced"),
        SyncStatus::Pending { count } => (
            "🔄",
            format!("{} Änderungen ausstehend", count),
            "sync-indicator pending",
        ),
        SyncStatus::Offline { pending_count } => (
            "📡",
            if *pending_count > 0 {
                format!("Offline – {} ausstehend", pending_count)
            } else {
                "Offline".to_string()
            },
            "sync-indicator offline",
        ),
    };

    html! {
        <span class={class} title="Synchronisierungsstatus">
            <span class="sync-icon">{icon}</span>
            <span class="sync-text">{text}</span>
        </span>
    }
}
