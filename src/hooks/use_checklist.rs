use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::models::ChecklistEntry;
use crate::services::{app_registry, app_sync};

pub struct UseChecklistHandle {
    pub entries: UseStateHandle<Vec<ChecklistEntry>>,
    pub loading: UseStateHandle<bool>,
    pub error: UseStateHandle<Option<String>>,
    pub reload: Callback<()>,
    pub toggle: Callback<String>,
    pub reset: Callback<()>,
}

/// Orquesta load/toggle/reset de la checklist de un escenario.
/// El toggle es optimista: actualiza la lista en memoria, y si el
/// upsert remoto falla revierte ese valor y deja el error visible.
#[hook]
pub fn use_checklist(
    user_id: String,
    scenario_id: String,
    on_reset_done: Callback<()>,
) -> UseChecklistHandle {
    let entries = use_state(Vec::<ChecklistEntry>::new);
    let loading = use_state(|| true);
    let error = use_state(|| None::<String>);

    let load = {
        let entries = entries.clone();
        let loading = loading.clone();
        let error = error.clone();
        let user_id = user_id.clone();
        let scenario_id = scenario_id.clone();

        Callback::from(move |_: ()| {
            let entries = entries.clone();
            let loading = loading.clone();
            let error = error.clone();
            let user_id = user_id.clone();
            let scenario_id = scenario_id.clone();

            spawn_local(async move {
                loading.set(true);
                let result = match app_sync() {
                    Ok(sync) => sync.load(&user_id, &scenario_id).await,
                    Err(e) => Err(e),
                };
                match result {
                    Ok(list) => {
                        entries.set(list);
                        error.set(None);
                    }
                    Err(e) => {
                        log::error!("❌ Error cargando la checklist: {}", e);
                        error.set(Some(format!("Fehler beim Laden der Aufgaben: {}", e)));
                    }
                }
                loading.set(false);
            });
        })
    };

    // Carga inicial y recarga al cambiar de escenario
    {
        let load = load.clone();
        use_effect_with((user_id.clone(), scenario_id.clone()), move |_| {
            load.emit(());
        });
    }

    let toggle = {
        let entries = entries.clone();
        let error = error.clone();
        let user_id = user_id.clone();

        Callback::from(move |task_id: String| {
            let before = (*entries).clone();
            let current_done = match before.iter().find(|e| e.task.id == task_id) {
                Some(entry) => entry.done,
                None => return,
            };

            // Optimista: la UI cambia ya
            let after: Vec<ChecklistEntry> = before
                .iter()
                .cloned()
                .map(|mut e| {
                    if e.task.id == task_id {
                        e.done = !current_done;
                    }
                    e
                })
                .collect();
            entries.set(after);

            let entries = entries.clone();
            let error = error.clone();
            let user_id = user_id.clone();
            spawn_local(async move {
                let result = match app_sync() {
                    Ok(sync) => sync.toggle(&user_id, &task_id, current_done).await,
                    Err(e) => Err(e),
                };
                if let Err(e) = result {
                    log::error!("❌ Error guardando el estado: {}", e);
                    // Transición compensatoria: volver al valor previo
                    entries.set(before);
                    error.set(Some(format!("Fehler beim Speichern der Aufgabe: {}", e)));
                }
            });
        })
    };

    let reset = {
        let entries = entries.clone();
        let error = error.clone();
        let user_id = user_id.clone();
        let scenario_id = scenario_id.clone();
        let on_reset_done = on_reset_done.clone();

        Callback::from(move |_: ()| {
            let task_ids: Vec<String> =
                (*entries).iter().map(|e| e.task.id.clone()).collect();
            let entries = entries.clone();
            let error = error.clone();
            let user_id = user_id.clone();
            let scenario_id = scenario_id.clone();
            let on_reset_done = on_reset_done.clone();

            spawn_local(async move {
                let result = match app_sync() {
                    Ok(sync) => sync.reset(&user_id, &scenario_id, &task_ids).await,
                    Err(e) => Err(e),
                };
                match result {
                    Ok(()) => {
                        // El reset también cierra la checklist en el registro
                        if let Ok(registry) = app_registry() {
                            registry.remove(&user_id, &scenario_id).await;
                        }
                        let cleared: Vec<ChecklistEntry> = (*entries)
                            .iter()
                            .cloned()
                            .map(|mut e| {
                                e.done = false;
                                e
                            })
                            .collect();
                        entries.set(cleared);
                        on_reset_done.emit(());
                    }
                    Err(e) => {
                        log::error!("❌ Error en el reset: {}", e);
                        error.set(Some(format!("Fehler beim Zurücksetzen: {}", e)));
                    }
                }
            });
        })
    };

    UseChecklistHandle {
        entries,
        loading,
        error,
        reload: load,
        toggle,
        reset,
    }
}
