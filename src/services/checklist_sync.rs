// ============================================================================
// SINCRONIZADOR DE ESTADOS DE CHECKLIST
// ============================================================================
// El único sitio donde se maneja la dualidad online/offline:
//  - Load:   online -> remoto (y refresco best-effort del espejo local);
//            offline -> espejo local. Un fetch fallido estando online es un
//            error real, NUNCA un fallback silencioso al cache.
//  - Toggle: el almacén local se escribe SIEMPRE; el remoto solo online.
//            Si el upsert remoto falla, el llamador revierte el valor
//            optimista en memoria (el cache queda como está - la próxima
//            carga online reconcilia desde el remoto).
//  - Reset:  online borra primero en remoto; un fallo aborta sin tocar local.
//  - Queue:  operaciones hechas offline se encolan y se reproducen al
//            reconectar por los mismos caminos upsert/delete.
// ============================================================================

use crate::models::{
    merge_statuses, ChecklistEntry, PendingAction, PendingOp, SyncError, SyncStatus,
    UserTaskStatus,
};
use crate::services::network_monitor::Connectivity;
use crate::services::offline_service::{OfflineStore, StorageBackend};
use crate::services::remote::ChecklistRemote;

pub struct ChecklistSync<R, B, C>
where
    R: ChecklistRemote,
    B: StorageBackend,
    C: Connectivity,
{
    remote: R,
    store: OfflineStore<B>,
    network: C,
}

impl<R, B, C> Clone for ChecklistSync<R, B, C>
where
    R: ChecklistRemote + Clone,
    B: StorageBackend,
    C: Connectivity + Clone,
{
    fn clone(&self) -> Self {
        Self {
            remote: self.remote.clone(),
            store: self.store.clone(),
            network: self.network.clone(),
        }
    }
}

impl<R, B, C> ChecklistSync<R, B, C>
where
    R: ChecklistRemote,
    B: StorageBackend,
    C: Connectivity,
{
    pub fn new(remote: R, store: OfflineStore<B>, network: C) -> Self {
        Self {
            remote,
            store,
            network,
        }
    }

    pub fn is_online(&self) -> bool {
        self.network.is_online()
    }

    /// Estado para el indicador de la UI
    pub fn sync_status(&self) -> SyncStatus {
        let pending = self.store.queue_len();
        if !self.network.is_online() {
            SyncStatus::Offline {
                pending_count: pending,
            }
        } else if pending > 0 {
            SyncStatus::Pending { count: pending }
        } else {
            SyncStatus::Synced
        }
    }

    /// Carga la checklist de un escenario para el usuario actual
    pub async fn load(
        &self,
        user_id: &str,
        scenario_id: &str,
    ) -> Result<Vec<ChecklistEntry>, SyncError> {
        if !self.network.is_online() {
            log::info!("📴 Offline: cargando '{}' desde el almacén local", scenario_id);
            let tasks = self.store.get_tasks_by_scenario(scenario_id)?;
            let statuses = self.store.get_statuses(user_id, scenario_id)?;
            return Ok(merge_statuses(tasks, &statuses));
        }

        // Vaciar la queue antes de leer, para que el remoto ya refleje
        // los cambios hechos offline
        if let Err(e) = self.process_pending_queue().await {
            log::warn!("⚠️ Queue pendiente sin procesar del todo: {}", e);
        }

        let tasks = self.remote.fetch_tasks(scenario_id).await?;
        let task_ids: Vec<String> = tasks.iter().map(|t| t.id.clone()).collect();
        let statuses = self.remote.fetch_statuses(user_id, &task_ids).await?;

        // Refresco best-effort del espejo: un fallo solo degrada la
        // capacidad offline, no la carga
        if let Err(e) = self.store.put_tasks(&tasks) {
            log::error!("❌ Error refrescando tareas en el cache: {}", e);
        }
        if let Err(e) = self.store.put_statuses(&statuses) {
            log::error!("❌ Error refrescando estados en el cache: {}", e);
        }

        log::info!(
            "✅ Checklist '{}' cargada: {} tareas, {} estados",
            scenario_id,
            tasks.len(),
            statuses.len()
        );
        Ok(merge_statuses(tasks, &statuses))
    }

    /// Cambia el estado de una tarea. Devuelve el nuevo valor `done`.
    /// En caso de Err el llamador debe revertir su valor optimista.
    pub async fn toggle(
        &self,
        user_id: &str,
        task_id: &str,
        current_done: bool,
    ) -> Result<bool, SyncError> {
        let new_done = !current_done;

        // Local siempre primero: una recarga (incluso offline) debe
        // reflejar el toggle
        let status = self.store.set_status(user_id, task_id, new_done)?;

        if self.network.is_online() {
            self.remote.upsert_status(&status).await?;
            log::info!("✅ Estado sincronizado: {} -> {}", task_id, new_done);
        } else {
            self.store.enqueue(PendingOp::new(PendingAction::UpsertStatus {
                user_id: user_id.to_string(),
                task_id: task_id.to_string(),
                done: new_done,
                updated_at: status.updated_at.clone(),
            }))?;
            log::info!("📴 Toggle en cola: {} -> {}", task_id, new_done);
        }

        Ok(new_done)
    }

    /// Resetea la checklist de un escenario borrando las filas de estado
    /// del usuario (no escribe done=false, no deja residuos).
    pub async fn reset(
        &self,
        user_id: &str,
        scenario_id: &str,
        task_ids: &[String],
    ) -> Result<(), SyncError> {
        if self.network.is_online() {
            // El borrado remoto va primero: si falla, se aborta sin
            // ninguna mutación local
            self.remote.delete_statuses(user_id, task_ids).await?;
            self.store.delete_statuses(user_id, task_ids)?;
        } else {
            self.store.delete_statuses(user_id, task_ids)?;
            self.store.enqueue(PendingOp::new(PendingAction::DeleteStatuses {
                user_id: user_id.to_string(),
                task_ids: task_ids.to_vec(),
            }))?;
        }
        log::info!("🗑️ Checklist '{}' reseteada ({} tareas)", scenario_id, task_ids.len());
        Ok(())
    }

    /// Reproduce la queue pendiente contra el remoto (más antiguas primero).
    /// Si una operación falla, el resto vuelve a la queue.
    pub async fn process_pending_queue(&self) -> Result<usize, SyncError> {
        if !self.network.is_online() {
            return Ok(0);
        }

        let ops = self.store.take_queue()?;
        if ops.is_empty() {
            return Ok(0);
        }

        log::info!("🔄 Procesando queue: {} operaciones pendientes", ops.len());
        let mut processed = 0;
        let mut iter = ops.into_iter();

        while let Some(op) = iter.next() {
            let result = match &op.action {
                PendingAction::UpsertStatus {
                    user_id,
                    task_id,
                    done,
                    updated_at,
                } => {
                    let status = UserTaskStatus {
                        id: crate::models::status_id(user_id, task_id),
                        user_id: user_id.clone(),
                        task_id: task_id.clone(),
                        done: *done,
                        updated_at: updated_at.clone(),
                    };
                    self.remote.upsert_status(&status).await
                }
                PendingAction::DeleteStatuses { user_id, task_ids } => {
                    self.remote.delete_statuses(user_id, task_ids).await
                }
                PendingAction::AddActiveScenario {
                    user_id,
                    scenario_id,
                } => self.remote.add_active_scenario(user_id, scenario_id).await,
                PendingAction::RemoveActiveScenario {
                    user_id,
                    scenario_id,
                } => {
                    self.remote
                        .remove_active_scenario(user_id, scenario_id)
                        .await
                }
            };

            if let Err(e) = result {
                let mut remaining = vec![op];
                remaining.extend(iter);
                self.store.requeue_front(remaining)?;
                log::warn!("⚠️ Queue interrumpida tras {} operaciones: {}", processed, e);
                return Err(e);
            }
            processed += 1;
        }

        log::info!("✅ Queue procesada: {} operaciones", processed);
        Ok(processed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::test_task;
    use crate::models::Task;
    use crate::services::network_monitor::FixedConnectivity;
    use crate::services::offline_service::testing::MemoryBackend;
    use crate::services::remote::testing::FakeRemote;
    use futures::executor::block_on;

    fn sync_with(
        remote: FakeRemote,
        backend: MemoryBackend,
        online: bool,
    ) -> ChecklistSync<FakeRemote, MemoryBackend, FixedConnectivity> {
        let network = if online {
            FixedConnectivity::online()
        } else {
            FixedConnectivity::offline()
        };
        ChecklistSync::new(remote, OfflineStore::open(backend).unwrap(), network)
    }

    fn two_tasks() -> Vec<Task> {
        vec![
            test_task("t1", "s1", "Sicherheit", None, 1),
            test_task("t2", "s1", "Sicherheit", None, 2),
        ]
    }

    #[test]
    fn carga_online_sin_fila_es_false() {
        // Tarea sin fila de estado -> done == false
        let remote = FakeRemote::with_tasks(two_tasks());
        remote
            .0
            .borrow_mut()
            .statuses
            .insert("u1-t2".into(), UserTaskStatus::new("u1", "t2", true));

        let sync = sync_with(remote, MemoryBackend::new(), true);
        let entries = block_on(sync.load("u1", "s1")).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(!entries[0].done);
        assert!(entries[1].done);

        // La carga online refresca el espejo local
        assert_eq!(sync.store.get_tasks_by_scenario("s1").unwrap().len(), 2);
    }

    #[test]
    fn carga_online_con_error_no_cae_al_cache() {
        let backend = MemoryBackend::new();
        // Cache poblado de una sesión anterior
        {
            let store = OfflineStore::open(backend.clone()).unwrap();
            store.put_tasks(&two_tasks()).unwrap();
        }

        let remote = FakeRemote::with_tasks(two_tasks());
        remote.0.borrow_mut().fail_fetch = true;

        let sync = sync_with(remote, backend, true);
        // Error real estando online, sin fallback silencioso
        assert!(block_on(sync.load("u1", "s1")).is_err());
    }

    #[test]
    fn fallo_de_cache_no_rompe_la_carga_online() {
        let remote = FakeRemote::with_tasks(two_tasks());
        let backend = MemoryBackend::new();
        let sync = sync_with(remote, backend.clone(), true);

        // El refresco del espejo falla, la carga sigue funcionando
        backend.set_fail_writes(true);
        let entries = block_on(sync.load("u1", "s1")).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn carga_offline_desde_cache() {
        let backend = MemoryBackend::new();
        {
            let store = OfflineStore::open(backend.clone()).unwrap();
            store.put_tasks(&two_tasks()).unwrap();
            store.set_status("u1", "t1", true).unwrap();
        }

        let sync = sync_with(FakeRemote::default(), backend, false);
        let entries = block_on(sync.load("u1", "s1")).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].done);
        assert!(!entries[1].done);
    }

    #[test]
    fn carga_offline_sin_cache_es_lista_vacia() {
        let sync = sync_with(FakeRemote::default(), MemoryBackend::new(), false);
        let entries = block_on(sync.load("u1", "s-nuevo")).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn toggle_doble_online_deja_una_sola_fila() {
        // Dos toggles seguidos -> una sola fila, done vuelve al valor inicial
        let remote = FakeRemote::with_tasks(two_tasks());
        let sync = sync_with(remote.clone(), MemoryBackend::new(), true);

        let done = block_on(sync.toggle("u1", "t1", false)).unwrap();
        assert!(done);
        let done = block_on(sync.toggle("u1", "t1", done)).unwrap();
        assert!(!done);

        let state = remote.0.borrow();
        assert_eq!(state.upsert_calls, 2);
        assert_eq!(state.statuses.len(), 1);
        assert!(!state.statuses["u1-t1"].done);
    }

    #[test]
    fn toggle_online_con_fallo_remoto_devuelve_err_y_cache_queda() {
        // Rama online-con-error: Err para que el llamador
        // revierta lo optimista; el cache NO se revierte
        let remote = FakeRemote::with_tasks(two_tasks());
        remote.0.borrow_mut().fail_upsert = true;

        let sync = sync_with(remote, MemoryBackend::new(), true);
        // El join offline necesita el espejo de tareas
        sync.store.put_tasks(&two_tasks()).unwrap();

        assert!(block_on(sync.toggle("u1", "t2", false)).is_err());

        let cached = sync.store.get_statuses("u1", "s1").unwrap();
        assert_eq!(cached.len(), 1);
        assert!(cached[0].done);
    }

    #[test]
    fn toggle_offline_se_encola_y_sobrevive_recargas() {
        // Toggle offline -> recarga offline lo refleja; al reconectar,
        // el drain lo empuja al remoto
        let backend = MemoryBackend::new();
        {
            let store = OfflineStore::open(backend.clone()).unwrap();
            store.put_tasks(&two_tasks()).unwrap();
        }
        let remote = FakeRemote::with_tasks(two_tasks());
        let network = FixedConnectivity::offline();
        let sync = ChecklistSync::new(
            remote.clone(),
            OfflineStore::open(backend).unwrap(),
            network.clone(),
        );

        let done = block_on(sync.toggle("u1", "t2", false)).unwrap();
        assert!(done);
        assert_eq!(sync.store.queue_len(), 1);
        // Nada llegó al remoto todavía
        assert_eq!(remote.0.borrow().statuses.len(), 0);

        // Recarga offline: el toggle sigue ahí
        let entries = block_on(sync.load("u1", "s1")).unwrap();
        assert!(entries[1].done);

        // Reconexión: la siguiente carga online vacía la queue primero
        network.set_online(true);
        let entries = block_on(sync.load("u1", "s1")).unwrap();
        assert!(entries[1].done);
        assert_eq!(sync.store.queue_len(), 0);
        assert_eq!(remote.0.borrow().statuses.len(), 1);
        assert!(remote.0.borrow().statuses["u1-t2"].done);
    }

    #[test]
    fn drain_fallido_requeuea_lo_no_procesado() {
        let backend = MemoryBackend::new();
        let remote = FakeRemote::with_tasks(two_tasks());
        let network = FixedConnectivity::offline();
        let sync = ChecklistSync::new(
            remote.clone(),
            OfflineStore::open(backend).unwrap(),
            network.clone(),
        );
        sync.store.put_tasks(&two_tasks()).unwrap();

        block_on(sync.toggle("u1", "t1", false)).unwrap();
        block_on(sync.toggle("u1", "t2", false)).unwrap();
        assert_eq!(sync.store.queue_len(), 2);

        network.set_online(true);
        remote.0.borrow_mut().fail_upsert = true;
        assert!(block_on(sync.process_pending_queue()).is_err());
        // La primera falló: las dos siguen en la queue
        assert_eq!(sync.store.queue_len(), 2);

        remote.0.borrow_mut().fail_upsert = false;
        assert_eq!(block_on(sync.process_pending_queue()).unwrap(), 2);
        assert_eq!(sync.store.queue_len(), 0);
    }

    #[test]
    fn reset_online_borra_remoto_y_cache() {
        // Tras el reset todo queda no-erledigt
        let remote = FakeRemote::with_tasks(two_tasks());
        let sync = sync_with(remote.clone(), MemoryBackend::new(), true);
        sync.store.put_tasks(&two_tasks()).unwrap();

        block_on(sync.toggle("u1", "t1", false)).unwrap();
        block_on(sync.toggle("u1", "t2", false)).unwrap();

        let ids = vec!["t1".to_string(), "t2".to_string()];
        block_on(sync.reset("u1", "s1", &ids)).unwrap();

        assert!(remote.0.borrow().statuses.is_empty());
        assert!(sync.store.get_statuses("u1", "s1").unwrap().is_empty());

        let entries = block_on(sync.load("u1", "s1")).unwrap();
        assert!(entries.iter().all(|e| !e.done));
    }

    #[test]
    fn reset_aborta_si_el_remoto_falla() {
        let remote = FakeRemote::with_tasks(two_tasks());
        let sync = sync_with(remote.clone(), MemoryBackend::new(), true);
        sync.store.put_tasks(&two_tasks()).unwrap();
        block_on(sync.toggle("u1", "t1", false)).unwrap();

        remote.0.borrow_mut().fail_delete = true;
        let ids = vec!["t1".to_string(), "t2".to_string()];
        assert!(block_on(sync.reset("u1", "s1", &ids)).is_err());

        // Sin mutación local: el estado sigue en el cache
        assert_eq!(sync.store.get_statuses("u1", "s1").unwrap().len(), 1);
    }

    #[test]
    fn reset_offline_limpia_cache_y_encola() {
        let remote = FakeRemote::with_tasks(two_tasks());
        let sync = sync_with(remote, MemoryBackend::new(), false);
        sync.store.put_tasks(&two_tasks()).unwrap();
        block_on(sync.toggle("u1", "t1", false)).unwrap();

        let ids = vec!["t1".to_string(), "t2".to_string()];
        block_on(sync.reset("u1", "s1", &ids)).unwrap();

        assert!(sync.store.get_statuses("u1", "s1").unwrap().is_empty());
        // Un UpsertStatus (del toggle) + un DeleteStatuses (del reset)
        assert_eq!(sync.store.queue_len(), 2);
    }

    #[test]
    fn estado_del_indicador() {
        let sync = sync_with(FakeRemote::default(), MemoryBackend::new(), false);
        assert_eq!(sync.sync_status(), SyncStatus::Offline { pending_count: 0 });

        sync.store.put_tasks(&two_tasks()).unwrap();
        block_on(sync.toggle("u1", "t1", false)).unwrap();
        assert_eq!(sync.sync_status(), SyncStatus::Offline { pending_count: 1 });
    }
}
