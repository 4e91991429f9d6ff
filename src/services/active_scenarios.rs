// ============================================================================
// REGISTRO DE ESCENARIOS ACTIVOS
// ============================================================================
// Qué checklists tiene "abiertas" cada usuario. La tabla remota
// user_active_scenarios es la verdad cuando hay conexión; el espejo en
// localStorage (activeScenarios_{user}) es solo cache de lectura y se
// refresca en cada lectura remota con éxito. add/remove son idempotentes.
// ============================================================================

use crate::models::{PendingAction, PendingOp};
use crate::services::network_monitor::Connectivity;
use crate::services::offline_service::{OfflineStore, StorageBackend};
use crate::services::remote::ChecklistRemote;

pub struct ActiveScenarios<R, B, C>
where
    R: ChecklistRemote,
    B: StorageBackend,
    C: Connectivity,
{
    remote: R,
    store: OfflineStore<B>,
    network: C,
}

impl<R, B, C> ActiveScenarios<R, B, C>
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

    /// Lista sincronizada: remoto preferido, espejo como fallback.
    /// Nunca falla - en el peor de los casos devuelve el espejo (o nada).
    pub async fn sync(&self, user_id: &str) -> Vec<String> {
        if self.network.is_online() {
            match self.remote.list_active_scenarios(user_id).await {
                Ok(scenarios) => {
                    self.store.save_offline_active_scenarios(user_id, &scenarios);
                    return scenarios;
                }
                Err(e) => {
                    log::error!("❌ Error cargando escenarios activos: {}", e);
                }
            }
        }
        self.store.offline_active_scenarios(user_id)
    }

    /// Marca un escenario como activo. Añadir uno ya activo es un éxito.
    pub async fn add(&self, user_id: &str, scenario_id: &str) -> bool {
        if self.network.is_online() {
            if let Err(e) = self.remote.add_active_scenario(user_id, scenario_id).await {
                log::error!("❌ Error añadiendo escenario activo: {}", e);
                return false;
            }
        } else if let Err(e) = self.store.enqueue(PendingOp::new(
            PendingAction::AddActiveScenario {
                user_id: user_id.to_string(),
                scenario_id: scenario_id.to_string(),
            },
        )) {
            log::error!("❌ Error encolando escenario activo: {}", e);
            return false;
        }

        let mut mirror = self.store.offline_active_scenarios(user_id);
        if !mirror.iter().any(|s| s == scenario_id) {
            mirror.push(scenario_id.to_string());
            self.store.save_offline_active_scenarios(user_id, &mirror);
        }
        true
    }

    /// Quita un escenario del registro. Quitar uno ausente es un éxito.
    pub async fn remove(&self, user_id: &str, scenario_id: &str) -> bool {
        if self.network.is_online() {
            if let Err(e) = self
                .remote
                .remove_active_scenario(user_id, scenario_id)
                .await
            {
                log::error!("❌ Error quitando escenario activo: {}", e);
                return false;
            }
        } else if let Err(e) = self.store.enqueue(PendingOp::new(
            PendingAction::RemoveActiveScenario {
                user_id: user_id.to_string(),
                scenario_id: scenario_id.to_string(),
            },
        )) {
            log::error!("❌ Error encolando borrado de escenario activo: {}", e);
            return false;
        }

        let mut mirror = self.store.offline_active_scenarios(user_id);
        mirror.retain(|s| s != scenario_id);
        self.store.save_offline_active_scenarios(user_id, &mirror);
        true
    }

    /// Borra todos los escenarios activos del usuario (p.ej. al cerrar sesión)
    pub async fn clear_all(&self, user_id: &str) -> bool {
        if self.network.is_online() {
            if let Err(e) = self.remote.clear_active_scenarios(user_id).await {
                log::error!("❌ Error borrando escenarios activos: {}", e);
                return false;
            }
        } else {
            for scenario_id in self.store.offline_active_scenarios(user_id) {
                if self
                    .store
                    .enqueue(PendingOp::new(PendingAction::RemoveActiveScenario {
                        user_id: user_id.to_string(),
                        scenario_id,
                    }))
                    .is_err()
                {
                    return false;
                }
            }
        }
        self.store.save_offline_active_scenarios(user_id, &[]);
        true
    }

    pub async fn is_active(&self, user_id: &str, scenario_id: &str) -> bool {
        self.sync(user_id).await.iter().any(|s| s == scenario_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::network_monitor::FixedConnectivity;
    use crate::services::offline_service::testing::MemoryBackend;
    use crate::services::remote::testing::FakeRemote;
    use futures::executor::block_on;

    fn registry(
        remote: FakeRemote,
        backend: MemoryBackend,
        online: bool,
    ) -> ActiveScenarios<FakeRemote, MemoryBackend, FixedConnectivity> {
        let network = if online {
            FixedConnectivity::online()
        } else {
            FixedConnectivity::offline()
        };
        ActiveScenarios::new(remote, OfflineStore::open(backend).unwrap(), network)
    }

    #[test]
    fn add_es_idempotente() {
        let remote = FakeRemote::default();
        let registry = registry(remote.clone(), MemoryBackend::new(), true);

        assert!(block_on(registry.add("u1", "reise-nl-ben")));
        assert!(block_on(registry.add("u1", "reise-nl-ben")));

        assert_eq!(remote.0.borrow().active.len(), 1);
        assert_eq!(block_on(registry.sync("u1")), vec!["reise-nl-ben"]);
    }

    #[test]
    fn remove_de_ausente_es_exito() {
        let registry = registry(FakeRemote::default(), MemoryBackend::new(), true);
        assert!(block_on(registry.remove("u1", "no-activo")));
    }

    #[test]
    fn sync_refresca_el_espejo() {
        let remote = FakeRemote::default();
        remote
            .0
            .borrow_mut()
            .active
            .push(("u1".into(), "vor-ort-ben".into()));

        let registry = registry(remote, MemoryBackend::new(), true);
        assert_eq!(block_on(registry.sync("u1")), vec!["vor-ort-ben"]);
        // El espejo quedó refrescado con la lectura remota
        assert_eq!(
            registry.store.offline_active_scenarios("u1"),
            vec!["vor-ort-ben"]
        );
    }

    #[test]
    fn sync_cae_al_espejo_si_el_remoto_falla() {
        let remote = FakeRemote::default();
        let backend = MemoryBackend::new();
        {
            let store = OfflineStore::open(backend.clone()).unwrap();
            store.save_offline_active_scenarios("u1", &["reise-ben-nl".to_string()]);
        }
        remote.0.borrow_mut().fail_active = true;

        let registry = registry(remote, backend, true);
        assert_eq!(block_on(registry.sync("u1")), vec!["reise-ben-nl"]);
    }

    #[test]
    fn offline_actualiza_espejo_y_encola() {
        let remote = FakeRemote::default();
        let registry = registry(remote.clone(), MemoryBackend::new(), false);

        assert!(block_on(registry.add("u1", "reise-nl-ben")));
        assert_eq!(block_on(registry.sync("u1")), vec!["reise-nl-ben"]);
        // Nada llegó al remoto, la operación quedó en cola
        assert!(remote.0.borrow().active.is_empty());
        assert_eq!(registry.store.queue_len(), 1);

        assert!(block_on(registry.remove("u1", "reise-nl-ben")));
        assert_eq!(block_on(registry.sync("u1")), Vec::<String>::new());
        assert_eq!(registry.store.queue_len(), 2);
    }

    #[test]
    fn clear_all_vacia_remoto_y_espejo() {
        let remote = FakeRemote::default();
        let registry = registry(remote.clone(), MemoryBackend::new(), true);
        block_on(registry.add("u1", "reise-nl-ben"));
        block_on(registry.add("u1", "vor-ort-nl"));

        assert!(block_on(registry.clear_all("u1")));
        assert!(remote.0.borrow().active.is_empty());
        assert_eq!(block_on(registry.sync("u1")), Vec::<String>::new());
    }

    #[test]
    fn add_online_con_error_remoto_devuelve_false() {
        let remote = FakeRemote::default();
        remote.0.borrow_mut().fail_active = true;
        let registry = registry(remote, MemoryBackend::new(), true);

        assert!(!block_on(registry.add("u1", "reise-nl-ben")));
        // El espejo no se toca cuando el remoto rechaza
        assert_eq!(
            registry.store.offline_active_scenarios("u1"),
            Vec::<String>::new()
        );
    }
}
