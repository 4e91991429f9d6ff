use crate::models::{SyncError, Task, UserTaskStatus};

/// Operaciones remotas que necesita el núcleo de sincronización.
/// La implementación de producción es SupabaseApi; los tests usan un
/// backend falso en memoria. Todo corre en el hilo del navegador,
/// por eso no hay bounds de Send.
#[allow(async_fn_in_trait)]
pub trait ChecklistRemote {
    /// Tareas de un escenario, ordenadas por `order` ascendente
    async fn fetch_tasks(&self, scenario_id: &str) -> Result<Vec<Task>, SyncError>;

    /// Filas de estado del usuario restringidas a un conjunto de tareas
    async fn fetch_statuses(
        &self,
        user_id: &str,
        task_ids: &[String],
    ) -> Result<Vec<UserTaskStatus>, SyncError>;

    /// Upsert con conflicto en (user_id, task_id)
    async fn upsert_status(&self, status: &UserTaskStatus) -> Result<(), SyncError>;

    /// Borrado masivo de filas de estado (reset)
    async fn delete_statuses(&self, user_id: &str, task_ids: &[String]) -> Result<(), SyncError>;

    async fn list_active_scenarios(&self, user_id: &str) -> Result<Vec<String>, SyncError>;

    /// Upsert con conflicto en (user_id, scenario_id)
    async fn add_active_scenario(&self, user_id: &str, scenario_id: &str)
        -> Result<(), SyncError>;

    async fn remove_active_scenario(
        &self,
        user_id: &str,
        scenario_id: &str,
    ) -> Result<(), SyncError>;

    async fn clear_active_scenarios(&self, user_id: &str) -> Result<(), SyncError>;
}

/// Remoto falso en memoria para los tests de los servicios
#[cfg(test)]
pub mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    #[derive(Default)]
    pub struct FakeState {
        pub tasks: Vec<Task>,
        pub statuses: HashMap<String, UserTaskStatus>,
        pub active: Vec<(String, String)>,
        pub fail_fetch: bool,
        pub fail_upsert: bool,
        pub fail_delete: bool,
        pub fail_active: bool,
        pub upsert_calls: usize,
    }

    #[derive(Clone, Default)]
    pub struct FakeRemote(pub Rc<RefCell<FakeState>>);

    impl FakeRemote {
        pub fn with_tasks(tasks: Vec<Task>) -> Self {
            let remote = Self::default();
            remote.0.borrow_mut().tasks = tasks;
            remote
        }
    }

    fn boom() -> SyncError {
        SyncError::Http {
            status: 500,
            message: "boom".into(),
        }
    }

    impl ChecklistRemote for FakeRemote {
        async fn fetch_tasks(&self, scenario_id: &str) -> Result<Vec<Task>, SyncError> {
            let state = self.0.borrow();
            if state.fail_fetch {
                return Err(boom());
            }
            let mut tasks: Vec<Task> = state
                .tasks
                .iter()
                .filter(|t| t.scenario == scenario_id)
                .cloned()
                .collect();
            tasks.sort_by_key(|t| t.order);
            Ok(tasks)
        }

        async fn fetch_statuses(
            &self,
            user_id: &str,
            task_ids: &[String],
        ) -> Result<Vec<UserTaskStatus>, SyncError> {
            let state = self.0.borrow();
            if state.fail_fetch {
                return Err(boom());
            }
            Ok(state
                .statuses
                .values()
                .filter(|s| s.user_id == user_id && task_ids.contains(&s.task_id))
                .cloned()
                .collect())
        }

        async fn upsert_status(&self, status: &UserTaskStatus) -> Result<(), SyncError> {
            let mut state = self.0.borrow_mut();
            state.upsert_calls += 1;
            if state.fail_upsert {
                return Err(boom());
            }
            state.statuses.insert(status.id.clone(), status.clone());
            Ok(())
        }

        async fn delete_statuses(
            &self,
            user_id: &str,
            task_ids: &[String],
        ) -> Result<(), SyncError> {
            let mut state = self.0.borrow_mut();
            if state.fail_delete {
                return Err(boom());
            }
            for task_id in task_ids {
                state
                    .statuses
                    .remove(&crate::models::status_id(user_id, task_id));
            }
            Ok(())
        }

        async fn list_active_scenarios(&self, user_id: &str) -> Result<Vec<String>, SyncError> {
            let state = self.0.borrow();
            if state.fail_active {
                return Err(boom());
            }
            Ok(state
                .active
                .iter()
                .filter(|(u, _)| u == user_id)
                .map(|(_, s)| s.clone())
                .collect())
        }

        async fn add_active_scenario(
            &self,
            user_id: &str,
            scenario_id: &str,
        ) -> Result<(), SyncError> {
            let mut state = self.0.borrow_mut();
            if state.fail_active {
                return Err(boom());
            }
            let pair = (user_id.to_string(), scenario_id.to_string());
            if !state.active.contains(&pair) {
                state.active.push(pair);
            }
            Ok(())
        }

        async fn remove_active_scenario(
            &self,
            user_id: &str,
            scenario_id: &str,
        ) -> Result<(), SyncError> {
            let mut state = self.0.borrow_mut();
            if state.fail_active {
                return Err(boom());
            }
            state
                .active
                .retain(|(u, s)| !(u == user_id && s == scenario_id));
            Ok(())
        }

        async fn clear_active_scenarios(&self, user_id: &str) -> Result<(), SyncError> {
            let mut state = self.0.borrow_mut();
            if state.fail_active {
                return Err(boom());
            }
            state.active.retain(|(u, _)| u != user_id);
            Ok(())
        }
    }
}
