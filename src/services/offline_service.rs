// ============================================================================
// ALMACÉN OFFLINE CON ESQUEMA VERSIONADO
// ============================================================================
// Espejo local de tasks / contacts / user_task_status más la queue de
// operaciones pendientes. Las migraciones son aditivas: subir de versión
// nunca destruye datos ya cacheados.
//   v1: tasks (+índice por escenario), contacts, sync queue
//   v2: añade el store de estados por usuario
// ============================================================================

use std::collections::HashMap;

use serde::{de::DeserializeOwned, Serialize};

use crate::models::{Contact, Location, PendingOp, SyncError, Task, UserTaskStatus};
use crate::models::status_id;
use crate::utils::constants::ACTIVE_SCENARIOS_KEY_PREFIX;
use crate::utils::storage;

pub const SCHEMA_VERSION: u32 = 2;

const KEY_VERSION: &str = "reise-check-db::version";
const KEY_TASKS: &str = "reise-check-db::tasks";
const KEY_TASKS_BY_SCENARIO: &str = "reise-check-db::tasks_by_scenario";
const KEY_CONTACTS: &str = "reise-check-db::contacts";
const KEY_STATUSES: &str = "reise-check-db::statuses";
const KEY_QUEUE: &str = "reise-check-db::sync_queue";

/// Acceso clave-valor durable. En el navegador es localStorage;
/// los tests usan un backend en memoria.
pub trait StorageBackend: Clone {
    fn get(&self, key: &str) -> Result<Option<String>, String>;
    fn set(&self, key: &str, value: &str) -> Result<(), String>;
    fn remove(&self, key: &str) -> Result<(), String>;
}

/// Backend de producción sobre localStorage
#[derive(Clone, Default)]
pub struct LocalStorageBackend;

impl StorageBackend for LocalStorageBackend {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        storage::raw_get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        storage::raw_set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), String> {
        storage::raw_remove(key)
    }
}

/// Almacén offline sobre un backend durable
#[derive(Clone)]
pub struct OfflineStore<B: StorageBackend> {
    backend: B,
}

impl<B: StorageBackend> OfflineStore<B> {
    /// Abre el almacén y aplica migraciones pendientes (idempotente)
    pub fn open(backend: B) -> Result<Self, SyncError> {
        let store = Self { backend };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), SyncError> {
        let version: u32 = self
            .read_json(KEY_VERSION)?
            .unwrap_or(0);

        if version >= SCHEMA_VERSION {
            return Ok(());
        }

        // v1: stores base. Solo se crean si faltan.
        if version < 1 {
            self.init_if_missing::<HashMap<String, Task>>(KEY_TASKS)?;
            self.init_if_missing::<HashMap<String, Vec<String>>>(KEY_TASKS_BY_SCENARIO)?;
            self.init_if_missing::<HashMap<String, Contact>>(KEY_CONTACTS)?;
            self.init_if_missing::<Vec<PendingOp>>(KEY_QUEUE)?;
        }

        // v2: store de estados por usuario, sin tocar lo anterior
        if version < 2 {
            self.init_if_missing::<HashMap<String, UserTaskStatus>>(KEY_STATUSES)?;
        }

        self.write_json(KEY_VERSION, &SCHEMA_VERSION)?;
        log::info!("💾 Almacén offline migrado: v{} -> v{}", version, SCHEMA_VERSION);
        Ok(())
    }

    fn init_if_missing<T: Serialize + Default>(&self, key: &str) -> Result<(), SyncError> {
        if self.backend.get(key).map_err(SyncError::Cache)?.is_none() {
            self.write_json(key, &T::default())?;
        }
        Ok(())
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, SyncError> {
        match self.backend.get(key).map_err(SyncError::Cache)? {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| SyncError::Cache(format!("Error deserializando {}: {}", key, e))),
            None => Ok(None),
        }
    }

    fn write_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), SyncError> {
        let json = serde_json::to_string(value)
            .map_err(|e| SyncError::Cache(format!("Error serializando {}: {}", key, e)))?;
        self.backend.set(key, &json).map_err(SyncError::Cache)
    }

    fn read_map<T: DeserializeOwned>(&self, key: &str) -> Result<HashMap<String, T>, SyncError> {
        Ok(self.read_json(key)?.unwrap_or_default())
    }

    // ==========================================
    // TASKS
    // ==========================================

    /// Upsert por id; refresca también el índice por escenario
    pub fn put_tasks(&self, tasks: &[Task]) -> Result<(), SyncError> {
        if tasks.is_empty() {
            return Ok(());
        }
        let mut map: HashMap<String, Task> = self.read_map(KEY_TASKS)?;
        let mut index: HashMap<String, Vec<String>> = self.read_map(KEY_TASKS_BY_SCENARIO)?;

        for task in tasks {
            let ids = index.entry(task.scenario.clone()).or_default();
            if !ids.contains(&task.id) {
                ids.push(task.id.clone());
            }
            map.insert(task.id.clone(), task.clone());
        }

        self.write_json(KEY_TASKS, &map)?;
        self.write_json(KEY_TASKS_BY_SCENARIO, &index)
    }

    pub fn put_task(&self, task: &Task) -> Result<(), SyncError> {
        self.put_tasks(std::slice::from_ref(task))
    }

    pub fn remove_task(&self, task_id: &str) -> Result<(), SyncError> {
        let mut map: HashMap<String, Task> = self.read_map(KEY_TASKS)?;
        let mut index: HashMap<String, Vec<String>> = self.read_map(KEY_TASKS_BY_SCENARIO)?;

        map.remove(task_id);
        for ids in index.values_mut() {
            ids.retain(|id| id != task_id);
        }

        self.write_json(KEY_TASKS, &map)?;
        self.write_json(KEY_TASKS_BY_SCENARIO, &index)
    }

    /// Lookup por índice. Un escenario nunca cacheado devuelve `[]`.
    pub fn get_tasks_by_scenario(&self, scenario_id: &str) -> Result<Vec<Task>, SyncError> {
        let map: HashMap<String, Task> = self.read_map(KEY_TASKS)?;
        let index: HashMap<String, Vec<String>> = self.read_map(KEY_TASKS_BY_SCENARIO)?;

        let mut tasks: Vec<Task> = index
            .get(scenario_id)
            .map(|ids| ids.iter().filter_map(|id| map.get(id).cloned()).collect())
            .unwrap_or_default();
        tasks.sort_by_key(|t| t.order);
        Ok(tasks)
    }

    // ==========================================
    // CONTACTS
    // ==========================================

    pub fn put_contacts(&self, contacts: &[Contact]) -> Result<(), SyncError> {
        if contacts.is_empty() {
            return Ok(());
        }
        let mut map: HashMap<String, Contact> = self.read_map(KEY_CONTACTS)?;
        for contact in contacts {
            map.insert(contact.id.clone(), contact.clone());
        }
        self.write_json(KEY_CONTACTS, &map)
    }

    pub fn remove_contact(&self, contact_id: &str) -> Result<(), SyncError> {
        let mut map: HashMap<String, Contact> = self.read_map(KEY_CONTACTS)?;
        map.remove(contact_id);
        self.write_json(KEY_CONTACTS, &map)
    }

    pub fn get_contacts_by_location(&self, location: Location) -> Result<Vec<Contact>, SyncError> {
        let map: HashMap<String, Contact> = self.read_map(KEY_CONTACTS)?;
        let mut contacts: Vec<Contact> =
            map.into_values().filter(|c| c.location == location).collect();
        contacts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(contacts)
    }

    // ==========================================
    // USER TASK STATUS
    // ==========================================

    pub fn put_statuses(&self, statuses: &[UserTaskStatus]) -> Result<(), SyncError> {
        if statuses.is_empty() {
            return Ok(());
        }
        let mut map: HashMap<String, UserTaskStatus> = self.read_map(KEY_STATUSES)?;
        for status in statuses {
            map.insert(status.id.clone(), status.clone());
        }
        self.write_json(KEY_STATUSES, &map)
    }

    /// Upsert individual - siempre funciona en local, sin red
    pub fn set_status(
        &self,
        user_id: &str,
        task_id: &str,
        done: bool,
    ) -> Result<UserTaskStatus, SyncError> {
        let status = UserTaskStatus::new(user_id, task_id, done);
        self.put_statuses(std::slice::from_ref(&status))?;
        Ok(status)
    }

    /// Solo filas cuyo task_id pertenece a tareas cacheadas del escenario
    /// (join contra el espejo de tareas, no un scan de todos los estados)
    pub fn get_statuses(
        &self,
        user_id: &str,
        scenario_id: &str,
    ) -> Result<Vec<UserTaskStatus>, SyncError> {
        let index: HashMap<String, Vec<String>> = self.read_map(KEY_TASKS_BY_SCENARIO)?;
        let task_ids = match index.get(scenario_id) {
            Some(ids) => ids,
            None => return Ok(Vec::new()),
        };

        let map: HashMap<String, UserTaskStatus> = self.read_map(KEY_STATUSES)?;
        Ok(task_ids
            .iter()
            .filter_map(|task_id| map.get(&status_id(user_id, task_id)).cloned())
            .collect())
    }

    pub fn delete_statuses(&self, user_id: &str, task_ids: &[String]) -> Result<(), SyncError> {
        let mut map: HashMap<String, UserTaskStatus> = self.read_map(KEY_STATUSES)?;
        for task_id in task_ids {
            map.remove(&status_id(user_id, task_id));
        }
        self.write_json(KEY_STATUSES, &map)
    }

    // ==========================================
    // QUEUE DE OPERACIONES PENDIENTES
    // ==========================================

    pub fn enqueue(&self, op: PendingOp) -> Result<(), SyncError> {
        let mut queue: Vec<PendingOp> = self.read_queue()?;
        queue.push(op);
        self.write_json(KEY_QUEUE, &queue)
    }

    /// Saca toda la queue (y la vacía). El llamador decide requeuear.
    pub fn take_queue(&self) -> Result<Vec<PendingOp>, SyncError> {
        let queue = self.read_queue()?;
        self.write_json(KEY_QUEUE, &Vec::<PendingOp>::new())?;
        Ok(queue)
    }

    /// Reinserta operaciones no procesadas al frente de la queue
    pub fn requeue_front(&self, ops: Vec<PendingOp>) -> Result<(), SyncError> {
        if ops.is_empty() {
            return Ok(());
        }
        let mut queue = ops;
        queue.extend(self.read_queue()?);
        self.write_json(KEY_QUEUE, &queue)
    }

    pub fn queue_len(&self) -> usize {
        self.read_queue().map(|q| q.len()).unwrap_or(0)
    }

    fn read_queue(&self) -> Result<Vec<PendingOp>, SyncError> {
        Ok(self.read_json(KEY_QUEUE)?.unwrap_or_default())
    }

    // ==========================================
    // ESPEJO OFFLINE DE ESCENARIOS ACTIVOS
    // ==========================================
    // Clave heredada por usuario, fuera del esquema versionado

    pub fn offline_active_scenarios(&self, user_id: &str) -> Vec<String> {
        let key = format!("{}{}", ACTIVE_SCENARIOS_KEY_PREFIX, user_id);
        match self.backend.get(&key) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    pub fn save_offline_active_scenarios(&self, user_id: &str, scenarios: &[String]) {
        let key = format!("{}{}", ACTIVE_SCENARIOS_KEY_PREFIX, user_id);
        if let Ok(json) = serde_json::to_string(scenarios) {
            if let Err(e) = self.backend.set(&key, &json) {
                log::error!("❌ Error guardando escenarios activos offline: {}", e);
            }
        }
    }
}

// ============================================================================
// BACKENDS DE TEST
// ============================================================================

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// Backend en memoria con fallo de escritura simulable
    #[derive(Clone, Default)]
    pub struct MemoryBackend {
        data: Rc<RefCell<HashMap<String, String>>>,
        fail_writes: Rc<Cell<bool>>,
    }

    impl MemoryBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_fail_writes(&self, fail: bool) {
            self.fail_writes.set(fail);
        }

        pub fn raw_insert(&self, key: &str, value: &str) {
            self.data.borrow_mut().insert(key.to_string(), value.to_string());
        }
    }

    impl StorageBackend for MemoryBackend {
        fn get(&self, key: &str) -> Result<Option<String>, String> {
            Ok(self.data.borrow().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<(), String> {
            if self.fail_writes.get() {
                return Err("simulated write failure".to_string());
            }
            self.data.borrow_mut().insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn remove(&self, key: &str) -> Result<(), String> {
            self.data.borrow_mut().remove(key);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::MemoryBackend;
    use super::*;
    use crate::models::task::test_task;

    fn store() -> OfflineStore<MemoryBackend> {
        OfflineStore::open(MemoryBackend::new()).unwrap()
    }

    #[test]
    fn escenario_nunca_cacheado_devuelve_vacio() {
        let store = store();
        assert_eq!(store.get_tasks_by_scenario("reise-nl-ben").unwrap(), vec![]);
        assert_eq!(store.get_statuses("u1", "reise-nl-ben").unwrap(), vec![]);
    }

    #[test]
    fn put_tasks_es_upsert_y_ordena_por_order() {
        let store = store();
        let t1 = test_task("t1", "s1", "Sicherheit", None, 2);
        let t2 = test_task("t2", "s1", "Sicherheit", None, 1);
        store.put_tasks(&[t1.clone(), t2.clone()]).unwrap();
        // Upsert repetido no duplica
        store.put_tasks(&[t1.clone()]).unwrap();

        let tasks = store.get_tasks_by_scenario("s1").unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id, "t2");
        assert_eq!(tasks[1].id, "t1");
    }

    #[test]
    fn migracion_v1_a_v2_conserva_tareas() {
        // Simular una base v1 ya poblada (sin store de estados)
        let backend = MemoryBackend::new();
        {
            let v1 = OfflineStore { backend: backend.clone() };
            v1.write_json(KEY_TASKS, &HashMap::from([(
                "t1".to_string(),
                test_task("t1", "s1", "Sicherheit", None, 1),
            )]))
            .unwrap();
            v1.write_json(
                KEY_TASKS_BY_SCENARIO,
                &HashMap::from([("s1".to_string(), vec!["t1".to_string()])]),
            )
            .unwrap();
            v1.write_json(KEY_VERSION, &1u32).unwrap();
        }

        let store = OfflineStore::open(backend.clone()).unwrap();
        let version: u32 = store.read_json(KEY_VERSION).unwrap().unwrap();
        assert_eq!(version, SCHEMA_VERSION);
        // Los datos v1 siguen ahí y el store nuevo existe vacío
        assert_eq!(store.get_tasks_by_scenario("s1").unwrap().len(), 1);
        assert_eq!(store.get_statuses("u1", "s1").unwrap(), vec![]);
    }

    #[test]
    fn set_status_visible_inmediatamente() {
        let store = store();
        store.put_tasks(&[test_task("t1", "s1", "Sicherheit", None, 1)]).unwrap();

        store.set_status("u1", "t1", true).unwrap();
        let statuses = store.get_statuses("u1", "s1").unwrap();
        assert_eq!(statuses.len(), 1);
        assert!(statuses[0].done);

        // Upsert: cambiar el valor no crea una segunda fila
        store.set_status("u1", "t1", false).unwrap();
        let statuses = store.get_statuses("u1", "s1").unwrap();
        assert_eq!(statuses.len(), 1);
        assert!(!statuses[0].done);
    }

    #[test]
    fn join_restringido_al_escenario() {
        let store = store();
        store.put_tasks(&[
            test_task("t1", "s1", "Sicherheit", None, 1),
            test_task("t2", "s2", "Sicherheit", None, 1),
        ])
        .unwrap();
        store.set_status("u1", "t1", true).unwrap();
        store.set_status("u1", "t2", true).unwrap();
        // Estado de otro usuario
        store.set_status("u2", "t1", true).unwrap();

        let statuses = store.get_statuses("u1", "s1").unwrap();
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].task_id, "t1");
        assert_eq!(statuses[0].user_id, "u1");
    }

    #[test]
    fn delete_statuses_elimina_filas() {
        let store = store();
        store.put_tasks(&[
            test_task("t1", "s1", "Sicherheit", None, 1),
            test_task("t2", "s1", "Sicherheit", None, 2),
        ])
        .unwrap();
        store.set_status("u1", "t1", true).unwrap();
        store.set_status("u1", "t2", true).unwrap();

        store
            .delete_statuses("u1", &["t1".to_string(), "t2".to_string()])
            .unwrap();
        assert_eq!(store.get_statuses("u1", "s1").unwrap(), vec![]);
    }

    #[test]
    fn queue_fifo_y_requeue_al_frente() {
        let store = store();
        let op1 = PendingOp::new(crate::models::PendingAction::AddActiveScenario {
            user_id: "u1".into(),
            scenario_id: "s1".into(),
        });
        let op2 = PendingOp::new(crate::models::PendingAction::RemoveActiveScenario {
            user_id: "u1".into(),
            scenario_id: "s2".into(),
        });
        store.enqueue(op1.clone()).unwrap();
        store.enqueue(op2.clone()).unwrap();
        assert_eq!(store.queue_len(), 2);

        let taken = store.take_queue().unwrap();
        assert_eq!(taken, vec![op1.clone(), op2.clone()]);
        assert_eq!(store.queue_len(), 0);

        // Reinsertar el resto no procesado delante de lo nuevo
        let op3 = PendingOp::new(crate::models::PendingAction::AddActiveScenario {
            user_id: "u1".into(),
            scenario_id: "s3".into(),
        });
        store.enqueue(op3.clone()).unwrap();
        store.requeue_front(vec![op2.clone()]).unwrap();
        assert_eq!(store.take_queue().unwrap(), vec![op2, op3]);
    }

    #[test]
    fn espejo_de_escenarios_activos_por_usuario() {
        let store = store();
        assert_eq!(store.offline_active_scenarios("u1"), Vec::<String>::new());
        store.save_offline_active_scenarios("u1", &["reise-nl-ben".to_string()]);
        assert_eq!(store.offline_active_scenarios("u1"), vec!["reise-nl-ben"]);
        // Otro usuario no ve la lista
        assert_eq!(store.offline_active_scenarios("u2"), Vec::<String>::new());
    }
}
