use serde::{Deserialize, Serialize};

use super::task::{ChecklistEntry, Task};

/// Estado "erledigt" por (usuario, tarea).
/// Como máximo una fila por par - los writes son siempre upserts
/// con conflicto en (user_id, task_id).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserTaskStatus {
    pub id: String,
    pub user_id: String,
    pub task_id: String,
    pub done: bool,
    pub updated_at: String,
}

impl UserTaskStatus {
    pub fn new(user_id: &str, task_id: &str, done: bool) -> Self {
        Self {
            id: status_id(user_id, task_id),
            user_id: user_id.to_string(),
            task_id: task_id.to_string(),
            done,
            updated_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Id sintético para upserts idempotentes
pub fn status_id(user_id: &str, task_id: &str) -> String {
    format!("{}-{}", user_id, task_id)
}

/// Join tareas × estados. Una tarea sin fila de estado cuenta como
/// no erledigt - eso no es un error.
pub fn merge_statuses(tasks: Vec<Task>, statuses: &[UserTaskStatus]) -> Vec<ChecklistEntry> {
    tasks
        .into_iter()
        .map(|task| {
            let done = statuses
                .iter()
                .find(|s| s.task_id == task.id)
                .map(|s| s.done)
                .unwrap_or(false);
            ChecklistEntry { task, done }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::test_task;

    #[test]
    fn id_sintetico() {
        assert_eq!(status_id("u1", "t9"), "u1-t9");
        let status = UserTaskStatus::new("u1", "t9", true);
        assert_eq!(status.id, "u1-t9");
        assert!(status.done);
    }

    #[test]
    fn merge_sin_fila_es_false() {
        // Tarea sin fila de estado -> done == false
        let tasks = vec![
            test_task("t1", "s", "Sicherheit", None, 1),
            test_task("t2", "s", "Sicherheit", None, 2),
        ];
        let statuses = vec![UserTaskStatus::new("u1", "t2", true)];

        let merged = merge_statuses(tasks, &statuses);
        assert_eq!(merged.len(), 2);
        assert!(!merged[0].done);
        assert!(merged[1].done);
    }

    #[test]
    fn merge_conserva_el_orden_de_las_tareas() {
        let tasks = vec![
            test_task("t3", "s", "Sicherheit", None, 3),
            test_task("t1", "s", "Sicherheit", None, 1),
        ];
        let merged = merge_statuses(tasks, &[]);
        assert_eq!(merged[0].task.id, "t3");
        assert_eq!(merged[1].task.id, "t1");
    }
}
