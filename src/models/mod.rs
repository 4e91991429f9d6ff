pub mod auth;
pub mod contact;
pub mod scenario;
pub mod status;
pub mod sync;
pub mod task;

pub use auth::{AuthSession, AuthUser};
pub use contact::Contact;
pub use scenario::{find_scenario, Scenario, SCENARIOS};
pub use status::{merge_statuses, status_id, UserTaskStatus};
pub use sync::{PendingAction, PendingOp, SyncError, SyncStatus};
pub use task::{ChecklistEntry, Location, Task, TaskType, TransportType};
