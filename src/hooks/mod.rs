pub mod use_checklist;
pub mod use_grouped_tasks;
pub mod use_online;

pub use use_checklist::{use_checklist, UseChecklistHandle};
pub use use_grouped_tasks::{group_tasks, sorted_categories, sorted_subcategories, GroupedTasks};
pub use use_online::use_online;
