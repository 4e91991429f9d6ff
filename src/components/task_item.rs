use yew::prelude::*;

use crate::models::ChecklistEntry;

#[derive(Properties, PartialEq)]
pub struct TaskItemProps {
    pub entry: ChecklistEntry,
    pub on_toggle: Callback<String>,
    pub on_detail: Callback<String>,
}

#[function_component(TaskItem)]
pub fn task_item(props: &TaskItemProps) -> Html {
    let task = &props.entry.task;

    let on_toggle = {
        let task_id = task.id.clone();
        props.on_toggle.reform(move |_: MouseEvent| task_id.clone())
    };
    let on_detail = {
        let task_id = task.id.clone();
        props.on_detail.reform(move |_: MouseEvent| task_id.clone())
    };

    let has_extras = task.description.is_some()
        || task.notes.is_some()
        || task.link.is_some()
        || !task.effective_image_urls().is_empty();

    html! {
        <div class={classes!("task-item", props.entry.done.then_some("done"))}>
            <button class="task-checkbox" onclick={on_toggle}>
                { if props.entry.done { "☑" } else { "☐" } }
            </button>
            <span class="task-title" onclick={on_detail.clone()}>
                {&task.title}
            </span>
            if has_extras {
                <button class="task-detail-hint" onclick={on_detail} title="Details anzeigen">
                    {"ℹ️"}
                </button>
            }
        </div>
    }
}
