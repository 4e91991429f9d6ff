use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::components::confirm_modal::ConfirmModal;
use crate::models::{ChecklistEntry, Scenario};
use crate::services::{app_api, LocalStorageBackend, OfflineStore, TaskUpdate};
use crate::utils::categories::{category_order, subcategory_order, DEFAULT_SUBCATEGORY};

const MAX_IMAGE_BYTES: f64 = 5.0 * 1024.0 * 1024.0;

#[derive(Properties, PartialEq)]
pub struct TaskDetailModalProps {
    pub entry: ChecklistEntry,
    pub scenario: Scenario,
    pub on_close: Callback<()>,
    pub on_updated: Callback<()>,
}

#[function_component(TaskDetailModal)]
pub fn task_detail_modal(props: &TaskDetailModalProps) -> Html {
    let task = props.entry.task.clone();
    let scenario = props.scenario.clone();

    let editing = use_state(|| false);
    let saving = use_state(|| false);
    let confirm_delete = use_state(|| false);
    let error = use_state(|| None::<String>);
    let category = use_state(|| task.category.clone());
    let subcategory = use_state(|| task.subcategory_or_default().to_string());
    let image_file = use_state(|| None::<web_sys::File>);

    let title_ref = use_node_ref();
    let description_ref = use_node_ref();
    let link_ref = use_node_ref();
    let notes_ref = use_node_ref();

    let categories = category_order(scenario.task_type);
    let subcategories = subcategory_order(scenario.task_type, &category, scenario.location);

    let on_category_change = {
        let category = category.clone();
        let subcategory = subcategory.clone();
        let scenario = scenario.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            let new_category = select.value();
            let subs = subcategory_order(scenario.task_type, &new_category, scenario.location);
            subcategory.set(subs.first().unwrap_or(&DEFAULT_SUBCATEGORY).to_string());
            category.set(new_category);
        })
    };

    let on_subcategory_change = {
        let subcategory = subcategory.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            subcategory.set(select.value());
        })
    };

    let on_image_change = {
        let image_file = image_file.clone();
        let error = error.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let file = input.files().and_then(|files| files.get(0));
            if let Some(file) = &file {
                if file.size() > MAX_IMAGE_BYTES {
                    error.set(Some("Datei ist zu groß! Maximale Größe: 5MB".to_string()));
                    return;
                }
                if !file.type_().starts_with("image/") {
                    error.set(Some("Bitte wählen Sie eine Bilddatei aus!".to_string()));
                    return;
                }
            }
            error.set(None);
            image_file.set(file);
        })
    };

    let on_save = {
        let task = task.clone();
        let category = category.clone();
        let subcategory = subcategory.clone();
        let saving = saving.clone();
        let error = error.clone();
        let image_file = image_file.clone();
        let title_ref = title_ref.clone();
        let description_ref = description_ref.clone();
        let link_ref = link_ref.clone();
        let notes_ref = notes_ref.clone();
        let on_updated = props.on_updated.clone();
        let on_close = props.on_close.clone();

        Callback::from(move |_: MouseEvent| {
            let title = title_ref
                .cast::<HtmlInputElement>()
                .map(|i| i.value())
                .unwrap_or_default();
            if title.is_empty() {
                return;
            }
            let non_empty = |s: String| if s.is_empty() { None } else { Some(s) };
            let description = description_ref
                .cast::<HtmlTextAreaElement>()
                .map(|i| i.value())
                .and_then(non_empty);
            let link = link_ref
                .cast::<HtmlInputElement>()
                .map(|i| i.value())
                .and_then(non_empty);
            let notes = notes_ref
                .cast::<HtmlTextAreaElement>()
                .map(|i| i.value())
                .and_then(non_empty);

            let mut task = task.clone();
            let category = (*category).clone();
            let subcategory = (*subcategory).clone();
            let file = (*image_file).clone();
            let saving = saving.clone();
            let error = error.clone();
            let image_file = image_file.clone();
            let on_updated = on_updated.clone();
            let on_close = on_close.clone();

            spawn_local(async move {
                saving.set(true);
                let api = app_api();

                // Subir primero la imagen nueva, si la hay
                if let Some(file) = file {
                    let extension = file
                        .name()
                        .rsplit_once('.')
                        .map(|(_, ext)| ext.to_lowercase())
                        .unwrap_or_else(|| "jpg".to_string());
                    let path = format!("{}.{}", uuid::Uuid::new_v4(), extension);
                    match api.upload_task_image(&path, &file).await {
                        Ok(url) => task.push_image_url(url),
                        Err(e) => {
                            log::error!("❌ Error subiendo la imagen: {}", e);
                            error.set(Some("Fehler beim Hochladen des Bildes.".to_string()));
                            saving.set(false);
                            return;
                        }
                    }
                }

                let update = TaskUpdate {
                    title,
                    description,
                    category,
                    subcategory: Some(subcategory),
                    link,
                    notes,
                    image_url: task.image_url.clone(),
                    image_urls: task.image_urls.clone(),
                    updated_at: chrono::Utc::now().to_rfc3339(),
                };

                match api.update_task(&task.id, &update).await {
                    Ok(updated) => {
                        // Mantener el espejo local al día
                        if let Ok(store) = OfflineStore::open(LocalStorageBackend) {
                            if let Err(e) = store.put_task(&updated) {
                                log::error!("❌ Espejo local no actualizado: {}", e);
                            }
                        }
                        image_file.set(None);
                        on_updated.emit(());
                        on_close.emit(());
                    }
                    Err(e) => {
                        log::error!("❌ Error guardando la tarea: {}", e);
                        error.set(Some("Fehler beim Speichern der Änderungen.".to_string()));
                    }
                }
                saving.set(false);
            });
        })
    };

    let on_delete = {
        let task_id = task.id.clone();
        let error = error.clone();
        let confirm_delete = confirm_delete.clone();
        let on_updated = props.on_updated.clone();
        let on_close = props.on_close.clone();

        Callback::from(move |_: ()| {
            confirm_delete.set(false);
            let task_id = task_id.clone();
            let error = error.clone();
            let on_updated = on_updated.clone();
            let on_close = on_close.clone();
            spawn_local(async move {
                match app_api().delete_task(&task_id).await {
                    Ok(()) => {
                        if let Ok(store) = OfflineStore::open(LocalStorageBackend) {
                            if let Err(e) = store.remove_task(&task_id) {
                                log::error!("❌ Espejo local no actualizado: {}", e);
                            }
                        }
                        on_updated.emit(());
                        on_close.emit(());
                    }
                    Err(e) => {
                        log::error!("❌ Error borrando la tarea: {}", e);
                        error.set(Some("Fehler beim Löschen der Aufgabe.".to_string()));
                    }
                }
            });
        })
    };

    let view_mode = html! {
        <div class="task-detail">
            <h3>{&task.title}</h3>
            <div class="task-badges">
                <span class="badge badge-category">{&task.category}</span>
                if task.subcategory_or_default() != DEFAULT_SUBCATEGORY {
                    <span class="badge badge-subcategory">{task.subcategory_or_default()}</span>
                }
                <span class={classes!("badge", if props.entry.done { "badge-done" } else { "badge-open" })}>
                    { if props.entry.done { "✓ Erledigt" } else { "○ Offen" } }
                </span>
            </div>

            if let Some(description) = &task.description {
                <div class="task-section">
                    <h4>{"Beschreibung"}</h4>
                    <p>{description}</p>
                </div>
            }

            if let Some(link) = &task.link {
                <div class="task-section">
                    <h4>{"Link"}</h4>
                    <a href={link.clone()} target="_blank" rel="noopener noreferrer">{format!("🔗 {}", link)}</a>
                </div>
            }

            { for task.effective_image_urls().iter().map(|url| html! {
                <div class="task-section">
                    <h4>{"Bild"}</h4>
                    <img src={url.clone()} alt={task.title.clone()} class="task-image" />
                </div>
            }) }

            if let Some(notes) = &task.notes {
                <div class="task-section">
                    <h4>{"Notizen"}</h4>
                    <p>{notes}</p>
                </div>
            }

            <div class="modal-actions">
                <button class="btn-primary" onclick={{
                    let editing = editing.clone();
                    Callback::from(move |_| editing.set(true))
                }}>{"Bearbeiten"}</button>
                <button class="btn-danger" onclick={{
                    let confirm_delete = confirm_delete.clone();
                    Callback::from(move |_| confirm_delete.set(true))
                }}>{"Löschen"}</button>
                <button class="btn-secondary" onclick={props.on_close.reform(|_| ())}>{"Schließen"}</button>
            </div>
        </div>
    };

    let edit_mode = html! {
        <div class="task-edit">
            <div class="form-group">
                <label>{"Titel *"}</label>
                <input type="text" value={task.title.clone()} ref={title_ref} required=true />
            </div>

            <div class="form-group">
                <label>{"Kategorie"}</label>
                <select onchange={on_category_change}>
                    { for categories.iter().map(|cat| html! {
                        <option value={*cat} selected={*cat == *category}>{*cat}</option>
                    }) }
                </select>
            </div>

            if subcategories.len() > 1 {
                <div class="form-group">
                    <label>{"Unterkategorie"}</label>
                    <select onchange={on_subcategory_change}>
                        { for subcategories.iter().map(|sub| html! {
                            <option value={*sub} selected={*sub == *subcategory}>{*sub}</option>
                        }) }
                    </select>
                </div>
            }

            <div class="form-group">
                <label>{"Beschreibung"}</label>
                <textarea rows="4" value={task.description.clone().unwrap_or_default()} ref={description_ref} />
            </div>

            <div class="form-group">
                <label>{"Link"}</label>
                <input type="url" placeholder="https://..." value={task.link.clone().unwrap_or_default()} ref={link_ref} />
            </div>

            <div class="form-group">
                <label>{ if task.effective_image_urls().is_empty() { "Foto hinzufügen" } else { "Foto ändern" } }</label>
                <input type="file" accept="image/*" onchange={on_image_change} />
                if let Some(file) = &*image_file {
                    <p class="file-hint">{format!("Ausgewählt: {}", file.name())}</p>
                }
                <p class="file-hint">{"Max. 5MB, Formate: JPG, PNG, GIF, WebP"}</p>
            </div>

            <div class="form-group">
                <label>{"Notizen"}</label>
                <textarea rows="3" value={task.notes.clone().unwrap_or_default()} ref={notes_ref} />
            </div>

            if let Some(message) = &*error {
                <p class="form-error">{message}</p>
            }

            <div class="modal-actions">
                <button class="btn-primary" onclick={on_save} disabled={*saving}>
                    { if *saving { "Speichern..." } else { "Speichern" } }
                </button>
                <button class="btn-secondary" onclick={{
                    let editing = editing.clone();
                    Callback::from(move |_| editing.set(false))
                }}>{"Abbrechen"}</button>
            </div>
        </div>
    };

    html! {
        <div class="modal-backdrop">
            <div class="modal modal-wide">
                <div class="modal-header">
                    <h2>{"Aufgaben-Details"}</h2>
                    <button class="modal-close" onclick={props.on_close.reform(|_| ())}>{"×"}</button>
                </div>
                { if *editing { edit_mode } else { view_mode } }
            </div>

            if *confirm_delete {
                <ConfirmModal
                    title="Aufgabe löschen"
                    message="Möchten Sie diese Aufgabe wirklich löschen?"
                    confirm_label="Löschen"
                    on_confirm={on_delete}
                    on_cancel={{
                        let confirm_delete = confirm_delete.clone();
                        Callback::from(move |_| confirm_delete.set(false))
                    }}
                />
            }
        </div>
    }
}
