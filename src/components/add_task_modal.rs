use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::models::Scenario;
use crate::services::{app_api, TaskInsert};
use crate::utils::categories::{category_order, subcategory_order, DEFAULT_SUBCATEGORY};

#[derive(Properties, PartialEq)]
pub struct AddTaskModalProps {
    pub scenario: Scenario,
    pub on_close: Callback<()>,
    pub on_added: Callback<()>,
}

#[function_component(AddTaskModal)]
pub fn add_task_modal(props: &AddTaskModalProps) -> Html {
    let scenario = props.scenario.clone();
    let categories = category_order(scenario.task_type);

    let category = use_state(|| categories[0].to_string());
    let subcategory = use_state(|| DEFAULT_SUBCATEGORY.to_string());
    let saving = use_state(|| false);
    let error = use_state(|| None::<String>);

    let title_ref = use_node_ref();
    let description_ref = use_node_ref();
    let link_ref = use_node_ref();
    let notes_ref = use_node_ref();

    let subcategories =
        subcategory_order(scenario.task_type, &category, scenario.location);

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

    let on_submit = {
        let scenario = scenario.clone();
        let category = category.clone();
        let subcategory = subcategory.clone();
        let saving = saving.clone();
        let error = error.clone();
        let title_ref = title_ref.clone();
        let description_ref = description_ref.clone();
        let link_ref = link_ref.clone();
        let notes_ref = notes_ref.clone();
        let on_added = props.on_added.clone();
        let on_close = props.on_close.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

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

            let insert_base = TaskInsert {
                title,
                description,
                category: (*category).clone(),
                subcategory: Some((*subcategory).clone()),
                location: scenario.location,
                task_type: scenario.task_type,
                scenario: scenario.id.to_string(),
                order: 0,
                link,
                notes,
                transport_type: None,
            };

            let saving = saving.clone();
            let error = error.clone();
            let on_added = on_added.clone();
            let on_close = on_close.clone();
            spawn_local(async move {
                saving.set(true);
                let api = app_api();
                // order = max(order) + 1 del escenario; no es libre de
                // huecos ni único entre creadores concurrentes
                let result = match api.max_task_order(&insert_base.scenario).await {
                    Ok(max_order) => {
                        let insert = TaskInsert {
                            order: max_order + 1,
                            ..insert_base
                        };
                        api.insert_task(&insert).await
                    }
                    Err(e) => Err(e),
                };
                match result {
                    Ok(_) => {
                        on_added.emit(());
                        on_close.emit(());
                    }
                    Err(e) => {
                        log::error!("❌ Error creando la tarea: {}", e);
                        error.set(Some("Fehler beim Hinzufügen der Aufgabe.".to_string()));
                    }
                }
                saving.set(false);
            });
        })
    };

    html! {
        <div class="modal-backdrop">
            <div class="modal">
                <div class="modal-header">
                    <h2>{"Aufgabe hinzufügen"}</h2>
                    <button class="modal-close" onclick={props.on_close.reform(|_| ())}>{"×"}</button>
                </div>

                <form onsubmit={on_submit}>
                    <div class="form-group">
                        <label>{"Checkliste"}</label>
                        <input type="text" value={scenario.title} disabled=true />
                    </div>

                    <div class="form-group">
                        <label>{"Titel der Aufgabe *"}</label>
                        <input
                            type="text"
                            placeholder="z.B. Kühlschrank ausschalten"
                            ref={title_ref}
                            required=true
                        />
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
                        <textarea rows="4" placeholder="Weitere Details zur Aufgabe..." ref={description_ref} />
                    </div>

                    <div class="form-group">
                        <label>{"Link (optional)"}</label>
                        <input type="url" placeholder="https://..." ref={link_ref} />
                    </div>

                    <div class="form-group">
                        <label>{"Notizen (optional)"}</label>
                        <textarea rows="3" placeholder="Zusätzliche Bemerkungen..." ref={notes_ref} />
                    </div>

                    if let Some(message) = &*error {
                        <p class="form-error">{message}</p>
                    }

                    <div class="modal-actions">
                        <button type="submit" class="btn-primary" disabled={*saving}>
                            { if *saving { "Speichern..." } else { "Aufgabe hinzufügen" } }
                        </button>
                        <button type="button" class="btn-secondary" onclick={props.on_close.reform(|_| ())}>
                            {"Abbrechen"}
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}
