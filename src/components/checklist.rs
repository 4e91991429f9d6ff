use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::components::add_task_modal::AddTaskModal;
use crate::components::confirm_modal::ConfirmModal;
use crate::components::sync_indicator::SyncIndicator;
use crate::components::task_detail_modal::TaskDetailModal;
use crate::components::task_item::TaskItem;
use crate::components::toast::Toast;
use crate::hooks::{sorted_categories, sorted_subcategories, use_checklist, use_online};
use crate::hooks::use_grouped_tasks::group_tasks;
use crate::models::{find_scenario, Contact};
use crate::services::{app_api, LocalStorageBackend, OfflineStore};
use crate::utils::categories::DEFAULT_SUBCATEGORY;

#[derive(Properties, PartialEq)]
pub struct ChecklistPageProps {
    pub user_id: String,
    pub scenario_id: String,
    pub on_back: Callback<()>,
}

#[function_component(ChecklistPage)]
pub fn checklist_page(props: &ChecklistPageProps) -> Html {
    let online = use_online();
    let scenario = find_scenario(&props.scenario_id);

    let handle = use_checklist(
        props.user_id.clone(),
        props.scenario_id.clone(),
        props.on_back.clone(),
    );

    let contacts = use_state(Vec::<Contact>::new);
    let show_add_modal = use_state(|| false);
    let show_reset_confirm = use_state(|| false);
    let detail_task_id = use_state(|| None::<String>);

    // Contactos de la propiedad: remoto con refresco del espejo,
    // offline desde el espejo
    {
        let contacts = contacts.clone();
        let location = scenario.map(|s| s.location);
        use_effect_with((props.scenario_id.clone(), online), move |&(_, online)| {
            let Some(location) = location else { return };
            let contacts = contacts.clone();
            spawn_local(async move {
                if online {
                    match app_api().fetch_contacts(location).await {
                        Ok(list) => {
                            if let Ok(store) = OfflineStore::open(LocalStorageBackend) {
                                if let Err(e) = store.put_contacts(&list) {
                                    log::error!("❌ Espejo de contactos no refrescado: {}", e);
                                }
                            }
                            contacts.set(list);
                        }
                        Err(e) => log::error!("❌ Error cargando contactos: {}", e),
                    }
                } else if let Ok(store) = OfflineStore::open(LocalStorageBackend) {
                    if let Ok(list) = store.get_contacts_by_location(location) {
                        contacts.set(list);
                    }
                }
            });
        });
    }

    let Some(scenario) = scenario else {
        return html! {
            <div class="page page-center">
                <h1>{"Szenario nicht gefunden"}</h1>
                <button class="btn-primary" onclick={props.on_back.reform(|_| ())}>
                    {"Zurück zur Auswahl"}
                </button>
            </div>
        };
    };

    if *handle.loading {
        return html! {
            <div class="page page-center"><div class="spinner" /></div>
        };
    }

    let entries = (*handle.entries).clone();
    let completed = entries.iter().filter(|e| e.done).count();
    let total = entries.len();
    let percent = if total > 0 {
        (completed as f64 / total as f64 * 100.0).round() as u32
    } else {
        0
    };
    let all_completed = total > 0 && completed == total;

    let grouped = group_tasks(&entries);
    let categories = sorted_categories(&grouped, scenario.task_type);

    let on_detail = {
        let detail_task_id = detail_task_id.clone();
        Callback::from(move |task_id: String| detail_task_id.set(Some(task_id)))
    };

    let request_reset = {
        let show_reset_confirm = show_reset_confirm.clone();
        Callback::from(move |_: MouseEvent| show_reset_confirm.set(true))
    };

    let do_reset = {
        let show_reset_confirm = show_reset_confirm.clone();
        let reset = handle.reset.clone();
        Callback::from(move |_: ()| {
            show_reset_confirm.set(false);
            reset.emit(());
        })
    };

    html! {
        <div class="page checklist-page">
            <header class="page-header">
                <button class="btn-link" onclick={props.on_back.reform(|_| ())}>
                    {"← Zurück zur Auswahl"}
                </button>
                <div class="page-title-row">
                    <h1>
                        <span class="scenario-icon">{scenario.icon}</span>
                        {scenario.title}
                    </h1>
                    <SyncIndicator />
                </div>
                <p class="page-subtitle">{scenario.description}</p>
            </header>

            <div class="card progress-card">
                <div class="progress-labels">
                    <span>{format!("Fortschritt: {} von {}", completed, total)}</span>
                    <span>{format!("{}%", percent)}</span>
                </div>
                <div class="progress-track">
                    <div class="progress-fill" style={format!("width: {}%", percent)} />
                </div>
            </div>

            if all_completed {
                <div class="card completion-card">
                    <h2>{"🎉 Alle Aufgaben erledigt!"}</h2>
                    <p>{"Herzlichen Glückwunsch! Sie haben alle Aufgaben abgeschlossen. Gute Reise!"}</p>
                    <button class="btn-primary" onclick={request_reset.clone()}>
                        {"Checkliste zurücksetzen und zur Auswahl"}
                    </button>
                </div>
            }

            <div class="card tasks-card">
                <div class="card-header">
                    <h2>{"Aufgaben"}</h2>
                    <button class="btn-primary btn-small" onclick={{
                        let show_add_modal = show_add_modal.clone();
                        Callback::from(move |_| show_add_modal.set(true))
                    }}>{"+ Aufgabe hinzufügen"}</button>
                </div>

                { for categories.iter().map(|category| {
                    let subgroups = &grouped[category];
                    let subcategories = sorted_subcategories(
                        subgroups,
                        scenario.task_type,
                        category,
                        scenario.location,
                    );
                    html! {
                        <div class="category-block" key={category.clone()}>
                            <h3 class="category-title">{category}</h3>
                            { for subcategories.iter().map(|subcategory| {
                                let tasks = &subgroups[subcategory];
                                // Mismo criterio que el PDF: subtítulo solo si
                                // hay varias subcategorías o la única no es la
                                // subcategoría por defecto
                                let show_title = subgroups.len() > 1
                                    || subcategory != DEFAULT_SUBCATEGORY;
                                html! {
                                    <div class="subcategory-block" key={subcategory.clone()}>
                                        if show_title {
                                            <h4 class="subcategory-title">{subcategory}</h4>
                                        }
                                        { for tasks.iter().map(|entry| html! {
                                            <TaskItem
                                                key={entry.task.id.clone()}
                                                entry={entry.clone()}
                                                on_toggle={handle.toggle.clone()}
                                                on_detail={on_detail.clone()}
                                            />
                                        }) }
                                    </div>
                                }
                            }) }
                        </div>
                    }
                }) }

                if entries.is_empty() {
                    <p class="empty-hint">
                        {"Keine Aufgaben vorhanden. Fügen Sie Ihre erste Aufgabe hinzu!"}
                    </p>
                }
            </div>

            if !contacts.is_empty() {
                <div class="card contacts-card">
                    <h2>{format!("📞 Wichtige Kontakte - {}", scenario.location.as_str())}</h2>
                    { for contacts.iter().map(|contact| html! {
                        <div class="contact-entry" key={contact.id.clone()}>
                            <h3>{&contact.name}</h3>
                            <p class="contact-role">{&contact.role}</p>
                            if let Some(phone) = &contact.phone {
                                <a href={format!("tel:{}", phone)}>{format!("📞 {}", phone)}</a>
                            }
                            if let Some(email) = &contact.email {
                                <a href={format!("mailto:{}", email)}>{format!("✉️ {}", email)}</a>
                            }
                        </div>
                    }) }
                </div>
            }

            <div class="reset-row">
                <button class="btn-danger" onclick={request_reset}>
                    {"Checkliste zurücksetzen"}
                </button>
            </div>

            if let Some(task_id) = &*detail_task_id {
                if let Some(entry) = entries.iter().find(|e| e.task.id == *task_id) {
                    <TaskDetailModal
                        entry={entry.clone()}
                        scenario={scenario.clone()}
                        on_close={{
                            let detail_task_id = detail_task_id.clone();
                            Callback::from(move |_| detail_task_id.set(None))
                        }}
                        on_updated={handle.reload.clone()}
                    />
                }
            }

            if *show_add_modal {
                <AddTaskModal
                    scenario={scenario.clone()}
                    on_close={{
                        let show_add_modal = show_add_modal.clone();
                        Callback::from(move |_| show_add_modal.set(false))
                    }}
                    on_added={handle.reload.clone()}
                />
            }

            if *show_reset_confirm {
                <ConfirmModal
                    title="Checkliste zurücksetzen"
                    message="Möchten Sie die Checkliste wirklich zurücksetzen?"
                    confirm_label="Zurücksetzen"
                    on_confirm={do_reset}
                    on_cancel={{
                        let show_reset_confirm = show_reset_confirm.clone();
                        Callback::from(move |_| show_reset_confirm.set(false))
                    }}
                />
            }

            if let Some(message) = &*handle.error {
                <Toast
                    message={message.clone()}
                    on_dismiss={{
                        let error = handle.error.clone();
                        Callback::from(move |_| error.set(None))
                    }}
                />
            }
        </div>
    }
}
