use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::models::SCENARIOS;
use crate::services::{app_sync, pdf_generator};

#[derive(Properties, PartialEq)]
pub struct DownloadPdfModalProps {
    pub user_id: String,
    pub active_scenario_ids: Vec<String>,
    pub on_close: Callback<()>,
}

/// Export por lotes: los escenarios marcados se generan uno a uno;
/// un fallo aborta el resto e informa del parcial
#[function_component(DownloadPdfModal)]
pub fn download_pdf_modal(props: &DownloadPdfModalProps) -> Html {
    let selected = use_state(|| props.active_scenario_ids.clone());
    let generating = use_state(|| false);
    let progress = use_state(|| (0usize, 0usize));
    let error = use_state(|| None::<String>);

    let toggle_scenario = {
        let selected = selected.clone();
        Callback::from(move |scenario_id: String| {
            let mut list = (*selected).clone();
            if list.contains(&scenario_id) {
                list.retain(|id| *id != scenario_id);
            } else {
                list.push(scenario_id);
            }
            selected.set(list);
        })
    };

    let on_download = {
        let selected = selected.clone();
        let generating = generating.clone();
        let progress = progress.clone();
        let error = error.clone();
        let user_id = props.user_id.clone();
        let on_close = props.on_close.clone();

        Callback::from(move |_: MouseEvent| {
            let ids = (*selected).clone();
            if ids.is_empty() {
                return;
            }
            let generating = generating.clone();
            let progress = progress.clone();
            let error = error.clone();
            let user_id = user_id.clone();
            let on_close = on_close.clone();

            spawn_local(async move {
                generating.set(true);
                error.set(None);

                let sync = match app_sync() {
                    Ok(sync) => sync,
                    Err(e) => {
                        error.set(Some(format!("Fehler: {}", e)));
                        generating.set(false);
                        return;
                    }
                };

                let outcome = {
                    let progress = progress.clone();
                    pdf_generator::generate_many(&sync, &user_id, &ids, move |current, total| {
                        progress.set((current, total));
                    })
                    .await
                };

                generating.set(false);
                match outcome.failed {
                    Some((title, e)) => {
                        log::error!("❌ Export abgebrochen bei '{}': {}", title, e);
                        error.set(Some(format!(
                            "Fehler beim Erstellen des PDFs für \"{}\" ({} von {} fertig).",
                            title,
                            outcome.completed,
                            ids.len()
                        )));
                    }
                    None => on_close.emit(()),
                }
            });
        })
    };

    let count = selected.len();
    let (current, total) = *progress;

    html! {
        <div class="modal-backdrop">
            <div class="modal modal-wide">
                <div class="modal-header">
                    <h2>{"Checklisten als PDF herunterladen"}</h2>
                    <button
                        class="modal-close"
                        disabled={*generating}
                        onclick={props.on_close.reform(|_| ())}
                    >{"×"}</button>
                </div>
                <p class="modal-subtitle">
                    {"Wähle die Checklisten aus, die du als druckfertiges PDF exportieren möchtest."}
                </p>

                <div class="scenario-picker">
                    { for SCENARIOS.iter().map(|scenario| {
                        let is_selected = selected.contains(&scenario.id.to_string());
                        let onclick = {
                            let id = scenario.id.to_string();
                            toggle_scenario.reform(move |_: MouseEvent| id.clone())
                        };
                        html! {
                            <div
                                class={classes!("scenario-pick", is_selected.then_some("selected"))}
                                onclick={onclick}
                            >
                                <span class="pick-checkbox">{ if is_selected { "✓" } else { "" } }</span>
                                <span class="pick-icon">{scenario.icon}</span>
                                <div class="pick-text">
                                    <h3>{scenario.title}</h3>
                                    <p>{scenario.description}</p>
                                </div>
                            </div>
                        }
                    }) }
                </div>

                if let Some(message) = &*error {
                    <p class="form-error">{message}</p>
                }

                if *generating {
                    <div class="pdf-progress">
                        <p>{"PDFs werden erstellt..."}</p>
                        <p class="pdf-progress-count">{format!("({} / {})", current, total)}</p>
                    </div>
                } else {
                    <div class="modal-actions">
                        <button class="btn-secondary" onclick={props.on_close.reform(|_| ())}>
                            {"Abbrechen"}
                        </button>
                        <button class="btn-primary" disabled={count == 0} onclick={on_download}>
                            {format!("{} Liste{} herunterladen", count, if count == 1 { "" } else { "n" })}
                        </button>
                    </div>
                }
            </div>
        </div>
    }
}
