use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::components::download_pdf_modal::DownloadPdfModal;
use crate::components::sync_indicator::SyncIndicator;
use crate::models::{find_scenario, SCENARIOS};
use crate::services::{app_registry, auth_service};

#[derive(Properties, PartialEq)]
pub struct HomePageProps {
    pub user_id: String,
    pub on_open_scenario: Callback<String>,
    pub on_open_contacts: Callback<()>,
    pub on_logout: Callback<()>,
}

#[function_component(HomePage)]
pub fn home_page(props: &HomePageProps) -> Html {
    let active_scenarios = use_state(Vec::<String>::new);
    let show_pdf_modal = use_state(|| false);

    // Registro sincronizado: remoto preferido, espejo como fallback
    {
        let active_scenarios = active_scenarios.clone();
        let user_id = props.user_id.clone();
        use_effect_with(user_id.clone(), move |_| {
            spawn_local(async move {
                if let Ok(registry) = app_registry() {
                    active_scenarios.set(registry.sync(&user_id).await);
                }
            });
        });
    }

    let select_scenario = {
        let user_id = props.user_id.clone();
        let on_open_scenario = props.on_open_scenario.clone();
        Callback::from(move |scenario_id: String| {
            let user_id = user_id.clone();
            let on_open_scenario = on_open_scenario.clone();
            spawn_local(async move {
                // Abrir una checklist la marca como activa (idempotente)
                if let Ok(registry) = app_registry() {
                    registry.add(&user_id, &scenario_id).await;
                }
                on_open_scenario.emit(scenario_id);
            });
        })
    };

    let on_logout = {
        let on_logout = props.on_logout.clone();
        Callback::from(move |_: MouseEvent| {
            let on_logout = on_logout.clone();
            spawn_local(async move {
                auth_service::sign_out().await;
                on_logout.emit(());
            });
        })
    };

    html! {
        <div class="page home-page">
            <header class="page-header">
                <div class="page-title-row">
                    <h1>{"🧳 Reise Checkapp"}</h1>
                    <div class="header-actions">
                        <SyncIndicator />
                        <button class="btn-secondary" onclick={{
                            let show_pdf_modal = show_pdf_modal.clone();
                            Callback::from(move |_| show_pdf_modal.set(true))
                        }}>{"📄 PDF"}</button>
                        <button class="btn-secondary" onclick={props.on_open_contacts.reform(|_| ())}>
                            {"📞 Kontakte"}
                        </button>
                        <button class="btn-secondary" onclick={on_logout}>{"Abmelden"}</button>
                    </div>
                </div>
            </header>

            if !active_scenarios.is_empty() {
                <div class="card active-card">
                    <h2>{"Aktive Checklisten"}</h2>
                    { for active_scenarios.iter().filter_map(|id| find_scenario(id)).map(|scenario| {
                        let onclick = {
                            let id = scenario.id.to_string();
                            props.on_open_scenario.reform(move |_: MouseEvent| id.clone())
                        };
                        html! {
                            <div class="active-row" key={scenario.id}>
                                <span>
                                    {"Sie haben eine laufende Checkliste: "}
                                    <strong>{scenario.title}</strong>
                                </span>
                                <button class="btn-primary btn-small" onclick={onclick}>
                                    {"Fortfahren →"}
                                </button>
                            </div>
                        }
                    }) }
                </div>
            }

            <div class="card">
                <h2>{"Szenario auswählen"}</h2>
                <div class="scenario-grid">
                    { for SCENARIOS.iter().map(|scenario| {
                        let onclick = {
                            let id = scenario.id.to_string();
                            select_scenario.reform(move |_: MouseEvent| id.clone())
                        };
                        html! {
                            <button class="scenario-card" onclick={onclick} key={scenario.id}>
                                <div class="scenario-icon">{scenario.icon}</div>
                                <h3>{scenario.title}</h3>
                                <p>{scenario.description}</p>
                            </button>
                        }
                    }) }
                </div>
            </div>

            <div class="card info-card">
                <h3>{"ℹ️ Hinweis"}</h3>
                <p>
                    {"Wählen Sie ein Szenario aus, um die entsprechende Checkliste zu starten. \
                      Die App funktioniert auch offline - alle Änderungen werden automatisch \
                      synchronisiert, sobald Sie wieder online sind."}
                </p>
            </div>

            if *show_pdf_modal {
                <DownloadPdfModal
                    user_id={props.user_id.clone()}
                    active_scenario_ids={(*active_scenarios).clone()}
                    on_close={{
                        let show_pdf_modal = show_pdf_modal.clone();
                        Callback::from(move |_| show_pdf_modal.set(false))
                    }}
                />
            }
        </div>
    }
}
