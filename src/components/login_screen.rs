use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::models::AuthSession;
use crate::services::auth_service;

#[derive(Properties, PartialEq)]
pub struct LoginScreenProps {
    pub on_login: Callback<AuthSession>,
}

#[function_component(LoginScreen)]
pub fn login_screen(props: &LoginScreenProps) -> Html {
    let email_ref = use_node_ref();
    let password_ref = use_node_ref();
    let busy = use_state(|| false);
    let error = use_state(|| None::<String>);

    let on_submit = {
        let email_ref = email_ref.clone();
        let password_ref = password_ref.clone();
        let busy = busy.clone();
        let error = error.clone();
        let on_login = props.on_login.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let (Some(email_input), Some(password_input)) = (
                email_ref.cast::<HtmlInputElement>(),
                password_ref.cast::<HtmlInputElement>(),
            ) else {
                return;
            };

            let email = email_input.value();
            let password = password_input.value();
            if email.is_empty() || password.is_empty() {
                error.set(Some("Bitte E-Mail und Passwort eingeben.".to_string()));
                return;
            }

            let busy = busy.clone();
            let error = error.clone();
            let on_login = on_login.clone();
            spawn_local(async move {
                busy.set(true);
                match auth_service::sign_in(&email, &password).await {
                    Ok(session) => {
                        error.set(None);
                        on_login.emit(session);
                    }
                    Err(e) => {
                        log::error!("❌ Login fallido: {}", e);
                        error.set(Some("Anmeldung fehlgeschlagen. Bitte prüfen Sie Ihre Zugangsdaten.".to_string()));
                    }
                }
                busy.set(false);
            });
        })
    };

    html! {
        <div class="login-screen">
            <div class="login-container">
                <div class="login-header">
                    <div class="login-logo">{"🧳"}</div>
                    <h1>{"Reise Checkapp"}</h1>
                    <p>{"Checklisten für Reisen und Aufenthalte"}</p>
                </div>

                <form class="login-form" onsubmit={on_submit}>
                    <div class="form-group">
                        <label for="email">{"E-Mail"}</label>
                        <input
                            type="email"
                            id="email"
                            placeholder="name@example.com"
                            ref={email_ref}
                            required=true
                        />
                    </div>

                    <div class="form-group">
                        <label for="password">{"Passwort"}</label>
                        <input
                            type="password"
                            id="password"
                            placeholder="Passwort"
                            ref={password_ref}
                            required=true
                        />
                    </div>

                    if let Some(message) = &*error {
                        <p class="login-error">{message}</p>
                    }

                    <button type="submit" class="btn-primary" disabled={*busy}>
                        { if *busy { "Anmelden..." } else { "Anmelden" } }
                    </button>
                </form>
            </div>
        </div>
    }
}
