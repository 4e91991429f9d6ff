use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::components::confirm_modal::ConfirmModal;
use crate::models::{Contact, Location};
use crate::services::{app_api, ContactInsert, LocalStorageBackend, OfflineStore};

#[derive(Properties, PartialEq)]
pub struct ContactModalProps {
    /// None = crear, Some = editar
    #[prop_or_default]
    pub contact: Option<Contact>,
    pub on_close: Callback<()>,
    pub on_saved: Callback<()>,
}

#[function_component(ContactModal)]
pub fn contact_modal(props: &ContactModalProps) -> Html {
    let existing = props.contact.clone();
    let is_edit = existing.is_some();

    let saving = use_state(|| false);
    let confirm_delete = use_state(|| false);
    let error = use_state(|| None::<String>);
    let location = use_state(|| {
        existing
            .as_ref()
            .map(|c| c.location)
            .unwrap_or(Location::Niederlauterbach)
    });

    let name_ref = use_node_ref();
    let role_ref = use_node_ref();
    let phone_ref = use_node_ref();
    let email_ref = use_node_ref();
    let address_ref = use_node_ref();
    let notes_ref = use_node_ref();

    let on_location_change = {
        let location = location.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            location.set(match select.value().as_str() {
                "Benissa" => Location::Benissa,
                _ => Location::Niederlauterbach,
            });
        })
    };

    let on_submit = {
        let existing = existing.clone();
        let location = location.clone();
        let saving = saving.clone();
        let error = error.clone();
        let name_ref = name_ref.clone();
        let role_ref = role_ref.clone();
        let phone_ref = phone_ref.clone();
        let email_ref = email_ref.clone();
        let address_ref = address_ref.clone();
        let notes_ref = notes_ref.clone();
        let on_saved = props.on_saved.clone();
        let on_close = props.on_close.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let input_value = |node_ref: &NodeRef| {
                node_ref
                    .cast::<HtmlInputElement>()
                    .map(|i| i.value())
                    .unwrap_or_default()
            };
            let name = input_value(&name_ref);
            let role = input_value(&role_ref);
            if name.is_empty() || role.is_empty() {
                return;
            }
            let non_empty = |s: String| if s.is_empty() { None } else { Some(s) };

            let insert = ContactInsert {
                name,
                role,
                location: *location,
                phone: non_empty(input_value(&phone_ref)),
                email: non_empty(input_value(&email_ref)),
                address: non_empty(input_value(&address_ref)),
                notes: notes_ref
                    .cast::<HtmlTextAreaElement>()
                    .map(|i| i.value())
                    .and_then(non_empty),
            };

            let existing = existing.clone();
            let saving = saving.clone();
            let error = error.clone();
            let on_saved = on_saved.clone();
            let on_close = on_close.clone();
            spawn_local(async move {
                saving.set(true);
                let api = app_api();
                let result = match &existing {
                    Some(contact) => api.update_contact(&contact.id, &insert).await,
                    None => api.insert_contact(&insert).await,
                };
                match result {
                    Ok(saved) => {
                        if let Ok(store) = OfflineStore::open(LocalStorageBackend) {
                            if let Err(e) = store.put_contacts(std::slice::from_ref(&saved)) {
                                log::error!("❌ Espejo de contactos no actualizado: {}", e);
                            }
                        }
                        on_saved.emit(());
                        on_close.emit(());
                    }
                    Err(e) => {
                        log::error!("❌ Error guardando el contacto: {}", e);
                        error.set(Some("Fehler beim Speichern des Kontakts.".to_string()));
                    }
                }
                saving.set(false);
            });
        })
    };

    let on_delete = {
        let existing = existing.clone();
        let error = error.clone();
        let confirm_delete = confirm_delete.clone();
        let on_saved = props.on_saved.clone();
        let on_close = props.on_close.clone();

        Callback::from(move |_: ()| {
            confirm_delete.set(false);
            let Some(contact) = existing.clone() else { return };
            let error = error.clone();
            let on_saved = on_saved.clone();
            let on_close = on_close.clone();
            spawn_local(async move {
                match app_api().delete_contact(&contact.id).await {
                    Ok(()) => {
                        if let Ok(store) = OfflineStore::open(LocalStorageBackend) {
                            if let Err(e) = store.remove_contact(&contact.id) {
                                log::error!("❌ Espejo de contactos no actualizado: {}", e);
                            }
                        }
                        on_saved.emit(());
                        on_close.emit(());
                    }
                    Err(e) => {
                        log::error!("❌ Error borrando el contacto: {}", e);
                        error.set(Some("Fehler beim Löschen des Kontakts.".to_string()));
                    }
                }
            });
        })
    };

    let contact = existing.as_ref();

    html! {
        <div class="modal-backdrop">
            <div class="modal">
                <div class="modal-header">
                    <h2>{ if is_edit { "Kontakt bearbeiten" } else { "Kontakt hinzufügen" } }</h2>
                    <button class="modal-close" onclick={props.on_close.reform(|_| ())}>{"×"}</button>
                </div>

                <form onsubmit={on_submit}>
                    <div class="form-group">
                        <label>{"Name *"}</label>
                        <input
                            type="text"
                            value={contact.map(|c| c.name.clone()).unwrap_or_default()}
                            ref={name_ref}
                            required=true
                        />
                    </div>

                    <div class="form-group">
                        <label>{"Rolle *"}</label>
                        <input
                            type="text"
                            placeholder="z.B. Nachbar, Handwerker, Verwaltung"
                            value={contact.map(|c| c.role.clone()).unwrap_or_default()}
                            ref={role_ref}
                            required=true
                        />
                    </div>

                    <div class="form-group">
                        <label>{"Ort"}</label>
                        <select onchange={on_location_change}>
                            <option value="Niederlauterbach" selected={*location == Location::Niederlauterbach}>
                                {"Niederlauterbach"}
                            </option>
                            <option value="Benissa" selected={*location == Location::Benissa}>
                                {"Benissa"}
                            </option>
                        </select>
                    </div>

                    <div class="form-group">
                        <label>{"Telefon"}</label>
                        <input
                            type="tel"
                            value={contact.and_then(|c| c.phone.clone()).unwrap_or_default()}
                            ref={phone_ref}
                        />
                    </div>

                    <div class="form-group">
                        <label>{"E-Mail"}</label>
                        <input
                            type="email"
                            value={contact.and_then(|c| c.email.clone()).unwrap_or_default()}
                            ref={email_ref}
                        />
                    </div>

                    <div class="form-group">
                        <label>{"Adresse"}</label>
                        <input
                            type="text"
                            value={contact.and_then(|c| c.address.clone()).unwrap_or_default()}
                            ref={address_ref}
                        />
                    </div>

                    <div class="form-group">
                        <label>{"Notizen"}</label>
                        <textarea
                            rows="3"
                            value={contact.and_then(|c| c.notes.clone()).unwrap_or_default()}
                            ref={notes_ref}
                        />
                    </div>

                    if let Some(message) = &*error {
                        <p class="form-error">{message}</p>
                    }

                    <div class="modal-actions">
                        <button type="submit" class="btn-primary" disabled={*saving}>
                            { if *saving { "Speichern..." } else { "Speichern" } }
                        </button>
                        if is_edit {
                            <button type="button" class="btn-danger" onclick={{
                                let confirm_delete = confirm_delete.clone();
                                Callback::from(move |_| confirm_delete.set(true))
                            }}>{"Löschen"}</button>
                        }
                        <button type="button" class="btn-secondary" onclick={props.on_close.reform(|_| ())}>
                            {"Abbrechen"}
                        </button>
                    </div>
                </form>
            </div>

            if *confirm_delete {
                <ConfirmModal
                    title="Kontakt löschen"
                    message="Möchten Sie diesen Kontakt wirklich löschen?"
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
