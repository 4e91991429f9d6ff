use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::components::contact_modal::ContactModal;
use crate::hooks::use_online;
use crate::models::{Contact, Location};
use crate::services::{app_api, LocalStorageBackend, OfflineStore};

#[derive(Clone, Copy, PartialEq)]
enum ContactFilter {
    All,
    Only(Location),
}

#[derive(Properties, PartialEq)]
pub struct ContactsPageProps {
    pub on_back: Callback<()>,
}

#[function_component(ContactsPage)]
pub fn contacts_page(props: &ContactsPageProps) -> Html {
    let online = use_online();
    let contacts = use_state(Vec::<Contact>::new);
    let loading = use_state(|| true);
    let filter = use_state(|| ContactFilter::All);
    let selected = use_state(|| None::<Contact>);
    let show_add_modal = use_state(|| false);
    let reload_tick = use_state(|| 0u32);

    {
        let contacts = contacts.clone();
        let loading = loading.clone();
        use_effect_with((online, *reload_tick), move |&(online, _)| {
            let contacts = contacts.clone();
            let loading = loading.clone();
            spawn_local(async move {
                if online {
                    match app_api().fetch_all_contacts().await {
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
                    // Offline: espejo local, ambas propiedades
                    let mut list = store
                        .get_contacts_by_location(Location::Niederlauterbach)
                        .unwrap_or_default();
                    list.extend(
                        store
                            .get_contacts_by_location(Location::Benissa)
                            .unwrap_or_default(),
                    );
                    contacts.set(list);
                }
                loading.set(false);
            });
        });
    }

    let reload = {
        let reload_tick = reload_tick.clone();
        Callback::from(move |_: ()| reload_tick.set(*reload_tick + 1))
    };

    if *loading {
        return html! { <div class="page page-center"><div class="spinner" /></div> };
    }

    let filtered: Vec<Contact> = contacts
        .iter()
        .filter(|c| match *filter {
            ContactFilter::All => true,
            ContactFilter::Only(location) => c.location == location,
        })
        .cloned()
        .collect();

    let filter_button = |label: &str, value: ContactFilter| {
        let filter = filter.clone();
        let active = *filter == value;
        html! {
            <button
                class={classes!("filter-btn", active.then_some("active"))}
                onclick={Callback::from(move |_| filter.set(value))}
            >{label.to_string()}</button>
        }
    };

    html! {
        <div class="page contacts-page">
            <header class="page-header">
                <button class="btn-link" onclick={props.on_back.reform(|_| ())}>
                    {"← Zurück zur Startseite"}
                </button>
                <div class="page-title-row">
                    <h1>{"📞 Kontakte"}</h1>
                    <button class="btn-primary" onclick={{
                        let show_add_modal = show_add_modal.clone();
                        Callback::from(move |_| show_add_modal.set(true))
                    }}>{"+ Kontakt hinzufügen"}</button>
                </div>
            </header>

            <div class="card filter-card">
                { filter_button("Alle", ContactFilter::All) }
                { filter_button("Niederlauterbach", ContactFilter::Only(Location::Niederlauterbach)) }
                { filter_button("Benissa", ContactFilter::Only(Location::Benissa)) }
            </div>

            if filtered.is_empty() {
                <div class="card empty-card">
                    <p>{"Keine Kontakte gefunden. Fügen Sie Ihren ersten Kontakt hinzu!"}</p>
                </div>
            } else {
                { for filtered.iter().map(|contact| {
                    let onclick = {
                        let selected = selected.clone();
                        let contact = contact.clone();
                        Callback::from(move |_| selected.set(Some(contact.clone())))
                    };
                    html! {
                        <div class="card contact-card" key={contact.id.clone()} onclick={onclick}>
                            <div class="contact-head">
                                <h3>{&contact.name}</h3>
                                <span class="badge badge-location">{contact.location.as_str()}</span>
                            </div>
                            <p class="contact-role">{&contact.role}</p>
                            if let Some(phone) = &contact.phone {
                                <a href={format!("tel:{}", phone)} onclick={Callback::from(|e: MouseEvent| e.stop_propagation())}>
                                    {format!("📞 {}", phone)}
                                </a>
                            }
                            if let Some(email) = &contact.email {
                                <a href={format!("mailto:{}", email)} onclick={Callback::from(|e: MouseEvent| e.stop_propagation())}>
                                    {format!("✉️ {}", email)}
                                </a>
                            }
                            if let Some(address) = &contact.address {
                                <p class="contact-address">{format!("📍 {}", address)}</p>
                            }
                            if let Some(notes) = &contact.notes {
                                <p class="contact-notes">{notes}</p>
                            }
                        </div>
                    }
                }) }
            }

            if *show_add_modal {
                <ContactModal
                    on_close={{
                        let show_add_modal = show_add_modal.clone();
                        Callback::from(move |_| show_add_modal.set(false))
                    }}
                    on_saved={reload.clone()}
                />
            }

            if let Some(contact) = &*selected {
                <ContactModal
                    contact={contact.clone()}
                    on_close={{
                        let selected = selected.clone();
                        Callback::from(move |_| selected.set(None))
                    }}
                    on_saved={reload}
                />
            }
        </div>
    }
}
