use yew::prelude::*;

use crate::components::checklist::ChecklistPage;
use crate::components::contacts::ContactsPage;
use crate::components::home::HomePage;
use crate::components::login_screen::LoginScreen;
use crate::services::{auth_service, start_auto_drain};

#[derive(Clone, PartialEq)]
enum View {
    Home,
    Checklist(String),
    Contacts,
}

#[function_component(App)]
pub fn app() -> Html {
    let session = use_state(auth_service::current_session);
    let view = use_state(|| View::Home);

    // Un solo registro de listeners: la queue offline se drena al reconectar
    use_effect_with((), |_| {
        start_auto_drain();
    });

    let Some(current) = (*session).clone() else {
        let on_login = {
            let session = session.clone();
            Callback::from(move |new_session| session.set(Some(new_session)))
        };
        return html! { <LoginScreen {on_login} /> };
    };

    let go_home = {
        let view = view.clone();
        Callback::from(move |_: ()| view.set(View::Home))
    };

    match (*view).clone() {
        View::Home => {
            let on_open_scenario = {
                let view = view.clone();
                Callback::from(move |scenario_id: String| view.set(View::Checklist(scenario_id)))
            };
            let on_open_contacts = {
                let view = view.clone();
                Callback::from(move |_: ()| view.set(View::Contacts))
            };
            let on_logout = {
                let session = session.clone();
                let view = view.clone();
                Callback::from(move |_: ()| {
                    session.set(None);
                    view.set(View::Home);
                })
            };
            html! {
                <HomePage
                    user_id={current.user.id}
                    {on_open_scenario}
                    {on_open_contacts}
                    {on_logout}
                />
            }
        }
        View::Checklist(scenario_id) => html! {
            <ChecklistPage
                user_id={current.user.id}
                {scenario_id}
                on_back={go_home}
            />
        },
        View::Contacts => html! {
            <ContactsPage on_back={go_home} />
        },
    }
}
