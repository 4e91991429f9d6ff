use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Event;
use yew::prelude::*;

use crate::services::network_monitor::{NetworkMonitor, NetworkStatus};

/// Flag reactivo de conectividad: se actualiza con los eventos
/// online/offline del window y limpia sus listeners al desmontar
#[hook]
pub fn use_online() -> bool {
    let online = use_state(|| {
        // Unknown se trata como online (arranque optimista)
        !matches!(NetworkMonitor::new().current_status(), NetworkStatus::Offline)
    });

    {
        let online = online.clone();
        use_effect_with((), move |_| {
            let window = web_sys::window();

            let on_online = {
                let online = online.clone();
                Closure::wrap(Box::new(move |_: Event| online.set(true)) as Box<dyn FnMut(Event)>)
            };
            let on_offline = {
                let online = online.clone();
                Closure::wrap(Box::new(move |_: Event| online.set(false)) as Box<dyn FnMut(Event)>)
            };

            if let Some(window) = &window {
                let _ = window.add_event_listener_with_callback(
                    "online",
                    on_online.as_ref().unchecked_ref(),
                );
                let _ = window.add_event_listener_with_callback(
                    "offline",
                    on_offline.as_ref().unchecked_ref(),
                );
            }

            move || {
                if let Some(window) = &window {
                    let _ = window.remove_event_listener_with_callback(
                        "online",
                        on_online.as_ref().unchecked_ref(),
                    );
                    let _ = window.remove_event_listener_with_callback(
                        "offline",
                        on_offline.as_ref().unchecked_ref(),
                    );
                }
            }
        });
    }

    *online
}
