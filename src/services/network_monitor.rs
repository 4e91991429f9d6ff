// ============================================================================
// MONITOR DE ESTADO DE RED
// ============================================================================
// Detecta conectividad (online/offline) a partir de la señal del navegador.
// Sin reintentos ni heartbeat: la señal de la plataforma es la verdad.
// Un backend alcanzable pero con errores NO se detecta aquí - eso lo
// maneja el sincronizador por llamada.
// ============================================================================

use std::sync::{Arc, Mutex};

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, Event};

/// Vista mínima de la conectividad que necesita el sincronizador
pub trait Connectivity {
    fn is_online(&self) -> bool;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NetworkStatus {
    Online,
    Offline,
    Unknown,
}

/// Monitor de red con listeners de eventos del window
#[derive(Clone)]
pub struct NetworkMonitor {
    status: Arc<Mutex<NetworkStatus>>,
}

impl NetworkMonitor {
    pub fn new() -> Self {
        let status = Arc::new(Mutex::new(NetworkStatus::Unknown));

        // Estado inicial desde navigator.onLine (vía Reflect, sin feature extra)
        if let Some(window) = window() {
            let on_line = js_sys::Reflect::get(&window, &JsValue::from_str("navigator"))
                .ok()
                .and_then(|nav| js_sys::Reflect::get(&nav, &JsValue::from_str("onLine")).ok())
                .and_then(|v| v.as_bool());

            if let Some(is_online) = on_line {
                *status.lock().unwrap() = if is_online {
                    NetworkStatus::Online
                } else {
                    NetworkStatus::Offline
                };
            }
        }

        Self { status }
    }

    pub fn current_status(&self) -> NetworkStatus {
        *self.status.lock().unwrap()
    }

    /// Registrar callback cuando vuelve la conexión.
    /// Los listeners del window viven toda la app, por eso forget().
    pub fn on_online<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        let window = match window() {
            Some(w) => w,
            None => return,
        };

        let status = self.status.clone();
        let online_closure = Closure::wrap(Box::new(move |_event: Event| {
            log::info!("🌐 Red: ONLINE");
            *status.lock().unwrap() = NetworkStatus::Online;
            callback();
        }) as Box<dyn FnMut(Event)>);

        let _ = window
            .add_event_listener_with_callback("online", online_closure.as_ref().unchecked_ref());
        online_closure.forget();

        // Mantener el estado coherente también al perder la conexión
        let status = self.status.clone();
        let offline_closure = Closure::wrap(Box::new(move |_event: Event| {
            log::warn!("📴 Red: OFFLINE");
            *status.lock().unwrap() = NetworkStatus::Offline;
        }) as Box<dyn FnMut(Event)>);

        let _ = window
            .add_event_listener_with_callback("offline", offline_closure.as_ref().unchecked_ref());
        offline_closure.forget();
    }
}

impl Default for NetworkMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl Connectivity for NetworkMonitor {
    fn is_online(&self) -> bool {
        matches!(self.current_status(), NetworkStatus::Online)
    }
}

/// Conectividad fija, para tests del sincronizador
#[cfg(test)]
#[derive(Clone)]
pub struct FixedConnectivity(pub std::rc::Rc<std::cell::Cell<bool>>);

#[cfg(test)]
impl FixedConnectivity {
    pub fn online() -> Self {
        Self(std::rc::Rc::new(std::cell::Cell::new(true)))
    }

    pub fn offline() -> Self {
        Self(std::rc::Rc::new(std::cell::Cell::new(false)))
    }

    pub fn set_online(&self, online: bool) {
        self.0.set(online);
    }
}

#[cfg(test)]
impl Connectivity for FixedConnectivity {
    fn is_online(&self) -> bool {
        self.0.get()
    }
}
