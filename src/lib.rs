// ============================================================================
// REISE-CHECK - CHECKLISTEN PWA (RUST/YEW)
// ============================================================================
// Checklisten por escenario (viaje o estancia) con estado por usuario,
// espejo offline en localStorage y export a PDF.
// - components: UI (function components de Yew)
// - hooks:      estado reactivo + agrupación pura de la checklist
// - services:   sincronización, almacén offline, API remota, PDF
// - models:     estructuras compartidas con la base de datos
// ============================================================================

pub mod components;
pub mod hooks;
pub mod models;
pub mod services;
pub mod utils;

pub use components::App;
