use reise_check_pwa::App;

fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("🚀 Reise-Check starting...");

    yew::Renderer::<App>::new().render();
}
