// ============================================================================
// JSPDF FFI - Foreign Function Interface para JavaScript
// ============================================================================
// Solo wrappers para funciones JS (js/pdf.js) - Sin estado, sin lógica
// ============================================================================

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = pdfInit)]
    pub fn pdf_init();

    #[wasm_bindgen(js_name = pdfAddPage)]
    pub fn pdf_add_page();

    #[wasm_bindgen(js_name = pdfSetFont)]
    pub fn pdf_set_font(bold: bool, size: f64);

    #[wasm_bindgen(js_name = pdfSetTextColor)]
    pub fn pdf_set_text_color(hex: &str);

    #[wasm_bindgen(js_name = pdfText)]
    pub fn pdf_text(x: f64, y: f64, text: &str);

    #[wasm_bindgen(js_name = pdfTextRight)]
    pub fn pdf_text_right(x: f64, y: f64, text: &str);

    #[wasm_bindgen(js_name = pdfTextLink)]
    pub fn pdf_text_link(x: f64, y: f64, text: &str, url: &str);

    #[wasm_bindgen(js_name = pdfSetDrawColor)]
    pub fn pdf_set_draw_color(hex: &str);

    #[wasm_bindgen(js_name = pdfRect)]
    pub fn pdf_rect(x: f64, y: f64, w: f64, h: f64, line_width: f64);

    #[wasm_bindgen(js_name = pdfLine)]
    pub fn pdf_line(x1: f64, y1: f64, x2: f64, y2: f64, line_width: f64);

    #[wasm_bindgen(js_name = pdfAddImage)]
    pub fn pdf_add_image(data_url: &str, x: f64, y: f64, w: f64, h: f64);

    #[wasm_bindgen(js_name = pdfSave)]
    pub fn pdf_save(filename: &str);

    /// Devuelve un Promise<{dataUrl, width, height}>
    #[wasm_bindgen(js_name = pdfLoadImage)]
    pub fn pdf_load_image(url: &str) -> js_sys::Promise;
}
