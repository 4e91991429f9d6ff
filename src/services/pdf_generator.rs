// ============================================================================
// GENERADOR DE PDF (checklists)
// ============================================================================
// Dos capas: un layout puro que produce una lista de operaciones de dibujo
// (con saltos de página y cabecera repetida), y un emisor WASM que
// reproduce esas operaciones sobre jsPDF vía FFI. Las imágenes se cargan
// y re-codifican a JPEG una a una antes de maquetar; una imagen fallida
// se convierte en una línea de aviso, no aborta el documento.
// ============================================================================

use std::collections::HashMap;

use wasm_bindgen_futures::JsFuture;

use crate::hooks::use_grouped_tasks::{group_tasks, sorted_categories, sorted_subcategories};
use crate::models::{ChecklistEntry, Scenario, SyncError};
use crate::utils::categories::DEFAULT_SUBCATEGORY;
use crate::utils::jspdf_ffi;

// Dimensiones A4 en mm
const PAGE_WIDTH: f64 = 210.0;
const PAGE_HEIGHT: f64 = 297.0;
const MARGIN: f64 = 15.0;
const CONTENT_WIDTH: f64 = PAGE_WIDTH - MARGIN * 2.0;

const COLOR_PRIMARY: &str = "#1E40AF";
const COLOR_TEXT: &str = "#1F2937";
const COLOR_SUBTLE: &str = "#6B7281";
const COLOR_DONE: &str = "#9CA3AF";
const COLOR_LINK: &str = "#0000EE";
const COLOR_ERROR: &str = "#DC2626";

// Aproximación del ancho medio de un carácter Helvetica (pt -> mm)
const PT_TO_MM: f64 = 0.352_778;
const AVG_CHAR_FACTOR: f64 = 0.5;

/// Imagen ya cargada y re-codificada, lista para incrustar
#[derive(Clone, Debug, PartialEq)]
pub struct PdfImage {
    pub data_url: String,
    pub width: f64,
    pub height: f64,
}

pub type ImageMap = HashMap<String, Result<PdfImage, String>>;

/// Operación de dibujo - el emisor las reproduce en orden
#[derive(Clone, Debug, PartialEq)]
pub enum PdfOp {
    AddPage,
    SetFont { bold: bool, size: f64 },
    SetTextColor(String),
    SetDrawColor(String),
    Text { x: f64, y: f64, text: String },
    TextRight { x: f64, y: f64, text: String },
    TextLink { x: f64, y: f64, text: String, url: String },
    Rect { x: f64, y: f64, w: f64, h: f64, line_width: f64 },
    Line { x1: f64, y1: f64, x2: f64, y2: f64, line_width: f64 },
    Image { data_url: String, x: f64, y: f64, w: f64, h: f64 },
    Save { filename: String },
}

/// Corte greedy por palabras para un ancho de columna en mm
pub fn wrap_text(text: &str, max_width_mm: f64, font_size: f64) -> Vec<String> {
    let char_width = font_size * AVG_CHAR_FACTOR * PT_TO_MM;
    let max_chars = ((max_width_mm / char_width).floor() as usize).max(1);

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate_len = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if candidate_len <= max_chars {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
            } else {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                // Palabras más largas que la columna se parten duro
                let mut rest: Vec<char> = word.chars().collect();
                while rest.len() > max_chars {
                    lines.push(rest.drain(..max_chars).collect());
                }
                current = rest.into_iter().collect();
            }
        }
        lines.push(current);
    }
    lines
}

struct Layout {
    ops: Vec<PdfOp>,
    y: f64,
    title: String,
    date_display: String,
}

impl Layout {
    fn new(title: String, date_display: String) -> Self {
        Self {
            ops: Vec::new(),
            y: MARGIN,
            title,
            date_display,
        }
    }

    /// Cabecera en cada página: título a la izquierda, fecha a la derecha
    fn add_header(&mut self) {
        self.ops.push(PdfOp::SetFont { bold: true, size: 18.0 });
        self.ops.push(PdfOp::SetTextColor(COLOR_PRIMARY.to_string()));
        self.ops.push(PdfOp::Text {
            x: MARGIN,
            y: self.y,
            text: self.title.clone(),
        });

        self.ops.push(PdfOp::SetFont { bold: false, size: 10.0 });
        self.ops.push(PdfOp::SetTextColor(COLOR_SUBTLE.to_string()));
        self.ops.push(PdfOp::TextRight {
            x: PAGE_WIDTH - MARGIN,
            y: self.y,
            text: self.date_display.clone(),
        });

        self.y += 15.0;
    }

    fn add_divider(&mut self) {
        self.ops.push(PdfOp::SetDrawColor(COLOR_PRIMARY.to_string()));
        self.ops.push(PdfOp::Line {
            x1: MARGIN,
            y1: self.y,
            x2: PAGE_WIDTH - MARGIN,
            y2: self.y,
            line_width: 0.2,
        });
        self.y += 5.0;
    }

    /// Salto de página cuando el siguiente bloque no cabe
    fn check_page_break(&mut self, space_needed: f64) {
        if self.y + space_needed > PAGE_HEIGHT - MARGIN {
            self.ops.push(PdfOp::AddPage);
            self.y = MARGIN;
            self.add_header();
        }
    }
}

fn cleaned_title(title: &str) -> String {
    title.replace('→', "-")
}

/// Maqueta una checklist completa como lista de operaciones.
/// `date_display` va en la cabecera (dd.mm.yyyy), `date_iso` al nombre
/// del archivo.
pub fn layout_checklist(
    scenario: &Scenario,
    entries: &[ChecklistEntry],
    images: &ImageMap,
    date_display: &str,
    date_iso: &str,
) -> Vec<PdfOp> {
    let grouped = group_tasks(entries);
    let title = cleaned_title(scenario.title);
    let mut layout = Layout::new(title.clone(), date_display.to_string());

    layout.add_header();
    layout.add_divider();

    for category in sorted_categories(&grouped, scenario.task_type) {
        let subgroups = &grouped[&category];

        layout.check_page_break(15.0);

        layout.ops.push(PdfOp::SetFont { bold: true, size: 14.0 });
        layout.ops.push(PdfOp::SetTextColor(COLOR_TEXT.to_string()));
        layout.ops.push(PdfOp::Text {
            x: MARGIN,
            y: layout.y,
            text: category.clone(),
        });
        layout.y += 8.0;

        let subcategories = sorted_subcategories(
            subgroups,
            scenario.task_type,
            &category,
            scenario.location,
        );

        for subcategory in subcategories {
            let tasks = &subgroups[&subcategory];
            // Solo con más de una subcategoría, o cuando la única no es
            // la subcategoría por defecto
            let has_subcategory_title =
                subgroups.len() > 1 || subcategory != DEFAULT_SUBCATEGORY;

            if has_subcategory_title {
                layout.check_page_break(10.0);
                layout.ops.push(PdfOp::SetFont { bold: true, size: 11.0 });
                layout.ops.push(PdfOp::SetTextColor(COLOR_TEXT.to_string()));
                layout.ops.push(PdfOp::Text {
                    x: MARGIN + 5.0,
                    y: layout.y,
                    text: subcategory.clone(),
                });
                layout.y += 6.0;
            }

            for entry in tasks {
                layout_task(&mut layout, entry, images);
            }
        }
        layout.y += 5.0;
    }

    let filename = format!("{}_{}.pdf", title.replace(' ', "_"), date_iso);
    layout.ops.push(PdfOp::Save { filename });
    layout.ops
}

fn layout_task(layout: &mut Layout, entry: &ChecklistEntry, images: &ImageMap) {
    let task = &entry.task;
    layout.check_page_break(10.0);

    // Checkbox
    let checkbox_x = MARGIN + 7.0;
    layout.ops.push(PdfOp::SetDrawColor(COLOR_TEXT.to_string()));
    layout.ops.push(PdfOp::Rect {
        x: checkbox_x,
        y: layout.y - 3.0,
        w: 4.0,
        h: 4.0,
        line_width: 0.3,
    });

    let title_x = checkbox_x + 8.0;
    layout.ops.push(PdfOp::SetFont { bold: false, size: 11.0 });

    if entry.done {
        layout.ops.push(PdfOp::SetTextColor(COLOR_DONE.to_string()));
        // Marca dentro de la checkbox
        layout.ops.push(PdfOp::SetFont { bold: true, size: 11.0 });
        layout.ops.push(PdfOp::Text {
            x: checkbox_x + 1.0,
            y: layout.y + 0.5,
            text: "X".to_string(),
        });
        layout.ops.push(PdfOp::SetFont { bold: false, size: 11.0 });
    } else {
        layout.ops.push(PdfOp::SetTextColor(COLOR_TEXT.to_string()));
    }

    let title_lines = wrap_text(&task.title, CONTENT_WIDTH - 20.0, 11.0);
    let line_count = title_lines.len() as f64;
    for (i, line) in title_lines.into_iter().enumerate() {
        layout.ops.push(PdfOp::Text {
            x: title_x,
            y: layout.y + i as f64 * 5.0,
            text: line,
        });
    }
    layout.y += line_count * 5.0;

    if let Some(description) = &task.description {
        layout.check_page_break(8.0);
        layout.ops.push(PdfOp::SetFont { bold: false, size: 9.0 });
        layout.ops.push(PdfOp::SetTextColor(COLOR_SUBTLE.to_string()));
        let lines = wrap_text(description, CONTENT_WIDTH - 20.0, 9.0);
        let count = lines.len() as f64;
        for (i, line) in lines.into_iter().enumerate() {
            layout.ops.push(PdfOp::Text {
                x: title_x,
                y: layout.y + i as f64 * 3.5,
                text: line,
            });
        }
        layout.y += count * 3.5 + 2.0;
    }

    if let Some(notes) = &task.notes {
        layout.check_page_break(8.0);
        layout.ops.push(PdfOp::SetFont { bold: true, size: 9.0 });
        layout.ops.push(PdfOp::SetTextColor(COLOR_SUBTLE.to_string()));
        layout.ops.push(PdfOp::Text {
            x: title_x,
            y: layout.y,
            text: "Notiz:".to_string(),
        });

        layout.ops.push(PdfOp::SetFont { bold: false, size: 9.0 });
        let lines = wrap_text(notes, CONTENT_WIDTH - 28.0, 9.0);
        let count = lines.len() as f64;
        for (i, line) in lines.into_iter().enumerate() {
            layout.ops.push(PdfOp::Text {
                x: title_x + 10.0,
                y: layout.y + i as f64 * 3.5,
                text: line,
            });
        }
        layout.y += count * 3.5 + 2.0;
    }

    if let Some(link) = &task.link {
        layout.check_page_break(8.0);
        layout.ops.push(PdfOp::SetFont { bold: true, size: 9.0 });
        layout.ops.push(PdfOp::SetTextColor(COLOR_SUBTLE.to_string()));
        layout.ops.push(PdfOp::Text {
            x: title_x,
            y: layout.y,
            text: "Link:".to_string(),
        });

        layout.ops.push(PdfOp::SetFont { bold: false, size: 9.0 });
        layout.ops.push(PdfOp::SetTextColor(COLOR_LINK.to_string()));
        layout.ops.push(PdfOp::TextLink {
            x: title_x + 10.0,
            y: layout.y,
            text: link.clone(),
            url: link.clone(),
        });
        layout.y += 5.5;
    }

    for image_url in task.effective_image_urls() {
        match images.get(&image_url) {
            Some(Ok(image)) if image.width > 0.0 => {
                let img_width = CONTENT_WIDTH - 20.0;
                let img_height = image.height * img_width / image.width;
                layout.check_page_break(img_height + 5.0);
                layout.ops.push(PdfOp::Image {
                    data_url: image.data_url.clone(),
                    x: title_x,
                    y: layout.y,
                    w: img_width,
                    h: img_height,
                });
                layout.y += img_height + 5.0;
            }
            _ => {
                // Placeholder en línea, el resto del documento sigue
                layout.check_page_break(8.0);
                layout.ops.push(PdfOp::SetFont { bold: false, size: 9.0 });
                layout.ops.push(PdfOp::SetTextColor(COLOR_ERROR.to_string()));
                layout.ops.push(PdfOp::Text {
                    x: title_x,
                    y: layout.y,
                    text: format!("[Bild konnte nicht geladen werden: {}]", image_url),
                });
                layout.y += 5.0;
            }
        }
    }

    layout.y += 4.0;
}

// ============================================================================
// LADO WASM: carga de imágenes y emisión sobre jsPDF
// ============================================================================

/// Carga las imágenes una a una (nunca más de un fetch en vuelo,
/// para acotar memoria con checklists llenas de fotos)
pub async fn load_images(urls: &[String]) -> ImageMap {
    let mut images = ImageMap::new();
    for url in urls {
        if images.contains_key(url) {
            continue;
        }
        let result = match JsFuture::from(jspdf_ffi::pdf_load_image(url)).await {
            Ok(value) => {
                let get_f64 = |key: &str| {
                    js_sys::Reflect::get(&value, &wasm_bindgen::JsValue::from_str(key))
                        .ok()
                        .and_then(|v| v.as_f64())
                };
                let data_url =
                    js_sys::Reflect::get(&value, &wasm_bindgen::JsValue::from_str("dataUrl"))
                        .ok()
                        .and_then(|v| v.as_string());
                match (data_url, get_f64("width"), get_f64("height")) {
                    (Some(data_url), Some(width), Some(height)) => Ok(PdfImage {
                        data_url,
                        width,
                        height,
                    }),
                    _ => Err("respuesta de imagen incompleta".to_string()),
                }
            }
            Err(e) => Err(format!("{:?}", e)),
        };
        if let Err(e) = &result {
            log::error!("❌ Imagen no cargada ({}): {}", url, e);
        }
        images.insert(url.clone(), result);
    }
    images
}

/// Reproduce la lista de operaciones sobre jsPDF
pub fn render_ops(ops: &[PdfOp]) {
    jspdf_ffi::pdf_init();
    for op in ops {
        match op {
            PdfOp::AddPage => jspdf_ffi::pdf_add_page(),
            PdfOp::SetFont { bold, size } => jspdf_ffi::pdf_set_font(*bold, *size),
            PdfOp::SetTextColor(hex) => jspdf_ffi::pdf_set_text_color(hex),
            PdfOp::SetDrawColor(hex) => jspdf_ffi::pdf_set_draw_color(hex),
            PdfOp::Text { x, y, text } => jspdf_ffi::pdf_text(*x, *y, text),
            PdfOp::TextRight { x, y, text } => jspdf_ffi::pdf_text_right(*x, *y, text),
            PdfOp::TextLink { x, y, text, url } => jspdf_ffi::pdf_text_link(*x, *y, text, url),
            PdfOp::Rect { x, y, w, h, line_width } => {
                jspdf_ffi::pdf_rect(*x, *y, *w, *h, *line_width)
            }
            PdfOp::Line { x1, y1, x2, y2, line_width } => {
                jspdf_ffi::pdf_line(*x1, *y1, *x2, *y2, *line_width)
            }
            PdfOp::Image { data_url, x, y, w, h } => {
                jspdf_ffi::pdf_add_image(data_url, *x, *y, *w, *h)
            }
            PdfOp::Save { filename } => jspdf_ffi::pdf_save(filename),
        }
    }
}

/// Genera y descarga el PDF de una checklist ya cargada
pub async fn generate_checklist_pdf(scenario: &Scenario, entries: &[ChecklistEntry]) {
    let urls: Vec<String> = entries
        .iter()
        .flat_map(|e| e.task.effective_image_urls())
        .collect();
    let images = load_images(&urls).await;

    let now = chrono::Local::now();
    let date_display = now.format("%d.%m.%Y").to_string();
    let date_iso = now.format("%Y-%m-%d").to_string();

    let ops = layout_checklist(scenario, entries, &images, &date_display, &date_iso);
    render_ops(&ops);
    log::info!("📄 PDF generado: {}", scenario.title);
}

/// Resultado de un export por lotes: cuántos escenarios terminaron y,
/// si se abortó, en cuál
#[derive(Debug)]
pub struct BatchOutcome {
    pub completed: usize,
    pub failed: Option<(String, SyncError)>,
}

/// Exporta varios escenarios, uno por uno. Un fallo aborta los
/// restantes (nunca a mitad de un escenario) y se informa del parcial.
pub async fn generate_many<R, B, C>(
    sync: &crate::services::checklist_sync::ChecklistSync<R, B, C>,
    user_id: &str,
    scenario_ids: &[String],
    mut on_progress: impl FnMut(usize, usize),
) -> BatchOutcome
where
    R: crate::services::remote::ChecklistRemote,
    B: crate::services::offline_service::StorageBackend,
    C: crate::services::network_monitor::Connectivity,
{
    let total = scenario_ids.len();
    let mut completed = 0;

    for (i, scenario_id) in scenario_ids.iter().enumerate() {
        on_progress(i + 1, total);
        let scenario = match crate::models::find_scenario(scenario_id) {
            Some(s) => s,
            None => continue,
        };

        match sync.load(user_id, scenario_id).await {
            Ok(entries) => {
                generate_checklist_pdf(scenario, &entries).await;
                completed += 1;
            }
            Err(e) => {
                log::error!("❌ PDF abortado en '{}': {}", scenario.title, e);
                return BatchOutcome {
                    completed,
                    failed: Some((scenario.title.to_string(), e)),
                };
            }
        }
    }

    BatchOutcome {
        completed,
        failed: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::test_task;
    use crate::models::{find_scenario, ChecklistEntry};

    fn entries(n: usize, done_first: bool) -> Vec<ChecklistEntry> {
        (0..n)
            .map(|i| ChecklistEntry {
                task: test_task(&format!("t{}", i), "reise-nl-ben", "Sicherheit", None, i as i64),
                done: done_first && i == 0,
            })
            .collect()
    }

    fn texts(ops: &[PdfOp]) -> Vec<&str> {
        ops.iter()
            .filter_map(|op| match op {
                PdfOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn documento_corto_en_una_pagina() {
        let scenario = find_scenario("reise-nl-ben").unwrap();
        let ops = layout_checklist(scenario, &entries(3, false), &ImageMap::new(), "01.08.2026", "2026-08-01");
        assert!(!ops.iter().any(|op| matches!(op, PdfOp::AddPage)));
        // Una cabecera: el título aparece una única vez
        let title = cleaned_title(scenario.title);
        assert_eq!(texts(&ops).iter().filter(|t| **t == title).count(), 1);
    }

    #[test]
    fn salto_de_pagina_repite_la_cabecera() {
        let scenario = find_scenario("reise-nl-ben").unwrap();
        let ops = layout_checklist(scenario, &entries(80, false), &ImageMap::new(), "01.08.2026", "2026-08-01");

        let pages = ops.iter().filter(|op| matches!(op, PdfOp::AddPage)).count();
        assert!(pages >= 1, "80 tareas deben desbordar una página A4");

        let title = cleaned_title(scenario.title);
        let headers = texts(&ops).iter().filter(|t| **t == title).count();
        // Cabecera inicial + una por cada página nueva
        assert_eq!(headers, pages + 1);
    }

    #[test]
    fn tarea_erledigt_lleva_marca_y_color_apagado() {
        let scenario = find_scenario("reise-nl-ben").unwrap();
        let ops = layout_checklist(scenario, &entries(2, true), &ImageMap::new(), "01.08.2026", "2026-08-01");
        assert!(texts(&ops).contains(&"X"));
        assert!(ops
            .iter()
            .any(|op| matches!(op, PdfOp::SetTextColor(c) if c == COLOR_DONE)));
    }

    #[test]
    fn imagen_fallida_se_vuelve_placeholder() {
        let scenario = find_scenario("reise-nl-ben").unwrap();
        let mut list = entries(1, false);
        list[0].task.push_image_url("https://cdn/rota.jpg".to_string());

        let mut images = ImageMap::new();
        images.insert("https://cdn/rota.jpg".to_string(), Err("timeout".to_string()));

        let ops = layout_checklist(scenario, &list, &images, "01.08.2026", "2026-08-01");
        assert!(!ops.iter().any(|op| matches!(op, PdfOp::Image { .. })));
        assert!(texts(&ops)
            .iter()
            .any(|t| t.contains("Bild konnte nicht geladen werden")));
    }

    #[test]
    fn imagen_cargada_se_escala_proporcionalmente() {
        let scenario = find_scenario("reise-nl-ben").unwrap();
        let mut list = entries(1, false);
        list[0].task.push_image_url("https://cdn/foto.jpg".to_string());

        let mut images = ImageMap::new();
        images.insert(
            "https://cdn/foto.jpg".to_string(),
            Ok(PdfImage {
                data_url: "data:image/jpeg;base64,xxxx".to_string(),
                width: 800.0,
                height: 400.0,
            }),
        );

        let ops = layout_checklist(scenario, &list, &images, "01.08.2026", "2026-08-01");
        let image_op = ops
            .iter()
            .find_map(|op| match op {
                PdfOp::Image { w, h, .. } => Some((*w, *h)),
                _ => None,
            })
            .expect("la imagen debe incrustarse");
        // Relación de aspecto 2:1 conservada al ancho de contenido
        assert_eq!(image_op.0, CONTENT_WIDTH - 20.0);
        assert!((image_op.1 - image_op.0 / 2.0).abs() < 1e-9);
    }

    #[test]
    fn subtitulo_solo_cuando_hace_falta() {
        let scenario = find_scenario("reise-nl-ben").unwrap();

        // Una sola subcategoría "Allgemein": sin subtítulo
        let ops = layout_checklist(scenario, &entries(2, false), &ImageMap::new(), "01.08.2026", "2026-08-01");
        assert!(!texts(&ops).contains(&"Allgemein"));

        // Dos subcategorías: ambas llevan subtítulo
        let mut list = entries(1, false);
        list.push(ChecklistEntry {
            task: test_task("t9", "reise-nl-ben", "Sicherheit", Some("Alarmanlage"), 9),
            done: false,
        });
        let ops = layout_checklist(scenario, &list, &ImageMap::new(), "01.08.2026", "2026-08-01");
        let texts = texts(&ops);
        assert!(texts.contains(&"Allgemein"));
        assert!(texts.contains(&"Alarmanlage"));
    }

    #[test]
    fn nombre_de_archivo_limpio() {
        let scenario = find_scenario("reise-nl-ben").unwrap();
        let ops = layout_checklist(scenario, &entries(1, false), &ImageMap::new(), "01.08.2026", "2026-08-01");
        let filename = ops
            .iter()
            .find_map(|op| match op {
                PdfOp::Save { filename } => Some(filename.clone()),
                _ => None,
            })
            .unwrap();
        assert!(!filename.contains('→'));
        assert!(!filename.contains(' '));
        assert!(filename.ends_with("_2026-08-01.pdf"));
    }

    #[test]
    fn wrap_respeta_parrafos_y_palabras_largas() {
        let lines = wrap_text("uno dos tres", 200.0, 11.0);
        assert_eq!(lines, vec!["uno dos tres"]);

        let lines = wrap_text("primera\nsegunda", 200.0, 11.0);
        assert_eq!(lines, vec!["primera", "segunda"]);

        // Palabra imposiblemente larga: se parte, no se pierde
        let long = "a".repeat(500);
        let lines = wrap_text(&long, 50.0, 11.0);
        let total: usize = lines.iter().map(|l| l.chars().count()).sum();
        assert_eq!(total, 500);
        assert!(lines.len() > 1);
    }
}
