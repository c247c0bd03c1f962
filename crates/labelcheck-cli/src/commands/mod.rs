pub mod check;
pub mod extract;
pub mod fields;

use labelcheck_core::error::LabelError;
use labelcheck_core::extract::{OcrInput, PageBundle};
use std::path::Path;

/// What kind of submission an input file holds, decided by extension.
pub enum Input {
    Text(OcrInput),
    Page(PageBundle),
}

/// Load a submission: `.txt` files are OCR text, `.html`/`.htm` files are
/// scraped pages.
pub fn load_input(
    path: &Path,
    url: Option<&str>,
    ocr_confidence: f64,
    width: u32,
    height: u32,
) -> Result<Input, LabelError> {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "txt" => {
            let text = std::fs::read_to_string(path)?;
            Ok(Input::Text(OcrInput {
                text,
                confidence: ocr_confidence,
                image_width: width,
                image_height: height,
            }))
        }
        "html" | "htm" => {
            let html = std::fs::read_to_string(path)?;
            Ok(Input::Page(PageBundle::from_html(&html, url)))
        }
        _ => Err(LabelError::UnsupportedInput {
            path: path.to_path_buf(),
        }),
    }
}
