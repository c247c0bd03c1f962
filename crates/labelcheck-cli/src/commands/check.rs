use labelcheck_core::error::LabelError;
use labelcheck_core::refine::FieldSuggestion;
use labelcheck_core::{check_page, check_text, CheckOptions};
use std::path::PathBuf;

use crate::commands::{load_input, Input};
use crate::output;

#[allow(clippy::too_many_arguments)]
pub fn run(
    input_file: PathBuf,
    url: Option<String>,
    ocr_confidence: f64,
    width: u32,
    height: u32,
    refine: Option<PathBuf>,
    output_format: &str,
    verbose: bool,
) -> Result<(), LabelError> {
    let mut options = CheckOptions::default();
    if let Some(path) = refine {
        options.suggestions = load_suggestions(&path)?;
    }

    let input = load_input(&input_file, url.as_deref(), ocr_confidence, width, height)?;
    let outcome = match &input {
        Input::Text(ocr) => check_text(ocr, &options),
        Input::Page(bundle) => check_page(bundle, &options),
    };

    match output_format {
        "json" => output::json::print(&outcome)?,
        _ => output::table::print(&outcome, verbose),
    }

    Ok(())
}

fn load_suggestions(path: &PathBuf) -> Result<Vec<FieldSuggestion>, LabelError> {
    let bytes = std::fs::read(path).map_err(|e| LabelError::RefinementLoad {
        path: path.clone(),
        reason: e.to_string(),
    })?;
    serde_json::from_slice(&bytes).map_err(|e| LabelError::RefinementLoad {
        path: path.clone(),
        reason: e.to_string(),
    })
}
