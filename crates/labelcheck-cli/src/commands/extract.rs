use labelcheck_core::error::LabelError;
use labelcheck_core::extract::{patterns, structured};
use labelcheck_core::model::ExtractedField;
use labelcheck_core::schema::FieldId;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::commands::{load_input, Input};

pub fn run(
    input_file: PathBuf,
    url: Option<String>,
    output_format: &str,
    out: Option<PathBuf>,
) -> Result<(), LabelError> {
    let input = load_input(&input_file, url.as_deref(), 1.0, 0, 0)?;
    let candidates = match &input {
        Input::Text(ocr) => patterns::extract_all(&ocr.text),
        Input::Page(bundle) => structured::extract_all(bundle),
    };

    if let Some(path) = out {
        let json = serde_json::to_string_pretty(&candidates)?;
        std::fs::write(&path, json)?;
        println!("Wrote candidates to {}", path.display());
        return Ok(());
    }

    match output_format {
        "json" => println!("{}", serde_json::to_string_pretty(&candidates)?),
        _ => print_table(&candidates),
    }

    Ok(())
}

fn print_table(candidates: &BTreeMap<FieldId, ExtractedField>) {
    let max_name = FieldId::ALL
        .iter()
        .map(|id| id.name().len())
        .max()
        .unwrap_or(10);

    for (id, candidate) in candidates {
        match &candidate.value {
            Some(value) => println!(
                "  {:<width$}  {:.2}  {}",
                id.name(),
                candidate.confidence,
                value,
                width = max_name
            ),
            None => println!(
                "  {:<width$}  -     (no value)",
                id.name(),
                width = max_name
            ),
        }
    }
}
