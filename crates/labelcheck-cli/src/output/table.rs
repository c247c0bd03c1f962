use labelcheck_core::model::LabelSource;
use labelcheck_core::schema::FieldId;
use labelcheck_core::CheckOutcome;

pub fn print(outcome: &CheckOutcome, verbose: bool) {
    let label = &outcome.label;

    match &label.source {
        LabelSource::Ocr { confidence, .. } => {
            println!("=== Label check (image, OCR confidence {confidence:.2}) ===\n");
        }
        LabelSource::Page { url, platform } => {
            let platform = platform
                .map(|p| p.to_string())
                .unwrap_or_else(|| "unknown platform".to_string());
            match url {
                Some(url) => println!("=== Label check ({platform}: {url}) ===\n"),
                None => println!("=== Label check ({platform}) ===\n"),
            }
        }
    }

    println!(
        "  Status: {}  (score {}/100, {}/{} mandatory fields)\n",
        label.status, label.compliance_score, label.fields_present, label.fields_total
    );

    let max_name = FieldId::ALL
        .iter()
        .map(|id| id.name().len())
        .max()
        .unwrap_or(10);

    for id in FieldId::ALL {
        let shown = match label.get(id) {
            Some(value) => value.to_string(),
            None => "(missing)".to_string(),
        };
        if verbose {
            println!(
                "  {:<width$}  {:.2}  {}",
                id.name(),
                label.confidence(id),
                shown,
                width = max_name
            );
        } else {
            println!("  {:<width$}  {}", id.name(), shown, width = max_name);
        }
    }

    if !label.violations.is_empty() {
        println!("\n  Violations:");
        for violation in &label.violations {
            println!(
                "    [{}] {} ({}): {}",
                violation.severity, violation.field, violation.kind, violation.message
            );
        }
    }

    if !outcome.required_missing.is_empty() {
        let names: Vec<&str> = outcome
            .required_missing
            .iter()
            .map(|id| id.name())
            .collect();
        println!(
            "\n  Required for this source but absent: {}",
            names.join(", ")
        );
    }

    if !outcome.quality_warnings.is_empty() {
        println!("\n  Quality warnings:");
        for warning in &outcome.quality_warnings {
            println!("    [{}] {}", warning.severity, warning.message);
        }
    }
}
