use labelcheck_core::error::LabelError;
use labelcheck_core::schema::{field_schema, registry, FieldId};

pub fn list() -> Result<(), LabelError> {
    let max_name = registry()
        .iter()
        .map(|s| s.id.name().len())
        .max()
        .unwrap_or(10);

    for schema in registry() {
        let kind = if schema.mandatory {
            "mandatory"
        } else {
            "supplemental"
        };
        println!(
            "  {:<width$}  {:<12}  {}",
            schema.id.name(),
            kind,
            schema.description,
            width = max_name
        );
    }
    Ok(())
}

pub fn describe(name: &str) -> Result<(), LabelError> {
    let id = FieldId::from_name(name)?;
    let schema = field_schema(id);

    println!("{}", schema.id.name());
    println!("  {}", schema.description);
    println!(
        "  kind:       {}",
        if schema.mandatory {
            "mandatory (counts toward the compliance score)"
        } else {
            "supplemental (informational only)"
        }
    );
    println!("  max length: {} characters", schema.max_length);
    println!("  validation: {}", schema.validation.as_str());
    Ok(())
}
