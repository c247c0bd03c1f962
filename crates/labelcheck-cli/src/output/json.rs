use labelcheck_core::CheckOutcome;

pub fn print(outcome: &CheckOutcome) -> Result<(), serde_json::Error> {
    let json = serde_json::to_string_pretty(outcome)?;
    println!("{json}");
    Ok(())
}
