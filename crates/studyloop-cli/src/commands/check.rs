use std::path::Path;

use serde_json::json;
use studyloop_core::QuestionSet;

pub fn run(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let set = QuestionSet::load(file)?;
    let warnings: Vec<String> = set.validate().iter().map(ToString::to_string).collect();
    for warning in &warnings {
        tracing::warn!(file = %file.display(), "{warning}");
    }
    let report = json!({
        "questions": set.len(),
        "warnings": warnings,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
