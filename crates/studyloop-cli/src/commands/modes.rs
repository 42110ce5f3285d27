use serde_json::json;
use studyloop_core::catalog;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let modes: Vec<_> = catalog()
        .iter()
        .map(|info| {
            json!({
                "mode": info.mode,
                "title": info.title,
                "description": info.description,
                "xp_range": info.xp_range(),
                "xp_basis": info.xp_basis,
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&modes)?);
    Ok(())
}
