//! services/api/src/bin/openapi.rs
//!
//! Writes the OpenAPI document of the report API to disk.
//!
//! Usage: `openapi [OUTPUT]`, where OUTPUT defaults to `openapi.json`.

use api_lib::web::rest::ApiDoc;
use std::path::PathBuf;
use utoipa::OpenApi;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("openapi.json"));

    let doc = ApiDoc::openapi();
    std::fs::write(&output, doc.to_pretty_json()?)?;
    println!(
        "Wrote {} paths to {}",
        doc.paths.paths.len(),
        output.display()
    );
    Ok(())
}
