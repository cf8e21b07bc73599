//! Version command implementation.

use serde::Serialize;

use crate::error::Result;
use crate::format::OutputContext;

#[derive(Serialize)]
struct VersionOutput<'a> {
    version: &'a str,
    build: &'a str,
    notion_api_version: &'a str,
}

/// Execute the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(output: &OutputContext) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    let build = if cfg!(debug_assertions) {
        "dev"
    } else {
        "release"
    };

    if output.is_json() {
        return output.json(&VersionOutput {
            version,
            build,
            notion_api_version: crate::config::NOTION_API_VERSION,
        });
    }

    println!("nissue {version}");
    Ok(())
}
