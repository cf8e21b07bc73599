//! Maintenance command implementation.

use serde::Serialize;
use tracing::info;

use super::Runtime;
use crate::error::Result;
use crate::storage::remove_cache_file;

#[derive(Serialize)]
struct MaintenanceOutput {
    path: String,
    removed: bool,
}

/// Execute the maintenance command: delete the schema cache file.
///
/// A missing file is reported, not treated as an error.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be removed.
pub fn execute(runtime: &Runtime) -> Result<()> {
    let path = &runtime.settings.cache_path;
    let removed = remove_cache_file(path)?;
    info!(path = %path.display(), removed, "Cache maintenance");

    let output = &runtime.output;
    if output.is_json() {
        return output.json(&MaintenanceOutput {
            path: path.display().to_string(),
            removed,
        });
    }
    if removed {
        output.line(&format!("Removed cache at: {}", path.display()));
    } else {
        output.line(&format!("No cache at: {}", path.display()));
    }
    Ok(())
}
