//! `nissue` - query a Notion database as an issue tracker.

use notion_issues::{AppError, run};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        let app_error = e.downcast_ref::<AppError>();
        if let Some(hint) = app_error.and_then(AppError::suggestion) {
            eprintln!("Hint: {hint}");
        }
        std::process::exit(app_error.map_or(1, AppError::exit_code));
    }
}
