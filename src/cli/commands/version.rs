//! Version information display

use serde_json::json;

use crate::cli::args::{OutputFormat, VersionArgs};

/// Prints the package name and version.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(args: &VersionArgs) -> Result<(), serde_json::Error> {
    let name = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");

    match args.format {
        OutputFormat::Human => println!("{name} {version}"),
        OutputFormat::Json => {
            let line = serde_json::to_string(&json!({ "name": name, "version": version }))?;
            println!("{line}");
        }
    }
    Ok(())
}
