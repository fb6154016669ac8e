//! `trellis path` command.

use crate::coords::{relative_path, Gav};

/// Execute the `path` command.
///
/// # Errors
///
/// Returns an error string if the coordinates are malformed.
pub fn run(gav: &str, classifier: Option<&str>, extension: Option<&str>) -> Result<(), String> {
    println!("{}", format_path(gav, classifier, extension)?);
    Ok(())
}

fn format_path(
    gav: &str,
    classifier: Option<&str>,
    extension: Option<&str>,
) -> Result<String, String> {
    let gav: Gav = gav.parse().map_err(|e: crate::Error| e.to_string())?;
    Ok(relative_path(&gav, classifier, extension))
}

#[cfg(test)]
mod tests {
    use super::format_path;

    #[test]
    fn formats_classified_paths() {
        let path = format_path("org.example:core:1.0", Some("sources"), None).unwrap();
        assert_eq!(path, "org/example/core/1.0/core-1.0-sources.jar");
    }

    #[test]
    fn rejects_incomplete_coordinates() {
        assert!(format_path("org.example:core", None, None).is_err());
    }
}
