//! Locates the injected `ytInitialData` assignment in a replay page

use serde_json::Value;
use tracing::debug;

use super::EmbeddedDataLocator;
use crate::infrastructure::replay_error::{ReplayError, ReplayResult};

/// Left-hand side of the global-state assignment line
pub const INITIAL_DATA_PREFIX: &str = r#"window["ytInitialData"]"#;

/// Line-scanning locator for the embedded data blob
#[derive(Debug, Clone, Default)]
pub struct InitialDataLocator;

impl InitialDataLocator {
    pub fn new() -> Self {
        Self
    }

    /// Strip `= ` and the statement terminator from the assignment remainder
    fn assignment_payload(rest: &str) -> Option<&str> {
        let payload = rest.trim_start().strip_prefix('=')?.trim();
        Some(payload.strip_suffix(';').unwrap_or(payload).trim_end())
    }
}

impl EmbeddedDataLocator for InitialDataLocator {
    fn locate(&self, body: &str) -> ReplayResult<Value> {
        let rest = body
            .lines()
            .map(str::trim)
            .find_map(|line| line.strip_prefix(INITIAL_DATA_PREFIX))
            .ok_or_else(|| {
                ReplayError::malformed_page(format!("no line starting with {INITIAL_DATA_PREFIX}"))
            })?;

        let payload = Self::assignment_payload(rest).ok_or_else(|| {
            ReplayError::malformed_page(format!("{INITIAL_DATA_PREFIX} is not an assignment"))
        })?;

        debug!(payload_len = payload.len(), "Located embedded data blob");

        serde_json::from_str(payload).map_err(|e| {
            ReplayError::malformed_page(format!("embedded data is not valid JSON: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locates_indented_assignment() {
        let body = "<html>\n<script>\n    window[\"ytInitialData\"] = {\"a\": 1};\n</script>\n</html>";
        let value = InitialDataLocator::new().locate(body).unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn test_first_assignment_wins() {
        let body = "window[\"ytInitialData\"] = {\"n\": 1};\nwindow[\"ytInitialData\"] = {\"n\": 2};";
        let value = InitialDataLocator::new().locate(body).unwrap();
        assert_eq!(value["n"], 1);
    }

    #[test]
    fn test_missing_line_is_malformed_page() {
        let err = InitialDataLocator::new()
            .locate("<html><body>var ytInitialData = {};</body></html>")
            .unwrap_err();
        assert!(matches!(err, ReplayError::MalformedPage { .. }));
    }

    #[test]
    fn test_invalid_json_is_malformed_page() {
        let err = InitialDataLocator::new()
            .locate("window[\"ytInitialData\"] = {\"broken\": ;")
            .unwrap_err();
        assert!(matches!(err, ReplayError::MalformedPage { .. }));
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn test_prefix_without_assignment_is_malformed_page() {
        let err = InitialDataLocator::new()
            .locate("window[\"ytInitialData\"].foo();")
            .unwrap_err();
        assert!(matches!(err, ReplayError::MalformedPage { .. }));
    }
}
