//! The HTML page shared by the dashboard and the collector.

use std::time::Duration;

const TEMPLATE: &str = include_str!("../assets/index.html");

/// How the page treats each `GET /logs` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PageMode {
    /// The endpoint drains: append each response to what is shown.
    Append,
    /// The endpoint returns full history: replace what is shown.
    Replace,
}

/// Renders the page with the poll interval embedded.
pub(crate) fn render(poll_interval: Duration, mode: PageMode) -> String {
    TEMPLATE
        .replace("{{POLL_INTERVAL_MS}}", &poll_interval.as_millis().to_string())
        .replace(
            "{{APPEND}}",
            if mode == PageMode::Append { "true" } else { "false" },
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_are_filled() {
        let page = render(Duration::from_secs(15), PageMode::Append);
        assert!(page.contains("const POLL_INTERVAL_MS = 15000;"));
        assert!(page.contains("const APPEND = true;"));
        assert!(!page.contains("{{"));

        let page = render(Duration::from_millis(250), PageMode::Replace);
        assert!(page.contains("const POLL_INTERVAL_MS = 250;"));
        assert!(page.contains("const APPEND = false;"));
    }
}
