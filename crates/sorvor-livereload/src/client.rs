//! Browser side of the live-reload channel.
//!
//! The script opens an `EventSource` on [`LIVERELOAD_PATH`](crate::LIVERELOAD_PATH),
//! reloads the page on every `message` event, and reloads again once the
//! connection reopens after an error (the server restarted).

/// Client script source.
pub const SCRIPT: &str = include_str!("../assets/client.js");

/// The client script wrapped in a `<script>` element.
pub fn script_tag() -> String {
    format!("<script>{}</script>", SCRIPT.trim_end())
}

/// Insert the client script tag into an HTML document.
///
/// The tag goes right before the last `</body>`; documents without one get
/// it appended at the end.
pub fn inject_script(html: &str) -> String {
    let tag = script_tag();

    if let Some(pos) = html.rfind("</body>") {
        let mut result = String::with_capacity(html.len() + tag.len() + 2);
        result.push_str(&html[..pos]);
        result.push_str(&tag);
        result.push('\n');
        result.push_str(&html[pos..]);
        return result;
    }

    let mut result = html.to_string();
    result.push('\n');
    result.push_str(&tag);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_targets_livereload_endpoint() {
        assert!(SCRIPT.contains("new EventSource('/livereload')"));
        assert!(SCRIPT.contains("source.onmessage = reload"));
    }

    #[test]
    fn test_inject_before_body() {
        let html = "<html><body><h1>Test</h1></body></html>";
        let result = inject_script(html);

        let script_pos = result.find("<script>").unwrap();
        let body_pos = result.find("</body>").unwrap();
        assert!(script_pos < body_pos);
        assert!(result.starts_with("<html><body><h1>Test</h1>"));
    }

    #[test]
    fn test_inject_without_body() {
        let html = "<h1>Test</h1>";
        let result = inject_script(html);

        assert!(result.starts_with("<h1>Test</h1>\n<script>"));
        assert!(result.ends_with("</script>"));
    }
}
