use crate::constants::content_types::{HTML, JSON, PLAIN};
use crate::managers::auth::ResultPrinter;
use crate::models::RequestResult;
use std::fmt::Write;

const RESULTS_BANNER: &str = "--------------------Results--------------------";
const CLOSING_BANNER: &str = "-----------------------------------------------";

/// Human-readable block for one response: status, headers, decoded body, duration.
pub fn render_request_result(result: &RequestResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", RESULTS_BANNER);
    let _ = writeln!(out, "{}", result.status_line());
    for (name, value) in result.headers() {
        let _ = writeln!(out, "{}: {}", name, String::from_utf8_lossy(value.as_bytes()));
    }
    out.push('\n');
    out.push_str(&render_body(result.content_type(), result.body()));
    out.push('\n');
    let _ = writeln!(out, "Duration: {:?}", result.elapsed());
    let _ = writeln!(out, "{}", CLOSING_BANNER);
    out
}

fn render_body(content_type: &str, body: &[u8]) -> String {
    let raw = String::from_utf8_lossy(body).into_owned();
    if content_type.contains(JSON) {
        return serde_json::from_slice::<serde_json::Value>(body)
            .ok()
            .and_then(|value| serde_json::to_string_pretty(&value).ok())
            .unwrap_or(raw);
    }
    if content_type.contains(HTML) || content_type.contains(PLAIN) {
        return raw;
    }
    format!(
        "Unable to decode content-type: {} printing raw output\n{}",
        content_type, raw
    )
}

/// Writes rendered results to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsolePrinter;

impl ResultPrinter for ConsolePrinter {
    fn print_request_result(&self, result: &RequestResult) {
        print!("{}", render_request_result(result));
    }
}

#[cfg(test)]
mod tests {
    use super::{render_body, render_request_result};
    use crate::models::RequestResult;
    use bytes::Bytes;
    use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
    use reqwest::StatusCode;
    use std::time::Duration;

    #[test]
    fn json_bodies_are_pretty_printed() {
        let rendered = render_body("application/json", br#"{"a":1}"#);
        assert_eq!(rendered, "{\n  \"a\": 1\n}");
    }

    #[test]
    fn invalid_json_falls_back_to_raw() {
        assert_eq!(render_body("application/json", b"{oops"), "{oops");
    }

    #[test]
    fn unknown_content_type_gets_a_note() {
        let rendered = render_body("application/pdf", b"%PDF");
        let note = "Unable to decode content-type: application/pdf printing raw output";
        assert!(rendered.starts_with(note));
        assert!(rendered.ends_with("%PDF"));
    }

    #[test]
    fn full_block_has_status_headers_and_duration() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        let result = RequestResult::new(
            StatusCode::NOT_FOUND,
            headers,
            Bytes::from_static(b"missing"),
            Duration::from_millis(12),
        );
        let rendered = render_request_result(&result);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "--------------------Results--------------------");
        assert_eq!(lines[1], "404 Not Found");
        assert_eq!(lines[2], "content-type: text/plain");
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "missing");
        assert_eq!(lines[5], "Duration: 12ms");
        assert_eq!(lines[6], "-----------------------------------------------");
    }
}
