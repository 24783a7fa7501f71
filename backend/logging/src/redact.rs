//! Log Redaction
//!
//! Scrubs Google API keys, OAuth access tokens and bearer tokens from
//! strings before they are logged. Provider error bodies and request URLs
//! can echo credentials back.

use regex::Regex;
use std::sync::LazyLock;

static GOOGLE_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"AIza[0-9A-Za-z_\-]{20,}").unwrap());
static KEY_PARAM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([?&]key=)[^&\s]+").unwrap());
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(sk-[a-zA-Z0-9\-]{20,})|(ya29\.[0-9A-Za-z_\-\.]+)|(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)")
        .unwrap()
});

/// Redacts credential patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = KEY_PARAM_RE.replace_all(input, "${1}[REDACTED_KEY]");
    let redacted = GOOGLE_KEY_RE.replace_all(&redacted, "[REDACTED_KEY]");
    TOKEN_RE.replace_all(&redacted, "[REDACTED_TOKEN]").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrubs_query_keys_and_tokens() {
        let raw = "POST https://vision.googleapis.com/v1/images:annotate?key=AIzaSyD-abcdefghijklmnopqrstu failed; Bearer ya29.a0AfH6SMB";
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("AIzaSyD"));
        assert!(!clean.contains("ya29.a0AfH6SMB"));
        assert!(clean.contains("?key=[REDACTED_KEY]"));
    }

    #[test]
    fn scrubs_llm_keys() {
        let clean = redact_sensitive_data("auth failed for sk-or-v1-0123456789abcdef0123");
        assert_eq!(clean, "auth failed for [REDACTED_TOKEN]");
    }

    #[test]
    fn leaves_plain_text_alone() {
        assert_eq!(redact_sensitive_data("Vision API quota exceeded"), "Vision API quota exceeded");
    }
}
