//! Hashtag normalization helpers

/// Normalizes a raw hashtag string into the display form the composer and
/// the transcript use: whitespace- or comma-separated tokens, each prefixed
/// with exactly one `#`, joined by single spaces.
pub fn format_for_display(raw: &str) -> String {
    raw.split(|c: char| c.is_whitespace() || c == ',')
        .map(|token| token.trim_start_matches('#'))
        .filter(|token| !token.is_empty())
        .map(|token| format!("#{}", token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalizes a hashtag string for submission to the backend: the display
/// form with duplicate tags (case-insensitive) collapsed, first occurrence
/// kept.
pub fn format_for_submission(raw: &str) -> String {
    let mut seen: Vec<String> = Vec::new();
    let mut tags: Vec<String> = Vec::new();

    for token in format_for_display(raw).split(' ') {
        if token.is_empty() {
            continue;
        }
        let key = token.to_lowercase();
        if !seen.contains(&key) {
            seen.push(key);
            tags.push(token.to_string());
        }
    }

    tags.join(" ")
}
