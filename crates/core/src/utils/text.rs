/// Lowercases, drops digits and punctuation, and collapses whitespace.
///
/// `"STARBUCKS #1234  Seattle"` becomes `"starbucks seattle"`. Used as the grouping
/// key for merchant heuristics and as the stored form of learned category patterns.
pub fn normalize_merchant(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_alphabetic() {
                c.to_ascii_lowercase()
            } else if c == '&' || c == '\'' {
                c
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Picks the merchant when present, otherwise the description.
pub fn merchant_or_description<'a>(merchant: Option<&'a str>, description: &'a str) -> &'a str {
    match merchant {
        Some(m) if !m.trim().is_empty() => m,
        _ => description,
    }
}
