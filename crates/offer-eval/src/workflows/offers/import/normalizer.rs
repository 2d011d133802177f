pub(crate) fn normalize_text(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Accepts plain numbers and spreadsheet-style amounts such as `$150,000` or `12k`.
pub(crate) fn parse_amount(value: &str) -> Option<f64> {
    let cleaned: String = normalize_text(value)
        .chars()
        .filter(|ch| !matches!(ch, '$' | ',' | '_' | ' '))
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let (digits, multiplier) = match cleaned.strip_suffix(['k', 'K']) {
        Some(stripped) => (stripped, 1_000.0),
        None => (cleaned.as_str(), 1.0),
    };

    digits
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .map(|amount| amount * multiplier)
}

pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    match normalize_text(value).to_ascii_lowercase().as_str() {
        "" | "false" | "no" | "n" | "0" => Some(false),
        "true" | "yes" | "y" | "1" => Some(true),
        _ => None,
    }
}
