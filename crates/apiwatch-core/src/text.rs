/// Clip width for ranked message lists.
pub const LONG_FORM_LABEL_CHARS: usize = 100;
/// Clip width for chart axis labels.
pub const CHART_LABEL_CHARS: usize = 40;

#[must_use]
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    let Some((clip_idx, _)) = text.char_indices().nth(max_chars) else {
        return text.to_string();
    };

    let mut out = text[..clip_idx].to_string();
    out.push_str("...");
    out
}

/// Trimmed cell text, or `None` when blank.
#[must_use]
pub fn non_empty_cell(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
