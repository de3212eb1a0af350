/// Normalizes free text for a BR Code field.
///
/// Drops every character that is not an ASCII letter, digit or whitespace
/// (accented letters go with them), uppercases, trims and cuts the result
/// to `max_len` bytes. The output is pure ASCII so the cut never splits a
/// character. Trailing whitespace exposed by the cut is trimmed as well, which
/// keeps the function idempotent.
pub fn sanitize(text: &str, max_len: usize) -> String {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_ascii_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    let trimmed = cleaned.trim();
    let cut = if trimmed.len() > max_len {
        &trimmed[..max_len]
    } else {
        trimmed
    };

    cut.trim_end().to_string()
}
