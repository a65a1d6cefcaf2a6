/// Parse one `--tags` entry.
///
/// Entries are tag titles without the leading `@`, e.g. `param` or `returns`.
///
/// # Errors
///
/// Returns an error message if the entry is empty, starts with `@` or
/// contains whitespace.
pub fn parse_tag_filter(s: &str) -> Result<String, String> {
    let entry = s.trim();
    if entry.is_empty() {
        return Err("Tag filter entries cannot be empty".to_string());
    }
    if entry.starts_with('@') {
        return Err(format!(
            "Tag filter entries are written without '@': '{}'",
            entry
        ));
    }
    if entry.contains(char::is_whitespace) {
        return Err(format!("Tag filter entries cannot contain spaces: '{}'", entry));
    }
    Ok(entry.to_string())
}
