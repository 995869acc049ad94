/// Pick the variant for a row: `templates[row_index % len]`.
///
/// Purely positional, so each role rotates on its own list. Returns `None`
/// for an empty list (an optional role with no templates).
pub fn select<T>(templates: &[T], row_index: usize) -> Option<&T> {
    if templates.is_empty() {
        return None;
    }
    templates.get(row_index % templates.len())
}
