use crate::row::PosterRow;

/// Two-column, plain-text view of a row for terminal display.
/// Empty cells are shown as `-`.
pub fn render_table(row: &PosterRow) -> String {
    let width = row.cells().map(|(name, _)| name.chars().count()).max().unwrap_or(0);
    let mut out = String::new();
    for (name, value) in row.cells() {
        let value = if value.is_empty() { "-" } else { value };
        out.push_str(&format!("{name:<width$}  {value}\n"));
    }
    out
}
