//! Plain-text table rendering for model context.

/// Render a header row and data rows as a right-aligned text table.
pub fn render_table<'a, I>(headers: &[String], rows: I) -> String
where
    I: IntoIterator<Item = &'a [String]>,
{
    let rows: Vec<&[String]> = rows.into_iter().collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(format_line(&widths, headers));
    for row in &rows {
        lines.push(format_line(&widths, row));
    }

    lines.join("\n")
}

fn format_line(widths: &[usize], cells: &[String]) -> String {
    widths
        .iter()
        .enumerate()
        .map(|(col, &width)| {
            let cell = cells.get(col).map(String::as_str).unwrap_or("");
            format!("{:>width$}", cell, width = width)
        })
        .collect::<Vec<_>>()
        .join("  ")
}
