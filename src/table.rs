use std::fmt::Write as _;

/// Renders left-aligned columns separated by two spaces, with a dashed rule
/// under the header row.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths = headers
        .iter()
        .map(|h| h.chars().count())
        .collect::<Vec<_>>();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(flatten(cell).chars().count());
        }
    }

    let mut output = String::new();
    let header_cells = headers.iter().map(|h| h.to_string()).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&header_cells, &widths));
    let rule = widths
        .iter()
        .map(|w| "-".repeat((*w).max(3)))
        .collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&rule, &widths));
    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths));
    }
    output
}

pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows));
}

fn format_row(values: &[String], widths: &[usize]) -> String {
    let line = values
        .iter()
        .zip(widths)
        .map(|(value, width)| format!("{:<width$}", flatten(value), width = *width))
        .collect::<Vec<_>>()
        .join("  ");
    line.trim_end().to_string()
}

// Header cells from spreadsheets often carry line breaks.
fn flatten(value: &str) -> String {
    value.replace(['\n', '\r', '\t'], " ")
}
