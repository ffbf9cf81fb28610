//! Compact output rendering helpers for CLI surfaces.

/// Collapse newlines/extra whitespace and bound length for terminal display.
pub fn compact_line(input: &str, max_chars: usize) -> String {
    let collapsed = input.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut chars = collapsed.chars();
    let preview: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", preview)
    } else {
        preview
    }
}

/// Deterministic line-per-field text rendering: `Key: value` per line,
/// keys capitalised, in the given order.
pub fn render_fields(title: &str, fields: &[(&str, String)]) -> String {
    let mut out = String::new();
    if !title.is_empty() {
        out.push_str(title);
        out.push('\n');
    }
    for (key, value) in fields {
        out.push_str(&format!("{}: {}\n", capitalize(key), value));
    }
    out
}

/// Upper-case the first character and lower-case the rest.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Capitalise every whitespace-separated word.
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format a float the way the history files show it: no trailing `.0` noise
/// beyond what the value needs.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

fn grid_rule(widths: &[usize], fill: char) -> String {
    let mut line = String::from("+");
    for w in widths {
        line.push_str(&fill.to_string().repeat(w + 2));
        line.push('+');
    }
    line
}

fn grid_row(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::from("|");
    for (cell, w) in cells.iter().zip(widths) {
        let pad = w.saturating_sub(cell.chars().count());
        line.push_str(&format!(" {}{} |", cell, " ".repeat(pad)));
    }
    line
}

/// Bordered table: header, `=` rule, then rows separated by `-` rules.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let mut out = vec![
        grid_rule(&widths, '-'),
        grid_row(&header_cells, &widths),
        grid_rule(&widths, '='),
    ];
    for row in rows {
        out.push(grid_row(row, &widths));
        out.push(grid_rule(&widths, '-'));
    }
    if rows.is_empty() {
        out.pop();
        out.push(grid_rule(&widths, '-'));
    }
    out.join("\n")
}
