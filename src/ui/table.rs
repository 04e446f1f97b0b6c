use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::models::{COLUMNS, RemnantRecord};

/// Widest a text cell may render before it is truncated
/// Image links are always shown in full so they can be checked
const MAX_CELL_WIDTH: usize = 40;

const COLUMN_GAP: &str = "  ";

/// Render records as an aligned text table with a header row
pub fn render_table(records: &[RemnantRecord]) -> String {
    let rows: Vec<[String; 5]> = records
        .iter()
        .map(|r| {
            [
                r.id.to_string(),
                truncate(&r.name, MAX_CELL_WIDTH),
                truncate(&r.material, MAX_CELL_WIDTH),
                truncate(&r.dimensions, MAX_CELL_WIDTH),
                r.image_url.clone(),
            ]
        })
        .collect();

    let mut widths = COLUMNS.map(|c| c.width());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.width());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &COLUMNS.map(str::to_string), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(rule.join(COLUMN_GAP).as_str());
    out.push('\n');
    for row in &rows {
        push_row(&mut out, row, &widths);
    }

    if records.is_empty() {
        out.push_str("(no remnants in stock)\n");
    }

    out
}

fn push_row(out: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths.iter())
        .map(|(cell, width)| pad(cell, *width))
        .collect();
    out.push_str(padded.join(COLUMN_GAP).trim_end());
    out.push('\n');
}

/// Pad with spaces to a display width
fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(fill))
}

/// Cut text to a display width, marking the cut with an ellipsis
fn truncate(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        // reserve one column for the ellipsis
        if used + w > max_width - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}
