//! Plain-text rendering of the pooled table for terminal output.

use crate::table::PooledTable;

const LABEL_WIDTH: usize = 44;
const CELL_WIDTH: usize = 22;

/// Render the pooled table as an aligned text block
///
/// Long labels are truncated from the left so the distinguishing suffix
/// (e.g. `(mean ± SD)`) stays visible.
pub fn generate_text_summary(pooled: &PooledTable, site_count: usize) -> String {
    let table = pooled.to_table();
    let mut lines = Vec::new();

    lines.push(format!(
        "  POOLED TABLE 1 ({} sites, {} variables)",
        site_count,
        table.rows.len()
    ));

    let rule = format!(
        "  {}",
        "━".repeat(LABEL_WIDTH + 3 + table.columns.len() * (CELL_WIDTH + 3))
    );

    let mut header = format!("  {:<width$} ┃", "Variable", width = LABEL_WIDTH);
    for column in &table.columns {
        header.push_str(&format!(" {:^width$} ┃", column, width = CELL_WIDTH));
    }
    lines.push(rule.clone());
    lines.push(header);
    lines.push(rule.clone());

    for row in &table.rows {
        let mut line = format!("  {:<width$} ┃", truncate_label(&row.label), width = LABEL_WIDTH);
        for cell in &row.cells {
            line.push_str(&format!(" {:>width$} ┃", cell, width = CELL_WIDTH));
        }
        lines.push(line);
    }
    lines.push(rule);

    let suppressed = pooled.suppressed_cells();
    if suppressed > 0 {
        lines.push(format!(
            "  ⚠ {} site cells carried the small-cell suppression token and were left out of pooling",
            suppressed
        ));
    }

    lines.join("\n")
}

fn truncate_label(label: &str) -> String {
    let chars: Vec<char> = label.chars().collect();
    if chars.len() <= LABEL_WIDTH {
        return label.to_string();
    }
    let tail: String = chars[chars.len() - (LABEL_WIDTH - 3)..].iter().collect();
    format!("...{}", tail)
}
