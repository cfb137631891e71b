//! Plain-text table output.

const COLUMN_GAP: &str = "  ";

/// Lays out a header row and data rows as left-aligned, space-padded text.
pub fn format_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            let len = cell.chars().count();
            match widths.get_mut(i) {
                Some(w) => *w = (*w).max(len),
                None => widths.push(len),
            }
        }
    }

    let mut out = String::new();
    push_line(&mut out, headers, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);
    for row in rows {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    out.push_str(line.join(COLUMN_GAP).trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_format_table_pads_columns() {
        let headers = strings(&["id", "name"]);
        let rows = vec![strings(&["1", "Fractions"]), strings(&["12", "Ratios"])];
        let text = format_table(&headers, &rows);
        assert_eq!(
            text,
            "id  name\n--  ---------\n1   Fractions\n12  Ratios\n"
        );
    }

    #[test]
    fn test_format_table_without_rows() {
        let text = format_table(&strings(&["id"]), &[]);
        assert_eq!(text, "id\n--\n");
    }
}
