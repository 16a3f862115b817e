//! Aligned two-or-more column listings.

use console::measure_text_width;

/// A borderless table used for summaries.
///
/// Cells are padded by display width, so status icons and styled text line
/// up in a terminal.
#[derive(Debug, Default)]
pub struct Table {
    rows: Vec<Vec<String>>,
    widths: Vec<usize>,
}

impl Table {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row.
    pub fn add_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row: Vec<String> = cells.into_iter().map(Into::into).collect();
        for (i, cell) in row.iter().enumerate() {
            let width = measure_text_width(cell);
            match self.widths.get_mut(i) {
                Some(w) => *w = (*w).max(width),
                None => self.widths.push(width),
            }
        }
        self.rows.push(row);
    }

    /// Render each row as one line with the given indent.
    ///
    /// The last cell of a row is never padded.
    pub fn render_lines(&self, indent: usize) -> Vec<String> {
        let pad = " ".repeat(indent);
        self.rows
            .iter()
            .map(|row| {
                let mut line = pad.clone();
                for (i, cell) in row.iter().enumerate() {
                    line.push_str(cell);
                    if i + 1 < row.len() {
                        let fill = self.widths[i] - measure_text_width(cell);
                        line.push_str(&" ".repeat(fill + 2));
                    }
                }
                line
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_table_renders_nothing() {
        let table = Table::new();
        assert!(table.render_lines(2).is_empty());
    }

    #[test]
    fn columns_align_on_widest_cell() {
        let mut table = Table::new();
        table.add_row(["create", ".env.example"]);
        table.add_row(["unchanged", "autoblitz-backend/requirements.txt"]);

        let lines = table.render_lines(0);
        assert_eq!(lines[0], "create     .env.example");
        assert_eq!(lines[1], "unchanged  autoblitz-backend/requirements.txt");
    }

    #[test]
    fn indent_prefixes_every_line() {
        let mut table = Table::new();
        table.add_row(["a", "b"]);
        table.add_row(["c", "d"]);

        let lines = table.render_lines(4);
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.starts_with("    ")));
    }

    #[test]
    fn short_rows_are_allowed() {
        let mut table = Table::new();
        table.add_row(["only"]);
        table.add_row(["two", "cells"]);

        let lines = table.render_lines(0);
        assert_eq!(lines[0], "only");
        assert_eq!(lines[1], "two   cells");
    }

    #[test]
    fn width_ignores_unicode_byte_length() {
        let mut table = Table::new();
        table.add_row(["✓", "x"]);
        table.add_row(["ab", "y"]);

        let lines = table.render_lines(0);
        assert_eq!(lines[0], "✓   x");
        assert_eq!(lines[1], "ab  y");
    }
}
