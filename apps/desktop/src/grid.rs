use report_model::Table;

/// The operations the editor needs from a spreadsheet-like grid control.
///
/// Rows and columns are addressed by zero-based position.
pub trait GridWidget {
    fn number_rows(&self) -> usize;
    fn number_cols(&self) -> usize;
    fn delete_rows(&mut self, pos: usize, num: usize);
    fn delete_cols(&mut self, pos: usize, num: usize);
    fn append_rows(&mut self, num: usize);
    fn append_cols(&mut self, num: usize);
    fn set_col_label(&mut self, col: usize, label: &str);
    fn set_cell_value(&mut self, row: usize, col: usize, value: &str);
    fn auto_size_columns(&mut self) {}
}

/// Mirror `table` into `grid`, discarding whatever the grid showed before.
pub fn populate_grid_from_table<G: GridWidget + ?Sized>(grid: &mut G, table: &Table) {
    let existing_cols = grid.number_cols();
    if existing_cols > 0 {
        grid.delete_cols(0, existing_cols);
    }
    let existing_rows = grid.number_rows();
    if existing_rows > 0 {
        grid.delete_rows(0, existing_rows);
    }

    if table.column_count() == 0 {
        return;
    }

    grid.append_cols(table.column_count());
    grid.append_rows(table.row_count());

    for (col, name) in table.columns().iter().enumerate() {
        grid.set_col_label(col, name);
    }
    for (row, values) in table.rows().iter().enumerate() {
        for (col, value) in values.iter().enumerate() {
            grid.set_cell_value(row, col, value);
        }
    }

    grid.auto_size_columns();
}

/// A grid that renders as a plain-text table.
#[derive(Clone, Debug, Default)]
pub struct TextGrid {
    labels: Vec<String>,
    cells: Vec<Vec<String>>,
    widths: Vec<usize>,
}

impl TextGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(&self, col: usize) -> Option<&str> {
        self.labels.get(col).map(String::as_str)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.cells.get(row)?.get(col).map(String::as_str)
    }

    /// Render with a 1-based row-number gutter, e.g.
    ///
    /// ```text
    ///   | Name | Role
    /// --+------+-----
    /// 1 | Ann  | Eng
    /// ```
    pub fn render(&self) -> String {
        if self.labels.is_empty() {
            return "(empty)\n".to_string();
        }

        let gutter = self.cells.len().to_string().len();
        let width = |col: usize, text: &str| {
            self.widths
                .get(col)
                .copied()
                .unwrap_or(0)
                .max(text.chars().count())
        };

        let mut out = String::new();
        let mut header = format!("{:gutter$}", "");
        let mut rule = "-".repeat(gutter);
        for (col, label) in self.labels.iter().enumerate() {
            let w = width(col, label);
            header.push_str(&format!(" | {label:<w$}"));
            rule.push_str(&format!("-+-{}", "-".repeat(w)));
        }
        out.push_str(header.trim_end());
        out.push('\n');
        out.push_str(&rule);
        out.push('\n');

        for (row, values) in self.cells.iter().enumerate() {
            let mut line = format!("{:>gutter$}", row + 1);
            for (col, value) in values.iter().enumerate() {
                let w = width(col, value);
                line.push_str(&format!(" | {value:<w$}"));
            }
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }
}

impl GridWidget for TextGrid {
    fn number_rows(&self) -> usize {
        self.cells.len()
    }

    fn number_cols(&self) -> usize {
        self.labels.len()
    }

    fn delete_rows(&mut self, pos: usize, num: usize) {
        let end = (pos + num).min(self.cells.len());
        if pos < end {
            self.cells.drain(pos..end);
        }
    }

    fn delete_cols(&mut self, pos: usize, num: usize) {
        let end = (pos + num).min(self.labels.len());
        if pos >= end {
            return;
        }
        self.labels.drain(pos..end);
        self.widths.drain(pos..end);
        for row in &mut self.cells {
            let row_end = end.min(row.len());
            if pos < row_end {
                row.drain(pos..row_end);
            }
        }
    }

    fn append_rows(&mut self, num: usize) {
        let cols = self.labels.len();
        self.cells
            .extend(std::iter::repeat_with(|| vec![String::new(); cols]).take(num));
    }

    fn append_cols(&mut self, num: usize) {
        self.labels.extend(std::iter::repeat(String::new()).take(num));
        self.widths.extend(std::iter::repeat(0).take(num));
        for row in &mut self.cells {
            row.extend(std::iter::repeat(String::new()).take(num));
        }
    }

    fn set_col_label(&mut self, col: usize, label: &str) {
        if let Some(slot) = self.labels.get_mut(col) {
            *slot = label.to_string();
        }
    }

    fn set_cell_value(&mut self, row: usize, col: usize, value: &str) {
        if let Some(slot) = self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            *slot = value.to_string();
        }
    }

    fn auto_size_columns(&mut self) {
        for (col, width) in self.widths.iter_mut().enumerate() {
            let label = self.labels[col].chars().count();
            let widest_cell = self
                .cells
                .iter()
                .filter_map(|row| row.get(col))
                .map(|v| v.chars().count())
                .max()
                .unwrap_or(0);
            *width = label.max(widest_cell);
        }
    }
}
