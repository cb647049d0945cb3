use crate::spreadsheet::cell::Cell;

/// One worksheet read into memory.
/// Cells are kept in the row-major order the worksheet stores them in, together with
/// the bounds of the area they cover.
#[derive(Debug)]
pub struct Sheet {
    /// Source file name
    pub(crate) file_name: String,
    /// Sheet name
    pub(crate) name: String,
    /// All non-empty cells, row-major
    pub(crate) cells: Vec<Cell>,
    pub(crate) row_lower_bound: Option<usize>,
    pub(crate) row_upper_bound: Option<usize>,
    pub(crate) col_lower_bound: Option<usize>,
    pub(crate) col_upper_bound: Option<usize>,
}

impl Sheet {
    pub(crate) fn new(file_name: &str, name: &str) -> Self {
        Self {
            file_name: file_name.to_owned(),
            name: name.to_owned(),
            cells: Vec::new(),
            row_lower_bound: None,
            row_upper_bound: None,
            col_lower_bound: None,
            col_upper_bound: None,
        }
    }

    /// Adds a cell, widening the sheet bounds as needed.
    /// Cells must arrive in row-major order.
    pub(crate) fn push(&mut self, cell: Cell) {
        if self.row_lower_bound.is_none() {
            self.row_lower_bound = Some(cell.row);
        }
        if self.col_lower_bound.map(|lower| cell.col < lower).unwrap_or(true) {
            self.col_lower_bound = Some(cell.col);
        }
        if self.col_upper_bound.map(|upper| upper < cell.col).unwrap_or(true) {
            self.col_upper_bound = Some(cell.col);
        }
        self.row_upper_bound = Some(cell.row);
        self.cells.push(cell);
    }

    /// Width of the covered area in columns.
    pub(crate) fn width(&self) -> usize {
        match (self.col_lower_bound, self.col_upper_bound) {
            (Some(lower), Some(upper)) => upper - lower + 1,
            _ => 0,
        }
    }

    /// Rows that hold at least one cell, each padded to the sheet width.
    /// Position `i` of a row is column `col_lower_bound + i`; gaps are `None`.
    pub(crate) fn rows(&self) -> Vec<(usize, Vec<Option<&Cell>>)> {
        let (Some(col_lower), width) = (self.col_lower_bound, self.width()) else {
            return Vec::new();
        };
        let mut rows: Vec<(usize, Vec<Option<&Cell>>)> = Vec::new();
        for cell in &self.cells {
            if rows.last().map(|(row, _)| *row != cell.row).unwrap_or(true) {
                rows.push((cell.row, vec![None; width]));
            }
            if let Some((_, record)) = rows.last_mut() {
                record[cell.col - col_lower] = Some(cell);
            }
        }
        rows
    }
}
