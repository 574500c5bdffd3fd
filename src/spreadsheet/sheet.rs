use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::cell::CellValue;
use std::collections::BTreeMap;

static EMPTY: CellValue = CellValue::Empty;

/// One worksheet row, cells keyed by 1-based column.
#[derive(Clone, Debug, Default)]
pub struct Row {
    pub index: usize,
    cells: BTreeMap<usize, Cell>,
}

impl Row {
    pub fn cell(&self, col: usize) -> Option<&Cell> {
        self.cells.get(&col)
    }

    /// Value at `col`, `Empty` for a missing cell.
    pub fn value(&self, col: usize) -> &CellValue {
        self.cells.get(&col).map(|cell| &cell.value).unwrap_or(&EMPTY)
    }

    /// Raw ARGB fill of the cell at `col`.
    pub fn fill(&self, col: usize) -> Option<&str> {
        self.cells.get(&col).and_then(|cell| cell.fill.as_deref())
    }
}

/// A fully loaded worksheet. Only cells carrying a value or a style are stored.
#[derive(Clone, Debug, Default)]
pub struct Sheet {
    /// Source file name
    pub file_name: String,
    /// Sheet name
    pub name: String,
    rows: BTreeMap<usize, Row>,
}

impl Sheet {
    pub(crate) fn new(file_name: &str, name: &str) -> Self {
        Self {
            file_name: file_name.to_owned(),
            name: name.to_owned(),
            rows: BTreeMap::new(),
        }
    }

    /// Adds a cell. A later cell at the same position replaces the earlier one.
    pub(crate) fn push(&mut self, cell: Cell) {
        let row = self.rows.entry(cell.row).or_insert_with(|| Row {
            index: cell.row,
            cells: BTreeMap::new(),
        });
        row.cells.insert(cell.col, cell);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(&index)
    }

    /// Rows in ascending order.
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.values()
    }

    /// Highest used row index, 0 for an empty sheet.
    pub fn max_row(&self) -> usize {
        self.rows.keys().next_back().copied().unwrap_or(0)
    }

    pub fn max_col(&self) -> usize {
        self.rows
            .values()
            .filter_map(|row| row.cells.keys().next_back().copied())
            .max()
            .unwrap_or(0)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(&row).and_then(|row| row.cell(col))
    }

    pub fn fill(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(&row).and_then(|row| row.fill(col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push(sheet: &mut Sheet, row: usize, col: usize, value: CellValue) {
        sheet.push(Cell {
            row,
            col,
            value,
            fill: None,
        });
    }

    #[test]
    fn sheet_initial() {
        let sheet = Sheet::new("", "");

        assert!(sheet.is_empty());
        assert_eq!(sheet.max_row(), 0);
        assert_eq!(sheet.max_col(), 0);
    }

    #[test]
    fn sheet_update() {
        let mut sheet = Sheet::new("book.xlsx", "Projects");
        push(&mut sheet, 3, 1, CellValue::Text("c".to_owned()));
        push(&mut sheet, 1, 3, CellValue::Number(1.0));
        push(&mut sheet, 1, 1, CellValue::Text("a".to_owned()));
        push(&mut sheet, 3, 2, CellValue::Bool(true));

        assert_eq!(sheet.max_row(), 3);
        assert_eq!(sheet.max_col(), 3);
        assert_eq!(sheet.rows().map(|row| row.index).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(sheet.row(1).unwrap().value(3), &CellValue::Number(1.0));
        assert_eq!(sheet.row(1).unwrap().value(2), &CellValue::Empty);
        assert!(sheet.row(2).is_none());
        assert_eq!(sheet.cell(3, 2).unwrap().reference(), "B3");
    }

    #[test]
    fn sheet_replace_cell() {
        let mut sheet = Sheet::new("", "");
        push(&mut sheet, 2, 1, CellValue::Text("old".to_owned()));
        push(&mut sheet, 2, 1, CellValue::Text("new".to_owned()));

        assert_eq!(sheet.max_col(), 1);
        assert_eq!(sheet.row(2).unwrap().value(1).as_text(), Some("new"));
    }
}
