//! Spreadsheet-backed record storage.
//!
//! `RecordStore` is the narrow interface the rest of the service talks to;
//! `SheetStore` implements it over the Sheets REST API and `MemoryStore`
//! implements it in memory for tests and local runs.

pub mod client;
pub mod memory;
pub mod store;

use async_trait::async_trait;

use crate::error::SheetError;

pub use client::SheetsClient;
pub use memory::MemoryStore;
pub use store::SheetStore;

/// 1-based sheet row number. Data rows start at 2, row 1 is the header.
pub type RowHandle = u32;

/// One data row with its position in the sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    pub row: RowHandle,
    pub values: Vec<String>,
}

impl SheetRow {
    /// Cell value by 0-based column index, empty when the row is short.
    pub fn cell(&self, index: usize) -> &str {
        self.values.get(index).map(String::as_str).unwrap_or("")
    }
}

/// Row-oriented storage over one worksheet.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All data rows in sheet order.
    async fn rows(&self) -> Result<Vec<SheetRow>, SheetError>;

    /// Appends one row after the current table.
    async fn append_row(&self, values: &[String]) -> Result<(), SheetError>;

    /// Overwrites a row starting at column A.
    async fn update_row(&self, row: RowHandle, values: &[String]) -> Result<(), SheetError>;

    /// Writes a single cell, addressed by column letter.
    async fn update_cell(&self, row: RowHandle, column: &str, value: &str)
    -> Result<(), SheetError>;

    /// Removes a row entirely. Rows below shift up.
    async fn delete_row(&self, row: RowHandle) -> Result<(), SheetError>;
}

/// Column letter for a 0-based index (A..Z only, which covers our sheets).
pub(crate) fn column_letter(index: usize) -> char {
    (b'A' + (index as u8).min(25)) as char
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_reads_present_and_missing_columns() {
        let row = SheetRow {
            row: 2,
            values: vec!["1".into(), "two".into()],
        };
        assert_eq!(row.cell(0), "1");
        assert_eq!(row.cell(1), "two");
        assert_eq!(row.cell(5), "");
    }

    #[test]
    fn column_letters() {
        assert_eq!(column_letter(0), 'A');
        assert_eq!(column_letter(10), 'K');
        assert_eq!(column_letter(25), 'Z');
    }
}
