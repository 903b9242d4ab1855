//! In-memory `RecordStore` for tests and local development.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::SheetError;
use crate::sheets::{RecordStore, RowHandle, SheetRow};

/// Vec-backed store. Index 0 corresponds to sheet row 2.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<Vec<String>>>,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<Vec<String>>) -> Self {
        Self {
            rows: Mutex::new(rows),
            failing: AtomicBool::new(false),
        }
    }

    /// When set, every operation fails with a network-class error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    fn check(&self) -> Result<(), SheetError> {
        if self.failing.load(Ordering::Relaxed) {
            return Err(SheetError::Http("injected failure".into()));
        }
        Ok(())
    }

    /// Snapshot of the raw row data, for assertions.
    pub async fn dump(&self) -> Vec<Vec<String>> {
        self.rows.lock().await.clone()
    }
}

fn column_index(column: &str) -> Result<usize, SheetError> {
    let c = column.as_bytes().first().copied().unwrap_or(0);
    if column.len() == 1 && c.is_ascii_uppercase() {
        Ok((c - b'A') as usize)
    } else {
        Err(SheetError::MalformedResponse(format!(
            "bad column reference: {column}"
        )))
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn rows(&self) -> Result<Vec<SheetRow>, SheetError> {
        self.check()?;
        let rows = self.rows.lock().await;
        Ok(rows
            .iter()
            .enumerate()
            .map(|(i, values)| SheetRow {
                row: i as RowHandle + 2,
                values: values.clone(),
            })
            .collect())
    }

    async fn append_row(&self, values: &[String]) -> Result<(), SheetError> {
        self.check()?;
        self.rows.lock().await.push(values.to_vec());
        Ok(())
    }

    async fn update_row(&self, row: RowHandle, values: &[String]) -> Result<(), SheetError> {
        self.check()?;
        let mut rows = self.rows.lock().await;
        let index = row
            .checked_sub(2)
            .map(|i| i as usize)
            .filter(|i| *i < rows.len())
            .ok_or(SheetError::RowNotFound(row))?;
        rows[index] = values.to_vec();
        Ok(())
    }

    async fn update_cell(
        &self,
        row: RowHandle,
        column: &str,
        value: &str,
    ) -> Result<(), SheetError> {
        self.check()?;
        let col = column_index(column)?;
        let mut rows = self.rows.lock().await;
        let index = row
            .checked_sub(2)
            .map(|i| i as usize)
            .filter(|i| *i < rows.len())
            .ok_or(SheetError::RowNotFound(row))?;
        let target = &mut rows[index];
        if target.len() <= col {
            target.resize(col + 1, String::new());
        }
        target[col] = value.to_string();
        Ok(())
    }

    async fn delete_row(&self, row: RowHandle) -> Result<(), SheetError> {
        self.check()?;
        let mut rows = self.rows.lock().await;
        let index = row
            .checked_sub(2)
            .map(|i| i as usize)
            .filter(|i| *i < rows.len())
            .ok_or(SheetError::RowNotFound(row))?;
        rows.remove(index);
        Ok(())
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn rows_are_numbered_from_two() {
        let store = MemoryStore::with_rows(vec![row(&["a"]), row(&["b"])]);
        let rows = store.rows().await.unwrap();
        assert_eq!(rows[0].row, 2);
        assert_eq!(rows[1].row, 3);
    }

    #[tokio::test]
    async fn append_adds_to_the_end() {
        let store = MemoryStore::new();
        store.append_row(&row(&["1", "x"])).await.unwrap();
        store.append_row(&row(&["2", "y"])).await.unwrap();
        let rows = store.rows().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].values, row(&["2", "y"]));
    }

    #[tokio::test]
    async fn update_cell_extends_short_rows() {
        let store = MemoryStore::with_rows(vec![row(&["1"])]);
        store.update_cell(2, "E", "0911").await.unwrap();
        let rows = store.dump().await;
        assert_eq!(rows[0], row(&["1", "", "", "", "0911"]));
    }

    #[tokio::test]
    async fn update_cell_rejects_bad_column() {
        let store = MemoryStore::with_rows(vec![row(&["1"])]);
        assert!(store.update_cell(2, "AA", "x").await.is_err());
        assert!(store.update_cell(2, "a", "x").await.is_err());
    }

    #[tokio::test]
    async fn delete_shifts_rows_up() {
        let store = MemoryStore::with_rows(vec![row(&["1"]), row(&["2"]), row(&["3"])]);
        store.delete_row(2).await.unwrap();
        let rows = store.rows().await.unwrap();
        assert_eq!(rows.len(), 2);
        // The row that was at sheet row 3 now answers to handle 2.
        assert_eq!(rows[0].row, 2);
        assert_eq!(rows[0].values, row(&["2"]));
    }

    #[tokio::test]
    async fn missing_rows_are_reported() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.update_row(2, &row(&["x"])).await,
            Err(SheetError::RowNotFound(2))
        ));
        assert!(store.delete_row(5).await.is_err());
        assert!(store.update_cell(1, "A", "x").await.is_err());
    }

    #[tokio::test]
    async fn injected_failures_surface_as_network_errors() {
        let store = MemoryStore::with_rows(vec![row(&["1"])]);
        store.set_failing(true);
        let err = store.rows().await.unwrap_err();
        assert!(err.is_network());
        store.set_failing(false);
        assert!(store.rows().await.is_ok());
    }
}
