//! `RecordStore` over one Google worksheet.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::SheetConfig;
use crate::error::SheetError;
use crate::sheets::client::SheetsClient;
use crate::sheets::{RecordStore, RowHandle, SheetRow, column_letter};

/// Widest column the bots read or write (column K).
const LAST_COLUMN: char = 'K';

pub struct SheetStore {
    client: Arc<SheetsClient>,
    sheet: SheetConfig,
}

impl SheetStore {
    pub fn new(client: Arc<SheetsClient>, sheet: SheetConfig) -> Self {
        Self { client, sheet }
    }

    fn range(&self, cells: &str) -> String {
        format!("'{}'!{cells}", self.sheet.worksheet)
    }
}

#[async_trait]
impl RecordStore for SheetStore {
    async fn rows(&self) -> Result<Vec<SheetRow>, SheetError> {
        let values = self
            .client
            .get_values(&self.sheet.spreadsheet_id, &self.range(&format!("A2:{LAST_COLUMN}")))
            .await?;
        Ok(values
            .into_iter()
            .enumerate()
            .map(|(i, values)| SheetRow {
                row: i as RowHandle + 2,
                values,
            })
            .collect())
    }

    async fn append_row(&self, values: &[String]) -> Result<(), SheetError> {
        self.client
            .append_values(
                &self.sheet.spreadsheet_id,
                &self.range("A1"),
                vec![values.to_vec()],
            )
            .await
    }

    async fn update_row(&self, row: RowHandle, values: &[String]) -> Result<(), SheetError> {
        let end = column_letter(values.len().saturating_sub(1));
        self.client
            .update_values(
                &self.sheet.spreadsheet_id,
                &self.range(&format!("A{row}:{end}{row}")),
                vec![values.to_vec()],
            )
            .await
    }

    async fn update_cell(
        &self,
        row: RowHandle,
        column: &str,
        value: &str,
    ) -> Result<(), SheetError> {
        self.client
            .update_values(
                &self.sheet.spreadsheet_id,
                &self.range(&format!("{column}{row}")),
                vec![vec![value.to_string()]],
            )
            .await
    }

    async fn delete_row(&self, row: RowHandle) -> Result<(), SheetError> {
        self.client
            .delete_rows(&self.sheet.spreadsheet_id, self.sheet.grid_id, row, 1)
            .await
    }
}
