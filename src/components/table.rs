// Full data table - the filtered rows with readable headers and formatting

use super::format::{currency, thousands};
use crate::query::RecordSet;
use crate::record::{display_name, GrantRecord, NumericField, COLUMNS};
use serde::Serialize;

pub const PAGE_SIZE: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableColumn {
    pub id: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataTable {
    pub columns: Vec<TableColumn>,
    /// One formatted cell per column, in column order
    pub rows: Vec<Vec<String>>,
    pub page_size: usize,
}

impl DataTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn cell(record: &GrantRecord, column: &str) -> String {
    match column {
        "year" => record.year.to_string(),
        "state_name" => record.state_name.clone(),
        "line_num" => record.line_num.map(|n| n.to_string()).unwrap_or_default(),
        "service_category" => record.service_category.clone(),
        other => NumericField::ALL
            .iter()
            .find(|f| f.column() == other)
            .map(|f| {
                let v = record.value(*f);
                if f.is_currency() {
                    currency(v)
                } else {
                    thousands(v)
                }
            })
            .unwrap_or_default(),
    }
}

pub fn data_table(records: &RecordSet<'_>) -> DataTable {
    DataTable {
        columns: COLUMNS
            .iter()
            .map(|&id| TableColumn {
                id,
                name: display_name(id),
            })
            .collect(),
        rows: records
            .iter()
            .map(|r| COLUMNS.iter().map(|c| cell(r, c)).collect())
            .collect(),
        page_size: PAGE_SIZE,
    }
}
