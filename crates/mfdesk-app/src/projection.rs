// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::columns::{Cell, ColumnDescriptor};
use crate::model::Record;

pub fn header(columns: &[ColumnDescriptor]) -> Vec<&'static str> {
    columns.iter().map(|column| column.label).collect()
}

pub fn project_row(record: &Record, columns: &[ColumnDescriptor]) -> Vec<Cell> {
    columns.iter().map(|column| column.cell(record)).collect()
}

/// One row per record, one cell per column, in the order given.
pub fn project<'a, I>(records: I, columns: &[ColumnDescriptor]) -> Vec<Vec<Cell>>
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .map(|record| project_row(record, columns))
        .collect()
}
