// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::cmp::Ordering;

use tracing::debug;

use crate::columns::{Cell, ColumnDescriptor};
use crate::error::DataAccessError;
use crate::filters::{FilterOptions, FilterSchema, matching_indices};
use crate::model::{Record, ReportKind, SortDirection, SummaryScope};
use crate::projection::{header, project};
use crate::reports::{ReportDefinition, definition};
use crate::summary::{Summary, summarize_spec};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: usize,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOutcome {
    Unavailable,
    Asc(&'static str),
    Desc(&'static str),
    Cleared,
}

/// A report's record collection plus the applied filter and sort. The
/// visible set is recomputed from scratch whenever records, filter, or sort
/// change.
#[derive(Debug, Clone)]
pub struct FilterableTable {
    definition: &'static ReportDefinition,
    records: Vec<Record>,
    applied: FilterOptions,
    visible: Vec<usize>,
    sorts: Vec<SortSpec>,
    load_error: Option<DataAccessError>,
}

impl FilterableTable {
    pub fn new(kind: ReportKind) -> Self {
        let definition = definition(kind);
        debug_assert!(definition.check().is_ok(), "{kind:?} definition");
        Self {
            definition,
            records: Vec::new(),
            applied: FilterOptions::new(),
            visible: Vec::new(),
            sorts: Vec::new(),
            load_error: None,
        }
    }

    pub fn kind(&self) -> ReportKind {
        self.definition.kind
    }

    pub fn definition(&self) -> &'static ReportDefinition {
        self.definition
    }

    pub fn columns(&self) -> &'static [ColumnDescriptor] {
        self.definition.columns
    }

    pub fn schema(&self) -> FilterSchema {
        self.definition.filters
    }

    pub fn header(&self) -> Vec<&'static str> {
        header(self.columns())
    }

    /// Replaces the collection wholesale, keeping the applied filter.
    pub fn replace_records(&mut self, records: Vec<Record>) {
        self.records = records;
        self.load_error = None;
        self.recompute();
    }

    /// Records a failed fetch. The last good collection stays visible.
    pub fn record_load_failure(&mut self, error: DataAccessError) {
        self.load_error = Some(error);
    }

    pub fn load(&mut self, result: Result<Vec<Record>, DataAccessError>) {
        match result {
            Ok(records) => self.replace_records(records),
            Err(error) => self.record_load_failure(error),
        }
    }

    pub fn load_error(&self) -> Option<&DataAccessError> {
        self.load_error.as_ref()
    }

    /// Applies a filter set and returns how many records match.
    pub fn apply(&mut self, options: FilterOptions) -> usize {
        self.applied = options;
        self.recompute();
        debug!(
            report = self.kind().as_str(),
            filters = %self.applied.describe(),
            matched = self.visible.len(),
            total = self.records.len(),
            "applied filters"
        );
        self.visible.len()
    }

    pub fn clear_filters(&mut self) {
        self.apply(FilterOptions::new());
    }

    pub fn applied(&self) -> &FilterOptions {
        &self.applied
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn visible_records(&self) -> impl Iterator<Item = &Record> + '_ {
        self.visible.iter().filter_map(|index| self.records.get(*index))
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn total_len(&self) -> usize {
        self.records.len()
    }

    pub fn record_at(&self, row: usize) -> Option<&Record> {
        self.visible
            .get(row)
            .and_then(|index| self.records.get(*index))
    }

    pub fn rows(&self) -> Vec<Vec<Cell>> {
        project(self.visible_records(), self.columns())
    }

    pub fn summarize_all(&self) -> Summary {
        summarize_spec(&self.records, &self.definition.summary)
    }

    pub fn summarize_filtered(&self) -> Summary {
        summarize_spec(self.visible_records(), &self.definition.summary)
    }

    pub fn summarize(&self, scope: SummaryScope) -> Summary {
        match scope {
            SummaryScope::Filtered => self.summarize_filtered(),
            SummaryScope::All => self.summarize_all(),
        }
    }

    pub fn count_label(&self) -> String {
        match self.visible.len() {
            1 => "1 record found".to_owned(),
            count => format!("{count} records found"),
        }
    }

    pub fn sorts(&self) -> &[SortSpec] {
        &self.sorts
    }

    /// Cycles a column through asc, desc, and off. Later columns break ties
    /// left by earlier ones.
    pub fn cycle_sort(&mut self, column: usize) -> SortOutcome {
        let Some(descriptor) = self.columns().get(column) else {
            return SortOutcome::Unavailable;
        };
        if !descriptor.sortable {
            return SortOutcome::Unavailable;
        }
        let label = descriptor.label;

        if let Some(index) = self.sorts.iter().position(|sort| sort.column == column) {
            match self.sorts[index].direction {
                SortDirection::Asc => self.sorts[index].direction = SortDirection::Desc,
                SortDirection::Desc => {
                    self.sorts.remove(index);
                }
            }
        } else {
            self.sorts.push(SortSpec {
                column,
                direction: SortDirection::Asc,
            });
        }
        self.recompute();

        match self
            .sorts
            .iter()
            .find(|sort| sort.column == column)
            .map(|sort| sort.direction)
        {
            Some(SortDirection::Asc) => SortOutcome::Asc(label),
            Some(SortDirection::Desc) => SortOutcome::Desc(label),
            None => SortOutcome::Cleared,
        }
    }

    pub fn clear_sorts(&mut self) {
        self.sorts.clear();
        self.recompute();
    }

    fn recompute(&mut self) {
        let mut visible = matching_indices(&self.records, &self.applied);
        if !self.sorts.is_empty() {
            let columns = self.columns();
            let records = &self.records;
            visible.sort_by(|left, right| {
                compare_records(&records[*left], &records[*right], columns, &self.sorts)
            });
        }
        self.visible = visible;
    }
}

/// Blank values sort last in either direction; the record id breaks ties.
fn compare_records(
    left: &Record,
    right: &Record,
    columns: &[ColumnDescriptor],
    sorts: &[SortSpec],
) -> Ordering {
    for sort in sorts {
        let Some(column) = columns.get(sort.column) else {
            continue;
        };
        let left_value = left.get(column.key);
        let right_value = right.get(column.key);
        match (left_value.is_empty(), right_value.is_empty()) {
            (true, true) => continue,
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            (false, false) => {}
        }
        let order = match sort.direction {
            SortDirection::Asc => column.compare_values(left_value, right_value),
            SortDirection::Desc => column.compare_values(left_value, right_value).reverse(),
        };
        if order != Ordering::Equal {
            return order;
        }
    }
    left.id.cmp(&right.id)
}
