// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod columns;
pub mod error;
pub mod filters;
pub mod ids;
pub mod model;
pub mod panel;
pub mod projection;
pub mod reports;
pub mod state;
pub mod summary;
pub mod table;
pub mod validation;

pub use columns::{Cell, ColumnDescriptor, describe_columns};
pub use error::{DataAccessError, ValidationError};
pub use filters::{FilterFieldSpec, FilterOptions, FilterSchema, FilterValue, apply_filters};
pub use ids::*;
pub use model::*;
pub use panel::{FilterPanel, PanelCommand, PanelEvent, PanelPart, PanelRow, PanelVisibility};
pub use reports::{ReportDefinition, definition};
pub use state::*;
pub use summary::{Summary, SummaryBucket, SummarySpec, summarize, summarize_spec};
pub use table::{FilterableTable, SortOutcome, SortSpec};
