// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use thiserror::Error;

/// A filter submission that cannot be applied. Raised by the filter panel
/// before the evaluator runs; the previously applied filter stays in place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{label} is required -- fill it in and apply again")]
    MissingRequired { label: &'static str },
    #[error("{label} needs both a start and an end date")]
    IncompleteRange { label: &'static str },
    #[error("{label} {value:?} is not a valid date (expected YYYY-MM-DD)")]
    InvalidDate { label: &'static str, value: String },
    #[error("{label} end date must be on/after start date")]
    InvertedRange { label: &'static str },
    #[error("{label} {value:?} is not one of: {choices}")]
    UnknownChoice {
        label: &'static str,
        value: String,
        choices: String,
    },
}

/// Failure reported by the data-source collaborator. Distinct from an empty
/// result, which is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataAccessError {
    #[error("data source unavailable: {0}")]
    Unavailable(String),
    #[error("not authorized to read {report}")]
    Unauthorized { report: &'static str },
    #[error("record {record_id} in {report} could not be decoded: {reason}")]
    Decode {
        report: &'static str,
        record_id: String,
        reason: String,
    },
}
