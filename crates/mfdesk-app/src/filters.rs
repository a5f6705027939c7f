// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ValidationError;
use crate::model::{Record, Value};
use crate::validation::parse_iso_date;

/// One filter input, keyed by the record field it constrains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterFieldSpec {
    Substring {
        field: &'static str,
        label: &'static str,
    },
    Exact {
        field: &'static str,
        label: &'static str,
        choices: &'static [&'static str],
    },
    DateRange {
        field: &'static str,
        label: &'static str,
    },
    Flag {
        field: &'static str,
        label: &'static str,
    },
}

impl FilterFieldSpec {
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Substring { field, .. }
            | Self::Exact { field, .. }
            | Self::DateRange { field, .. }
            | Self::Flag { field, .. } => field,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Substring { label, .. }
            | Self::Exact { label, .. }
            | Self::DateRange { label, .. }
            | Self::Flag { label, .. } => label,
        }
    }

    pub const fn choices(&self) -> &'static [&'static str] {
        match self {
            Self::Exact { choices, .. } => choices,
            _ => &[],
        }
    }

    /// The value a freshly opened panel shows for this input.
    pub fn blank(&self) -> FilterValue {
        match self {
            Self::Substring { .. } => FilterValue::Contains(String::new()),
            Self::Exact { .. } => FilterValue::Equals(String::new()),
            Self::DateRange { .. } => FilterValue::Between {
                from: String::new(),
                to: String::new(),
            },
            Self::Flag { .. } => FilterValue::Flag(None),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSchema {
    pub fields: &'static [FilterFieldSpec],
    /// Record fields that must carry an active predicate before a
    /// submission is accepted.
    pub required: &'static [&'static str],
}

impl FilterSchema {
    pub fn spec(&self, field: &str) -> Option<&'static FilterFieldSpec> {
        self.fields.iter().find(|spec| spec.field() == field)
    }

    pub fn is_required(&self, field: &str) -> bool {
        self.required.contains(&field)
    }

    /// Checks staged panel values and returns the normalized options to
    /// apply. Entries for fields outside the schema are dropped.
    pub fn validate(&self, staged: &FilterOptions) -> Result<FilterOptions, ValidationError> {
        let mut out = FilterOptions::new();
        for spec in self.fields {
            let field = spec.field();
            let label = spec.label();
            let required = self.is_required(field);
            let staged_value = staged.get(field);

            let normalized = match (spec, staged_value) {
                (FilterFieldSpec::DateRange { .. }, Some(FilterValue::Between { from, to })) => {
                    validate_range(label, from.trim(), to.trim())?
                }
                (FilterFieldSpec::Substring { .. }, Some(FilterValue::Contains(needle))) => {
                    let needle = needle.trim();
                    (!needle.is_empty()).then(|| FilterValue::Contains(needle.to_owned()))
                }
                (FilterFieldSpec::Exact { choices, .. }, Some(FilterValue::Equals(expected))) => {
                    let expected = expected.trim();
                    if expected.is_empty() {
                        None
                    } else if !choices.is_empty() && !choices.contains(&expected) {
                        return Err(ValidationError::UnknownChoice {
                            label,
                            value: expected.to_owned(),
                            choices: choices.join(", "),
                        });
                    } else {
                        Some(FilterValue::Equals(expected.to_owned()))
                    }
                }
                (FilterFieldSpec::Flag { .. }, Some(FilterValue::Flag(Some(flag)))) => {
                    Some(FilterValue::Flag(Some(*flag)))
                }
                _ => None,
            };

            match normalized {
                Some(value) => out.insert(field, value),
                None if required => return Err(ValidationError::MissingRequired { label }),
                None => {}
            }
        }
        Ok(out)
    }
}

fn validate_range(
    label: &'static str,
    from: &str,
    to: &str,
) -> Result<Option<FilterValue>, ValidationError> {
    match (from.is_empty(), to.is_empty()) {
        (true, true) => return Ok(None),
        (false, false) => {}
        _ => return Err(ValidationError::IncompleteRange { label }),
    }
    let start = parse_iso_date(from).ok_or_else(|| ValidationError::InvalidDate {
        label,
        value: from.to_owned(),
    })?;
    let end = parse_iso_date(to).ok_or_else(|| ValidationError::InvalidDate {
        label,
        value: to.to_owned(),
    })?;
    if end < start {
        return Err(ValidationError::InvertedRange { label });
    }
    Ok(Some(FilterValue::Between {
        from: from.to_owned(),
        to: to.to_owned(),
    }))
}

/// A predicate on a single record field. Blank values are inactive and
/// impose no constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum FilterValue {
    Contains(String),
    Equals(String),
    Flag(Option<bool>),
    /// Inclusive ISO date range. Half-populated ranges are inactive.
    Between { from: String, to: String },
}

impl FilterValue {
    pub fn contains(needle: impl Into<String>) -> Self {
        Self::Contains(needle.into())
    }

    pub fn equals(expected: impl Into<String>) -> Self {
        Self::Equals(expected.into())
    }

    pub fn between(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::Between {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn is_active(&self) -> bool {
        match self {
            Self::Contains(text) | Self::Equals(text) => !text.trim().is_empty(),
            Self::Flag(flag) => flag.is_some(),
            Self::Between { from, to } => !from.trim().is_empty() && !to.trim().is_empty(),
        }
    }

    /// Whether `value` satisfies this predicate. Inactive predicates accept
    /// everything; a missing field never satisfies an active one.
    pub fn matches(&self, value: &Value) -> bool {
        if !self.is_active() {
            return true;
        }
        if value.is_empty() {
            return false;
        }
        match self {
            Self::Contains(needle) => value
                .display()
                .to_lowercase()
                .contains(&needle.trim().to_lowercase()),
            Self::Equals(expected) => value.display() == *expected,
            Self::Flag(flag) => value.as_bool() == *flag,
            Self::Between { from, to } => value
                .as_str()
                .is_some_and(|date| from.trim() <= date && date <= to.trim()),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Contains(needle) => format!("~{needle}"),
            Self::Equals(expected) => format!("={expected}"),
            Self::Flag(Some(true)) => "=yes".to_owned(),
            Self::Flag(Some(false)) => "=no".to_owned(),
            Self::Flag(None) => "=any".to_owned(),
            Self::Between { from, to } => format!("{from}..{to}"),
        }
    }
}

/// The applied (or staged) filter set, keyed by record field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterOptions {
    entries: BTreeMap<String, FilterValue>,
}

impl FilterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &str, value: FilterValue) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: &str, value: FilterValue) {
        self.entries.insert(field.to_owned(), value);
    }

    pub fn get(&self, field: &str) -> Option<&FilterValue> {
        self.entries.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.entries
            .iter()
            .map(|(field, value)| (field.as_str(), value))
    }

    pub fn active(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.iter().filter(|(_, value)| value.is_active())
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    pub fn is_unconstrained(&self) -> bool {
        self.active_count() == 0
    }

    /// Combines two filter sets; `other` wins where both constrain a field.
    pub fn merged(&self, other: &Self) -> Self {
        let mut out = self.clone();
        for (field, value) in other.active() {
            out.insert(field, value.clone());
        }
        out
    }

    pub fn describe(&self) -> String {
        self.active()
            .map(|(field, value)| format!("{field}{}", value.describe()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub fn matches(record: &Record, options: &FilterOptions) -> bool {
    options
        .active()
        .all(|(field, predicate)| predicate.matches(record.get(field)))
}

/// Returns the records satisfying every active predicate, in input order.
pub fn apply_filters(records: &[Record], options: &FilterOptions) -> Vec<Record> {
    records
        .iter()
        .filter(|record| matches(record, options))
        .cloned()
        .collect()
}

pub fn matching_indices(records: &[Record], options: &FilterOptions) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| matches(record, options))
        .map(|(index, _)| index)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        FilterFieldSpec, FilterOptions, FilterSchema, FilterValue, apply_filters,
        matching_indices,
    };
    use crate::error::ValidationError;
    use crate::model::{Record, Value};

    fn collections() -> Vec<Record> {
        vec![
            Record::new("1")
                .with("title", "January Collection Report")
                .with("branch", "Main Branch")
                .with("bc_partner_id", "BCP001")
                .with("collection_type", "cash")
                .with("date", Value::date("2024-01-15")),
            Record::new("2")
                .with("title", "February Collection Report")
                .with("branch", "North Branch")
                .with("bc_partner_id", "BCP002")
                .with("collection_type", "digital")
                .with("date", Value::date("2024-02-15")),
            Record::new("3")
                .with("title", "March Collection Report")
                .with("branch", "South Branch")
                .with("bc_partner_id", "BCP003")
                .with("collection_type", "bank-transfer")
                .with("date", Value::date("2024-03-15")),
        ]
    }

    fn ids(records: &[Record]) -> Vec<&str> {
        records.iter().map(|record| record.id.as_str()).collect()
    }

    const SCHEMA: FilterSchema = FilterSchema {
        fields: &[
            FilterFieldSpec::Substring {
                field: "branch",
                label: "branch",
            },
            FilterFieldSpec::Exact {
                field: "collection_type",
                label: "collection type",
                choices: &["cash", "digital", "bank-transfer"],
            },
            FilterFieldSpec::DateRange {
                field: "date",
                label: "date",
            },
            FilterFieldSpec::Flag {
                field: "queued",
                label: "queued",
            },
        ],
        required: &[],
    };

    #[test]
    fn unconstrained_options_return_input_unchanged() {
        let records = collections();
        assert_eq!(apply_filters(&records, &FilterOptions::new()), records);

        let blank = FilterOptions::new()
            .with("branch", FilterValue::contains("  "))
            .with("date", FilterValue::between("", ""));
        assert_eq!(apply_filters(&records, &blank), records);
    }

    #[test]
    fn substring_is_case_insensitive() {
        let options = FilterOptions::new().with("bc_partner_id", FilterValue::contains("bcp"));
        assert_eq!(ids(&apply_filters(&collections(), &options)), ["1", "2", "3"]);
    }

    #[test]
    fn branch_and_date_range_combine() {
        let options = FilterOptions::new()
            .with("branch", FilterValue::contains("north"))
            .with("date", FilterValue::between("2024-02-01", "2024-02-29"));
        assert_eq!(ids(&apply_filters(&collections(), &options)), ["2"]);
    }

    #[test]
    fn exact_match_is_case_sensitive() {
        let records = collections();
        let cash = FilterOptions::new().with("collection_type", FilterValue::equals("cash"));
        assert_eq!(ids(&apply_filters(&records, &cash)), ["1"]);

        let shouting = FilterOptions::new().with("collection_type", FilterValue::equals("CASH"));
        assert!(apply_filters(&records, &shouting).is_empty());
    }

    #[test]
    fn date_range_bounds_are_inclusive() {
        let options =
            FilterOptions::new().with("date", FilterValue::between("2024-01-15", "2024-02-15"));
        assert_eq!(ids(&apply_filters(&collections(), &options)), ["1", "2"]);
    }

    #[test]
    fn half_populated_range_is_inactive() {
        let options = FilterOptions::new().with("date", FilterValue::between("2024-03-01", ""));
        assert_eq!(apply_filters(&collections(), &options).len(), 3);
    }

    #[test]
    fn missing_field_fails_active_predicate() {
        let mut records = collections();
        records.push(Record::new("4").with("title", "Unassigned"));
        let options = FilterOptions::new().with("branch", FilterValue::contains("branch"));
        assert_eq!(ids(&apply_filters(&records, &options)), ["1", "2", "3"]);
    }

    #[test]
    fn flag_matches_booleans_only() {
        let records = vec![
            Record::new("a").with("queued", true),
            Record::new("b").with("queued", false),
            Record::new("c"),
        ];
        let queued = FilterOptions::new().with("queued", FilterValue::Flag(Some(true)));
        assert_eq!(ids(&apply_filters(&records, &queued)), ["a"]);
        let any = FilterOptions::new().with("queued", FilterValue::Flag(None));
        assert_eq!(apply_filters(&records, &any).len(), 3);
    }

    #[test]
    fn january_window_keeps_both_bounds() {
        let records = (1..=31)
            .map(|day| {
                Record::new(format!("{day}"))
                    .with("date", Value::date(format!("2024-01-{day:02}")))
            })
            .collect::<Vec<_>>();
        let window =
            FilterOptions::new().with("date", FilterValue::between("2024-01-10", "2024-01-20"));
        let matched = apply_filters(&records, &window);
        assert_eq!(matched.len(), 11);
        assert_eq!(matched.first().map(|record| record.id.as_str()), Some("10"));
        assert_eq!(matched.last().map(|record| record.id.as_str()), Some("20"));
    }

    #[test]
    fn combined_options_equal_sequential_application() {
        let records = collections();
        let partners = FilterOptions::new().with("bc_partner_id", FilterValue::contains("bcp"));
        let southern = FilterOptions::new().with("branch", FilterValue::contains("s"));
        let both = partners.merged(&southern);

        let sequential = apply_filters(&apply_filters(&records, &partners), &southern);
        assert_eq!(apply_filters(&records, &both), sequential);
        assert_eq!(matching_indices(&records, &both), [2]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let options = FilterOptions::new().with("branch", FilterValue::contains("branch"));
        let once = apply_filters(&collections(), &options);
        assert_eq!(apply_filters(&once, &options), once);
    }

    #[test]
    fn validate_normalizes_and_drops_blank_inputs() {
        let staged = FilterOptions::new()
            .with("branch", FilterValue::contains("  north "))
            .with("collection_type", FilterValue::equals(""))
            .with("date", FilterValue::between("", ""))
            .with("unknown", FilterValue::contains("x"));
        let applied = SCHEMA.validate(&staged).expect("valid submission");
        assert_eq!(applied, FilterOptions::new().with("branch", FilterValue::contains("north")));
    }

    #[test]
    fn validate_rejects_inverted_and_half_ranges() {
        let inverted =
            FilterOptions::new().with("date", FilterValue::between("2024-03-01", "2024-02-01"));
        assert_eq!(
            SCHEMA.validate(&inverted),
            Err(ValidationError::InvertedRange { label: "date" })
        );

        let half = FilterOptions::new().with("date", FilterValue::between("2024-03-01", ""));
        assert_eq!(
            SCHEMA.validate(&half),
            Err(ValidationError::IncompleteRange { label: "date" })
        );

        let garbage = FilterOptions::new().with("date", FilterValue::between("soon", "2024-02-01"));
        assert!(matches!(
            SCHEMA.validate(&garbage),
            Err(ValidationError::InvalidDate { .. })
        ));
    }

    #[test]
    fn validate_rejects_unknown_choice() {
        let staged = FilterOptions::new().with("collection_type", FilterValue::equals("cheque"));
        let err = SCHEMA.validate(&staged).expect_err("cheque is not offered");
        assert!(err.to_string().contains("cash, digital, bank-transfer"));
    }

    #[test]
    fn validate_enforces_required_fields() {
        let schema = FilterSchema {
            required: &["date"],
            ..SCHEMA
        };
        assert_eq!(
            schema.validate(&FilterOptions::new()),
            Err(ValidationError::MissingRequired { label: "date" })
        );
        let staged = FilterOptions::new().with("date", FilterValue::between("2024-01-01", "2024-01-31"));
        assert!(schema.validate(&staged).is_ok());
    }

    #[test]
    fn attendance_state_then_zone_narrows() {
        let records = vec![
            Record::new("EMP001")
                .with("state", "Delhi")
                .with("zone", "North Zone"),
            Record::new("EMP002")
                .with("state", "Delhi")
                .with("zone", "East Zone"),
            Record::new("EMP003")
                .with("state", "Delhi")
                .with("zone", "South Zone"),
        ];
        let delhi = FilterOptions::new().with("state", FilterValue::equals("Delhi"));
        assert_eq!(apply_filters(&records, &delhi).len(), 3);

        let south = delhi.clone().with("zone", FilterValue::equals("South Zone"));
        assert_eq!(ids(&apply_filters(&records, &south)), ["EMP003"]);
    }

    #[test]
    fn describe_lists_active_predicates() {
        let options = FilterOptions::new()
            .with("branch", FilterValue::contains("north"))
            .with("zone", FilterValue::equals(""));
        assert_eq!(options.describe(), "branch~north");
        assert_eq!(options.active_count(), 1);
    }
}
