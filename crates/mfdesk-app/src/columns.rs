// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::cmp::Ordering;

use crate::model::{Record, ReportKind, Value};
use crate::reports::definition;
use crate::validation::{PLACEHOLDER, format_paise, format_percent};

/// Turns a field value (and, when it needs siblings, the whole record) into
/// a display cell. Must be pure and must not panic on empty values.
pub type Renderer = fn(&Value, &Record) -> Cell;

pub type Comparator = fn(&Value, &Value) -> Ordering;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Raw(Value),
    Text(String),
}

impl Cell {
    pub fn placeholder() -> Self {
        Self::Text(PLACEHOLDER.to_owned())
    }

    pub fn display(&self) -> String {
        match self {
            Self::Raw(value) if value.is_empty() => PLACEHOLDER.to_owned(),
            Self::Raw(value) => value.display(),
            Self::Text(text) => text.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ColumnDescriptor {
    pub key: &'static str,
    pub label: &'static str,
    pub sortable: bool,
    pub render: Option<Renderer>,
    pub compare: Option<Comparator>,
}

impl ColumnDescriptor {
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            sortable: false,
            render: None,
            compare: None,
        }
    }

    pub const fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub const fn with_render(mut self, render: Renderer) -> Self {
        self.render = Some(render);
        self
    }

    pub const fn with_compare(mut self, compare: Comparator) -> Self {
        self.compare = Some(compare);
        self
    }

    pub fn cell(&self, record: &Record) -> Cell {
        let value = record.get(self.key);
        match self.render {
            Some(render) => render(value, record),
            None => Cell::Raw(value.clone()),
        }
    }

    pub fn compare_values(&self, left: &Value, right: &Value) -> Ordering {
        match self.compare {
            Some(compare) => compare(left, right),
            None => left.cmp_value(right),
        }
    }
}

pub fn describe_columns(kind: ReportKind) -> &'static [ColumnDescriptor] {
    definition(kind).columns
}

pub fn text_or_dash(value: &Value, _record: &Record) -> Cell {
    if value.is_empty() {
        return Cell::placeholder();
    }
    Cell::Text(value.display())
}

/// Amounts are stored in paise.
pub fn amount(value: &Value, _record: &Record) -> Cell {
    match value {
        Value::Integer(paise) => Cell::Text(format_paise(*paise)),
        _ => Cell::placeholder(),
    }
}

/// Renders the record's latitude/longitude pair. Devices that never got a
/// fix report `0, 0`, which is shown as missing.
pub fn coordinates(_value: &Value, record: &Record) -> Cell {
    let latitude = record.get("latitude").as_f64();
    let longitude = record.get("longitude").as_f64();
    match (latitude, longitude) {
        (Some(lat), Some(lon)) if lat != 0.0 || lon != 0.0 => {
            Cell::Text(format!("{lat:.4}, {lon:.4}"))
        }
        _ => Cell::placeholder(),
    }
}

pub fn yes_no(value: &Value, _record: &Record) -> Cell {
    match value.as_bool() {
        Some(true) => Cell::Text("yes".to_owned()),
        Some(false) => Cell::Text("no".to_owned()),
        None => Cell::placeholder(),
    }
}

/// Device ids are only meaningful when the punch carried a location fix.
pub fn device_id(value: &Value, record: &Record) -> Cell {
    if matches!(coordinates(value, record), Cell::Text(ref text) if text == PLACEHOLDER) {
        return Cell::placeholder();
    }
    text_or_dash(value, record)
}

/// Collected share of the due amount on the same record.
pub fn percent(_value: &Value, record: &Record) -> Cell {
    match (record.get("collected_amount"), record.get("due_amount")) {
        (Value::Integer(collected), Value::Integer(due)) if *due > 0 => {
            Cell::Text(format_percent(*collected as f64 / *due as f64))
        }
        _ => Cell::placeholder(),
    }
}

/// `bank-transfer` becomes `Bank Transfer`.
pub fn status_label(value: &Value, _record: &Record) -> Cell {
    let Some(raw) = value.as_str().filter(|raw| !raw.trim().is_empty()) else {
        return Cell::placeholder();
    };
    let label = raw
        .split(['-', '_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    Cell::Text(label)
}

/// Bureau and audit scores of zero mean "not scored yet".
pub fn score(value: &Value, _record: &Record) -> Cell {
    match value {
        Value::Integer(score) if *score > 0 => Cell::Text(score.to_string()),
        _ => Cell::placeholder(),
    }
}

/// Sorts blank text after populated text; used for free-form columns where
/// blanks are noise.
pub fn blanks_last(left: &Value, right: &Value) -> Ordering {
    match (left.is_empty(), right.is_empty()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => left.cmp_value(right),
    }
}

/// Compares digit runs by numeric value so `"2"` sorts before `"10"` and
/// `"EMP9"` before `"EMP10"`.
pub fn natural_order(left: &Value, right: &Value) -> Ordering {
    let (left, right) = (left.display(), right.display());
    let (mut a, mut b) = (left.as_str(), right.as_str());
    loop {
        match (a.is_empty(), b.is_empty()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            (false, false) => {}
        }
        let a_digits = a.starts_with(|ch: char| ch.is_ascii_digit());
        let b_digits = b.starts_with(|ch: char| ch.is_ascii_digit());
        let (a_run, a_rest) = split_run(a, a_digits);
        let (b_run, b_rest) = split_run(b, b_digits);
        let order = if a_digits && b_digits {
            let (a_value, b_value) = (a_run.trim_start_matches('0'), b_run.trim_start_matches('0'));
            a_value
                .len()
                .cmp(&b_value.len())
                .then_with(|| a_value.cmp(b_value))
                .then_with(|| a_run.len().cmp(&b_run.len()))
        } else {
            a_run.cmp(b_run)
        };
        if order != Ordering::Equal {
            return order;
        }
        a = a_rest;
        b = b_rest;
    }
}

fn split_run(text: &str, digits: bool) -> (&str, &str) {
    let end = text
        .find(|ch: char| ch.is_ascii_digit() != digits)
        .unwrap_or(text.len());
    text.split_at(end)
}
