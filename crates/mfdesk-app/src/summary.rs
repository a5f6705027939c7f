// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeMap;

use crate::model::{Record, Value};
use crate::validation::PLACEHOLDER;

/// How a report groups its records for the summary strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummarySpec {
    pub group_field: &'static str,
    /// Paise field summed per bucket, when the report has one.
    pub amount_field: Option<&'static str>,
    /// Known categories, listed first and shown even at zero.
    pub categories: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryBucket {
    pub label: String,
    pub count: usize,
    pub proportion: f64,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub group_field: String,
    pub total: usize,
    pub buckets: Vec<SummaryBucket>,
}

impl Summary {
    pub fn counts(&self) -> BTreeMap<String, usize> {
        self.buckets
            .iter()
            .map(|bucket| (bucket.label.clone(), bucket.count))
            .collect()
    }

    pub fn bucket(&self, label: &str) -> Option<&SummaryBucket> {
        self.buckets.iter().find(|bucket| bucket.label == label)
    }

    pub fn total_amount(&self) -> i64 {
        self.buckets
            .iter()
            .fold(0_i64, |sum, bucket| sum.saturating_add(bucket.amount))
    }
}

/// Counts records per distinct value of `group_field`.
pub fn summarize<'a, I>(records: I, group_field: &str) -> Summary
where
    I: IntoIterator<Item = &'a Record>,
{
    summarize_with(records, group_field, None, &[])
}

pub fn summarize_spec<'a, I>(records: I, spec: &SummarySpec) -> Summary
where
    I: IntoIterator<Item = &'a Record>,
{
    summarize_with(records, spec.group_field, spec.amount_field, spec.categories)
}

fn summarize_with<'a, I>(
    records: I,
    group_field: &str,
    amount_field: Option<&str>,
    categories: &[&str],
) -> Summary
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut tallies: BTreeMap<String, (usize, i64)> = BTreeMap::new();
    let mut total = 0usize;
    for record in records {
        total += 1;
        let tally = tallies
            .entry(group_label(record.get(group_field)))
            .or_default();
        tally.0 += 1;
        if let Some(Value::Integer(paise)) = amount_field.map(|field| record.get(field)) {
            tally.1 = tally.1.saturating_add(*paise);
        }
    }

    let mut buckets = Vec::with_capacity(categories.len() + tallies.len());
    for category in categories {
        let (count, amount) = tallies.remove(*category).unwrap_or_default();
        buckets.push(bucket((*category).to_owned(), count, amount, total));
    }
    for (label, (count, amount)) in tallies {
        buckets.push(bucket(label, count, amount, total));
    }

    Summary {
        group_field: group_field.to_owned(),
        total,
        buckets,
    }
}

fn bucket(label: String, count: usize, amount: i64, total: usize) -> SummaryBucket {
    SummaryBucket {
        label,
        count,
        proportion: proportion(count, total),
        amount,
    }
}

fn group_label(value: &Value) -> String {
    if value.is_empty() {
        return PLACEHOLDER.to_owned();
    }
    value.display()
}

/// Zero totals yield zero, never NaN.
pub fn proportion(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64
}
