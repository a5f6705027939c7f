// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::Date;
use time::macros::format_description;

pub const PLACEHOLDER: &str = "-";

/// Parses a strict ISO `YYYY-MM-DD` date. Anything else, including
/// surrounding whitespace, is rejected.
pub fn parse_iso_date(input: &str) -> Option<Date> {
    Date::parse(input, &format_description!("[year]-[month]-[day]")).ok()
}

pub fn format_paise(paise: i64) -> String {
    let (sign, paise) = normalize_sign(paise);
    let rupees = paise / 100;
    let remainder = paise % 100;
    format!("{sign}₹{}.{:02}", comma_format(rupees), remainder)
}

pub fn format_compact_paise(paise: i64) -> String {
    let (sign, paise) = normalize_sign(paise);
    let rupees = (paise as f64) / 100.0;
    if rupees < 1000.0 {
        return format!("{sign}{}", format_paise(paise));
    }

    let (value, suffix) = if rupees < 1_000_000.0 {
        (rupees / 1000.0, "k")
    } else if rupees < 1_000_000_000.0 {
        (rupees / 1_000_000.0, "M")
    } else {
        (rupees / 1_000_000_000.0, "B")
    };

    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract().abs() < f64::EPSILON {
        format!("{sign}₹{rounded:.0}{suffix}")
    } else {
        format!("{sign}₹{rounded:.1}{suffix}")
    }
}

pub fn format_percent(proportion: f64) -> String {
    if !proportion.is_finite() {
        return "0%".to_owned();
    }
    format!("{:.0}%", proportion * 100.0)
}

fn comma_format(value: i64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let mut chars = digits.chars().collect::<Vec<_>>();
    let mut count = 0usize;
    while let Some(ch) = chars.pop() {
        if count == 3 {
            out.push(',');
            count = 0;
        }
        out.push(ch);
        count += 1;
    }
    out.chars().rev().collect()
}

fn normalize_sign(paise: i64) -> (&'static str, i64) {
    if paise >= 0 {
        return ("", paise);
    }
    if paise == i64::MIN {
        ("-", i64::MAX)
    } else {
        ("-", -paise)
    }
}
