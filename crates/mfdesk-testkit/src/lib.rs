// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use mfdesk_app::reports::{BUREAUS, STATES, ZONES};
use mfdesk_app::{Record, ReportKind, Value};
use std::path::PathBuf;
use time::Date;
use time::macros::format_description;

const REFERENCE_YEAR: i32 = 2024;

const BRANCHES: [&str; 6] = [
    "Main Branch",
    "North Branch",
    "South Branch",
    "East Branch",
    "Bengaluru Branch",
    "Pune Branch",
];

const FIRST_NAMES: [&str; 16] = [
    "Asha", "Rahul", "Meera", "Priya", "Ravi", "Sunita", "Anil", "Kavita", "Mohan", "Farah",
    "Suresh", "Anita", "Vikram", "Lakshmi", "Gopal", "Neha",
];
const LAST_NAMES: [&str; 14] = [
    "Verma", "Singh", "Iyer", "Nair", "Kumar", "Rao", "Mehta", "Das", "Lal", "Khan", "Yadav",
    "Joshi", "Patel", "Reddy",
];

const CENTER_NAMES: [&str; 8] = [
    "Shakti", "Pragati", "Udaan", "Asha", "Samriddhi", "Ujjwal", "Sahyog", "Unnati",
];

const ROLE_NAMES: [&str; 8] = [
    "Administrator",
    "Branch Manager",
    "Field Officer",
    "Auditor",
    "Data Entry",
    "Zonal Head",
    "Credit Analyst",
    "Collections Lead",
];

const WORDS: [&str; 20] = [
    "cash",
    "register",
    "mismatch",
    "filing",
    "gap",
    "borrower",
    "migrated",
    "business",
    "closure",
    "ledger",
    "receipt",
    "missing",
    "late",
    "deposit",
    "signature",
    "pending",
    "review",
    "center",
    "visit",
    "overdue",
];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Deterministic record generator for every report shape. The same seed
/// always yields the same records.
#[derive(Debug, Clone)]
pub struct ReportFaker {
    rng: DeterministicRng,
    seed: u64,
}

impl ReportFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            seed: normalized,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn records(&mut self, kind: ReportKind, count: usize) -> Vec<Record> {
        (1..=count).map(|index| self.record(kind, index)).collect()
    }

    pub fn record(&mut self, kind: ReportKind, index: usize) -> Record {
        match kind {
            ReportKind::Roles => self.role(index),
            ReportKind::DueVsCollection => self.collection(index),
            ReportKind::EmployeeAttendance => self.attendance(index),
            ReportKind::CenterMeeting => self.meeting(index),
            ReportKind::CenterTransfer => self.transfer(index),
            ReportKind::CreditBureau => self.bureau_check(index),
            ReportKind::DeathCase => self.death_case(index),
            ReportKind::WriteOff => self.write_off(index),
            ReportKind::BranchAudit => self.audit(index),
            ReportKind::ApplicationVerification => self.verification(index),
        }
    }

    pub fn date_in_year(&mut self, year: i32) -> String {
        let day = self.int_range_i64(1, 365) as u16;
        let date = Date::from_ordinal_date(year, day).expect("valid ordinal date");
        date.format(&format_description!("[year]-[month]-[day]"))
            .expect("format ISO date")
    }

    fn role(&mut self, index: usize) -> Record {
        let name = self.pick(&ROLE_NAMES);
        Record::new(format!("R{index:03}"))
            .with("role_name", name)
            .with("description", self.sentence(0, 6))
            .with("permissions", "reports")
            .with("status", self.pick(&["active", "inactive"]))
            .with("updated_on", self.date())
    }

    fn collection(&mut self, index: usize) -> Record {
        let due = self.int_range_i64(1_000_000, 20_000_000);
        let collected = self.int_range_i64(due / 2, due);
        Record::new(index.to_string())
            .with("title", format!("Collection Report {index}"))
            .with("branch", self.pick(&BRANCHES))
            .with("bc_partner_id", format!("BCP{:03}", self.int_range_i64(1, 40)))
            .with(
                "collection_type",
                self.pick(&["cash", "digital", "bank-transfer"]),
            )
            .with("date", self.date())
            .with("due_amount", due)
            .with("collected_amount", collected)
    }

    fn attendance(&mut self, index: usize) -> Record {
        let id = format!("EMP{index:03}");
        let absent = self.int_n(5) == 0;
        let located = !absent && self.rng.bool();
        let (latitude, longitude) = if located {
            (
                8.0 + self.int_range_i64(0, 2_800) as f64 / 100.0,
                68.0 + self.int_range_i64(0, 2_900) as f64 / 100.0,
            )
        } else {
            (0.0, 0.0)
        };
        Record::new(id.as_str())
            .with("employee_id", id.as_str())
            .with("employee_name", self.person())
            .with("branch", self.pick(&BRANCHES))
            .with("zone", self.pick(ZONES))
            .with("state", self.pick(STATES))
            .with("date", self.date())
            .with("check_in", if absent { String::new() } else { self.clock(8, 10) })
            .with("check_out", if absent { String::new() } else { self.clock(17, 19) })
            .with("latitude", latitude)
            .with("longitude", longitude)
            .with(
                "device_id",
                if located {
                    format!("DEV-{}", self.int_range_i64(1000, 9999))
                } else {
                    String::new()
                },
            )
            .with(
                "status",
                if absent {
                    "absent"
                } else {
                    self.pick(&["present", "late"])
                },
            )
    }

    fn meeting(&mut self, index: usize) -> Record {
        let status = self.pick(&["scheduled", "held", "missed"]);
        let attendees = if status == "held" {
            self.int_range_i64(5, 30)
        } else {
            0
        };
        Record::new(format!("M{index:03}"))
            .with("center_id", format!("C-{}", 100 + index))
            .with("center_name", format!("{} Center", self.pick(&CENTER_NAMES)))
            .with("branch", self.pick(&BRANCHES))
            .with("officer", self.person())
            .with("meeting_date", self.date())
            .with("attendees", attendees)
            .with("status", status)
    }

    fn transfer(&mut self, index: usize) -> Record {
        let from = self.pick(&BRANCHES);
        let mut to = self.pick(&BRANCHES);
        if to == from {
            to = BRANCHES[(BRANCHES.iter().position(|b| *b == from).unwrap_or(0) + 1) % BRANCHES.len()];
        }
        Record::new(format!("T{index:03}"))
            .with("center_id", format!("C-{}", 200 + index))
            .with("from_branch", from)
            .with("to_branch", to)
            .with("transfer_date", self.date())
            .with("requested_by", self.person())
            .with("status", self.pick(&["pending", "approved", "rejected"]))
    }

    fn bureau_check(&mut self, index: usize) -> Record {
        let status = self.pick(&["pass", "fail", "pending"]);
        let score = match status {
            "pass" => self.int_range_i64(650, 900),
            "fail" => self.int_range_i64(300, 649),
            _ => 0,
        };
        Record::new(format!("CB{index:03}"))
            .with("application_id", format!("APP-{}", 2000 + index))
            .with("customer_name", self.person())
            .with("branch", self.pick(&BRANCHES))
            .with("bureau", self.pick(BUREAUS))
            .with("score", score)
            .with("check_date", self.date())
            .with("status", status)
    }

    fn death_case(&mut self, index: usize) -> Record {
        let id = format!("DC-{index:02}");
        Record::new(id.as_str())
            .with("case_id", id.as_str())
            .with("customer_name", self.person())
            .with("branch", self.pick(&BRANCHES))
            .with("loan_id", format!("L-{}", 3000 + index))
            .with("outstanding_amount", self.int_range_i64(100_000, 8_000_000))
            .with("reported_on", self.date())
            .with("settlement_status", self.pick(&["open", "settled"]))
    }

    fn write_off(&mut self, index: usize) -> Record {
        let id = format!("L-{}", 4000 + index);
        Record::new(id.as_str())
            .with("loan_id", id.as_str())
            .with("customer_name", self.person())
            .with("branch", self.pick(&BRANCHES))
            .with("amount", self.int_range_i64(100_000, 10_000_000))
            .with("reason", self.sentence(0, 4))
            .with("write_off_date", self.date())
            .with("status", self.pick(&["draft", "submitted", "approved"]))
    }

    fn audit(&mut self, index: usize) -> Record {
        let score = self.int_range_i64(40, 100);
        let id = format!("A{index:03}");
        Record::new(id.as_str())
            .with("audit_id", id.as_str())
            .with("branch", self.pick(&BRANCHES))
            .with("auditor", self.person())
            .with("audit_date", self.date())
            .with("score", score)
            .with("compliant", score >= 75)
            .with("findings", self.sentence(0, 5))
    }

    fn verification(&mut self, index: usize) -> Record {
        let status = self.pick(&["pending", "verified", "rejected"]);
        let queued = status == "pending" && self.rng.bool();
        Record::new(format!("V{index:03}"))
            .with("application_id", format!("APP-{}", 2000 + index))
            .with("applicant_name", self.person())
            .with("branch", self.pick(&BRANCHES))
            .with("verifier", if queued { String::new() } else { self.person() })
            .with("submitted_on", self.date())
            .with("queued", queued)
            .with("status", status)
    }

    fn date(&mut self) -> Value {
        Value::date(self.date_in_year(REFERENCE_YEAR))
    }

    fn person(&mut self) -> String {
        format!("{} {}", self.pick(&FIRST_NAMES), self.pick(&LAST_NAMES))
    }

    fn clock(&mut self, from_hour: i64, to_hour: i64) -> String {
        format!(
            "{:02}:{:02}",
            self.int_range_i64(from_hour, to_hour),
            self.int_range_i64(0, 59)
        )
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range_i64(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + (self.rng.next_u64() % (span as u64)) as i64
    }

    /// Zero words yields an empty string, which exercises placeholder cells.
    fn sentence(&mut self, min_words: usize, max_words: usize) -> String {
        let count = self.int_range_i64(min_words as i64, max_words as i64) as usize;
        let mut parts = Vec::with_capacity(count);
        for _ in 0..count {
            parts.push(self.pick(&WORDS).to_owned());
        }
        let mut sentence = parts.join(" ");
        if let Some(first) = sentence.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        sentence
    }
}

pub fn temp_db_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let db_path = dir.path().join("mfdesk.db");
    Ok((dir, db_path))
}

pub fn branches() -> &'static [&'static str] {
    &BRANCHES
}
