// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::ids::RecordId;

pub const ID_FIELD: &str = "id";

static MISSING: Value = Value::Missing;

/// A primitive field value. Dates are kept as ISO `YYYY-MM-DD` strings so
/// that lexicographic order is chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Text(String),
    Integer(i64),
    Decimal(f64),
    Bool(bool),
    Date(String),
    Missing,
}

impl Value {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn date(value: impl Into<String>) -> Self {
        Self::Date(value.into())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Missing => true,
            Self::Text(value) | Self::Date(value) => value.trim().is_empty(),
            Self::Integer(_) | Self::Decimal(_) | Self::Bool(_) => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) | Self::Date(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(value) => Some(*value as f64),
            Self::Decimal(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn display(&self) -> String {
        match self {
            Self::Text(value) | Self::Date(value) => value.clone(),
            Self::Integer(value) => value.to_string(),
            Self::Decimal(value) if value.fract() == 0.0 => format!("{value:.0}"),
            Self::Decimal(value) => value.to_string(),
            Self::Bool(true) => "yes".to_owned(),
            Self::Bool(false) => "no".to_owned(),
            Self::Missing => String::new(),
        }
    }

    /// Default ordering derived from the runtime type. Mixed numeric kinds
    /// compare numerically; other mixed kinds fall back to display text.
    pub fn cmp_value(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Integer(left), Self::Integer(right)) => left.cmp(right),
            (Self::Decimal(left), Self::Decimal(right)) => left.total_cmp(right),
            (Self::Integer(_), Self::Decimal(_)) | (Self::Decimal(_), Self::Integer(_)) => {
                match (self.as_f64(), other.as_f64()) {
                    (Some(left), Some(right)) => left.total_cmp(&right),
                    _ => Ordering::Equal,
                }
            }
            (Self::Date(left), Self::Date(right)) => left.cmp(right),
            (Self::Bool(left), Self::Bool(right)) => left.cmp(right),
            (Self::Text(left), Self::Text(right)) => {
                left.to_ascii_lowercase().cmp(&right.to_ascii_lowercase())
            }
            _ => self
                .display()
                .to_ascii_lowercase()
                .cmp(&other.display().to_ascii_lowercase()),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Decimal(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// A flat field-name to value mapping with a stable id. The id is mirrored
/// into the `id` field so columns and filters can address it like any other
/// field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn new(id: impl Into<RecordId>) -> Self {
        let id = id.into();
        let mut fields = BTreeMap::new();
        fields.insert(ID_FIELD.to_owned(), Value::Text(id.as_str().to_owned()));
        Self { id, fields }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        if key == ID_FIELD {
            return;
        }
        self.fields.insert(key.to_owned(), value.into());
    }

    /// Absent fields read as `Value::Missing`.
    pub fn get(&self, key: &str) -> &Value {
        self.fields.get(key).unwrap_or(&MISSING)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReportKind {
    Roles,
    DueVsCollection,
    EmployeeAttendance,
    CenterMeeting,
    CenterTransfer,
    CreditBureau,
    DeathCase,
    WriteOff,
    BranchAudit,
    ApplicationVerification,
}

impl ReportKind {
    pub const ALL: [Self; 10] = [
        Self::Roles,
        Self::DueVsCollection,
        Self::EmployeeAttendance,
        Self::CenterMeeting,
        Self::CenterTransfer,
        Self::CreditBureau,
        Self::DeathCase,
        Self::WriteOff,
        Self::BranchAudit,
        Self::ApplicationVerification,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Roles => "roles",
            Self::DueVsCollection => "due_vs_collection",
            Self::EmployeeAttendance => "employee_attendance",
            Self::CenterMeeting => "center_meeting",
            Self::CenterTransfer => "center_transfer",
            Self::CreditBureau => "credit_bureau",
            Self::DeathCase => "death_case",
            Self::WriteOff => "write_off",
            Self::BranchAudit => "branch_audit",
            Self::ApplicationVerification => "application_verification",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "roles" => Some(Self::Roles),
            "due_vs_collection" => Some(Self::DueVsCollection),
            "employee_attendance" => Some(Self::EmployeeAttendance),
            "center_meeting" => Some(Self::CenterMeeting),
            "center_transfer" => Some(Self::CenterTransfer),
            "credit_bureau" => Some(Self::CreditBureau),
            "death_case" => Some(Self::DeathCase),
            "write_off" => Some(Self::WriteOff),
            "branch_audit" => Some(Self::BranchAudit),
            "application_verification" => Some(Self::ApplicationVerification),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Roles => "roles",
            Self::DueVsCollection => "due/coll",
            Self::EmployeeAttendance => "attendance",
            Self::CenterMeeting => "meetings",
            Self::CenterTransfer => "transfers",
            Self::CreditBureau => "bureau",
            Self::DeathCase => "death",
            Self::WriteOff => "write-off",
            Self::BranchAudit => "audit",
            Self::ApplicationVerification => "verify",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Roles => "Role Management",
            Self::DueVsCollection => "Due vs Collection",
            Self::EmployeeAttendance => "Employee Attendance",
            Self::CenterMeeting => "Center Meetings",
            Self::CenterTransfer => "Center Transfers",
            Self::CreditBureau => "Credit Bureau Checks",
            Self::DeathCase => "Death Case Settlement",
            Self::WriteOff => "Write-offs",
            Self::BranchAudit => "Branch Audits",
            Self::ApplicationVerification => "Application Verification",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SummaryScope {
    #[default]
    Filtered,
    All,
}

impl SummaryScope {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Filtered => "filtered",
            Self::All => "all",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "filtered" => Some(Self::Filtered),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Filtered => Self::All,
            Self::All => Self::Filtered,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppMode {
    Nav,
    Filter,
}

/// Out-of-band workflow actions. A successful mutation invalidates the
/// current record collection; callers refetch instead of patching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mutation {
    SetRoleActive { role_id: RecordId, active: bool },
    SubmitWriteOff { loan_id: RecordId },
    SettleDeathCase { case_id: RecordId },
    ClearQueue { kind: ReportKind },
}

impl Mutation {
    pub const fn report(&self) -> ReportKind {
        match self {
            Self::SetRoleActive { .. } => ReportKind::Roles,
            Self::SubmitWriteOff { .. } => ReportKind::WriteOff,
            Self::SettleDeathCase { .. } => ReportKind::DeathCase,
            Self::ClearQueue { kind } => *kind,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::SetRoleActive { role_id, active: true } => format!("role {role_id} activated"),
            Self::SetRoleActive {
                role_id,
                active: false,
            } => format!("role {role_id} deactivated"),
            Self::SubmitWriteOff { loan_id } => format!("write-off {loan_id} submitted"),
            Self::SettleDeathCase { case_id } => format!("death case {case_id} settled"),
            Self::ClearQueue { kind } => format!("{} queue cleared", kind.label()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedOutcome {
    pub success: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::{Mutation, Record, ReportKind, SummaryScope, Value};
    use crate::RecordId;
    use std::cmp::Ordering;

    #[test]
    fn record_mirrors_id_and_reads_absent_fields_as_missing() {
        let record = Record::new("7").with("branch", "Main Branch");
        assert_eq!(record.get("id"), &Value::text("7"));
        assert_eq!(record.get("branch"), &Value::text("Main Branch"));
        assert_eq!(record.get("zone"), &Value::Missing);
    }

    #[test]
    fn record_id_field_cannot_be_overwritten() {
        let record = Record::new("7").with("id", "8");
        assert_eq!(record.get("id"), &Value::text("7"));
        assert_eq!(record.id, RecordId::new("7"));
    }

    #[test]
    fn value_emptiness_covers_blank_text_and_missing() {
        assert!(Value::Missing.is_empty());
        assert!(Value::text("   ").is_empty());
        assert!(Value::date("").is_empty());
        assert!(!Value::Integer(0).is_empty());
        assert!(!Value::Bool(false).is_empty());
    }

    #[test]
    fn cmp_value_orders_by_runtime_type() {
        assert_eq!(Value::Integer(2).cmp_value(&Value::Integer(10)), Ordering::Less);
        assert_eq!(Value::Integer(3).cmp_value(&Value::Decimal(2.5)), Ordering::Greater);
        assert_eq!(
            Value::date("2024-01-31").cmp_value(&Value::date("2024-02-01")),
            Ordering::Less
        );
        assert_eq!(
            Value::text("north").cmp_value(&Value::text("North")),
            Ordering::Equal
        );
    }

    #[test]
    fn report_kind_parse_round_trips_every_variant() {
        for kind in ReportKind::ALL {
            assert_eq!(ReportKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ReportKind::parse("payroll"), None);
    }

    #[test]
    fn summary_scope_toggles() {
        assert_eq!(SummaryScope::Filtered.toggled(), SummaryScope::All);
        assert_eq!(SummaryScope::parse("all"), Some(SummaryScope::All));
    }

    #[test]
    fn mutation_reports_owning_report() {
        let mutation = Mutation::ClearQueue {
            kind: ReportKind::ApplicationVerification,
        };
        assert_eq!(mutation.report(), ReportKind::ApplicationVerification);
        assert_eq!(mutation.describe(), "verify queue cleared");
    }
}
