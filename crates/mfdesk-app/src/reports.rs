// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};

use crate::columns::{
    ColumnDescriptor, amount, blanks_last, coordinates, device_id, natural_order, percent, score,
    status_label, text_or_dash, yes_no,
};
use crate::filters::{FilterFieldSpec, FilterSchema};
use crate::model::{ID_FIELD, ReportKind};
use crate::summary::SummarySpec;

/// Everything the generic table needs to know about one report.
#[derive(Debug, Clone, Copy)]
pub struct ReportDefinition {
    pub kind: ReportKind,
    pub fields: &'static [&'static str],
    pub columns: &'static [ColumnDescriptor],
    pub filters: FilterSchema,
    pub summary: SummarySpec,
}

impl ReportDefinition {
    pub fn has_field(&self, field: &str) -> bool {
        field == ID_FIELD || self.fields.contains(&field)
    }

    /// Rejects definitions whose columns, filters, or summary refer to
    /// fields the record shape does not carry.
    pub fn check(&self) -> Result<()> {
        for column in self.columns {
            if !self.has_field(column.key) {
                bail!(
                    "{}: column {:?} names unknown field",
                    self.kind.as_str(),
                    column.key
                );
            }
        }
        for spec in self.filters.fields {
            if !self.has_field(spec.field()) {
                bail!(
                    "{}: filter {:?} names unknown field",
                    self.kind.as_str(),
                    spec.field()
                );
            }
        }
        for required in self.filters.required {
            if self.filters.spec(required).is_none() {
                bail!(
                    "{}: required filter {required:?} has no input",
                    self.kind.as_str()
                );
            }
        }
        if !self.has_field(self.summary.group_field) {
            bail!(
                "{}: summary groups by unknown field {:?}",
                self.kind.as_str(),
                self.summary.group_field
            );
        }
        if let Some(field) = self.summary.amount_field
            && !self.has_field(field)
        {
            bail!(
                "{}: summary sums unknown field {field:?}",
                self.kind.as_str()
            );
        }
        Ok(())
    }
}

pub fn definition(kind: ReportKind) -> &'static ReportDefinition {
    match kind {
        ReportKind::Roles => &ROLES,
        ReportKind::DueVsCollection => &DUE_VS_COLLECTION,
        ReportKind::EmployeeAttendance => &EMPLOYEE_ATTENDANCE,
        ReportKind::CenterMeeting => &CENTER_MEETING,
        ReportKind::CenterTransfer => &CENTER_TRANSFER,
        ReportKind::CreditBureau => &CREDIT_BUREAU,
        ReportKind::DeathCase => &DEATH_CASE,
        ReportKind::WriteOff => &WRITE_OFF,
        ReportKind::BranchAudit => &BRANCH_AUDIT,
        ReportKind::ApplicationVerification => &APPLICATION_VERIFICATION,
    }
}

const ID: ColumnDescriptor = ColumnDescriptor::new(ID_FIELD, "ID")
    .sortable()
    .with_compare(natural_order);

const fn text(key: &'static str, label: &'static str) -> ColumnDescriptor {
    ColumnDescriptor::new(key, label)
        .sortable()
        .with_render(text_or_dash)
}

const fn money(key: &'static str, label: &'static str) -> ColumnDescriptor {
    ColumnDescriptor::new(key, label)
        .sortable()
        .with_render(amount)
}

const fn status(key: &'static str, label: &'static str) -> ColumnDescriptor {
    ColumnDescriptor::new(key, label)
        .sortable()
        .with_render(status_label)
}

const fn date(key: &'static str, label: &'static str) -> ColumnDescriptor {
    ColumnDescriptor::new(key, label).sortable()
}

const fn branch_filter() -> FilterFieldSpec {
    FilterFieldSpec::Substring {
        field: "branch",
        label: "Branch",
    }
}

pub const STATES: &[&str] = &[
    "Delhi",
    "Karnataka",
    "Maharashtra",
    "Tamil Nadu",
    "Uttar Pradesh",
];

pub const ZONES: &[&str] = &["North Zone", "South Zone", "East Zone", "West Zone"];

pub const BUREAUS: &[&str] = &["CIBIL", "CRIF", "Equifax", "Experian"];

static ROLES: ReportDefinition = ReportDefinition {
    kind: ReportKind::Roles,
    fields: &["role_name", "description", "permissions", "status", "updated_on"],
    columns: &[
        ID,
        text("role_name", "Role"),
        ColumnDescriptor::new("description", "Description")
            .sortable()
            .with_render(text_or_dash)
            .with_compare(blanks_last),
        ColumnDescriptor::new("permissions", "Permissions").with_render(text_or_dash),
        status("status", "Status"),
        date("updated_on", "Updated"),
    ],
    filters: FilterSchema {
        fields: &[
            FilterFieldSpec::Substring {
                field: "role_name",
                label: "Role",
            },
            FilterFieldSpec::Exact {
                field: "status",
                label: "Status",
                choices: &["active", "inactive"],
            },
        ],
        required: &[],
    },
    summary: SummarySpec {
        group_field: "status",
        amount_field: None,
        categories: &["active", "inactive"],
    },
};

static DUE_VS_COLLECTION: ReportDefinition = ReportDefinition {
    kind: ReportKind::DueVsCollection,
    fields: &[
        "title",
        "branch",
        "bc_partner_id",
        "collection_type",
        "date",
        "due_amount",
        "collected_amount",
    ],
    columns: &[
        ID,
        text("title", "Title"),
        text("branch", "Branch"),
        text("bc_partner_id", "BC Partner"),
        status("collection_type", "Type"),
        date("date", "Date"),
        money("due_amount", "Due"),
        money("collected_amount", "Collected"),
        ColumnDescriptor::new("collected_amount", "Rate").with_render(percent),
    ],
    filters: FilterSchema {
        fields: &[
            branch_filter(),
            FilterFieldSpec::Substring {
                field: "bc_partner_id",
                label: "BC Partner",
            },
            FilterFieldSpec::Exact {
                field: "collection_type",
                label: "Collection Type",
                choices: &["cash", "digital", "bank-transfer"],
            },
            FilterFieldSpec::DateRange {
                field: "date",
                label: "Date",
            },
        ],
        required: &[],
    },
    summary: SummarySpec {
        group_field: "collection_type",
        amount_field: Some("collected_amount"),
        categories: &["cash", "digital", "bank-transfer"],
    },
};

static EMPLOYEE_ATTENDANCE: ReportDefinition = ReportDefinition {
    kind: ReportKind::EmployeeAttendance,
    fields: &[
        "employee_id",
        "employee_name",
        "branch",
        "zone",
        "state",
        "date",
        "check_in",
        "check_out",
        "latitude",
        "longitude",
        "device_id",
        "status",
    ],
    columns: &[
        ID,
        text("employee_name", "Employee"),
        text("branch", "Branch"),
        text("zone", "Zone"),
        text("state", "State"),
        date("date", "Date"),
        text("check_in", "In"),
        text("check_out", "Out"),
        ColumnDescriptor::new("latitude", "Location").with_render(coordinates),
        ColumnDescriptor::new("device_id", "Device").with_render(device_id),
        status("status", "Status"),
    ],
    filters: FilterSchema {
        fields: &[
            FilterFieldSpec::Exact {
                field: "state",
                label: "State",
                choices: STATES,
            },
            FilterFieldSpec::Exact {
                field: "zone",
                label: "Zone",
                choices: ZONES,
            },
            branch_filter(),
            FilterFieldSpec::Substring {
                field: "employee_id",
                label: "Employee ID",
            },
            FilterFieldSpec::Exact {
                field: "status",
                label: "Status",
                choices: &["present", "absent", "late"],
            },
        ],
        required: &[],
    },
    summary: SummarySpec {
        group_field: "status",
        amount_field: None,
        categories: &["present", "absent", "late"],
    },
};

static CENTER_MEETING: ReportDefinition = ReportDefinition {
    kind: ReportKind::CenterMeeting,
    fields: &[
        "center_id",
        "center_name",
        "branch",
        "officer",
        "meeting_date",
        "attendees",
        "status",
    ],
    columns: &[
        ID,
        text("center_id", "Center"),
        text("center_name", "Name"),
        text("branch", "Branch"),
        text("officer", "Officer"),
        date("meeting_date", "Meeting"),
        ColumnDescriptor::new("attendees", "Attendees").sortable(),
        status("status", "Status"),
    ],
    filters: FilterSchema {
        fields: &[
            branch_filter(),
            FilterFieldSpec::Substring {
                field: "officer",
                label: "Officer",
            },
            FilterFieldSpec::Exact {
                field: "status",
                label: "Status",
                choices: &["scheduled", "held", "missed"],
            },
            FilterFieldSpec::DateRange {
                field: "meeting_date",
                label: "Meeting Date",
            },
        ],
        required: &["meeting_date"],
    },
    summary: SummarySpec {
        group_field: "status",
        amount_field: None,
        categories: &["scheduled", "held", "missed"],
    },
};

static CENTER_TRANSFER: ReportDefinition = ReportDefinition {
    kind: ReportKind::CenterTransfer,
    fields: &[
        "center_id",
        "from_branch",
        "to_branch",
        "transfer_date",
        "requested_by",
        "status",
    ],
    columns: &[
        ID,
        text("center_id", "Center"),
        text("from_branch", "From"),
        text("to_branch", "To"),
        date("transfer_date", "Transfer"),
        text("requested_by", "Requested By"),
        status("status", "Status"),
    ],
    filters: FilterSchema {
        fields: &[
            FilterFieldSpec::Substring {
                field: "from_branch",
                label: "From Branch",
            },
            FilterFieldSpec::Substring {
                field: "to_branch",
                label: "To Branch",
            },
            FilterFieldSpec::Exact {
                field: "status",
                label: "Status",
                choices: &["pending", "approved", "rejected"],
            },
            FilterFieldSpec::DateRange {
                field: "transfer_date",
                label: "Transfer Date",
            },
        ],
        required: &["transfer_date"],
    },
    summary: SummarySpec {
        group_field: "status",
        amount_field: None,
        categories: &["pending", "approved", "rejected"],
    },
};

static CREDIT_BUREAU: ReportDefinition = ReportDefinition {
    kind: ReportKind::CreditBureau,
    fields: &[
        "application_id",
        "customer_name",
        "branch",
        "bureau",
        "score",
        "check_date",
        "status",
    ],
    columns: &[
        ID,
        text("application_id", "Application"),
        text("customer_name", "Customer"),
        text("branch", "Branch"),
        text("bureau", "Bureau"),
        ColumnDescriptor::new("score", "Score")
            .sortable()
            .with_render(score),
        date("check_date", "Checked"),
        status("status", "Status"),
    ],
    filters: FilterSchema {
        fields: &[
            branch_filter(),
            FilterFieldSpec::Exact {
                field: "bureau",
                label: "Bureau",
                choices: BUREAUS,
            },
            FilterFieldSpec::Exact {
                field: "status",
                label: "Status",
                choices: &["pass", "fail", "pending"],
            },
            FilterFieldSpec::DateRange {
                field: "check_date",
                label: "Check Date",
            },
        ],
        required: &["check_date"],
    },
    summary: SummarySpec {
        group_field: "status",
        amount_field: None,
        categories: &["pass", "fail", "pending"],
    },
};

static DEATH_CASE: ReportDefinition = ReportDefinition {
    kind: ReportKind::DeathCase,
    fields: &[
        "case_id",
        "customer_name",
        "branch",
        "loan_id",
        "outstanding_amount",
        "reported_on",
        "settlement_status",
    ],
    columns: &[
        ID,
        text("customer_name", "Customer"),
        text("branch", "Branch"),
        text("loan_id", "Loan"),
        money("outstanding_amount", "Outstanding"),
        date("reported_on", "Reported"),
        status("settlement_status", "Settlement"),
    ],
    filters: FilterSchema {
        fields: &[
            branch_filter(),
            FilterFieldSpec::Exact {
                field: "settlement_status",
                label: "Settlement",
                choices: &["open", "settled"],
            },
            FilterFieldSpec::DateRange {
                field: "reported_on",
                label: "Reported On",
            },
        ],
        required: &[],
    },
    summary: SummarySpec {
        group_field: "settlement_status",
        amount_field: Some("outstanding_amount"),
        categories: &["open", "settled"],
    },
};

static WRITE_OFF: ReportDefinition = ReportDefinition {
    kind: ReportKind::WriteOff,
    fields: &[
        "loan_id",
        "customer_name",
        "branch",
        "amount",
        "reason",
        "write_off_date",
        "status",
    ],
    columns: &[
        ID,
        text("customer_name", "Customer"),
        text("branch", "Branch"),
        money("amount", "Amount"),
        ColumnDescriptor::new("reason", "Reason")
            .with_render(text_or_dash)
            .with_compare(blanks_last),
        date("write_off_date", "Write-off"),
        status("status", "Status"),
    ],
    filters: FilterSchema {
        fields: &[
            branch_filter(),
            FilterFieldSpec::Exact {
                field: "status",
                label: "Status",
                choices: &["draft", "submitted", "approved"],
            },
            FilterFieldSpec::DateRange {
                field: "write_off_date",
                label: "Write-off Date",
            },
        ],
        required: &["write_off_date"],
    },
    summary: SummarySpec {
        group_field: "status",
        amount_field: Some("amount"),
        categories: &["draft", "submitted", "approved"],
    },
};

static BRANCH_AUDIT: ReportDefinition = ReportDefinition {
    kind: ReportKind::BranchAudit,
    fields: &[
        "audit_id",
        "branch",
        "auditor",
        "audit_date",
        "score",
        "compliant",
        "findings",
    ],
    columns: &[
        ID,
        text("branch", "Branch"),
        text("auditor", "Auditor"),
        date("audit_date", "Audited"),
        ColumnDescriptor::new("score", "Score")
            .sortable()
            .with_render(score),
        ColumnDescriptor::new("compliant", "Compliant")
            .sortable()
            .with_render(yes_no),
        ColumnDescriptor::new("findings", "Findings").with_render(text_or_dash),
    ],
    filters: FilterSchema {
        fields: &[
            branch_filter(),
            FilterFieldSpec::Substring {
                field: "auditor",
                label: "Auditor",
            },
            FilterFieldSpec::Flag {
                field: "compliant",
                label: "Compliant",
            },
            FilterFieldSpec::DateRange {
                field: "audit_date",
                label: "Audit Date",
            },
        ],
        required: &["audit_date"],
    },
    summary: SummarySpec {
        group_field: "compliant",
        amount_field: None,
        categories: &["yes", "no"],
    },
};

static APPLICATION_VERIFICATION: ReportDefinition = ReportDefinition {
    kind: ReportKind::ApplicationVerification,
    fields: &[
        "application_id",
        "applicant_name",
        "branch",
        "verifier",
        "submitted_on",
        "queued",
        "status",
    ],
    columns: &[
        ID,
        text("applicant_name", "Applicant"),
        text("branch", "Branch"),
        text("verifier", "Verifier"),
        date("submitted_on", "Submitted"),
        ColumnDescriptor::new("queued", "Queued")
            .sortable()
            .with_render(yes_no),
        status("status", "Status"),
    ],
    filters: FilterSchema {
        fields: &[
            branch_filter(),
            FilterFieldSpec::Exact {
                field: "status",
                label: "Status",
                choices: &["pending", "verified", "rejected"],
            },
            FilterFieldSpec::Flag {
                field: "queued",
                label: "Queued",
            },
        ],
        required: &[],
    },
    summary: SummarySpec {
        group_field: "status",
        amount_field: None,
        categories: &["pending", "verified", "rejected"],
    },
};

#[cfg(test)]
mod tests {
    use super::definition;
    use crate::model::ReportKind;

    #[test]
    fn every_definition_is_consistent() {
        for kind in ReportKind::ALL {
            let def = definition(kind);
            assert_eq!(def.kind, kind);
            def.check()
                .unwrap_or_else(|err| panic!("{kind:?} definition invalid: {err:#}"));
        }
    }

    #[test]
    fn column_labels_are_unique_per_report() {
        for kind in ReportKind::ALL {
            let columns = definition(kind).columns;
            for (index, column) in columns.iter().enumerate() {
                assert!(
                    columns[index + 1..]
                        .iter()
                        .all(|other| other.label != column.label),
                    "{kind:?} repeats column {}",
                    column.label
                );
            }
        }
    }

    #[test]
    fn dated_reports_require_a_range() {
        for kind in [
            ReportKind::CenterMeeting,
            ReportKind::CenterTransfer,
            ReportKind::CreditBureau,
            ReportKind::WriteOff,
            ReportKind::BranchAudit,
        ] {
            assert_eq!(definition(kind).filters.required.len(), 1, "{kind:?}");
        }
        assert!(definition(ReportKind::DueVsCollection).filters.required.is_empty());
    }
}
