// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use mfdesk_app::{Record, ReportKind, Value};

/// The sample set `--seed` and `--demo` load for each report. Amounts are
/// paise.
pub fn reference_records(kind: ReportKind) -> Vec<Record> {
    match kind {
        ReportKind::Roles => roles(),
        ReportKind::DueVsCollection => due_vs_collection(),
        ReportKind::EmployeeAttendance => employee_attendance(),
        ReportKind::CenterMeeting => center_meetings(),
        ReportKind::CenterTransfer => center_transfers(),
        ReportKind::CreditBureau => credit_bureau(),
        ReportKind::DeathCase => death_cases(),
        ReportKind::WriteOff => write_offs(),
        ReportKind::BranchAudit => branch_audits(),
        ReportKind::ApplicationVerification => application_verification(),
    }
}

fn roles() -> Vec<Record> {
    [
        (
            "R001",
            "Administrator",
            "Full access to every module",
            "users,reports,settings",
            "active",
            "2024-01-10",
        ),
        (
            "R002",
            "Branch Manager",
            "Approves branch-level workflows",
            "reports,approvals",
            "active",
            "2024-02-01",
        ),
        (
            "R003",
            "Field Officer",
            "Collects dues and records center meetings",
            "collections,meetings",
            "active",
            "2024-02-01",
        ),
        (
            "R004",
            "Auditor",
            "Read-only audit access",
            "reports",
            "inactive",
            "2023-11-20",
        ),
        ("R005", "Data Entry", "", "applications", "inactive", "2023-12-04"),
    ]
    .into_iter()
    .map(|(id, name, description, permissions, status, updated_on)| {
        Record::new(id)
            .with("role_name", name)
            .with("description", description)
            .with("permissions", permissions)
            .with("status", status)
            .with("updated_on", Value::date(updated_on))
    })
    .collect()
}

fn due_vs_collection() -> Vec<Record> {
    [
        (
            "1",
            "January Collection Report",
            "Main Branch",
            "BCP001",
            "cash",
            "2024-01-15",
            12_500_000_i64,
            11_800_000_i64,
        ),
        (
            "2",
            "February Collection Report",
            "North Branch",
            "BCP002",
            "digital",
            "2024-02-15",
            9_800_000,
            9_800_000,
        ),
        (
            "3",
            "March Collection Report",
            "South Branch",
            "BCP003",
            "bank-transfer",
            "2024-03-15",
            15_000_000,
            13_250_000,
        ),
    ]
    .into_iter()
    .map(
        |(id, title, branch, partner, collection_type, date, due, collected)| {
            Record::new(id)
                .with("title", title)
                .with("branch", branch)
                .with("bc_partner_id", partner)
                .with("collection_type", collection_type)
                .with("date", Value::date(date))
                .with("due_amount", due)
                .with("collected_amount", collected)
        },
    )
    .collect()
}

fn employee_attendance() -> Vec<Record> {
    let attendance = |id: &str,
                      name: &str,
                      branch: &str,
                      zone: &str,
                      state: &str,
                      times: (&str, &str),
                      location: (f64, f64),
                      device_id: &str,
                      status: &str| {
        Record::new(id)
            .with("employee_id", id)
            .with("employee_name", name)
            .with("branch", branch)
            .with("zone", zone)
            .with("state", state)
            .with("date", Value::date("2024-03-01"))
            .with("check_in", times.0)
            .with("check_out", times.1)
            .with("latitude", location.0)
            .with("longitude", location.1)
            .with("device_id", device_id)
            .with("status", status)
    };
    vec![
        attendance(
            "EMP001",
            "Asha Verma",
            "Main Branch",
            "North Zone",
            "Delhi",
            ("09:05", "18:02"),
            (28.6139, 77.2090),
            "DEV-1001",
            "present",
        ),
        attendance(
            "EMP002",
            "Rahul Singh",
            "North Branch",
            "East Zone",
            "Delhi",
            ("09:42", "18:10"),
            (28.7041, 77.1025),
            "DEV-1002",
            "late",
        ),
        attendance(
            "EMP003",
            "Meera Iyer",
            "South Branch",
            "South Zone",
            "Delhi",
            ("", ""),
            (0.0, 0.0),
            "",
            "absent",
        ),
        attendance(
            "EMP004",
            "Priya Nair",
            "Bengaluru Branch",
            "South Zone",
            "Karnataka",
            ("08:58", "17:45"),
            (12.9716, 77.5946),
            "DEV-1004",
            "present",
        ),
    ]
}

fn center_meetings() -> Vec<Record> {
    [
        ("M001", "C-101", "Shakti Center", "Main Branch", "Ravi Kumar", "2024-03-05", 18_i64, "held"),
        ("M002", "C-102", "Pragati Center", "North Branch", "Sunita Rao", "2024-03-12", 0, "missed"),
        ("M003", "C-103", "Udaan Center", "South Branch", "Ravi Kumar", "2024-03-19", 0, "scheduled"),
    ]
    .into_iter()
    .map(
        |(id, center_id, center_name, branch, officer, meeting_date, attendees, status)| {
            Record::new(id)
                .with("center_id", center_id)
                .with("center_name", center_name)
                .with("branch", branch)
                .with("officer", officer)
                .with("meeting_date", Value::date(meeting_date))
                .with("attendees", attendees)
                .with("status", status)
        },
    )
    .collect()
}

fn center_transfers() -> Vec<Record> {
    [
        ("T001", "C-104", "Main Branch", "North Branch", "2024-02-20", "Anil Mehta", "approved"),
        ("T002", "C-105", "North Branch", "South Branch", "2024-03-02", "Sunita Rao", "pending"),
        ("T003", "C-106", "South Branch", "Main Branch", "2024-03-08", "Ravi Kumar", "rejected"),
    ]
    .into_iter()
    .map(
        |(id, center_id, from_branch, to_branch, transfer_date, requested_by, status)| {
            Record::new(id)
                .with("center_id", center_id)
                .with("from_branch", from_branch)
                .with("to_branch", to_branch)
                .with("transfer_date", Value::date(transfer_date))
                .with("requested_by", requested_by)
                .with("status", status)
        },
    )
    .collect()
}

fn credit_bureau() -> Vec<Record> {
    [
        ("CB001", "APP-2001", "Kavita Das", "Main Branch", "CIBIL", 742_i64, "2024-03-03", "pass"),
        ("CB002", "APP-2002", "Mohan Lal", "North Branch", "Equifax", 598, "2024-03-04", "fail"),
        ("CB003", "APP-2003", "Farah Khan", "South Branch", "Experian", 0, "2024-03-05", "pending"),
    ]
    .into_iter()
    .map(
        |(id, application_id, customer, branch, bureau, score, check_date, status)| {
            Record::new(id)
                .with("application_id", application_id)
                .with("customer_name", customer)
                .with("branch", branch)
                .with("bureau", bureau)
                .with("score", score)
                .with("check_date", Value::date(check_date))
                .with("status", status)
        },
    )
    .collect()
}

fn death_cases() -> Vec<Record> {
    [
        ("DC-01", "Ramesh Gupta", "Main Branch", "L-3001", 4_500_000_i64, "2024-01-22", "open"),
        ("DC-02", "Lakshmi Pillai", "South Branch", "L-3002", 1_275_000, "2024-02-14", "settled"),
        ("DC-03", "Gopal Reddy", "North Branch", "L-3003", 2_010_000, "2024-03-06", "open"),
    ]
    .into_iter()
    .map(
        |(id, customer, branch, loan_id, outstanding, reported_on, settlement)| {
            Record::new(id)
                .with("case_id", id)
                .with("customer_name", customer)
                .with("branch", branch)
                .with("loan_id", loan_id)
                .with("outstanding_amount", outstanding)
                .with("reported_on", Value::date(reported_on))
                .with("settlement_status", settlement)
        },
    )
    .collect()
}

fn write_offs() -> Vec<Record> {
    [
        ("L-4001", "Suresh Yadav", "North Branch", 2_340_000_i64, "Borrower migrated", "2024-02-28", "draft"),
        ("L-4002", "Anita Joshi", "Main Branch", 860_000, "", "2024-03-10", "submitted"),
        ("L-4003", "Vikram Patel", "South Branch", 5_100_000, "Business closure", "2024-01-31", "approved"),
    ]
    .into_iter()
    .map(
        |(id, customer, branch, amount, reason, write_off_date, status)| {
            Record::new(id)
                .with("loan_id", id)
                .with("customer_name", customer)
                .with("branch", branch)
                .with("amount", amount)
                .with("reason", reason)
                .with("write_off_date", Value::date(write_off_date))
                .with("status", status)
        },
    )
    .collect()
}

fn branch_audits() -> Vec<Record> {
    [
        ("A001", "Main Branch", "N. Krishnan", "2024-02-10", 88_i64, true, ""),
        ("A002", "North Branch", "P. Banerjee", "2024-02-24", 64, false, "Cash register mismatch"),
        ("A003", "South Branch", "N. Krishnan", "2024-03-09", 91, true, "Minor filing gaps"),
    ]
    .into_iter()
    .map(
        |(id, branch, auditor, audit_date, score, compliant, findings)| {
            Record::new(id)
                .with("audit_id", id)
                .with("branch", branch)
                .with("auditor", auditor)
                .with("audit_date", Value::date(audit_date))
                .with("score", score)
                .with("compliant", compliant)
                .with("findings", findings)
        },
    )
    .collect()
}

fn application_verification() -> Vec<Record> {
    [
        ("V001", "APP-2001", "Kavita Das", "Main Branch", "Sunita Rao", "2024-03-01", true, "pending"),
        ("V002", "APP-2002", "Mohan Lal", "North Branch", "", "2024-03-02", true, "pending"),
        ("V003", "APP-2003", "Farah Khan", "South Branch", "Ravi Kumar", "2024-02-27", false, "verified"),
    ]
    .into_iter()
    .map(
        |(id, application_id, applicant, branch, verifier, submitted_on, queued, status)| {
            Record::new(id)
                .with("application_id", application_id)
                .with("applicant_name", applicant)
                .with("branch", branch)
                .with("verifier", verifier)
                .with("submitted_on", Value::date(submitted_on))
                .with("queued", queued)
                .with("status", status)
        },
    )
    .collect()
}
