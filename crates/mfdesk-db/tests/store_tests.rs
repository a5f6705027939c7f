// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use mfdesk_app::{
    DataAccessError, FilterOptions, FilterValue, Mutation, Record, RecordId, ReportKind, Value,
};
use mfdesk_db::{Store, reference_records, validate_db_path};
use mfdesk_testkit::{ReportFaker, temp_db_path};

fn seeded() -> Result<Store> {
    let store = Store::open_memory()?;
    store.bootstrap()?;
    store.seed_reference_data()?;
    Ok(store)
}

fn ids(records: &[Record]) -> Vec<&str> {
    records.iter().map(|record| record.id.as_str()).collect()
}

#[test]
fn validate_db_path_rejects_uri_forms() {
    assert!(validate_db_path("file:test.db").is_err());
    assert!(validate_db_path("https://example.com/db.sqlite").is_err());
    assert!(validate_db_path("db.sqlite?mode=ro").is_err());
    assert!(validate_db_path("").is_err());
    assert!(validate_db_path("/tmp/mfdesk.db").is_ok());
    assert!(validate_db_path(":memory:").is_ok());
}

#[test]
fn bootstrap_creates_schema_and_is_repeatable() -> Result<()> {
    let store = Store::open_memory()?;
    store.bootstrap()?;
    store.bootstrap()?;
    for kind in ReportKind::ALL {
        assert_eq!(store.record_count(kind)?, 0);
    }
    Ok(())
}

#[test]
fn bootstrap_rejects_schema_missing_required_column() -> Result<()> {
    let store = Store::open_memory()?;
    store.bootstrap()?;

    store.raw_connection().execute_batch(
        "
            DROP TABLE records;
            CREATE TABLE records (
              id INTEGER PRIMARY KEY,
              report_kind TEXT NOT NULL,
              record_id TEXT NOT NULL,
              created_at TEXT NOT NULL,
              updated_at TEXT NOT NULL
            );
            ",
    )?;

    let err = store
        .bootstrap()
        .expect_err("schema validation should fail");
    let message = err.to_string();
    assert!(message.contains("table `records` is missing required columns"));
    assert!(message.contains("payload"));
    Ok(())
}

#[test]
fn bootstrap_rejects_foreign_database() -> Result<()> {
    let store = Store::open_memory()?;
    store
        .raw_connection()
        .execute_batch("CREATE TABLE projects (id INTEGER PRIMARY KEY);")?;
    let err = store.bootstrap().expect_err("foreign schema");
    assert!(err.to_string().contains("missing required table `records`"));
    Ok(())
}

#[test]
fn seed_is_idempotent() -> Result<()> {
    let store = Store::open_memory()?;
    store.bootstrap()?;

    let first = store.seed_reference_data()?;
    assert!(first.success);
    assert!(first.message.starts_with("seeded "));
    let counts = store.report_counts()?;

    let second = store.seed_reference_data()?;
    assert!(second.success);
    assert_eq!(second.message, "reference data already present");
    assert_eq!(store.report_counts()?, counts);

    for kind in ReportKind::ALL {
        assert_eq!(store.record_count(kind)?, reference_records(kind).len());
    }
    Ok(())
}

#[test]
fn fetch_returns_insertion_order_and_typed_values() -> Result<()> {
    let store = seeded()?;
    let records = store.fetch_records(ReportKind::DueVsCollection, None)?;
    assert_eq!(ids(&records), ["1", "2", "3"]);
    assert_eq!(records[1].get("branch"), &Value::text("North Branch"));
    assert_eq!(records[1].get("date"), &Value::date("2024-02-15"));
    assert_eq!(records[1].get("due_amount"), &Value::Integer(9_800_000));
    assert_eq!(records[0], reference_records(ReportKind::DueVsCollection)[0]);
    Ok(())
}

#[test]
fn fetch_applies_criteria_in_memory() -> Result<()> {
    let store = seeded()?;

    let north_february = FilterOptions::new()
        .with("branch", FilterValue::contains("north"))
        .with("date", FilterValue::between("2024-02-01", "2024-02-29"));
    let records = store.fetch_records(ReportKind::DueVsCollection, Some(&north_february))?;
    assert_eq!(ids(&records), ["2"]);

    let cash = FilterOptions::new().with("collection_type", FilterValue::equals("cash"));
    assert_eq!(
        ids(&store.fetch_records(ReportKind::DueVsCollection, Some(&cash))?),
        ["1"]
    );

    let partners = FilterOptions::new().with("bc_partner_id", FilterValue::contains("bcp"));
    assert_eq!(
        store
            .fetch_records(ReportKind::DueVsCollection, Some(&partners))?
            .len(),
        3
    );
    Ok(())
}

#[test]
fn attendance_scenario_narrows_by_state_then_zone() -> Result<()> {
    let store = seeded()?;
    let delhi = FilterOptions::new().with("state", FilterValue::equals("Delhi"));
    let records = store.fetch_records(ReportKind::EmployeeAttendance, Some(&delhi))?;
    assert_eq!(ids(&records), ["EMP001", "EMP002", "EMP003"]);

    let south = delhi.with("zone", FilterValue::equals("South Zone"));
    let records = store.fetch_records(ReportKind::EmployeeAttendance, Some(&south))?;
    assert_eq!(ids(&records), ["EMP003"]);
    assert_eq!(records[0].get("latitude").as_f64(), Some(0.0));
    assert!(records[0].get("device_id").is_empty());
    Ok(())
}

#[test]
fn empty_report_is_not_an_error() -> Result<()> {
    let store = Store::open_memory()?;
    store.bootstrap()?;
    assert!(store.fetch_records(ReportKind::WriteOff, None)?.is_empty());
    Ok(())
}

#[test]
fn corrupt_payload_surfaces_decode_error() -> Result<()> {
    let store = seeded()?;
    store.raw_connection().execute(
        "UPDATE records SET payload = '{broken' WHERE report_kind = 'roles' AND record_id = 'R002'",
        [],
    )?;
    let err = store
        .fetch_records(ReportKind::Roles, None)
        .expect_err("corrupt payload");
    assert!(matches!(
        err.downcast_ref::<DataAccessError>(),
        Some(DataAccessError::Decode { report: "roles", .. })
    ));
    Ok(())
}

#[test]
fn role_toggle_rewrites_status() -> Result<()> {
    let store = seeded()?;
    let affected = store.apply_mutation(&Mutation::SetRoleActive {
        role_id: RecordId::new("R004"),
        active: true,
    })?;
    assert_eq!(affected, 1);

    let role = store
        .get_record(ReportKind::Roles, &RecordId::new("R004"))?
        .expect("role exists");
    assert_eq!(role.get("status"), &Value::text("active"));
    assert_ne!(role.get("updated_on"), &Value::date("2023-11-20"));

    let records = store.fetch_records(ReportKind::Roles, None)?;
    assert_eq!(ids(&records)[3], "R004", "update keeps position");
    Ok(())
}

#[test]
fn write_off_submission_and_guards() -> Result<()> {
    let store = seeded()?;
    store.apply_mutation(&Mutation::SubmitWriteOff {
        loan_id: RecordId::new("L-4001"),
    })?;
    let loan = store
        .get_record(ReportKind::WriteOff, &RecordId::new("L-4001"))?
        .expect("loan exists");
    assert_eq!(loan.get("status"), &Value::text("submitted"));

    let err = store
        .apply_mutation(&Mutation::SubmitWriteOff {
            loan_id: RecordId::new("L-4003"),
        })
        .expect_err("approved write-off cannot be resubmitted");
    assert!(err.to_string().contains("already approved"));

    let missing = store
        .apply_mutation(&Mutation::SubmitWriteOff {
            loan_id: RecordId::new("L-9999"),
        })
        .expect_err("unknown loan");
    assert!(missing.to_string().contains("not found"));
    Ok(())
}

#[test]
fn death_case_settlement() -> Result<()> {
    let store = seeded()?;
    store.apply_mutation(&Mutation::SettleDeathCase {
        case_id: RecordId::new("DC-01"),
    })?;
    let settled = FilterOptions::new().with("settlement_status", FilterValue::equals("settled"));
    let records = store.fetch_records(ReportKind::DeathCase, Some(&settled))?;
    assert_eq!(ids(&records), ["DC-01", "DC-02"]);

    assert!(
        store
            .apply_mutation(&Mutation::SettleDeathCase {
                case_id: RecordId::new("DC-02"),
            })
            .is_err()
    );
    Ok(())
}

#[test]
fn clearing_queue_unflags_every_queued_application() -> Result<()> {
    let store = seeded()?;
    let cleared = store.apply_mutation(&Mutation::ClearQueue {
        kind: ReportKind::ApplicationVerification,
    })?;
    assert_eq!(cleared, 2);

    let queued = FilterOptions::new().with("queued", FilterValue::Flag(Some(true)));
    assert!(
        store
            .fetch_records(ReportKind::ApplicationVerification, Some(&queued))?
            .is_empty()
    );
    assert_eq!(
        store.apply_mutation(&Mutation::ClearQueue {
            kind: ReportKind::ApplicationVerification,
        })?,
        0
    );

    assert!(
        store
            .apply_mutation(&Mutation::ClearQueue {
                kind: ReportKind::Roles,
            })
            .is_err()
    );
    Ok(())
}

#[test]
fn failed_queue_clear_leaves_every_application_queued() -> Result<()> {
    let store = seeded()?;
    store.raw_connection().execute_batch(
        "
            CREATE TRIGGER block_v002 BEFORE UPDATE ON records
            WHEN NEW.record_id = 'V002'
            BEGIN
              SELECT RAISE(ABORT, 'V002 is locked');
            END;
            ",
    )?;

    let err = store
        .apply_mutation(&Mutation::ClearQueue {
            kind: ReportKind::ApplicationVerification,
        })
        .expect_err("second write fails");
    assert!(format!("{err:#}").contains("V002 is locked"));

    let queued = FilterOptions::new().with("queued", FilterValue::Flag(Some(true)));
    assert_eq!(
        ids(&store.fetch_records(ReportKind::ApplicationVerification, Some(&queued))?),
        ["V001", "V002"]
    );

    store
        .raw_connection()
        .execute_batch("DROP TRIGGER block_v002;")?;
    assert_eq!(
        store.apply_mutation(&Mutation::ClearQueue {
            kind: ReportKind::ApplicationVerification,
        })?,
        2
    );
    assert!(
        store
            .fetch_records(ReportKind::ApplicationVerification, Some(&queued))?
            .is_empty()
    );
    Ok(())
}

#[test]
fn put_record_round_trips_faker_batches_on_disk() -> Result<()> {
    let (_dir, path) = temp_db_path()?;
    let mut faker = ReportFaker::new(21);
    let batch = faker.records(ReportKind::BranchAudit, 15);
    {
        let store = Store::open(&path)?;
        store.bootstrap()?;
        for record in &batch {
            store.put_record(ReportKind::BranchAudit, record)?;
        }
    }

    let reopened = Store::open(&path)?;
    reopened.bootstrap()?;
    assert_eq!(reopened.fetch_records(ReportKind::BranchAudit, None)?, batch);
    assert_eq!(reopened.record_count(ReportKind::CreditBureau)?, 0);
    Ok(())
}
