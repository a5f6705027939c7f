// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod seed;

use anyhow::{Context, Result, anyhow, bail};
use mfdesk_app::{
    DataAccessError, FilterOptions, Mutation, Record, RecordId, ReportKind, SeedOutcome, Value,
    apply_filters,
};
use rusqlite::{Connection, ErrorCode, OptionalExtension, params};
use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use tracing::{debug, info};

pub use seed::reference_records;

pub const APP_NAME: &str = "mfdesk";

const RECORDS_TABLE: &str = "records";

const RECORD_COLUMNS: &[&str] = &[
    "id",
    "report_kind",
    "record_id",
    "payload",
    "created_at",
    "updated_at",
];

/// `(name, create statement)`; created on every bootstrap.
const RECORD_INDEXES: &[(&str, &str)] = &[
    (
        "idx_records_kind_record_id",
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_records_kind_record_id ON records (report_kind, record_id);",
    ),
    (
        "idx_records_kind",
        "CREATE INDEX IF NOT EXISTS idx_records_kind ON records (report_kind, id);",
    ),
];

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let printable = path.to_string_lossy().to_string();
        validate_db_path(&printable)?;
        let conn = Connection::open(path)
            .with_context(|| format!("open database at {}", path.display()))?;
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory database")?;
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn raw_connection(&self) -> &Connection {
        &self.conn
    }

    pub fn bootstrap(&self) -> Result<()> {
        if has_user_tables(&self.conn)? {
            validate_schema(&self.conn)?;
        } else {
            self.conn
                .execute_batch(include_str!("sql/schema.sql"))
                .context("create schema")?;
        }

        ensure_record_indexes(&self.conn)?;
        Ok(())
    }

    /// Loads a report's records in insertion order. Criteria, when given,
    /// are applied in memory with the same evaluator the table uses.
    pub fn fetch_records(
        &self,
        kind: ReportKind,
        criteria: Option<&FilterOptions>,
    ) -> Result<Vec<Record>> {
        let mut stmt = self
            .conn
            .prepare(
                "
                SELECT record_id, payload
                FROM records
                WHERE report_kind = ?
                ORDER BY id ASC
                ",
            )
            .map_err(|err| read_error(kind, err, "prepare fetch for"))?;
        let rows = stmt
            .query_map(params![kind.as_str()], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(|err| read_error(kind, err, "query"))?;

        let mut records = Vec::new();
        for row in rows {
            let (record_id, payload) = row.map_err(|err| read_error(kind, err, "read row from"))?;
            records.push(decode_record(kind, record_id, &payload)?);
        }

        let total = records.len();
        let records = match criteria {
            Some(criteria) if !criteria.is_unconstrained() => apply_filters(&records, criteria),
            _ => records,
        };
        debug!(
            report = kind.as_str(),
            total,
            returned = records.len(),
            "fetched records"
        );
        Ok(records)
    }

    pub fn get_record(&self, kind: ReportKind, record_id: &RecordId) -> Result<Option<Record>> {
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT payload FROM records WHERE report_kind = ? AND record_id = ?",
                params![kind.as_str(), record_id.as_str()],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("load {} {record_id}", kind.as_str()))?;
        payload
            .map(|payload| decode_record(kind, record_id.as_str().to_owned(), &payload))
            .transpose()
    }

    /// Inserts or replaces one record, keeping its original position.
    pub fn put_record(&self, kind: ReportKind, record: &Record) -> Result<()> {
        let now = now_rfc3339()?;
        let payload = encode_payload(record)?;
        self.conn
            .execute(
                "
                INSERT INTO records (report_kind, record_id, payload, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?)
                ON CONFLICT (report_kind, record_id)
                DO UPDATE SET payload = excluded.payload, updated_at = excluded.updated_at
                ",
                params![kind.as_str(), record.id.as_str(), payload, now, now],
            )
            .with_context(|| format!("save {} {}", kind.as_str(), record.id))?;
        Ok(())
    }

    pub fn record_count(&self, kind: ReportKind) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM records WHERE report_kind = ?",
                params![kind.as_str()],
                |row| row.get(0),
            )
            .with_context(|| format!("count {}", kind.as_str()))?;
        usize::try_from(count).with_context(|| format!("invalid count {count}"))
    }

    /// Applies a workflow action and returns how many records changed.
    pub fn apply_mutation(&self, mutation: &Mutation) -> Result<usize> {
        let affected = match mutation {
            Mutation::SetRoleActive { role_id, active } => {
                let status = if *active { "active" } else { "inactive" };
                self.update_record(ReportKind::Roles, role_id, |record| {
                    record.set("status", status);
                    record.set("updated_on", Value::date(today()?));
                    Ok(())
                })?;
                1
            }
            Mutation::SubmitWriteOff { loan_id } => {
                self.update_record(ReportKind::WriteOff, loan_id, |record| {
                    match record.get("status").as_str() {
                        Some("approved") => bail!("write-off {loan_id} is already approved"),
                        Some("submitted") => bail!("write-off {loan_id} is already submitted"),
                        _ => {}
                    }
                    record.set("status", "submitted");
                    Ok(())
                })?;
                1
            }
            Mutation::SettleDeathCase { case_id } => {
                self.update_record(ReportKind::DeathCase, case_id, |record| {
                    if record.get("settlement_status").as_str() == Some("settled") {
                        bail!("death case {case_id} is already settled");
                    }
                    record.set("settlement_status", "settled");
                    Ok(())
                })?;
                1
            }
            Mutation::ClearQueue { kind } => {
                if *kind != ReportKind::ApplicationVerification {
                    bail!("{} has no verification queue", kind.title());
                }
                let tx = self
                    .conn
                    .unchecked_transaction()
                    .context("begin queue clear transaction")?;
                let mut cleared = 0usize;
                for mut record in self.fetch_records(*kind, None)? {
                    if record.get("queued").as_bool() == Some(true) {
                        record.set("queued", false);
                        self.put_record(*kind, &record)?;
                        cleared += 1;
                    }
                }
                tx.commit().context("commit queue clear transaction")?;
                cleared
            }
        };
        info!(
            report = mutation.report().as_str(),
            affected,
            "{}",
            mutation.describe()
        );
        Ok(affected)
    }

    /// Loads the reference sample set. Existing records are left alone, so
    /// running it twice changes nothing.
    pub fn seed_reference_data(&self) -> Result<SeedOutcome> {
        let now = now_rfc3339()?;
        let tx = self
            .conn
            .unchecked_transaction()
            .context("begin seed transaction")?;
        let mut inserted = 0usize;
        for kind in ReportKind::ALL {
            for record in reference_records(kind) {
                let payload = encode_payload(&record)?;
                inserted += tx
                    .execute(
                        "
                        INSERT INTO records (report_kind, record_id, payload, created_at, updated_at)
                        VALUES (?, ?, ?, ?, ?)
                        ON CONFLICT (report_kind, record_id) DO NOTHING
                        ",
                        params![kind.as_str(), record.id.as_str(), payload, now, now],
                    )
                    .with_context(|| format!("seed {} {}", kind.as_str(), record.id))?;
            }
        }
        tx.commit().context("commit seed transaction")?;

        let message = if inserted == 0 {
            "reference data already present".to_owned()
        } else {
            format!(
                "seeded {inserted} records across {} reports",
                ReportKind::ALL.len()
            )
        };
        info!(inserted, "{message}");
        Ok(SeedOutcome {
            success: true,
            message,
        })
    }

    pub fn report_counts(&self) -> Result<BTreeMap<ReportKind, usize>> {
        ReportKind::ALL
            .into_iter()
            .map(|kind| Ok((kind, self.record_count(kind)?)))
            .collect()
    }

    fn update_record(
        &self,
        kind: ReportKind,
        record_id: &RecordId,
        change: impl FnOnce(&mut Record) -> Result<()>,
    ) -> Result<()> {
        let mut record = self
            .get_record(kind, record_id)?
            .ok_or_else(|| anyhow!("{} {record_id} not found", kind.title()))?;
        change(&mut record)?;
        self.put_record(kind, &record)
    }
}

/// Authorizer and permission denials surface as
/// [`DataAccessError::Unauthorized`]; everything else keeps its context.
fn read_error(kind: ReportKind, err: rusqlite::Error, action: &str) -> anyhow::Error {
    match err.sqlite_error_code() {
        Some(ErrorCode::AuthorizationForStatementDenied | ErrorCode::PermissionDenied) => {
            anyhow::Error::new(DataAccessError::Unauthorized {
                report: kind.as_str(),
            })
        }
        _ => anyhow::Error::new(err).context(format!("{action} {}", kind.as_str())),
    }
}

/// Payloads hold every field except the mirrored id.
fn encode_payload(record: &Record) -> Result<String> {
    let fields = record
        .fields
        .iter()
        .filter(|(key, _)| key.as_str() != mfdesk_app::ID_FIELD)
        .collect::<BTreeMap<_, _>>();
    serde_json::to_string(&fields).with_context(|| format!("encode record {}", record.id))
}

fn decode_record(kind: ReportKind, record_id: String, payload: &str) -> Result<Record> {
    let fields: BTreeMap<String, Value> = serde_json::from_str(payload).map_err(|err| {
        DataAccessError::Decode {
            report: kind.as_str(),
            record_id: record_id.clone(),
            reason: err.to_string(),
        }
    })?;
    let mut record = Record::new(record_id);
    for (key, value) in fields {
        record.set(&key, value);
    }
    Ok(record)
}

pub fn default_db_path() -> Result<PathBuf> {
    if let Some(override_path) = env::var_os("MFDESK_DB_PATH") {
        return Ok(PathBuf::from(override_path));
    }

    let app_dir = data_dir()?;
    Ok(app_dir.join("mfdesk.db"))
}

/// Platform data directory for mfdesk, created on first use.
pub fn data_dir() -> Result<PathBuf> {
    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set MFDESK_DB_PATH to a writable database path")
    })?;

    let app_dir = data_root.join(APP_NAME);
    fs::create_dir_all(&app_dir)
        .with_context(|| format!("create data directory {}", app_dir.display()))?;
    Ok(app_dir)
}

pub fn validate_db_path(path: &str) -> Result<()> {
    if path.is_empty() {
        bail!("database path must not be empty");
    }
    if path == ":memory:" {
        return Ok(());
    }

    if let Some(index) = path.find("://")
        && index > 0
    {
        let scheme = &path[..index];
        if scheme.chars().all(char::is_alphabetic) {
            bail!(
                "database path {path:?} looks like a URI ({scheme}://); pass a filesystem path instead"
            );
        }
    }

    if path.starts_with("file:") {
        bail!("database path {path:?} uses file: URI syntax; pass a plain filesystem path");
    }

    if path.contains('?') {
        bail!(
            "database path {path:?} contains '?'; remove query parameters and use a plain file path"
        );
    }

    Ok(())
}

fn has_user_tables(conn: &Connection) -> Result<bool> {
    let count: i64 = conn
        .query_row(
            "
            SELECT COUNT(*)
            FROM sqlite_master
            WHERE type = 'table'
              AND name NOT LIKE 'sqlite_%'
            ",
            [],
            |row| row.get(0),
        )
        .context("count user tables")?;
    Ok(count > 0)
}

fn validate_schema(conn: &Connection) -> Result<()> {
    let columns = table_columns(conn, RECORDS_TABLE)?;
    if columns.is_empty() {
        bail!(
            "database is missing required table `{RECORDS_TABLE}`; use an mfdesk database or start with --demo"
        );
    }

    let missing: Vec<&str> = RECORD_COLUMNS
        .iter()
        .copied()
        .filter(|column| !columns.contains(*column))
        .collect();
    if !missing.is_empty() {
        bail!(
            "table `{RECORDS_TABLE}` is missing required columns: {}; run migration before launching",
            missing.join(", ")
        );
    }

    Ok(())
}

fn ensure_record_indexes(conn: &Connection) -> Result<()> {
    for (name, create_sql) in RECORD_INDEXES {
        conn.execute_batch(create_sql)
            .with_context(|| format!("ensure index `{name}`; run migration before launching"))?;
    }
    Ok(())
}

// An unknown table yields no rows.
fn table_columns(conn: &Connection, table: &str) -> Result<BTreeSet<String>> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table})"))
        .with_context(|| format!("inspect columns for {table}"))?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .with_context(|| format!("query column info for {table}"))?;

    let names = rows
        .collect::<rusqlite::Result<BTreeSet<_>>>()
        .with_context(|| format!("collect columns for {table}"))?;
    Ok(names)
}

fn configure_connection(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        ",
    )
    .context("configure sqlite pragmas")
}

fn now_rfc3339() -> Result<String> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("format current timestamp")
}

fn today() -> Result<String> {
    OffsetDateTime::now_utc()
        .date()
        .format(&format_description!("[year]-[month]-[day]"))
        .context("format current date")
}

#[cfg(test)]
mod tests {
    use super::{decode_record, encode_payload, read_error};
    use mfdesk_app::{DataAccessError, Record, ReportKind, Value};

    #[test]
    fn payload_round_trip_restores_id_and_typed_fields() {
        let record = Record::new("EMP003")
            .with("latitude", 0.0)
            .with("device_id", "")
            .with("date", Value::date("2024-03-01"))
            .with("queued", true);
        let payload = encode_payload(&record).expect("encode");
        assert!(!payload.contains("EMP003"), "id is stored in its own column");

        let decoded = decode_record(ReportKind::EmployeeAttendance, "EMP003".to_owned(), &payload)
            .expect("decode");
        assert_eq!(decoded, record);
    }

    #[test]
    fn malformed_payload_is_a_typed_decode_error() {
        let err = decode_record(ReportKind::Roles, "R001".to_owned(), "{not json")
            .expect_err("payload is malformed");
        let decode = err
            .downcast_ref::<DataAccessError>()
            .expect("decode errors keep their type");
        assert!(matches!(decode, DataAccessError::Decode { record_id, .. } if record_id == "R001"));
    }

    #[test]
    fn authorization_denials_become_unauthorized() {
        let denied = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_AUTH),
            None,
        );
        let err = read_error(ReportKind::Roles, denied, "query");
        assert_eq!(
            err.downcast_ref::<DataAccessError>(),
            Some(&DataAccessError::Unauthorized { report: "roles" })
        );

        let busy = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            None,
        );
        let err = read_error(ReportKind::Roles, busy, "query");
        assert!(err.downcast_ref::<DataAccessError>().is_none());
        assert!(format!("{err:#}").starts_with("query roles"));
    }
}
