// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use mfdesk_app::{DataAccessError, FilterOptions, Mutation, Record, ReportKind, SeedOutcome};
use mfdesk_db::Store;

pub struct DbRuntime<'a> {
    store: &'a Store,
}

impl<'a> DbRuntime<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }
}

impl mfdesk_tui::AppRuntime for DbRuntime<'_> {
    fn fetch_records(
        &mut self,
        kind: ReportKind,
        criteria: Option<&FilterOptions>,
    ) -> Result<Vec<Record>, DataAccessError> {
        self.store
            .fetch_records(kind, criteria)
            .map_err(into_data_access_error)
    }

    fn apply_mutation(&mut self, mutation: &Mutation) -> Result<usize> {
        self.store.apply_mutation(mutation)
    }

    fn seed_reference_data(&mut self) -> Result<SeedOutcome> {
        self.store.seed_reference_data()
    }
}

// Typed failures from the store pass through; anything else (sqlite, io) is
// reported as the source being unavailable.
fn into_data_access_error(error: anyhow::Error) -> DataAccessError {
    match error.downcast::<DataAccessError>() {
        Ok(typed) => typed,
        Err(other) => DataAccessError::Unavailable(format!("{other:#}")),
    }
}

#[cfg(test)]
mod tests {
    use super::{DbRuntime, into_data_access_error};
    use anyhow::{Result, anyhow};
    use mfdesk_app::{
        DataAccessError, FilterOptions, FilterValue, Mutation, RecordId, ReportKind, Value,
    };
    use mfdesk_db::Store;
    use mfdesk_tui::AppRuntime;

    fn seeded_store() -> Result<Store> {
        let store = Store::open_memory()?;
        store.bootstrap()?;
        store.seed_reference_data()?;
        Ok(store)
    }

    #[test]
    fn fetch_passes_criteria_through() -> Result<()> {
        let store = seeded_store()?;
        let mut runtime = DbRuntime::new(&store);
        let digital = FilterOptions::new().with("collection_type", FilterValue::equals("digital"));
        let records = runtime.fetch_records(ReportKind::DueVsCollection, Some(&digital))?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("branch"), &Value::text("North Branch"));
        Ok(())
    }

    #[test]
    fn missing_table_is_reported_as_unavailable() -> Result<()> {
        let store = Store::open_memory()?;
        let mut runtime = DbRuntime::new(&store);
        let error = runtime
            .fetch_records(ReportKind::Roles, None)
            .expect_err("no schema");
        assert!(matches!(error, DataAccessError::Unavailable(_)));
        assert!(error.to_string().starts_with("data source unavailable"));
        Ok(())
    }

    #[test]
    fn typed_errors_survive_conversion() {
        let typed = anyhow::Error::new(DataAccessError::Unauthorized { report: "roles" });
        assert_eq!(
            into_data_access_error(typed),
            DataAccessError::Unauthorized { report: "roles" }
        );

        let wrapped = into_data_access_error(anyhow!("disk I/O error").context("fetch roles"));
        assert_eq!(
            wrapped,
            DataAccessError::Unavailable("fetch roles: disk I/O error".to_owned())
        );
    }

    #[test]
    fn mutations_and_seed_reach_the_store() -> Result<()> {
        let store = Store::open_memory()?;
        store.bootstrap()?;
        let mut runtime = DbRuntime::new(&store);

        let outcome = runtime.seed_reference_data()?;
        assert!(outcome.success);

        let affected = runtime.apply_mutation(&Mutation::SetRoleActive {
            role_id: RecordId::new("R001"),
            active: false,
        })?;
        assert_eq!(affected, 1);
        let role = store
            .get_record(ReportKind::Roles, &RecordId::new("R001"))?
            .expect("role exists");
        assert_eq!(role.get("status"), &Value::text("inactive"));
        Ok(())
    }
}
