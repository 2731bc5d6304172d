//! Per-test databases cloned from a migrated template.
//!
//! The template is named after a hash of `migrations/`, so editing a
//! migration produces a fresh template instead of reusing a stale schema.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use fishing_backend::domain::ports::UserRepositoryError;
use pg_embedded_setup_unpriv::test_support::hash_directory;
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use postgres::{Client, NoTls};
use uuid::Uuid;

use super::format_postgres_error;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const TEMPLATE_NAME_PREFIX: &str = "fishing_template";
const TEMPLATE_PROVISION_RETRIES: usize = 5;
const TEMPLATE_PROVISION_RETRY_DELAY: Duration = Duration::from_millis(500);

fn migrations_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations")
}

fn template_database_name() -> Result<String, UserRepositoryError> {
    let hash = hash_directory(migrations_dir())
        .map_err(|err| UserRepositoryError::query(format!("hash migrations: {err}")))?;
    let short_hash = hash.get(..8).unwrap_or(&hash);
    Ok(format!("{TEMPLATE_NAME_PREFIX}_{short_hash}"))
}

fn ensure_template_database(cluster: &ClusterHandle) -> Result<String, UserRepositoryError> {
    let template_name = template_database_name()?;
    let _lock = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let exists = cluster
        .database_exists(template_name.as_str())
        .map_err(|err| UserRepositoryError::query(format!("template check: {err:?}")))?;
    if !exists {
        cluster
            .create_database(template_name.as_str())
            .map_err(|err| UserRepositoryError::query(format!("create template: {err:?}")))?;
        let url = cluster.connection().database_url(&template_name);
        migrate_schema(&url)?;
    }
    Ok(template_name)
}

fn provision_attempt(
    cluster: &ClusterHandle,
    attempt: usize,
) -> Result<TemporaryDatabase, UserRepositoryError> {
    let template_name = ensure_template_database(cluster).map_err(|error| {
        UserRepositoryError::query(format!(
            "template check: attempt {attempt}/{TEMPLATE_PROVISION_RETRIES}: {error}"
        ))
    })?;
    let db_name = format!("test_{}", Uuid::new_v4().simple());
    cluster
        .temporary_database_from_template(db_name.as_str(), template_name.as_str())
        .map_err(|error| {
            UserRepositoryError::query(format!(
                "create database from template: attempt {attempt}/{TEMPLATE_PROVISION_RETRIES}: {error:?}"
            ))
        })
}

/// Provision a throwaway database with the current schema.
///
/// The database is dropped when the returned handle goes out of scope.
pub fn provision_template_database(
    cluster: &ClusterHandle,
) -> Result<TemporaryDatabase, UserRepositoryError> {
    let mut last_error = None;
    for attempt in 1..=TEMPLATE_PROVISION_RETRIES {
        match provision_attempt(cluster, attempt) {
            Ok(database) => return Ok(database),
            Err(error) => last_error = Some(error),
        }
        if attempt < TEMPLATE_PROVISION_RETRIES {
            std::thread::sleep(TEMPLATE_PROVISION_RETRY_DELAY);
        }
    }
    Err(last_error.unwrap_or_else(|| {
        UserRepositoryError::query("create database from template: exhausted retries")
    }))
}

/// Apply the embedded Diesel migrations to `url`.
pub fn migrate_schema(url: &str) -> Result<(), UserRepositoryError> {
    let mut conn = PgConnection::establish(url)
        .map_err(|err| UserRepositoryError::connection(format!("{err:?}")))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|err| UserRepositoryError::query(format!("migration: {err:?}")))?;
    Ok(())
}

/// Drop `table` and everything referencing it.
pub fn drop_table(url: &str, table: &str) -> Result<(), UserRepositoryError> {
    let mut client = Client::connect(url, NoTls)
        .map_err(|err| UserRepositoryError::connection(format_postgres_error(&err)))?;
    let escaped = table.replace('"', "\"\"");
    client
        .batch_execute(&format!(r#"DROP TABLE IF EXISTS "{escaped}" CASCADE"#))
        .map_err(|err| UserRepositoryError::query(format_postgres_error(&err)))
}

/// Count the rows of `table` that belong to `user_id`.
pub fn count_owned_rows(url: &str, table: &str, user_id: Uuid) -> Result<i64, UserRepositoryError> {
    let mut client = Client::connect(url, NoTls)
        .map_err(|err| UserRepositoryError::connection(format_postgres_error(&err)))?;
    let escaped = table.replace('"', "\"\"");
    let row = client
        .query_one(
            &format!(r#"SELECT COUNT(*) FROM "{escaped}" WHERE user_id = $1"#),
            &[&user_id],
        )
        .map_err(|err| UserRepositoryError::query(format_postgres_error(&err)))?;
    Ok(row.get(0))
}
