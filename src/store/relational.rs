//! Relational contact store
//!
//! Keeps contacts in a SQLite `contacts` table. Glob patterns are pushed
//! down to the database as `LIKE` expressions.
//!
//! sqlx is async, the store contract is not: the store owns a small tokio
//! runtime and blocks on it for each call.

use std::str::FromStr;

use parking_lot::Mutex;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tokio::runtime::{Builder, Runtime};

use crate::contact::{Contact, ContactPatch};
use crate::error::Result;
use crate::pattern::NamePattern;

use super::{contact_exists, name_taken, no_such_contact, ContactStore};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS contacts (
    name    TEXT PRIMARY KEY NOT NULL,
    phone   TEXT NOT NULL,
    address TEXT NOT NULL
)";

const SELECT_ALL: &str = "SELECT name, phone, address FROM contacts ORDER BY name";
const SELECT_EXACT: &str = "SELECT name, phone, address FROM contacts WHERE name = ?";
const SELECT_LIKE: &str =
    "SELECT name, phone, address FROM contacts WHERE name LIKE ? ESCAPE '\\' ORDER BY name";

const INSERT: &str = "INSERT INTO contacts (name, phone, address) VALUES (?, ?, ?)";

const DELETE_ALL: &str = "DELETE FROM contacts";
const DELETE_EXACT: &str = "DELETE FROM contacts WHERE name = ?";
const DELETE_LIKE: &str = "DELETE FROM contacts WHERE name LIKE ? ESCAPE '\\'";

const COUNT: &str = "SELECT COUNT(*) FROM contacts";

/// Pool size for file-backed databases
const MAX_POOL_CONNECTIONS: u32 = 8;

type ContactRow = (String, String, String);

/// Contacts stored in SQLite
///
/// ## Concurrency:
/// - Reads go straight to the pool and run concurrently
/// - Writes are serialized by `write_lock` so multi-statement updates never
///   race each other for the SQLite write lock
pub struct RelationalStore {
    pool: SqlitePool,

    /// Serializes write operations (insert/delete/update)
    write_lock: Mutex<()>,

    /// Drives the pool; dropped after it
    runtime: Runtime,
}

impl RelationalStore {
    /// Connect to `database_url` (e.g. `sqlite://contacts.db` or
    /// `sqlite::memory:`) and create the `contacts` table if needed
    pub fn open(database_url: &str) -> Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("addressbook-sql")
            .enable_all()
            .build()?;

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        // Every connection to an in-memory database sees its own empty
        // database, so pin the pool to one long-lived connection.
        let pool_options = if is_memory_url(database_url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(MAX_POOL_CONNECTIONS)
        };

        let pool = runtime.block_on(async {
            let pool = pool_options.connect_with(options).await?;
            sqlx::query(CREATE_TABLE).execute(&pool).await?;
            Ok::<_, sqlx::Error>(pool)
        })?;

        tracing::debug!(url = %database_url, "Relational contact store opened");

        Ok(Self {
            pool,
            write_lock: Mutex::new(()),
            runtime,
        })
    }
}

impl Drop for RelationalStore {
    // The pool must shut down while its runtime is still alive
    fn drop(&mut self) {
        self.runtime.block_on(self.pool.close());
    }
}

impl ContactStore for RelationalStore {
    fn insert(&self, contact: Contact) -> Result<()> {
        let _write_guard = self.write_lock.lock();

        let result = self.runtime.block_on(
            sqlx::query(INSERT)
                .bind(&contact.name)
                .bind(&contact.phone)
                .bind(&contact.address)
                .execute(&self.pool),
        );

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(contact_exists(&contact.name))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn get(&self, name: &str) -> Result<Option<Contact>> {
        let row: Option<ContactRow> = self.runtime.block_on(
            sqlx::query_as(SELECT_EXACT)
                .bind(name)
                .fetch_optional(&self.pool),
        )?;

        Ok(row.map(contact_from_row))
    }

    fn find(&self, pattern: &NamePattern) -> Result<Vec<Contact>> {
        let rows: Vec<ContactRow> = match pattern {
            NamePattern::All => self
                .runtime
                .block_on(sqlx::query_as(SELECT_ALL).fetch_all(&self.pool))?,
            NamePattern::Exact(name) => self.runtime.block_on(
                sqlx::query_as(SELECT_EXACT)
                    .bind(name)
                    .fetch_all(&self.pool),
            )?,
            NamePattern::Glob { .. } => {
                let like = pattern.to_sql_like()?;
                self.runtime.block_on(
                    sqlx::query_as(SELECT_LIKE)
                        .bind(like)
                        .fetch_all(&self.pool),
                )?
            }
        };

        Ok(rows.into_iter().map(contact_from_row).collect())
    }

    fn delete(&self, pattern: &NamePattern) -> Result<usize> {
        let _write_guard = self.write_lock.lock();

        let result = match pattern {
            NamePattern::All => self
                .runtime
                .block_on(sqlx::query(DELETE_ALL).execute(&self.pool))?,
            NamePattern::Exact(name) => self
                .runtime
                .block_on(sqlx::query(DELETE_EXACT).bind(name).execute(&self.pool))?,
            NamePattern::Glob { .. } => {
                let like = pattern.to_sql_like()?;
                self.runtime
                    .block_on(sqlx::query(DELETE_LIKE).bind(like).execute(&self.pool))?
            }
        };

        Ok(result.rows_affected() as usize)
    }

    fn update(&self, name: &str, patch: &ContactPatch) -> Result<Contact> {
        let _write_guard = self.write_lock.lock();
        self.runtime.block_on(update_in_transaction(&self.pool, name, patch))
    }

    fn len(&self) -> Result<usize> {
        let count: i64 = self
            .runtime
            .block_on(sqlx::query_scalar(COUNT).fetch_one(&self.pool))?;
        Ok(count as usize)
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}

/// Select, merge, collision-check and move in one transaction.
/// Returning early drops `tx`, which rolls it back.
async fn update_in_transaction(
    pool: &SqlitePool,
    name: &str,
    patch: &ContactPatch,
) -> Result<Contact> {
    let mut tx = pool.begin().await?;

    let current: Option<ContactRow> = sqlx::query_as(SELECT_EXACT)
        .bind(name)
        .fetch_optional(&mut *tx)
        .await?;
    let current = match current {
        Some(row) => contact_from_row(row),
        None => return Err(no_such_contact(name)),
    };

    let merged = current.merged(patch);

    if merged.name != name {
        let taken: Option<ContactRow> = sqlx::query_as(SELECT_EXACT)
            .bind(&merged.name)
            .fetch_optional(&mut *tx)
            .await?;
        if taken.is_some() {
            return Err(name_taken(&merged.name));
        }
    }

    sqlx::query(DELETE_EXACT)
        .bind(name)
        .execute(&mut *tx)
        .await?;
    sqlx::query(INSERT)
        .bind(&merged.name)
        .bind(&merged.phone)
        .bind(&merged.address)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(merged)
}

fn contact_from_row((name, phone, address): ContactRow) -> Contact {
    Contact {
        name,
        phone,
        address,
    }
}

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}
