use std::path::Path;
use std::time::Duration;

use log::{debug, info};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OpenFlags};

use crate::error::Result;

pub type DbPool = Pool<SqliteConnectionManager>;

const SCHEMA_SQL: &str = include_str!("schema.sql");
const SEED_SQL: &str = include_str!("seed.sql");

// Children before parents so foreign keys never block the drop
const DROP_SQL: &str = "
    DROP TABLE IF EXISTS article_views;
    DROP TABLE IF EXISTS comments;
    DROP TABLE IF EXISTS article_tags;
    DROP TABLE IF EXISTS tags;
    DROP TABLE IF EXISTS categories;
    DROP TABLE IF EXISTS articles;
    DROP TABLE IF EXISTS users;
";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

fn configure(manager: SqliteConnectionManager) -> SqliteConnectionManager {
    manager.with_init(|conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
    })
}

/// Opens (creating if needed) the database file and makes sure the schema exists
pub fn init_database(db_path: &Path, pool_size: u32) -> Result<DbPool> {
    let manager = SqliteConnectionManager::file(db_path)
        .with_flags(OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE);

    let pool = Pool::builder()
        .max_size(pool_size.max(1))
        .build(configure(manager))?;

    let conn = pool.get()?;
    init_schema(&conn)?;
    info!("Database ready at {}", db_path.display());

    Ok(pool)
}

/// Opens a pool on an existing database file without touching the schema
pub fn get_connection_pool(db_path: &Path, pool_size: u32) -> Result<DbPool> {
    let manager =
        SqliteConnectionManager::file(db_path).with_flags(OpenFlags::SQLITE_OPEN_READ_WRITE);
    let pool = Pool::builder()
        .max_size(pool_size.max(1))
        .build(configure(manager))?;
    Ok(pool)
}

/// A single-connection pool over a private in-memory database with the schema applied.
///
/// Every in-memory connection is its own database, so the pool is capped at one
/// connection that is never recycled.
pub fn memory_pool() -> Result<DbPool> {
    let pool = Pool::builder()
        .max_size(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .build(configure(SqliteConnectionManager::memory()))?;

    let conn = pool.get()?;
    init_schema(&conn)?;
    debug!("In-memory database initialized");

    Ok(pool)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    debug!("Applying schema");
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

pub fn drop_schema(conn: &Connection) -> Result<()> {
    info!("Dropping all tables");
    conn.execute_batch(DROP_SQL)?;
    Ok(())
}

/// Loads the bundled sample catalog into an empty schema
pub fn load_seed(conn: &Connection) -> Result<()> {
    info!("Loading sample catalog");
    conn.execute_batch(SEED_SQL)?;
    Ok(())
}
