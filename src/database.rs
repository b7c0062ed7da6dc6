use actix::prelude::*;
use rusqlite::{Connection, Row};
use std::fs;
use std::path::Path;

use crate::errors::JoblyError;
use crate::sql::SqlValue;

const DATABASE_FILE: &str = "jobly-database.db";

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS companies (
        handle TEXT PRIMARY KEY CHECK (handle = lower(handle)),
        name TEXT UNIQUE NOT NULL,
        num_employees INTEGER CHECK (num_employees >= 0),
        description TEXT NOT NULL,
        logo_url TEXT
    );

    CREATE TABLE IF NOT EXISTS jobs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT UNIQUE NOT NULL,
        salary INTEGER CHECK (salary >= 0),
        equity REAL CHECK (equity <= 1.0),
        company_handle TEXT NOT NULL
            REFERENCES companies ON DELETE CASCADE
    );
";

pub struct Database {
    connection: rusqlite::Connection,
}

impl Database {
    pub fn open(path: &str) -> Result<Self, JoblyError> {
        fs::create_dir_all(path).map_err(|err| JoblyError::CreateDatabaseDir { source: err })?;

        let database_path_buf = Path::new(path).join(DATABASE_FILE);
        let database_path = database_path_buf
            .to_str()
            .ok_or_else(|| JoblyError::DatabasePath {
                path: path.to_owned(),
            })?;

        let connection = Connection::open(database_path)?;

        Ok(Self { connection })
    }

    pub fn in_memory() -> Result<Self, JoblyError> {
        let connection = Connection::open_in_memory()?;
        Ok(Self { connection })
    }

    fn prepare_schema(&self) -> rusqlite::Result<()> {
        self.connection.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.connection.execute_batch(SCHEMA)
    }
}

impl Actor for Database {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Context<Self>) {
        debug!("Connected to the database");
        debug!("Preparing database schema");
        if let Err(err) = self.prepare_schema() {
            error!("Failed to prepare database schema: {}", err);
            System::current().stop();
        }
    }

    fn stopped(&mut self, _ctx: &mut Context<Self>) {
        debug!("Disconnected from database");
    }
}

/// Runs a statement and replies with the number of changed rows.
#[derive(Message)]
#[rtype(result = "rusqlite::Result<usize>")]
pub struct Execute {
    pub query: String,
    pub params: Vec<SqlValue>,
}

impl Handler<Execute> for Database {
    type Result = rusqlite::Result<usize>;

    fn handle(&mut self, execute: Execute, _ctx: &mut Context<Self>) -> Self::Result {
        self.connection
            .execute(execute.query.as_str(), execute.params)
    }
}

/// Runs a query and replies with every row passed through `map_result`.
#[derive(Message)]
#[rtype(result = "rusqlite::Result<Vec<T>>")]
pub struct Query<T, F>
where
    T: 'static,
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    pub query: String,
    pub params: Vec<SqlValue>,
    pub map_result: F,
}

impl<T, F> Handler<Query<T, F>> for Database
where
    T: 'static,
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    type Result = rusqlite::Result<Vec<T>>;

    fn handle(&mut self, query: Query<T, F>, _ctx: &mut Context<Self>) -> Self::Result {
        let mut statement = self.connection.prepare(query.query.as_str())?;
        let rows = statement.query_map(query.params, query.map_result)?;
        let result: rusqlite::Result<Vec<T>> = rows.collect();

        result
    }
}

pub async fn execute<S: Into<String>>(
    database: &Addr<Database>,
    query: S,
    params: Vec<SqlValue>,
) -> Result<usize, JoblyError> {
    let changed = database
        .send(Execute {
            query: query.into(),
            params,
        })
        .await??;

    Ok(changed)
}

pub async fn query<S, T, F>(
    database: &Addr<Database>,
    query: S,
    params: Vec<SqlValue>,
    map_result: F,
) -> Result<Vec<T>, JoblyError>
where
    S: Into<String>,
    T: Send + 'static,
    F: FnMut(&Row<'_>) -> rusqlite::Result<T> + Send + 'static,
{
    let rows = database
        .send(Query {
            query: query.into(),
            params,
            map_result,
        })
        .await??;

    Ok(rows)
}

/// Like `query`, keeping only the first row.
pub async fn query_one<S, T, F>(
    database: &Addr<Database>,
    query: S,
    params: Vec<SqlValue>,
    map_result: F,
) -> Result<Option<T>, JoblyError>
where
    S: Into<String>,
    T: Send + 'static,
    F: FnMut(&Row<'_>) -> rusqlite::Result<T> + Send + 'static,
{
    let rows = self::query(database, query, params, map_result).await?;
    Ok(rows.into_iter().next())
}
