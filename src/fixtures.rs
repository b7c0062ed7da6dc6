//! Shared database state for tests.

use actix::{Actor, Addr};

use crate::database::{self, Database};
use crate::sql::SqlValue;

const INSERT_COMPANY: &str = "
    INSERT INTO companies (handle, name, num_employees, description, logo_url)
    VALUES (?1, ?2, ?3, ?4, ?5)
";

const INSERT_JOB: &str = "
    INSERT INTO jobs (title, salary, equity, company_handle)
    VALUES (?1, ?2, ?3, ?4)
";

/// In-memory database with companies c1..c3 and jobs j1..j3.
///
/// j1 and j2 belong to c1, j3 to c2. Only j1 carries equity.
pub async fn seeded() -> Addr<Database> {
    let database = Database::in_memory()
        .expect("Failed to open in-memory database")
        .start();

    for idx in 1..=3i64 {
        database::execute(
            &database,
            INSERT_COMPANY,
            vec![
                SqlValue::from(format!("c{}", idx)),
                SqlValue::from(format!("C{}", idx)),
                SqlValue::Integer(idx),
                SqlValue::from(format!("Desc{}", idx)),
                SqlValue::from(format!("http://c{}.img", idx)),
            ],
        )
        .await
        .expect("Failed to seed companies");
    }

    let jobs: Vec<(&str, i64, Option<f64>, &str)> = vec![
        ("j1", 100, Some(0.001), "c1"),
        ("j2", 500, Some(0.0), "c1"),
        ("j3", 1000, None, "c2"),
    ];
    for (title, salary, equity, company_handle) in jobs {
        database::execute(
            &database,
            INSERT_JOB,
            vec![
                SqlValue::from(title),
                SqlValue::Integer(salary),
                SqlValue::from(equity),
                SqlValue::from(company_handle),
            ],
        )
        .await
        .expect("Failed to seed jobs");
    }

    database
}
