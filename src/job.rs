use actix::Addr;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::company::Company;
use crate::database::{self, Database};
use crate::errors::JoblyError;
use crate::schema::{self, Field, Rule};
use crate::sql::{self, ColumnMapping, SqlValue, UpdatePayload};

mod query;

/// Fields a job update may touch.
pub const UPDATE_FIELDS: &[Field] = &[
    Field::required("title", Rule::Text),
    Field::nullable("salary", Rule::Count),
    Field::nullable("equity", Rule::Fraction),
    Field::required("companyHandle", Rule::Text),
];

const SEARCH_KEYS: &[&str] = &["title", "minSalary", "hasEquity"];

fn columns() -> ColumnMapping {
    ColumnMapping::new().with("companyHandle", "company_handle")
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub salary: Option<i64>,
    pub equity: Option<f64>,
    pub company_handle: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub salary: Option<i64>,
    #[serde(default)]
    pub equity: Option<f64>,
    pub company_handle: String,
}

impl NewJob {
    pub fn validate(&self) -> Result<(), JoblyError> {
        schema::check_text("title", &self.title)?;
        schema::check_text("companyHandle", &self.company_handle)?;
        if let Some(salary) = self.salary {
            schema::check_count("salary", salary)?;
        }
        if let Some(equity) = self.equity {
            schema::check_fraction("equity", equity)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobFilter {
    /// Case-insensitive substring of the title.
    pub title: Option<String>,
    pub min_salary: Option<i64>,
    pub has_equity: bool,
}

impl JobFilter {
    pub fn from_query(query: &HashMap<String, String>) -> Result<Self, JoblyError> {
        schema::check_query_keys(query, SEARCH_KEYS)?;

        Ok(JobFilter {
            title: query.get("title").cloned(),
            min_salary: schema::query_count(query, "minSalary")?,
            has_equity: schema::query_flag(query, "hasEquity"),
        })
    }

    fn where_clause(&self) -> (String, Vec<SqlValue>) {
        let mut expressions = Vec::new();
        let mut values = Vec::new();

        if let Some(min_salary) = self.min_salary {
            values.push(SqlValue::Integer(min_salary));
            expressions.push(format!("salary >= ${}", values.len()));
        }
        if self.has_equity {
            expressions.push("equity > 0".to_owned());
        }
        if let Some(title) = &self.title {
            values.push(SqlValue::Text(format!("%{}%", title)));
            expressions.push(format!("title LIKE ${}", values.len()));
        }

        if expressions.is_empty() {
            return (String::new(), values);
        }

        (format!(" WHERE {}", expressions.join(" AND ")), values)
    }
}

impl Job {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Job> {
        Ok(Job {
            id: row.get(0)?,
            title: row.get(1)?,
            salary: row.get(2)?,
            equity: row.get(3)?,
            company_handle: row.get(4)?,
        })
    }

    pub async fn create(database: &Addr<Database>, new_job: NewJob) -> Result<Job, JoblyError> {
        new_job.validate()?;

        let duplicate = database::query_one(
            database,
            query::GET_JOB_BY_TITLE,
            vec![SqlValue::from(new_job.title.as_str())],
            Job::from_row,
        )
        .await?;
        if duplicate.is_some() {
            return Err(JoblyError::bad_request(format!(
                "Duplicate job: {}",
                new_job.title
            )));
        }

        if !Company::exists(database, &new_job.company_handle).await? {
            return Err(JoblyError::bad_request(format!(
                "Company doesn't exist on table: {}",
                new_job.company_handle
            )));
        }

        database::execute(
            database,
            query::INSERT_JOB,
            vec![
                SqlValue::from(new_job.title.as_str()),
                SqlValue::from(new_job.salary),
                SqlValue::from(new_job.equity),
                SqlValue::from(new_job.company_handle.as_str()),
            ],
        )
        .await?;

        debug!("Job {} saved in the database", &new_job.title);
        Job::get(database, &new_job.title).await
    }

    pub async fn find_all(
        database: &Addr<Database>,
        filter: &JobFilter,
    ) -> Result<Vec<Job>, JoblyError> {
        let (where_clause, values) = filter.where_clause();
        let query = format!("{}{} ORDER BY title", query::SELECT_JOBS, where_clause);

        database::query(database, query, values, Job::from_row).await
    }

    pub async fn get(database: &Addr<Database>, title: &str) -> Result<Job, JoblyError> {
        database::query_one(
            database,
            query::GET_JOB_BY_TITLE,
            vec![SqlValue::from(title)],
            Job::from_row,
        )
        .await?
        .ok_or_else(|| JoblyError::not_found(format!("No job: {}", title)))
    }

    /// Applies a partial update to the job with `title` and returns it as stored.
    pub async fn update(
        database: &Addr<Database>,
        title: &str,
        payload: &UpdatePayload,
    ) -> Result<Job, JoblyError> {
        let fragment = sql::sql_for_partial_update(payload, &columns())?;
        let title_idx = fragment.next_placeholder();
        let query = format!(
            "UPDATE jobs SET {} WHERE title = ${}",
            fragment.assignments(),
            title_idx
        );

        let mut values = fragment.into_values();
        values.push(SqlValue::from(title));

        let changed = database::execute(database, query, values).await?;
        if changed == 0 {
            return Err(JoblyError::not_found(format!("No job: {}", title)));
        }

        debug!("Job {} updated", title);
        let current_title = payload
            .get("title")
            .and_then(SqlValue::as_str)
            .unwrap_or(title);
        Job::get(database, current_title).await
    }

    pub async fn remove(database: &Addr<Database>, title: &str) -> Result<(), JoblyError> {
        let deleted =
            database::execute(database, query::DELETE_JOB, vec![SqlValue::from(title)]).await?;

        if deleted == 0 {
            return Err(JoblyError::not_found(format!("No job: {}", title)));
        }

        debug!("Job {} removed", title);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fixtures;

    fn titles(jobs: &[Job]) -> Vec<&str> {
        jobs.iter().map(|job| job.title.as_str()).collect()
    }

    #[actix_rt::test]
    async fn create_job() {
        let database = fixtures::seeded().await;
        let new_job = NewJob {
            title: "Street Sweeper".to_owned(),
            salary: Some(123_000),
            equity: Some(0.987),
            company_handle: "c1".to_owned(),
        };

        let job = Job::create(&database, new_job).await.unwrap();

        assert_eq!(job.title, "Street Sweeper");
        assert_eq!(job.salary, Some(123_000));
        assert_eq!(job.equity, Some(0.987));
        assert_eq!(job.company_handle, "c1");
        assert_eq!(Job::get(&database, "Street Sweeper").await.unwrap(), job);
    }

    #[actix_rt::test]
    async fn create_rejects_duplicates_and_unknown_companies() {
        let database = fixtures::seeded().await;
        let new_job = NewJob {
            title: "j1".to_owned(),
            salary: None,
            equity: None,
            company_handle: "c1".to_owned(),
        };

        let result = Job::create(&database, new_job.clone()).await;
        assert!(matches!(result, Err(JoblyError::BadRequest { .. })));

        let orphan = NewJob {
            title: "orphan".to_owned(),
            company_handle: "nope".to_owned(),
            ..new_job
        };
        let result = Job::create(&database, orphan).await;
        assert!(matches!(result, Err(JoblyError::BadRequest { .. })));
    }

    #[actix_rt::test]
    async fn find_all_without_filter() {
        let database = fixtures::seeded().await;

        let jobs = Job::find_all(&database, &JobFilter::default()).await.unwrap();

        assert_eq!(titles(&jobs), vec!["j1", "j2", "j3"]);
    }

    #[actix_rt::test]
    async fn find_all_filters() {
        let database = fixtures::seeded().await;

        let filter = JobFilter {
            min_salary: Some(200),
            ..JobFilter::default()
        };
        let jobs = Job::find_all(&database, &filter).await.unwrap();
        assert_eq!(titles(&jobs), vec!["j2", "j3"]);

        let filter = JobFilter {
            has_equity: true,
            ..JobFilter::default()
        };
        let jobs = Job::find_all(&database, &filter).await.unwrap();
        assert_eq!(titles(&jobs), vec!["j1"]);

        let filter = JobFilter {
            title: Some("J".to_owned()),
            min_salary: Some(600),
            has_equity: false,
        };
        let jobs = Job::find_all(&database, &filter).await.unwrap();
        assert_eq!(titles(&jobs), vec!["j3"]);
    }

    #[actix_rt::test]
    async fn get_unknown_job() {
        let database = fixtures::seeded().await;

        let result = Job::get(&database, "nope").await;

        assert!(matches!(result, Err(JoblyError::NotFound { .. })));
    }

    #[actix_rt::test]
    async fn update_job() {
        let database = fixtures::seeded().await;
        let mut payload = UpdatePayload::new();
        payload.push("salary", 100_000i64);
        payload.push("equity", 0.954);
        payload.push("companyHandle", "c2");

        let job = Job::update(&database, "j1", &payload).await.unwrap();

        assert_eq!(job.title, "j1");
        assert_eq!(job.salary, Some(100_000));
        assert_eq!(job.equity, Some(0.954));
        assert_eq!(job.company_handle, "c2");
    }

    #[actix_rt::test]
    async fn update_keeps_falsy_values_and_follows_renames() {
        let database = fixtures::seeded().await;
        let mut payload = UpdatePayload::new();
        payload.push("title", "renamed");
        payload.push("salary", 0i64);
        payload.push("equity", SqlValue::Null);

        let job = Job::update(&database, "j1", &payload).await.unwrap();

        assert_eq!(job.title, "renamed");
        assert_eq!(job.salary, Some(0));
        assert_eq!(job.equity, None);
        assert!(Job::get(&database, "j1").await.is_err());
    }

    #[actix_rt::test]
    async fn update_errors() {
        let database = fixtures::seeded().await;

        let result = Job::update(&database, "j1", &UpdatePayload::new()).await;
        assert!(matches!(result, Err(JoblyError::BadRequest { .. })));

        let payload: UpdatePayload = vec![("salary", 1i64)].into_iter().collect();
        let result = Job::update(&database, "nope", &payload).await;
        assert!(matches!(result, Err(JoblyError::NotFound { .. })));

        let payload: UpdatePayload = vec![("title", "j2")].into_iter().collect();
        let result = Job::update(&database, "j1", &payload).await;
        assert!(matches!(result, Err(JoblyError::BadRequest { .. })));
    }

    #[actix_rt::test]
    async fn remove_job() {
        let database = fixtures::seeded().await;

        Job::remove(&database, "j1").await.unwrap();

        assert!(Job::get(&database, "j1").await.is_err());
        let result = Job::remove(&database, "j1").await;
        assert!(matches!(result, Err(JoblyError::NotFound { .. })));
    }

    #[test]
    fn filter_from_query() {
        let mut query = HashMap::new();
        query.insert("title".to_owned(), "eng".to_owned());
        query.insert("minSalary".to_owned(), "5".to_owned());

        let filter = JobFilter::from_query(&query).unwrap();
        assert_eq!(
            filter,
            JobFilter {
                title: Some("eng".to_owned()),
                min_salary: Some(5),
                has_equity: false,
            }
        );

        query.insert("salary".to_owned(), "5".to_owned());
        assert!(JobFilter::from_query(&query).is_err());
    }

    #[test]
    fn where_clause_numbers_values() {
        let filter = JobFilter {
            title: Some("eng".to_owned()),
            min_salary: Some(5),
            has_equity: true,
        };

        let (clause, values) = filter.where_clause();

        assert_eq!(
            clause,
            " WHERE salary >= $1 AND equity > 0 AND title LIKE $2"
        );
        assert_eq!(
            values,
            vec![SqlValue::Integer(5), SqlValue::from("%eng%")]
        );
    }
}
