use actix::Addr;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::database::{self, Database};
use crate::errors::JoblyError;
use crate::schema::{self, Field, Rule};
use crate::sql::{self, ColumnMapping, SqlValue, UpdatePayload};

mod query;

/// Fields a company update may touch. The handle is the identifier and stays.
pub const UPDATE_FIELDS: &[Field] = &[
    Field::required("name", Rule::Text),
    Field::required("description", Rule::Text),
    Field::nullable("numEmployees", Rule::Count),
    Field::nullable("logoUrl", Rule::Text),
];

const SEARCH_KEYS: &[&str] = &["nameLike", "minEmployees", "maxEmployees"];

fn columns() -> ColumnMapping {
    ColumnMapping::new()
        .with("numEmployees", "num_employees")
        .with("logoUrl", "logo_url")
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i64>,
    pub logo_url: Option<String>,
}

/// A job as listed under its company, without the redundant handle.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyJob {
    pub id: i64,
    pub title: String,
    pub salary: Option<i64>,
    pub equity: Option<f64>,
}

impl CompanyJob {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<CompanyJob> {
        Ok(CompanyJob {
            id: row.get(0)?,
            title: row.get(1)?,
            salary: row.get(2)?,
            equity: row.get(3)?,
        })
    }
}

/// A company together with the jobs it offers.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<CompanyJob>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub num_employees: Option<i64>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl NewCompany {
    pub fn validate(&self) -> Result<(), JoblyError> {
        schema::check_text("handle", &self.handle)?;
        schema::check_lowercase("handle", &self.handle)?;
        schema::check_text("name", &self.name)?;
        schema::check_text("description", &self.description)?;
        if let Some(num_employees) = self.num_employees {
            schema::check_count("numEmployees", num_employees)?;
        }
        if let Some(logo_url) = &self.logo_url {
            schema::check_text("logoUrl", logo_url)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyFilter {
    pub name_like: Option<String>,
    pub min_employees: Option<i64>,
    pub max_employees: Option<i64>,
}

impl CompanyFilter {
    pub fn from_query(query: &HashMap<String, String>) -> Result<Self, JoblyError> {
        schema::check_query_keys(query, SEARCH_KEYS)?;

        let filter = CompanyFilter {
            name_like: query.get("nameLike").cloned(),
            min_employees: schema::query_count(query, "minEmployees")?,
            max_employees: schema::query_count(query, "maxEmployees")?,
        };

        if let (Some(min), Some(max)) = (filter.min_employees, filter.max_employees) {
            if min > max {
                return Err(JoblyError::bad_request(
                    "Min employees cannot be greater than max",
                ));
            }
        }

        Ok(filter)
    }

    fn where_clause(&self) -> (String, Vec<SqlValue>) {
        let mut expressions = Vec::new();
        let mut values = Vec::new();

        if let Some(min_employees) = self.min_employees {
            values.push(SqlValue::Integer(min_employees));
            expressions.push(format!("num_employees >= ${}", values.len()));
        }
        if let Some(max_employees) = self.max_employees {
            values.push(SqlValue::Integer(max_employees));
            expressions.push(format!("num_employees <= ${}", values.len()));
        }
        if let Some(name) = &self.name_like {
            values.push(SqlValue::Text(format!("%{}%", name)));
            expressions.push(format!("name LIKE ${}", values.len()));
        }

        if expressions.is_empty() {
            return (String::new(), values);
        }

        (format!(" WHERE {}", expressions.join(" AND ")), values)
    }
}

impl Company {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Company> {
        Ok(Company {
            handle: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            num_employees: row.get(3)?,
            logo_url: row.get(4)?,
        })
    }

    async fn find(database: &Addr<Database>, handle: &str) -> Result<Option<Company>, JoblyError> {
        database::query_one(
            database,
            query::GET_COMPANY_BY_HANDLE,
            vec![SqlValue::from(handle)],
            Company::from_row,
        )
        .await
    }

    pub async fn exists(database: &Addr<Database>, handle: &str) -> Result<bool, JoblyError> {
        Ok(Company::find(database, handle).await?.is_some())
    }

    pub async fn create(
        database: &Addr<Database>,
        new_company: NewCompany,
    ) -> Result<Company, JoblyError> {
        new_company.validate()?;

        if Company::exists(database, &new_company.handle).await? {
            return Err(JoblyError::bad_request(format!(
                "Duplicate company: {}",
                new_company.handle
            )));
        }

        database::execute(
            database,
            query::INSERT_COMPANY,
            vec![
                SqlValue::from(new_company.handle.as_str()),
                SqlValue::from(new_company.name.as_str()),
                SqlValue::from(new_company.description.as_str()),
                SqlValue::from(new_company.num_employees),
                SqlValue::from(new_company.logo_url.clone()),
            ],
        )
        .await?;

        debug!("Company {} saved in the database", &new_company.handle);
        Company::find(database, &new_company.handle)
            .await?
            .ok_or_else(|| JoblyError::not_found(format!("No company: {}", new_company.handle)))
    }

    pub async fn find_all(
        database: &Addr<Database>,
        filter: &CompanyFilter,
    ) -> Result<Vec<Company>, JoblyError> {
        let (where_clause, values) = filter.where_clause();
        let query = format!("{}{} ORDER BY name", query::SELECT_COMPANIES, where_clause);

        database::query(database, query, values, Company::from_row).await
    }

    pub async fn get(database: &Addr<Database>, handle: &str) -> Result<CompanyDetail, JoblyError> {
        let company = Company::find(database, handle)
            .await?
            .ok_or_else(|| JoblyError::not_found(format!("No company: {}", handle)))?;
        let jobs = database::query(
            database,
            query::GET_COMPANY_JOBS,
            vec![SqlValue::from(handle)],
            CompanyJob::from_row,
        )
        .await?;

        Ok(CompanyDetail { company, jobs })
    }

    pub async fn update(
        database: &Addr<Database>,
        handle: &str,
        payload: &UpdatePayload,
    ) -> Result<Company, JoblyError> {
        let fragment = sql::sql_for_partial_update(payload, &columns())?;
        let handle_idx = fragment.next_placeholder();
        let query = format!(
            "UPDATE companies SET {} WHERE handle = ${}",
            fragment.assignments(),
            handle_idx
        );

        let mut values = fragment.into_values();
        values.push(SqlValue::from(handle));

        let changed = database::execute(database, query, values).await?;
        if changed == 0 {
            return Err(JoblyError::not_found(format!("No company: {}", handle)));
        }

        debug!("Company {} updated", handle);
        Company::find(database, handle)
            .await?
            .ok_or_else(|| JoblyError::not_found(format!("No company: {}", handle)))
    }

    pub async fn remove(database: &Addr<Database>, handle: &str) -> Result<(), JoblyError> {
        let deleted =
            database::execute(database, query::DELETE_COMPANY, vec![SqlValue::from(handle)])
                .await?;

        if deleted == 0 {
            return Err(JoblyError::not_found(format!("No company: {}", handle)));
        }

        debug!("Company {} removed", handle);
        Ok(())
    }
}
