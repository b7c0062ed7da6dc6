use actix::Addr;
use actix_web::{delete, get, patch, post, web, HttpResponse};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::auth::Admin;
use crate::company::{self, Company, CompanyFilter, NewCompany};
use crate::database::Database;
use crate::errors::JoblyError;
use crate::schema;

#[post("/companies")]
pub async fn create(
    Admin(user): Admin,
    body: web::Json<Value>,
    database: web::Data<Addr<Database>>,
) -> Result<HttpResponse, JoblyError> {
    let new_company: NewCompany = schema::parse(body.into_inner())?;
    debug!("{} creates company {}", &user.username, &new_company.handle);
    let company = Company::create(database.get_ref(), new_company).await?;

    Ok(HttpResponse::Created().json(json!({ "company": company })))
}

#[get("/companies")]
pub async fn list(
    query: web::Query<HashMap<String, String>>,
    database: web::Data<Addr<Database>>,
) -> Result<HttpResponse, JoblyError> {
    let filter = CompanyFilter::from_query(&query)?;
    let companies = Company::find_all(database.get_ref(), &filter).await?;

    Ok(HttpResponse::Ok().json(json!({ "companies": companies })))
}

#[get("/companies/{handle}")]
pub async fn get(
    handle: web::Path<String>,
    database: web::Data<Addr<Database>>,
) -> Result<HttpResponse, JoblyError> {
    let company = Company::get(database.get_ref(), &handle).await?;

    Ok(HttpResponse::Ok().json(json!({ "company": company })))
}

#[patch("/companies/{handle}")]
pub async fn update(
    Admin(user): Admin,
    handle: web::Path<String>,
    body: web::Json<Value>,
    database: web::Data<Addr<Database>>,
) -> Result<HttpResponse, JoblyError> {
    let payload = schema::update_payload(body.into_inner(), company::UPDATE_FIELDS)?;
    debug!("{} updates company {}", &user.username, &handle);
    let company = Company::update(database.get_ref(), &handle, &payload).await?;

    Ok(HttpResponse::Ok().json(json!({ "company": company })))
}

#[delete("/companies/{handle}")]
pub async fn remove(
    Admin(user): Admin,
    handle: web::Path<String>,
    database: web::Data<Addr<Database>>,
) -> Result<HttpResponse, JoblyError> {
    let handle = handle.into_inner();
    debug!("{} removes company {}", &user.username, &handle);
    Company::remove(database.get_ref(), &handle).await?;

    Ok(HttpResponse::Ok().json(json!({ "deleted": handle })))
}
