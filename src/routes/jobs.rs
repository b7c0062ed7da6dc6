use actix::Addr;
use actix_web::{delete, get, patch, post, web, HttpResponse};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::auth::Admin;
use crate::database::Database;
use crate::errors::JoblyError;
use crate::job::{self, Job, JobFilter, NewJob};
use crate::schema;

#[post("/jobs")]
pub async fn create(
    Admin(user): Admin,
    body: web::Json<Value>,
    database: web::Data<Addr<Database>>,
) -> Result<HttpResponse, JoblyError> {
    let new_job: NewJob = schema::parse(body.into_inner())?;
    debug!("{} creates job {}", &user.username, &new_job.title);
    let job = Job::create(database.get_ref(), new_job).await?;

    Ok(HttpResponse::Created().json(json!({ "job": job })))
}

#[get("/jobs")]
pub async fn list(
    query: web::Query<HashMap<String, String>>,
    database: web::Data<Addr<Database>>,
) -> Result<HttpResponse, JoblyError> {
    let filter = JobFilter::from_query(&query)?;
    debug!("Listing jobs with {:?}", &filter);
    let jobs = Job::find_all(database.get_ref(), &filter).await?;

    Ok(HttpResponse::Ok().json(json!({ "jobs": jobs })))
}

#[get("/jobs/{title}")]
pub async fn get(
    title: web::Path<String>,
    database: web::Data<Addr<Database>>,
) -> Result<HttpResponse, JoblyError> {
    let job = Job::get(database.get_ref(), &title).await?;

    Ok(HttpResponse::Ok().json(json!({ "job": job })))
}

#[patch("/jobs/{title}")]
pub async fn update(
    Admin(user): Admin,
    title: web::Path<String>,
    body: web::Json<Value>,
    database: web::Data<Addr<Database>>,
) -> Result<HttpResponse, JoblyError> {
    let payload = schema::update_payload(body.into_inner(), job::UPDATE_FIELDS)?;
    debug!("{} updates job {}", &user.username, &title);
    let job = Job::update(database.get_ref(), &title, &payload).await?;

    Ok(HttpResponse::Ok().json(json!({ "job": job })))
}

#[delete("/jobs/{title}")]
pub async fn remove(
    Admin(user): Admin,
    title: web::Path<String>,
    database: web::Data<Addr<Database>>,
) -> Result<HttpResponse, JoblyError> {
    let title = title.into_inner();
    debug!("{} removes job {}", &user.username, &title);
    Job::remove(database.get_ref(), &title).await?;

    Ok(HttpResponse::Ok().json(json!({ "deleted": title })))
}
