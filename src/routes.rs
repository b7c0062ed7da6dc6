use actix_web::{get, web, HttpResponse, Responder, Result};
use serde_json::json;

mod companies;
mod jobs;

#[get("/healthz")]
async fn healthz() -> impl Responder {
    HttpResponse::Ok().body("200 Ok")
}

#[get("/info")]
async fn info() -> Result<web::Json<serde_json::value::Value>> {
    let response = json!({ "version": env!("CARGO_PKG_VERSION") });

    Ok(web::Json(response))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(healthz)
        .service(info)
        .service(jobs::create)
        .service(jobs::list)
        .service(jobs::get)
        .service(jobs::update)
        .service(jobs::remove)
        .service(companies::create)
        .service(companies::list)
        .service(companies::get)
        .service(companies::update)
        .service(companies::remove);
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use crate::auth;
    use crate::fixtures;
    use crate::Context;
    use actix_http::Request;
    use actix_web::dev::{Service, ServiceResponse};
    use actix_web::{test, App, Error};
    use serde_json::Value;

    pub const SECRET: &str = "secret";

    pub fn admin_token() -> String {
        format!(
            "Bearer {}",
            auth::create_token(SECRET, "admin", true, 10).unwrap()
        )
    }

    pub fn user_token() -> String {
        format!(
            "Bearer {}",
            auth::create_token(SECRET, "u1", false, 10).unwrap()
        )
    }

    /// Test application backed by the seeded in-memory database.
    pub async fn app() -> impl Service<Request = Request, Response = ServiceResponse, Error = Error>
    {
        let database = fixtures::seeded().await;
        test::init_service(
            App::new()
                .app_data(web::Data::new(Context {
                    secret: SECRET.to_owned(),
                }))
                .app_data(web::Data::new(database))
                .configure(configure),
        )
        .await
    }

    #[actix_rt::test]
    async fn healthz_is_public() {
        let mut app = test::init_service(App::new().configure(configure)).await;

        let req = test::TestRequest::get().uri("/healthz").to_request();
        let res = test::call_service(&mut app, req).await;

        assert!(res.status().is_success());
    }

    #[actix_rt::test]
    async fn info_reports_version() {
        let mut app = app().await;

        let req = test::TestRequest::get().uri("/info").to_request();
        let body: Value = test::read_response_json(&mut app, req).await;

        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }
}
