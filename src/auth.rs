use actix_web::dev::Payload;
use actix_web::http::header::Header;
use actix_web::HttpRequest;
use actix_web_httpauth::headers::authorization::{Authorization, Bearer};
use futures::future;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::JoblyError;
use crate::Context;

const ISSUER: &str = "jobly:api";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub is_admin: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    exp: usize,  // Expiration time (as UTC timestamp)
    iat: usize,  // Issued at (as UTC timestamp)
    iss: String, // Issuer
    user: User,
}

/// A request made with a valid token of an admin user.
#[derive(Debug)]
pub struct Admin(pub User);

fn authenticate(req: &HttpRequest) -> Result<User, JoblyError> {
    let context = req
        .app_data::<actix_web::web::Data<Context>>()
        .ok_or(JoblyError::ReadContext {})?;

    let token = Authorization::<Bearer>::parse(req)
        .map(|authorization| authorization.into_scheme().token().to_string())
        .map_err(|_| JoblyError::MissingToken {})?;

    decode_token(&context.secret, &token)
}

fn require_admin(user: User) -> Result<Admin, JoblyError> {
    if user.is_admin {
        Ok(Admin(user))
    } else {
        debug!("User {} is not an admin", &user.username);
        Err(JoblyError::Unauthorized {})
    }
}

/// Any request made with a valid token.
impl actix_web::FromRequest for User {
    type Config = ();
    type Error = JoblyError;
    type Future = future::Ready<Result<User, JoblyError>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        future::ready(authenticate(req))
    }
}

impl actix_web::FromRequest for Admin {
    type Config = ();
    type Error = JoblyError;
    type Future = future::Ready<Result<Admin, JoblyError>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        future::ready(authenticate(req).and_then(require_admin))
    }
}

pub fn decode_token(secret: &str, token: &str) -> Result<User, JoblyError> {
    let mut validation = Validation::new(Algorithm::HS512);
    validation.iss = Some(ISSUER.to_owned());

    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims.user)
        .map_err(|err| JoblyError::Authenticate { source: err })
}

pub fn create_token(
    secret: &str,
    username: &str,
    is_admin: bool,
    duration: i64,
) -> Result<String, JoblyError> {
    let header = JwtHeader::new(Algorithm::HS512);
    let user = User {
        username: username.to_owned(),
        is_admin,
    };
    let claims = Claims {
        exp: (chrono::Local::now() + chrono::Duration::minutes(duration)).timestamp() as usize,
        iat: chrono::Local::now().timestamp() as usize,
        iss: ISSUER.to_owned(),
        user,
    };

    encode(
        &header,
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|err| JoblyError::Authenticate { source: err })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::routes::test::{admin_token, user_token, SECRET};
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App, HttpResponse};

    async fn whoami(user: User) -> HttpResponse {
        HttpResponse::Ok().json(user)
    }

    async fn admin_only(Admin(user): Admin) -> HttpResponse {
        HttpResponse::Ok().json(user)
    }

    #[test]
    fn token_round_trip() {
        let token = create_token("secret", "admin", true, 10).unwrap();

        let user = decode_token("secret", &token).unwrap();

        assert_eq!(
            user,
            User {
                username: "admin".to_owned(),
                is_admin: true,
            }
        );
    }

    #[test]
    fn rejects_wrong_secret() {
        let token = create_token("secret", "u1", false, 10).unwrap();

        let result = decode_token("other", &token);

        assert!(matches!(result, Err(JoblyError::Authenticate { .. })));
    }

    #[test]
    fn rejects_expired_token() {
        let token = create_token("secret", "u1", true, -10).unwrap();

        let result = decode_token("secret", &token);

        assert!(matches!(result, Err(JoblyError::Authenticate { .. })));
    }

    #[actix_rt::test]
    async fn extracts_users_and_admins() {
        let mut app = test::init_service(
            App::new()
                .app_data(web::Data::new(Context {
                    secret: SECRET.to_owned(),
                }))
                .route("/whoami", web::get().to(whoami))
                .route("/admin", web::get().to(admin_only)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/whoami")
            .header("authorization", user_token())
            .to_request();
        let res = test::call_service(&mut app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(&test::read_body(res).await).expect("read_body_json failed");
        assert_eq!(body, serde_json::json!({ "username": "u1", "isAdmin": false }));

        let req = test::TestRequest::get().uri("/whoami").to_request();
        let res = test::call_service(&mut app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/admin")
            .header("authorization", user_token())
            .to_request();
        let res = test::call_service(&mut app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/admin")
            .header("authorization", admin_token())
            .to_request();
        let res = test::call_service(&mut app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}
