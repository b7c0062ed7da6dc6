use actix_http::ResponseBuilder;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde_json::json;

use crate::sql::InvalidUpdate;

#[derive(thiserror::Error, Debug)]
pub enum JoblyError {
    #[error("Failed to read Jobly config file, {}", source)]
    ReadConfigFile { source: std::io::Error },

    #[error("Failed to parse Jobly config file, {}", source)]
    ParseConfigFile { source: toml::de::Error },

    #[error("Failed to create database directory, {}", source)]
    CreateDatabaseDir { source: std::io::Error },

    #[error("Failed to build database path from {}", path)]
    DatabasePath { path: String },

    #[error("Failed to read application context")]
    ReadContext {},

    #[error("Missing authorization token")]
    MissingToken {},

    #[error("Failed to authenticate request, {}", source)]
    Authenticate { source: jsonwebtoken::errors::Error },

    #[error("Unauthorized")]
    Unauthorized {},

    #[error("{}", message)]
    BadRequest { message: String },

    #[error("{}", message)]
    NotFound { message: String },

    #[error("Database error, {}", source)]
    Database { source: rusqlite::Error },

    #[error("Failed to reach the database, {}", cause)]
    Mailbox { cause: actix::MailboxError },
}

impl JoblyError {
    pub fn bad_request<S: Into<String>>(message: S) -> Self {
        JoblyError::BadRequest {
            message: message.into(),
        }
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        JoblyError::NotFound {
            message: message.into(),
        }
    }
}

impl From<InvalidUpdate> for JoblyError {
    fn from(err: InvalidUpdate) -> Self {
        JoblyError::bad_request(err.to_string())
    }
}

impl From<rusqlite::Error> for JoblyError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(failure, message)
                if failure.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                let message = message.unwrap_or_else(|| failure.to_string());
                JoblyError::bad_request(message)
            }
            err => JoblyError::Database { source: err },
        }
    }
}

impl From<actix::MailboxError> for JoblyError {
    fn from(err: actix::MailboxError) -> Self {
        JoblyError::Mailbox { cause: err }
    }
}

impl JoblyError {
    /// Message sent to clients. Internal failures are logged and kept out of the body.
    fn public_message(&self, status: StatusCode) -> String {
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("{}", self);
            return "Internal Server Error".to_owned();
        }
        self.to_string()
    }
}

impl actix_web::error::ResponseError for JoblyError {
    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        ResponseBuilder::new(status).json(json!({
            "error": {
                "message": self.public_message(status),
                "status": status.as_u16(),
            }
        }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            JoblyError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            JoblyError::NotFound { .. } => StatusCode::NOT_FOUND,
            JoblyError::MissingToken {}
            | JoblyError::Authenticate { .. }
            | JoblyError::Unauthorized {} => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
