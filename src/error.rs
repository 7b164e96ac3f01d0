use std::path::PathBuf;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use crate::address::AddressError;
use crate::validator::ValidationError;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("empty request body not allowed when creating a paste")]
    EmptyBody,
    #[error("failed to generate paste address")]
    Address {
        #[from]
        source: AddressError,
    },
    #[error("generated address is already taken")]
    AddressTaken,
    #[error("expected exactly one row affected, got {0}")]
    UnexpectedRowCount(u64),
    #[error("store operation timed out")]
    Timeout,
    #[error("memory store lock poisoned")]
    StorePoisoned,
    #[error("database error")]
    Database { source: sqlx::Error },
    #[error("failed to decode request body")]
    Json {
        #[from]
        source: serde_json::Error,
    },
    #[error("failed to highlight paste")]
    Highlight {
        #[from]
        source: syntect::Error,
    },
    #[error("highlighting theme {0:?} is not bundled")]
    MissingTheme(&'static str),
    #[error("template error")]
    Template {
        #[from]
        source: minijinja::Error,
    },
    #[error("no templates found in {0}")]
    NoTemplates(PathBuf),
    #[error("IO error")]
    IO {
        #[from]
        source: std::io::Error,
    },
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::EmptyBody => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        if status_code.is_server_error() {
            // runs inside the request span, so method/path/host come along
            error!(error = ?self, "request failed");
            return (status_code, "internal server error").into_response();
        }

        (status_code, format!("{self}")).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(source: sqlx::Error) -> Self {
        match &source {
            sqlx::Error::Database(err) if err.is_unique_violation() => AppError::AddressTaken,
            _ => AppError::Database { source },
        }
    }
}
