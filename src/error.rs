use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use thiserror::Error;

use crate::{
    domain::validation::MAX_PERSONS,
    entity::sea_orm_active_enums::OrderStatus,
    response::{ApiResponse, Meta},
};

/// Input rejected before anything was written to the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("A table number is required for orders served at the table")]
    MissingTable,

    #[error("Party size must be between 1 and {}", MAX_PERSONS)]
    InvalidPartySize,

    #[error("Party of {party_size} does not fit a table for {capacity}")]
    TableTooSmall { party_size: i32, capacity: i32 },

    #[error("Table is not available")]
    TableUnavailable,

    #[error("Table is already booked for that date and time")]
    TableAlreadyBooked,

    #[error("Date must use the YYYY-MM-DD format")]
    InvalidDate,

    #[error("Time must use the HH:MM format")]
    InvalidTime,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Phone must have 9 digits and start with 9")]
    InvalidPhone,

    #[error("Password must have at least 6 characters")]
    WeakPassword,

    #[error("Email is already taken")]
    DuplicateEmail,

    #[error("Name must not be empty")]
    InvalidName,

    #[error("Product name must have at least 3 characters")]
    InvalidProductName,

    #[error("Description must have at least 10 characters")]
    InvalidDescription,

    #[error("Price must be greater than 0")]
    InvalidPrice,

    #[error("Stock must not be negative")]
    InvalidStock,

    #[error("Capacity and table number must be greater than 0")]
    InvalidCapacity,
}

impl ValidationError {
    /// Request field the message belongs to, for inline form errors.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::EmptyCart => "cart",
            ValidationError::MissingTable => "table_number",
            ValidationError::InvalidPartySize | ValidationError::TableTooSmall { .. } => {
                "party_size"
            }
            ValidationError::TableUnavailable | ValidationError::TableAlreadyBooked => "table_id",
            ValidationError::InvalidDate => "date",
            ValidationError::InvalidTime => "time",
            ValidationError::InvalidEmail | ValidationError::DuplicateEmail => "email",
            ValidationError::InvalidPhone => "phone",
            ValidationError::WeakPassword => "password",
            ValidationError::InvalidName | ValidationError::InvalidProductName => "name",
            ValidationError::InvalidDescription => "description",
            ValidationError::InvalidPrice => "price",
            ValidationError::InvalidStock => "stock",
            ValidationError::InvalidCapacity => "capacity",
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Database error")]
    DbError(#[from] sqlx::Error),

    #[error("ORM error")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::InvalidTransition { .. } => StatusCode::CONFLICT,
            AppError::DbError(_) | AppError::OrmError(_) | AppError::Internal(_) => {
                tracing::error!(error = ?self, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let field = match &self {
            AppError::Validation(err) => Some(err.field()),
            _ => None,
        };

        let body = ApiResponse {
            message: self.to_string(),
            data: Some(ErrorData {
                error: self.to_string(),
                field,
            }),
            meta: Some(Meta::empty()),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Turns a UNIQUE constraint failure into `conflict`; any other store error stays an `OrmError`.
pub fn unique_violation_as(err: DbErr, conflict: impl Into<AppError>) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => conflict.into(),
        _ => AppError::OrmError(err),
    }
}
