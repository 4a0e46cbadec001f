use async_graphql::ErrorExtensions;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Email or password incorrect")]
    InvalidCredentials,

    #[error("Email already exists")]
    DuplicateEmail,

    #[error("{0} is already taken")]
    UniqueConstraintViolation(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Registration failed: {0}")]
    RegistrationFailed(String),

    #[error("Database error")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable machine-readable code, exposed as `extensions.code` on GraphQL errors.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound => "NOT_FOUND",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::DuplicateEmail => "DUPLICATE_EMAIL",
            AppError::UniqueConstraintViolation(_) => "UNIQUE_CONSTRAINT_VIOLATION",
            AppError::ValidationFailed(_) => "VALIDATION_FAILED",
            AppError::RegistrationFailed(_) => "REGISTRATION_FAILED",
            AppError::OrmError(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL",
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AppError::ValidationFailed(message.into())
    }
}

impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        match self {
            AppError::OrmError(err) => tracing::error!(error = %err, "database error"),
            AppError::Internal(err) => tracing::error!(error = ?err, "internal error"),
            _ => {}
        }
        let code = self.code();
        async_graphql::Error::new(self.to_string()).extend_with(|_, ext| ext.set("code", code))
    }
}

pub type AppResult<T> = Result<T, AppError>;
