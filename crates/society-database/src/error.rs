//! Mapping of sqlx errors into the application taxonomy.

use society_core::error::{AppError, ErrorKind};

/// Wrap a sqlx error with context, classifying reachability failures as
/// upstream-unavailable.
pub fn db_error(context: &str, err: sqlx::Error) -> AppError {
    let kind = match &err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => ErrorKind::UpstreamUnavailable,
        sqlx::Error::Database(db) if db.is_unique_violation() => ErrorKind::Conflict,
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => ErrorKind::Validation,
        _ => ErrorKind::Internal,
    };
    AppError::with_source(kind, format!("{context}: {err}"), err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_timeout_is_upstream() {
        let err = db_error("Failed to list alerts", sqlx::Error::PoolTimedOut);
        assert_eq!(err.kind, ErrorKind::UpstreamUnavailable);
        assert!(err.message.starts_with("Failed to list alerts"));
    }

    #[test]
    fn test_row_not_found_is_internal() {
        let err = db_error("Failed to fetch", sqlx::Error::RowNotFound);
        assert_eq!(err.kind, ErrorKind::Internal);
    }
}
