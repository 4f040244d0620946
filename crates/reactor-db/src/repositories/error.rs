//! Error handling utilities for repositories

use reactor_core::error::DomainError;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Convert a row count to the unsigned domain representation
pub fn to_count(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}
