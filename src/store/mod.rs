//! Storage edge. Every SQL statement lives in this module tree; status
//! codes convert between enum and persisted character here and nowhere else.

pub mod adjustments;
pub mod attendance;
pub mod loans;
pub mod lookup;
pub mod payroll;

/// MySQL reports unique-key collisions as SQLSTATE 23000. The engines lean
/// on this to turn concurrent duplicate writes into business rejections.
pub fn is_duplicate_key(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        return db_err.code().as_deref() == Some("23000");
    }
    false
}
