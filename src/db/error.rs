use rusqlite::ErrorCode;

/// Failure of a data-access operation.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// UNIQUE, FOREIGN KEY, NOT NULL or CHECK violation.
    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("plant not found: {0}")]
    PlantNotFound(i64),

    #[error("database error: {0}")]
    Sqlite(rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DbError {
    pub fn is_constraint(&self) -> bool {
        matches!(self, DbError::Constraint(_))
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(ref code, ref message)
                if code.code == ErrorCode::ConstraintViolation =>
            {
                DbError::Constraint(
                    message
                        .clone()
                        .unwrap_or_else(|| code.to_string()),
                )
            }
            other => DbError::Sqlite(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_unique_violation_is_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (name TEXT UNIQUE); INSERT INTO t VALUES ('a');")
            .unwrap();
        let err: DbError = conn
            .execute("INSERT INTO t VALUES ('a')", [])
            .unwrap_err()
            .into();
        assert!(err.is_constraint());
        assert!(err.to_string().contains("UNIQUE"));
    }

    #[test]
    fn test_syntax_error_is_sqlite() {
        let conn = Connection::open_in_memory().unwrap();
        let err: DbError = conn.execute("SELEC 1", []).unwrap_err().into();
        assert!(matches!(err, DbError::Sqlite(_)));
    }
}
