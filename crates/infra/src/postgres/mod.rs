//! Postgres-backed repositories.
//!
//! Each repository holds a shared connection pool. Row mapping is explicit
//! (`try_get` per column); SQLx errors are mapped to `RepositoryError` as
//! follows:
//!
//! | SQLx Error                     | Code                    | RepositoryError |
//! |--------------------------------|-------------------------|-----------------|
//! | Database (unique / FK / check) | `23505` `23503` `23514` | `Constraint`    |
//! | Database (other)               | any other               | `Unavailable`   |
//! | ColumnDecode / Decode / ...    | N/A                     | `Decode`        |
//! | PoolClosed / Io / other        | N/A                     | `Unavailable`   |

pub mod checkout;
pub mod customers;
pub mod orders;
pub mod products;
pub mod schema;

pub use checkout::PgCheckout;
pub use customers::PgCustomersRepository;
pub use orders::PgOrdersRepository;
pub use products::PgProductsRepository;

pub use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use storefront_core::{RepositoryError, RepositoryResult};

/// Open a connection pool.
pub async fn connect(database_url: &str, max_connections: u32) -> RepositoryResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(|e| map_sqlx_error("connect", e))?;
    tracing::info!(max_connections, "postgres pool ready");
    Ok(pool)
}

pub(crate) fn map_sqlx_error(operation: &str, err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23505") | Some("23503") | Some("23514") => RepositoryError::Constraint(msg),
                _ => RepositoryError::Unavailable(msg),
            }
        }
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => {
            RepositoryError::Decode(format!("{} in {}", err, operation))
        }
        sqlx::Error::PoolClosed => {
            RepositoryError::Unavailable(format!("connection pool closed in {}", operation))
        }
        _ => RepositoryError::Unavailable(format!("sqlx error in {}: {}", operation, err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_closed_is_unavailable() {
        let err = map_sqlx_error("find", sqlx::Error::PoolClosed);
        assert_eq!(
            err,
            RepositoryError::Unavailable("connection pool closed in find".to_string())
        );
    }

    #[test]
    fn missing_row_is_a_decode_failure() {
        let err = map_sqlx_error("load", sqlx::Error::RowNotFound);
        assert!(matches!(err, RepositoryError::Decode(msg) if msg.ends_with("in load")));
    }

    #[test]
    fn missing_column_is_a_decode_failure() {
        let err = map_sqlx_error("load", sqlx::Error::ColumnNotFound("price".to_string()));
        assert!(matches!(err, RepositoryError::Decode(_)));
    }
}
