//! Table definitions for the Postgres backend.
//!
//! `products.quantity` has no `>= 0` check: the order use case is the only
//! guard on stock.

use sqlx::PgPool;

use storefront_core::RepositoryResult;

use super::map_sqlx_error;

pub const CREATE_CUSTOMERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS customers (
    id          UUID PRIMARY KEY,
    name        TEXT NOT NULL,
    email       TEXT NOT NULL UNIQUE,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

pub const CREATE_PRODUCTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id          UUID PRIMARY KEY,
    name        TEXT NOT NULL UNIQUE,
    price       NUMERIC(12, 2) NOT NULL,
    quantity    BIGINT NOT NULL,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

pub const CREATE_ORDERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS orders (
    id           UUID PRIMARY KEY,
    customer_id  UUID NOT NULL REFERENCES customers (id),
    created_at   TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at   TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

pub const CREATE_ORDERS_PRODUCTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS orders_products (
    id          UUID PRIMARY KEY,
    order_id    UUID NOT NULL REFERENCES orders (id) ON DELETE CASCADE,
    product_id  UUID NOT NULL REFERENCES products (id),
    line_no     INTEGER NOT NULL,
    price       NUMERIC(12, 2) NOT NULL,
    quantity    BIGINT NOT NULL,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (order_id, line_no)
)
"#;

pub const STATEMENTS: [(&str, &str); 4] = [
    ("customers", CREATE_CUSTOMERS_TABLE),
    ("products", CREATE_PRODUCTS_TABLE),
    ("orders", CREATE_ORDERS_TABLE),
    ("orders_products", CREATE_ORDERS_PRODUCTS_TABLE),
];

/// Create any missing tables. Idempotent.
pub async fn migrate(pool: &PgPool) -> RepositoryResult<()> {
    tracing::info!("initializing storefront schema");
    for (table, ddl) in STATEMENTS {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .map_err(|e| map_sqlx_error(&format!("create_table_{table}"), e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_created_before_their_references() {
        let order: Vec<&str> = STATEMENTS.iter().map(|(t, _)| *t).collect();
        assert_eq!(order, vec!["customers", "products", "orders", "orders_products"]);
    }

    #[test]
    fn every_statement_is_idempotent() {
        for (_, ddl) in STATEMENTS {
            assert!(ddl.contains("IF NOT EXISTS"));
        }
    }

    #[test]
    fn price_columns_use_the_catalog_price_scale() {
        let column = format!("NUMERIC(12, {})", storefront_products::PRICE_SCALE);
        assert!(CREATE_PRODUCTS_TABLE.contains(&column));
        assert!(CREATE_ORDERS_PRODUCTS_TABLE.contains(&column));
    }
}
