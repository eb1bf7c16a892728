//! Placing an order against the catalog.
//!
//! Checks run in a fixed order and the first failure wins:
//! 1. the customer exists
//! 2. at least one requested product exists
//! 3. every requested product exists
//! 4. every catalog row has enough stock for what was asked of it
//!
//! Nothing is written unless all four pass. The stock check reads the catalog
//! before the checkout writes, without a lock, so two concurrent orders for the
//! same product can both pass it.

use tracing::instrument;

use storefront_core::{DomainError, DomainResult, ProductId, ServiceResult};
use storefront_customers::CustomersRepository;
use storefront_products::{Product, ProductsRepository, UpdateProductQuantity};

use crate::order::{CreateOrderRequest, NewOrder, Order, OrderItem, RequestedProduct};
use crate::repository::OrderCheckout;

pub const CUSTOMER_NOT_FOUND: &str = "There is no customer with this id.";
pub const NO_PRODUCTS_FOUND: &str = "Could not find any product with given Id.";

/// Priced line items plus the stock decrement they imply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderPlan {
    /// One item per request line, in request order.
    pub items: Vec<OrderItem>,
    /// One entry per distinct product, in first-requested order.
    pub stock: Vec<UpdateProductQuantity>,
}

/// Run checks 2-4 against the catalog rows returned for the request and price
/// the order.
///
/// `catalog` is the result of `find_all_by_id` and is walked in the order
/// given when looking for a stock shortfall. A product requested on several
/// lines is checked against the sum of those lines.
pub fn plan_order(catalog: &[Product], requested: &[RequestedProduct]) -> DomainResult<OrderPlan> {
    if catalog.is_empty() {
        return Err(DomainError::validation(NO_PRODUCTS_FOUND));
    }

    let missing: Vec<String> = requested
        .iter()
        .filter(|r| !catalog.iter().any(|p| p.id == r.id))
        .map(|r| r.id.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DomainError::validation(format!(
            "Could not find product(s) of id(s):{}",
            missing.join(",")
        )));
    }

    let stock = requested_totals(requested)?;

    for product in catalog {
        let asked = stock
            .iter()
            .find(|s| s.id == product.id)
            .map(|s| s.quantity)
            .unwrap_or(0);
        if product.quantity < asked {
            return Err(DomainError::validation(format!(
                "The quantity: {} is not available for id: {}",
                product.quantity, product.id
            )));
        }
    }

    let mut items = Vec::with_capacity(requested.len());
    for line in requested {
        let product = catalog
            .iter()
            .find(|p| p.id == line.id)
            .ok_or_else(|| DomainError::not_found(format!("product {}", line.id)))?;
        items.push(OrderItem {
            product_id: line.id,
            quantity: line.quantity,
            price: product.price,
        });
    }

    Ok(OrderPlan { items, stock })
}

fn requested_totals(requested: &[RequestedProduct]) -> DomainResult<Vec<UpdateProductQuantity>> {
    let mut totals: Vec<UpdateProductQuantity> = Vec::with_capacity(requested.len());
    for line in requested {
        match totals.iter_mut().find(|t| t.id == line.id) {
            Some(total) => {
                total.quantity = total.quantity.checked_add(line.quantity).ok_or_else(|| {
                    DomainError::validation(format!(
                        "The requested quantity is too large for id: {}",
                        line.id
                    ))
                })?;
            }
            None => totals.push(UpdateProductQuantity {
                id: line.id,
                quantity: line.quantity,
            }),
        }
    }
    Ok(totals)
}

/// Places an order for an existing customer against the current catalog.
pub struct CreateOrderService<C, P, K> {
    customers: C,
    products: P,
    checkout: K,
}

impl<C, P, K> CreateOrderService<C, P, K>
where
    C: CustomersRepository,
    P: ProductsRepository,
    K: OrderCheckout,
{
    pub fn new(customers: C, products: P, checkout: K) -> Self {
        Self {
            customers,
            products,
            checkout,
        }
    }

    #[instrument(
        skip(self, request),
        fields(
            customer_id = %request.customer_id,
            lines = request.products.len()
        ),
        err(level = "debug")
    )]
    pub async fn execute(&self, request: CreateOrderRequest) -> ServiceResult<Order> {
        let customer = self
            .customers
            .find_by_id(request.customer_id)
            .await?
            .ok_or_else(|| DomainError::validation(CUSTOMER_NOT_FOUND))?;

        let ids: Vec<ProductId> = request.product_ids();
        let catalog = self.products.find_all_by_id(&ids).await?;

        let plan = plan_order(&catalog, &request.products)?;

        let order = self
            .checkout
            .place(
                NewOrder {
                    customer,
                    items: plan.items,
                },
                plan.stock,
            )
            .await?;

        tracing::info!(
            order_id = %order.id,
            items = order.items.len(),
            total = order.total().map(tracing::field::display),
            "order placed"
        );
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use storefront_products::CreateProduct;

    fn product(name: &str, price: i64, quantity: i64) -> Product {
        Product::from_new(
            CreateProduct {
                name: name.to_string(),
                price: Decimal::new(price, 0),
                quantity,
            },
            Utc::now(),
        )
    }

    fn line(product: &Product, quantity: i64) -> RequestedProduct {
        RequestedProduct {
            id: product.id,
            quantity,
        }
    }

    fn message(err: DomainError) -> String {
        match err {
            DomainError::Validation(msg) => msg,
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn prices_items_from_catalog_and_plans_decrement() {
        let a = product("A", 10, 5);
        let plan = plan_order(&[a.clone()], &[line(&a, 3)]).unwrap();

        assert_eq!(
            plan.items,
            vec![OrderItem {
                product_id: a.id,
                quantity: 3,
                price: Decimal::new(10, 0),
            }]
        );
        assert_eq!(
            plan.stock,
            vec![UpdateProductQuantity {
                id: a.id,
                quantity: 3
            }]
        );
    }

    #[test]
    fn exact_stock_is_enough() {
        let a = product("A", 10, 5);
        assert!(plan_order(&[a.clone()], &[line(&a, 5)]).is_ok());
    }

    #[test]
    fn shortfall_reports_catalog_quantity_and_id() {
        let a = product("A", 10, 5);
        let err = plan_order(&[a.clone()], &[line(&a, 10)]).unwrap_err();
        assert_eq!(
            message(err),
            format!("The quantity: 5 is not available for id: {}", a.id)
        );
    }

    #[test]
    fn shortfall_reports_first_in_catalog_order() {
        let a = product("A", 10, 1);
        let b = product("B", 10, 1);
        // Request order is B then A; catalog order is A then B.
        let err = plan_order(&[a.clone(), b.clone()], &[line(&b, 2), line(&a, 2)]).unwrap_err();
        assert!(message(err).ends_with(&a.id.to_string()));
    }

    #[test]
    fn empty_catalog_means_no_products_found() {
        let a = product("A", 10, 5);
        let err = plan_order(&[], &[line(&a, 1)]).unwrap_err();
        assert_eq!(message(err), NO_PRODUCTS_FOUND);
    }

    #[test]
    fn missing_ids_are_all_listed_in_request_order() {
        let a = product("A", 10, 5);
        let ghost1 = ProductId::new();
        let ghost2 = ProductId::new();
        let requested = vec![
            RequestedProduct {
                id: ghost1,
                quantity: 1,
            },
            line(&a, 1),
            RequestedProduct {
                id: ghost2,
                quantity: 1,
            },
        ];

        let err = plan_order(&[a], &requested).unwrap_err();
        assert_eq!(
            message(err),
            format!("Could not find product(s) of id(s):{ghost1},{ghost2}")
        );
    }

    #[test]
    fn missing_ids_win_over_stock_shortfall() {
        let a = product("A", 10, 1);
        let ghost = ProductId::new();
        let err = plan_order(
            &[a.clone()],
            &[
                line(&a, 99),
                RequestedProduct {
                    id: ghost,
                    quantity: 1,
                },
            ],
        )
        .unwrap_err();
        assert!(message(err).starts_with("Could not find product(s)"));
    }

    #[test]
    fn repeated_product_is_checked_against_its_sum() {
        let a = product("A", 10, 5);
        let err = plan_order(&[a.clone()], &[line(&a, 3), line(&a, 3)]).unwrap_err();
        assert!(message(err).starts_with("The quantity: 5"));

        let plan = plan_order(&[a.clone()], &[line(&a, 2), line(&a, 3)]).unwrap();
        assert_eq!(plan.items.len(), 2);
        assert_eq!(
            plan.stock,
            vec![UpdateProductQuantity {
                id: a.id,
                quantity: 5
            }]
        );
    }

    #[test]
    fn repeated_product_whose_sum_overflows_is_rejected() {
        let a = product("A", 10, 5);
        let err = plan_order(&[a.clone()], &[line(&a, i64::MAX), line(&a, i64::MAX)]).unwrap_err();
        assert_eq!(
            message(err),
            format!("The requested quantity is too large for id: {}", a.id)
        );
    }

    #[test]
    fn items_follow_request_order() {
        let a = product("A", 10, 5);
        let b = product("B", 7, 5);
        let plan = plan_order(&[a.clone(), b.clone()], &[line(&b, 1), line(&a, 2)]).unwrap();

        let ids: Vec<ProductId> = plan.items.iter().map(|i| i.product_id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
        assert_eq!(plan.items[0].price, Decimal::new(7, 0));
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: a plan exists iff every product has at least what was asked of it.
            #[test]
            fn plan_succeeds_iff_stock_covers_request(
                stock in proptest::collection::vec(0i64..20, 1..6),
                asked in proptest::collection::vec(1i64..20, 1..6),
            ) {
                let catalog: Vec<Product> = stock
                    .iter()
                    .enumerate()
                    .map(|(i, q)| product(&format!("P{i}"), 3, *q))
                    .collect();
                let requested: Vec<RequestedProduct> = catalog
                    .iter()
                    .zip(asked.iter())
                    .map(|(p, q)| line(p, *q))
                    .collect();

                let covered = catalog
                    .iter()
                    .zip(asked.iter())
                    .all(|(p, q)| p.quantity >= *q);

                let result = plan_order(&catalog, &requested);
                prop_assert_eq!(result.is_ok(), covered);

                if let Ok(plan) = result {
                    prop_assert_eq!(plan.items.len(), requested.len());
                    for item in &plan.items {
                        prop_assert_eq!(item.price, Decimal::new(3, 0));
                    }
                    let planned: i64 = plan.stock.iter().map(|s| s.quantity).sum();
                    let total: i64 = requested.iter().map(|r| r.quantity).sum();
                    prop_assert_eq!(planned, total);
                }
            }
        }
    }
}
