//! Read-side queries: lookups, filtered lists and report aggregates

use super::{CrmService, parse_id};
use crate::core::aggregate::total_revenue;
use crate::core::error::CrmResult;
use crate::core::filters::{
    CustomerFilter, FilterSet, OrderFilter, OrderRelations, ProductFilter, apply_sort,
};
use crate::core::query::{OrderBy, Page, PageRequest};
use crate::entities::{Customer, Order, Product};
use rust_decimal::Decimal;

/// Filter, sort and paginate a list query
#[derive(Debug, Clone, Default)]
pub struct ListQuery<F> {
    pub filter: F,
    pub order_by: Vec<String>,
    pub page: PageRequest,
}

impl<F: Default> ListQuery<F> {
    pub fn filtered(filter: F) -> Self {
        Self {
            filter,
            ..Default::default()
        }
    }
}

impl CrmService {
    /// Look up a customer; unknown or malformed ids give `None`
    pub async fn customer(&self, id: &str) -> CrmResult<Option<Customer>> {
        match parse_id(id) {
            Some(id) => Ok(self.store.get_customer(id).await?),
            None => Ok(None),
        }
    }

    pub async fn product(&self, id: &str) -> CrmResult<Option<Product>> {
        match parse_id(id) {
            Some(id) => Ok(self.store.get_product(id).await?),
            None => Ok(None),
        }
    }

    pub async fn order(&self, id: &str) -> CrmResult<Option<Order>> {
        match parse_id(id) {
            Some(id) => Ok(self.store.get_order(id).await?),
            None => Ok(None),
        }
    }

    pub async fn all_customers(&self, query: &ListQuery<CustomerFilter>) -> CrmResult<Page<Customer>> {
        let customers = query.filter.apply(self.store.list_customers().await?, &());
        let customers = apply_sort(customers, &OrderBy::parse_all(&query.order_by));
        Ok(Page::paginate(customers, &query.page))
    }

    pub async fn all_products(&self, query: &ListQuery<ProductFilter>) -> CrmResult<Page<Product>> {
        let products = query.filter.apply(self.store.list_products().await?, &());
        let products = apply_sort(products, &OrderBy::parse_all(&query.order_by));
        Ok(Page::paginate(products, &query.page))
    }

    pub async fn all_orders(&self, query: &ListQuery<OrderFilter>) -> CrmResult<Page<Order>> {
        let relations = if query.filter.needs_relations() {
            OrderRelations::new(
                self.store.list_customers().await?,
                self.store.list_products().await?,
            )
        } else {
            OrderRelations::default()
        };

        let orders = query.filter.apply(self.store.list_orders().await?, &relations);
        let orders = apply_sort(orders, &OrderBy::parse_all(&query.order_by));
        Ok(Page::paginate(orders, &query.page))
    }

    /// The customer an order belongs to
    pub async fn order_customer(&self, order: &Order) -> CrmResult<Option<Customer>> {
        Ok(self.store.get_customer(order.customer_id).await?)
    }

    /// The products attached to an order
    pub async fn order_products(&self, order: &Order) -> CrmResult<Vec<Product>> {
        Ok(self.store.products_by_ids(&order.product_ids).await?)
    }

    pub async fn customer_count(&self) -> CrmResult<usize> {
        Ok(self.store.list_customers().await?.len())
    }

    pub async fn order_count(&self) -> CrmResult<usize> {
        Ok(self.store.list_orders().await?.len())
    }

    /// Sum of all stored order totals
    pub async fn total_revenue(&self) -> CrmResult<Decimal> {
        Ok(total_revenue(&self.store.list_orders().await?))
    }
}
