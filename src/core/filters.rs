//! Declarative filter sets and ordering for list queries
//!
//! Each filter set is an input object whose fields are all optional; an absent
//! field does not constrain the result. Text filters are case-insensitive
//! "contains" matches unless noted otherwise.

use crate::core::entity::EntityId;
use crate::core::query::OrderBy;
use crate::entities::product::LOW_STOCK_THRESHOLD;
use crate::entities::{Customer, Order, Product};
use async_graphql::InputObject;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::HashMap;

/// A set of predicates over one entity type
pub trait FilterSet<T> {
    /// Related data the predicates need (e.g. customer names for orders)
    type Context;

    /// Whether `item` passes every populated predicate
    fn matches(&self, item: &T, ctx: &Self::Context) -> bool;

    /// Keep only matching items, preserving order
    fn apply(&self, items: Vec<T>, ctx: &Self::Context) -> Vec<T> {
        items
            .into_iter()
            .filter(|item| self.matches(item, ctx))
            .collect()
    }
}

/// Entities that can be ordered by named fields
pub trait Sortable {
    /// Compare two items by `field`; `None` for unknown fields
    fn compare_field(&self, other: &Self, field: &str) -> Option<Ordering>;
}

/// Sort by each expression in turn; unknown fields are ignored
pub fn apply_sort<T: Sortable>(mut data: Vec<T>, order_by: &[OrderBy]) -> Vec<T> {
    if order_by.is_empty() {
        return data;
    }

    data.sort_by(|a, b| {
        for expr in order_by {
            let Some(ord) = a.compare_field(b, &expr.field) else {
                continue;
            };
            let ord = if expr.descending { ord.reverse() } else { ord };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });

    data
}

fn icontains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

// =============================================================================
// Customers
// =============================================================================

/// Filters for customer lists
#[derive(Debug, Clone, Default, InputObject)]
pub struct CustomerFilter {
    pub name: Option<String>,
    pub email: Option<String>,
    pub created_at_gte: Option<NaiveDate>,
    pub created_at_lte: Option<NaiveDate>,
    /// Phone starts with this prefix (case-sensitive)
    pub phone_pattern: Option<String>,
}

impl FilterSet<Customer> for CustomerFilter {
    type Context = ();

    fn matches(&self, c: &Customer, _: &()) -> bool {
        let created = c.created_at.date_naive();

        self.name.as_deref().is_none_or(|n| icontains(&c.name, n))
            && self.email.as_deref().is_none_or(|e| icontains(&c.email, e))
            && self.created_at_gte.is_none_or(|d| created >= d)
            && self.created_at_lte.is_none_or(|d| created <= d)
            && self
                .phone_pattern
                .as_deref()
                .filter(|p| !p.is_empty())
                .is_none_or(|p| c.phone.as_deref().is_some_and(|phone| phone.starts_with(p)))
    }
}

impl Sortable for Customer {
    fn compare_field(&self, other: &Self, field: &str) -> Option<Ordering> {
        match field {
            "id" => Some(self.id.cmp(&other.id)),
            "name" => Some(self.name.cmp(&other.name)),
            "email" => Some(self.email.cmp(&other.email)),
            "created_at" | "createdAt" => Some(self.created_at.cmp(&other.created_at)),
            _ => None,
        }
    }
}

// =============================================================================
// Products
// =============================================================================

/// Filters for product lists
#[derive(Debug, Clone, Default, InputObject)]
pub struct ProductFilter {
    pub name: Option<String>,
    pub price_gte: Option<Decimal>,
    pub price_lte: Option<Decimal>,
    pub stock_gte: Option<i32>,
    pub stock_lte: Option<i32>,
    /// When true, only products with stock below 10
    pub low_stock: Option<bool>,
}

impl FilterSet<Product> for ProductFilter {
    type Context = ();

    fn matches(&self, p: &Product, _: &()) -> bool {
        self.name.as_deref().is_none_or(|n| icontains(&p.name, n))
            && self.price_gte.is_none_or(|v| p.price >= v)
            && self.price_lte.is_none_or(|v| p.price <= v)
            && self.stock_gte.is_none_or(|v| p.stock >= v)
            && self.stock_lte.is_none_or(|v| p.stock <= v)
            && (self.low_stock != Some(true) || p.is_low_stock(LOW_STOCK_THRESHOLD))
    }
}

impl Sortable for Product {
    fn compare_field(&self, other: &Self, field: &str) -> Option<Ordering> {
        match field {
            "id" => Some(self.id.cmp(&other.id)),
            "name" => Some(self.name.cmp(&other.name)),
            "price" => Some(self.price.cmp(&other.price)),
            "stock" => Some(self.stock.cmp(&other.stock)),
            "created_at" | "createdAt" => Some(self.created_at.cmp(&other.created_at)),
            _ => None,
        }
    }
}

// =============================================================================
// Orders
// =============================================================================

/// Filters for order lists
#[derive(Debug, Clone, Default, InputObject)]
pub struct OrderFilter {
    pub total_amount_gte: Option<Decimal>,
    pub total_amount_lte: Option<Decimal>,
    pub order_date_gte: Option<NaiveDate>,
    pub order_date_lte: Option<NaiveDate>,
    /// Customer name contains
    pub customer_name: Option<String>,
    /// Any associated product's name contains
    pub product_name: Option<String>,
    /// Order contains this product
    pub product_id: Option<EntityId>,
    /// Order belongs to this customer
    pub customer_id: Option<EntityId>,
}

/// Customers and products referenced by the orders being filtered
#[derive(Debug, Default)]
pub struct OrderRelations {
    pub customers: HashMap<EntityId, Customer>,
    pub products: HashMap<EntityId, Product>,
}

impl OrderRelations {
    pub fn new(customers: Vec<Customer>, products: Vec<Product>) -> Self {
        Self {
            customers: customers.into_iter().map(|c| (c.id, c)).collect(),
            products: products.into_iter().map(|p| (p.id, p)).collect(),
        }
    }
}

impl OrderFilter {
    /// Whether matching needs customer/product data
    pub fn needs_relations(&self) -> bool {
        self.customer_name.is_some() || self.product_name.is_some()
    }
}

impl FilterSet<Order> for OrderFilter {
    type Context = OrderRelations;

    fn matches(&self, o: &Order, rel: &OrderRelations) -> bool {
        let order_date = o.order_date.date_naive();

        self.total_amount_gte.is_none_or(|v| o.total_amount >= v)
            && self.total_amount_lte.is_none_or(|v| o.total_amount <= v)
            && self.order_date_gte.is_none_or(|d| order_date >= d)
            && self.order_date_lte.is_none_or(|d| order_date <= d)
            && self.customer_id.is_none_or(|id| o.customer_id == id)
            && self.product_id.is_none_or(|id| o.product_ids.contains(&id))
            && self.customer_name.as_deref().is_none_or(|n| {
                rel.customers
                    .get(&o.customer_id)
                    .is_some_and(|c| icontains(&c.name, n))
            })
            && self.product_name.as_deref().is_none_or(|n| {
                o.product_ids.iter().any(|id| {
                    rel.products
                        .get(id)
                        .is_some_and(|p| icontains(&p.name, n))
                })
            })
    }
}

impl Sortable for Order {
    fn compare_field(&self, other: &Self, field: &str) -> Option<Ordering> {
        match field {
            "id" => Some(self.id.cmp(&other.id)),
            "total_amount" | "totalAmount" => Some(self.total_amount.cmp(&other.total_amount)),
            "order_date" | "orderDate" => Some(self.order_date.cmp(&other.order_date)),
            "created_at" | "createdAt" => Some(self.created_at.cmp(&other.created_at)),
            _ => None,
        }
    }
}
