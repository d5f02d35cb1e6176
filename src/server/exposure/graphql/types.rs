//! GraphQL object types for the CRM entities and mutation payloads
//!
//! Entities are wrapped so their ids can be exposed as `ID` strings and so
//! relations can be resolved through the [`CrmService`] in the request context.

use crate::core::query::Page;
use crate::entities::{Customer, Order, Product};
use crate::handlers::{BulkCreateResponse, CrmService, MutationResponse};
use async_graphql::{Context, ErrorExtensions, ID, Object, Result, SimpleObject};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

fn gql_id(id: i64) -> ID {
    ID(id.to_string())
}

/// GraphQL `Int` counts are signed
pub(super) fn count(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

// =============================================================================
// Entities
// =============================================================================

/// A customer
pub struct CustomerObject(pub Customer);

#[Object(name = "Customer")]
impl CustomerObject {
    async fn id(&self) -> ID {
        gql_id(self.0.id)
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn email(&self) -> &str {
        &self.0.email
    }

    async fn phone(&self) -> Option<&str> {
        self.0.phone.as_deref()
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.0.updated_at
    }
}

/// A product in the catalogue
pub struct ProductObject(pub Product);

#[Object(name = "Product")]
impl ProductObject {
    async fn id(&self) -> ID {
        gql_id(self.0.id)
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn price(&self) -> Decimal {
        self.0.price
    }

    async fn stock(&self) -> i32 {
        self.0.stock
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.0.updated_at
    }
}

/// An order placed by a customer
pub struct OrderObject(pub Order);

#[Object(name = "Order")]
impl OrderObject {
    async fn id(&self) -> ID {
        gql_id(self.0.id)
    }

    /// Sum of product prices when the order was created
    async fn total_amount(&self) -> Decimal {
        self.0.total_amount
    }

    async fn order_date(&self) -> DateTime<Utc> {
        self.0.order_date
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.0.updated_at
    }

    async fn customer(&self, ctx: &Context<'_>) -> Result<Option<CustomerObject>> {
        let service = ctx.data::<CrmService>()?;
        Ok(service
            .order_customer(&self.0)
            .await
            .map_err(|e| e.extend())?
            .map(CustomerObject))
    }

    async fn products(&self, ctx: &Context<'_>) -> Result<Vec<ProductObject>> {
        let service = ctx.data::<CrmService>()?;
        Ok(service
            .order_products(&self.0)
            .await
            .map_err(|e| e.extend())?
            .into_iter()
            .map(ProductObject)
            .collect())
    }
}

// =============================================================================
// Connections
// =============================================================================

macro_rules! connection {
    ($name:ident, $gql_name:literal, $object:ident, $entity:ty) => {
        #[derive(SimpleObject)]
        #[graphql(name = $gql_name)]
        pub struct $name {
            pub items: Vec<$object>,
            pub total_count: i64,
            pub has_next_page: bool,
            pub has_previous_page: bool,
        }

        impl From<Page<$entity>> for $name {
            fn from(page: Page<$entity>) -> Self {
                Self {
                    items: page.items.into_iter().map($object).collect(),
                    total_count: count(page.total_count),
                    has_next_page: page.has_next_page,
                    has_previous_page: page.has_previous_page,
                }
            }
        }
    };
}

connection!(CustomerConnection, "CustomerConnection", CustomerObject, Customer);
connection!(ProductConnection, "ProductConnection", ProductObject, Product);
connection!(OrderConnection, "OrderConnection", OrderObject, Order);

// =============================================================================
// Mutation payloads
// =============================================================================

macro_rules! payload {
    ($name:ident, $gql_name:literal, $field:ident : $object:ident, $entity:ty) => {
        #[derive(SimpleObject)]
        #[graphql(name = $gql_name)]
        pub struct $name {
            pub $field: Option<$object>,
            pub message: String,
            pub success: bool,
            /// Set when `success` is false
            pub error_code: Option<String>,
        }

        impl From<MutationResponse<$entity>> for $name {
            fn from(response: MutationResponse<$entity>) -> Self {
                Self {
                    $field: response.payload.map($object),
                    message: response.message,
                    success: response.success,
                    error_code: response.error_code,
                }
            }
        }
    };
}

payload!(CreateCustomerPayload, "CreateCustomerPayload", customer: CustomerObject, Customer);
payload!(CreateProductPayload, "CreateProductPayload", product: ProductObject, Product);
payload!(CreateOrderPayload, "CreateOrderPayload", order: OrderObject, Order);

#[derive(SimpleObject)]
pub struct BulkCreateCustomersPayload {
    pub customers: Vec<CustomerObject>,
    pub errors: Vec<String>,
    pub success_count: i64,
    pub error_count: i64,
}

impl From<BulkCreateResponse> for BulkCreateCustomersPayload {
    fn from(response: BulkCreateResponse) -> Self {
        Self {
            customers: response.customers.into_iter().map(CustomerObject).collect(),
            errors: response.errors,
            success_count: count(response.success_count),
            error_count: count(response.error_count),
        }
    }
}

#[derive(SimpleObject)]
pub struct UpdateLowStockProductsPayload {
    /// The restocked products with their new stock
    pub products: Vec<ProductObject>,
    pub message: String,
    pub success: bool,
    pub error_code: Option<String>,
}

impl From<MutationResponse<Vec<Product>>> for UpdateLowStockProductsPayload {
    fn from(response: MutationResponse<Vec<Product>>) -> Self {
        Self {
            products: response
                .payload
                .unwrap_or_default()
                .into_iter()
                .map(ProductObject)
                .collect(),
            message: response.message,
            success: response.success,
            error_code: response.error_code,
        }
    }
}
