//! GraphQL schema: query and mutation roots over [`CrmService`]

use super::types::{
    BulkCreateCustomersPayload, CreateCustomerPayload, CreateOrderPayload, CreateProductPayload,
    CustomerConnection, CustomerObject, OrderConnection, OrderObject, ProductConnection,
    ProductObject, UpdateLowStockProductsPayload, count,
};
use crate::core::filters::{CustomerFilter, OrderFilter, ProductFilter};
use crate::core::query::PageRequest;
use crate::handlers::queries::ListQuery;
use crate::handlers::{CrmService, CustomerInput, OrderInput, ProductInput};
use async_graphql::{Context, EmptySubscription, ErrorExtensions, ID, Object, Result, Schema};
use rust_decimal::Decimal;

/// The executable CRM schema
pub type CrmSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the schema with the service available to every resolver
pub fn build_schema(service: CrmService) -> CrmSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(service)
        .finish()
}

fn list_query<F>(
    filter: Option<F>,
    order_by: Option<Vec<String>>,
    first: Option<i32>,
    offset: Option<i32>,
) -> ListQuery<F>
where
    F: Default,
{
    let non_negative = |v: i32| usize::try_from(v.max(0)).unwrap_or(0);

    ListQuery {
        filter: filter.unwrap_or_default(),
        order_by: order_by.unwrap_or_default(),
        page: PageRequest::new(first.map(non_negative), offset.map(non_negative)),
    }
}

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Liveness check used by the heartbeat job
    async fn hello(&self) -> &'static str {
        "Hello, GraphQL!"
    }

    async fn customer(&self, ctx: &Context<'_>, id: ID) -> Result<Option<CustomerObject>> {
        let service = ctx.data::<CrmService>()?;
        let customer = service.customer(&id).await.map_err(|e| e.extend())?;
        Ok(customer.map(CustomerObject))
    }

    async fn product(&self, ctx: &Context<'_>, id: ID) -> Result<Option<ProductObject>> {
        let service = ctx.data::<CrmService>()?;
        let product = service.product(&id).await.map_err(|e| e.extend())?;
        Ok(product.map(ProductObject))
    }

    async fn order(&self, ctx: &Context<'_>, id: ID) -> Result<Option<OrderObject>> {
        let service = ctx.data::<CrmService>()?;
        let order = service.order(&id).await.map_err(|e| e.extend())?;
        Ok(order.map(OrderObject))
    }

    /// Customers matching `filter`, sorted by `orderBy` (`field` or `-field`)
    async fn all_customers(
        &self,
        ctx: &Context<'_>,
        filter: Option<CustomerFilter>,
        order_by: Option<Vec<String>>,
        first: Option<i32>,
        offset: Option<i32>,
    ) -> Result<CustomerConnection> {
        let service = ctx.data::<CrmService>()?;
        let query = list_query(filter, order_by, first, offset);
        let page = service.all_customers(&query).await.map_err(|e| e.extend())?;
        Ok(page.into())
    }

    async fn all_products(
        &self,
        ctx: &Context<'_>,
        filter: Option<ProductFilter>,
        order_by: Option<Vec<String>>,
        first: Option<i32>,
        offset: Option<i32>,
    ) -> Result<ProductConnection> {
        let service = ctx.data::<CrmService>()?;
        let query = list_query(filter, order_by, first, offset);
        let page = service.all_products(&query).await.map_err(|e| e.extend())?;
        Ok(page.into())
    }

    async fn all_orders(
        &self,
        ctx: &Context<'_>,
        filter: Option<OrderFilter>,
        order_by: Option<Vec<String>>,
        first: Option<i32>,
        offset: Option<i32>,
    ) -> Result<OrderConnection> {
        let service = ctx.data::<CrmService>()?;
        let query = list_query(filter, order_by, first, offset);
        let page = service.all_orders(&query).await.map_err(|e| e.extend())?;
        Ok(page.into())
    }

    async fn customer_count(&self, ctx: &Context<'_>) -> Result<i64> {
        let service = ctx.data::<CrmService>()?;
        Ok(count(service.customer_count().await.map_err(|e| e.extend())?))
    }

    async fn order_count(&self, ctx: &Context<'_>) -> Result<i64> {
        let service = ctx.data::<CrmService>()?;
        Ok(count(service.order_count().await.map_err(|e| e.extend())?))
    }

    /// Sum of all order totals
    async fn total_revenue(&self, ctx: &Context<'_>) -> Result<Decimal> {
        let service = ctx.data::<CrmService>()?;
        service.total_revenue().await.map_err(|e| e.extend())
    }
}

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_customer(
        &self,
        ctx: &Context<'_>,
        input: CustomerInput,
    ) -> Result<CreateCustomerPayload> {
        let service = ctx.data::<CrmService>()?;
        Ok(service.create_customer(input).await.into())
    }

    /// Create many customers; invalid rows are reported, not fatal
    async fn bulk_create_customers(
        &self,
        ctx: &Context<'_>,
        inputs: Vec<CustomerInput>,
    ) -> Result<BulkCreateCustomersPayload> {
        let service = ctx.data::<CrmService>()?;
        Ok(service.bulk_create_customers(inputs).await.into())
    }

    async fn create_product(
        &self,
        ctx: &Context<'_>,
        input: ProductInput,
    ) -> Result<CreateProductPayload> {
        let service = ctx.data::<CrmService>()?;
        Ok(service.create_product(input).await.into())
    }

    async fn create_order(&self, ctx: &Context<'_>, input: OrderInput) -> Result<CreateOrderPayload> {
        let service = ctx.data::<CrmService>()?;
        Ok(service.create_order(input).await.into())
    }

    /// Restock every product below the low-stock threshold
    async fn update_low_stock_products(
        &self,
        ctx: &Context<'_>,
    ) -> Result<UpdateLowStockProductsPayload> {
        let service = ctx.data::<CrmService>()?;
        Ok(service.update_low_stock_products().await.into())
    }
}
