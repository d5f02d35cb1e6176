//! CRM entities: customers, products and the orders linking them

pub mod macros;

pub mod customer;
pub mod order;
pub mod product;

pub use customer::Customer;
pub use order::Order;
pub use product::Product;
