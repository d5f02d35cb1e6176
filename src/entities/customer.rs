//! Customer entity

crate::impl_data_entity!(
    /// A person or company buying products
    Customer,
    "customer",
    {
        /// Display name, never blank
        name: String,
        /// Contact email
        email: String,
        /// `+<1-15 digits>` or `DDD-DDD-DDDD`
        phone: Option<String>,
    }
);
