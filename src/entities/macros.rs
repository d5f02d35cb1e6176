//! Macros for reducing boilerplate when defining entities
//!
//! These macros generate the struct and the repetitive trait implementations
//! needed for each entity type.

/// Complete macro to create an entity with automatic trait implementations
///
/// The generated struct carries `id`, `created_at` and `updated_at` followed by
/// the specific fields, and gets a `new()` constructor taking the specific fields
/// in declaration order. New instances have id `0` until a store inserts them.
///
/// # Example
///
/// ```rust,ignore
/// use crm::prelude::*;
///
/// impl_data_entity!(
///     /// A supplier of products
///     Supplier,
///     "supplier",
///     {
///         name: String,
///         contact_email: String,
///     }
/// );
///
/// let supplier = Supplier::new("Acme".to_string(), "sales@acme.test".to_string());
/// assert_eq!(supplier.id, 0);
/// ```
#[macro_export]
macro_rules! impl_data_entity {
    (
        $(#[$meta:meta])*
        $type:ident,
        $singular:expr,
        {
            $( $(#[$field_meta:meta])* $specific_field:ident : $specific_type:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $type {
            /// Store-assigned identifier (0 until inserted)
            pub id: $crate::core::entity::EntityId,

            /// When this entity was created
            pub created_at: ::chrono::DateTime<::chrono::Utc>,

            /// When this entity was last updated
            pub updated_at: ::chrono::DateTime<::chrono::Utc>,

            $( $(#[$field_meta])* pub $specific_field : $specific_type ),*
        }

        // Implement Entity trait
        impl $crate::core::entity::Entity for $type {
            fn resource_name_singular() -> &'static str {
                $singular
            }

            fn id(&self) -> $crate::core::entity::EntityId {
                self.id
            }

            fn set_id(&mut self, id: $crate::core::entity::EntityId) {
                self.id = id;
            }
        }

        // Utility methods
        impl $type {
            /// Create a new, unsaved instance of this entity
            pub fn new($( $specific_field: $specific_type ),*) -> Self {
                let now = ::chrono::Utc::now();
                Self {
                    id: 0,
                    created_at: now,
                    updated_at: now,
                    $( $specific_field ),*
                }
            }

            /// Update the updated_at timestamp to now
            pub fn touch(&mut self) {
                self.updated_at = ::chrono::Utc::now();
            }
        }
    };
}
