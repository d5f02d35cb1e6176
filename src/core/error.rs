//! Typed error handling for the CRM core
//!
//! Every mutation handler works on `Result<T, CrmError>` internally and turns the
//! error into a result record at its boundary. The set of handler errors is closed:
//!
//! - [`ValidationError`]: bad input shape or value, correctable by the caller
//! - [`NotFoundError`]: a referenced entity does not exist
//! - [`StorageError`]: the entity store failed
//!
//! [`ConfigError`] is kept apart because it never reaches a handler.
//!
//! # Example
//!
//! ```rust,ignore
//! use crm::prelude::*;
//!
//! match service.try_create_order(input).await {
//!     Ok(order) => println!("Order {} total {}", order.id, order.total_amount),
//!     Err(CrmError::NotFound(NotFoundError::Products { ids })) => {
//!         println!("missing products: {:?}", ids);
//!     }
//!     Err(e) => eprintln!("{} ({})", e, e.error_code()),
//! }
//! ```

use async_graphql::ErrorExtensions;
use std::fmt;

/// The error type returned by every core operation
#[derive(Debug)]
pub enum CrmError {
    /// Input validation failed
    Validation(ValidationError),

    /// A referenced entity is missing
    NotFound(NotFoundError),

    /// Storage backend failure
    Storage(StorageError),
}

impl fmt::Display for CrmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrmError::Validation(e) => write!(f, "{}", e),
            CrmError::NotFound(e) => write!(f, "{}", e),
            CrmError::Storage(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CrmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CrmError::Validation(e) => Some(e),
            CrmError::NotFound(e) => Some(e),
            CrmError::Storage(e) => Some(e),
        }
    }
}

impl CrmError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            CrmError::Validation(_) => "VALIDATION_ERROR",
            CrmError::NotFound(_) => "NOT_FOUND",
            CrmError::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Message shown to API callers
    ///
    /// Validation and lookup failures are shown verbatim. Storage failures are
    /// wrapped, since they are not something the caller can fix.
    pub fn user_message(&self) -> String {
        match self {
            CrmError::Storage(e) => format!("An error occurred: {}", e),
            other => other.to_string(),
        }
    }
}

impl ErrorExtensions for CrmError {
    fn extend(&self) -> async_graphql::Error {
        let code = self.error_code();
        async_graphql::Error::new(self.user_message()).extend_with(|_, ext| ext.set("code", code))
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Phone does not match `+<1-15 digits>` or `DDD-DDD-DDDD`
    InvalidPhone,

    /// Email is not a syntactically valid address
    InvalidEmail {
        value: String,
    },

    /// Required field missing or blank
    Required {
        field: String,
    },

    /// Price is zero or negative
    NonPositivePrice,

    /// Stock is below zero
    NegativeStock,

    /// Order without products
    NoProducts,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidPhone => {
                write!(f, "Phone must be in format +1234567890 or 123-456-7890")
            }
            ValidationError::InvalidEmail { value } => {
                write!(f, "Enter a valid email address (got '{}')", value)
            }
            ValidationError::Required { field } => {
                write!(f, "Field '{}' is required", field)
            }
            ValidationError::NonPositivePrice => write!(f, "Price must be positive"),
            ValidationError::NegativeStock => write!(f, "Stock cannot be negative"),
            ValidationError::NoProducts => write!(f, "At least one product is required"),
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for CrmError {
    fn from(err: ValidationError) -> Self {
        CrmError::Validation(err)
    }
}

// =============================================================================
// Not Found Errors
// =============================================================================

/// Errors raised when a referenced entity does not exist
#[derive(Debug, Clone, PartialEq)]
pub enum NotFoundError {
    /// The order's customer is missing
    Customer {
        id: String,
    },

    /// Some of the order's products are missing (ids in request order)
    Products {
        ids: Vec<String>,
    },
}

impl fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotFoundError::Customer { .. } => write!(f, "Customer does not exist"),
            NotFoundError::Products { ids } => {
                write!(f, "Products not found: {}", ids.join(", "))
            }
        }
    }
}

impl std::error::Error for NotFoundError {}

impl From<NotFoundError> for CrmError {
    fn from(err: NotFoundError) -> Self {
        CrmError::NotFound(err)
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to storage backends
#[derive(Debug, Clone, PartialEq)]
pub enum StorageError {
    /// Query execution error
    QueryError {
        backend: String,
        message: String,
    },

    /// Data integrity error
    IntegrityError {
        message: String,
    },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::QueryError { backend, message } => {
                write!(f, "{} query error: {}", backend, message)
            }
            StorageError::IntegrityError { message } => {
                write!(f, "Data integrity error: {}", message)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl From<StorageError> for CrmError {
    fn from(err: StorageError) -> Self {
        CrmError::Storage(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration file
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// Configuration file not found
    FileNotFound {
        path: String,
    },

    /// IO error while reading configuration
    IoError {
        message: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::InvalidValue {
                field,
                value,
                message,
            } => {
                write!(
                    f,
                    "Invalid value '{}' for field '{}': {}",
                    value, field, message
                )
            }
            ConfigError::FileNotFound { path } => {
                write!(f, "Configuration file not found: {}", path)
            }
            ConfigError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Result type aliases
// =============================================================================

/// A specialized Result type for core operations
pub type CrmResult<T> = Result<T, CrmError>;

/// A specialized Result type for store operations
pub type StoreResult<T> = Result<T, StorageError>;

// =============================================================================
// Tests
// =============================================================================
