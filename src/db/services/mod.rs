//! High-level data access API over the SeaORM entities. Handlers and domain
//! services go through these functions instead of touching the query builder
//! directly, keeping the SQL concerns in one place.

pub mod employee_service;
pub mod record_service;

pub use employee_service::*;
pub use record_service::*;
