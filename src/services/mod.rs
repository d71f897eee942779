pub mod auth_service;
pub mod totals_service;
