pub mod admin_routes;
pub mod employee_routes;
pub mod record_routes;
pub mod totals_routes;
