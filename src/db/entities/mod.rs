//! SeaORM entities mapping to the database tables.

pub mod activity_record;
pub mod employee;
