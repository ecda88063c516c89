//! Row models mapped from database tables.

pub mod todo;
