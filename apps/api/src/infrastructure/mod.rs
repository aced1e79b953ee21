// Infrastructure layer module
// Database adapters, schema migrations and demo data

pub mod database;
pub mod repositories;
pub mod seed;
