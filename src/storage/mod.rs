//! Settings persistence

pub mod database;

pub use database::{data_dir, default_db_path, Database, DatabaseError};
