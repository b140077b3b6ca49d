pub mod books;
pub mod categories;
pub mod db;
pub mod models;
pub mod tables;

pub use db::{Database, DatabaseError};
