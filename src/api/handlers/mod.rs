mod admin;
mod books;
mod categories;

pub use admin::{admin_purge, health};
pub use books::{create_book, delete_book, edit_book, get_book, list_books, update_book, view_pdf};
pub use categories::{create_category, list_categories};
