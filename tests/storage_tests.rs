use book_manager::storage::models::{BookRecord, BookUpdate, CategoryRecord};
use book_manager::storage::Database;
use chrono::Utc;

fn test_db() -> (tempfile::TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(dir.path().join("data")).unwrap();
    (dir, db)
}

fn sample_book(id: &str, owner_id: &str) -> BookRecord {
    let now = Utc::now();
    BookRecord {
        id: id.to_string(),
        title: "The Rust Programming Language".to_string(),
        author: "Steve Klabnik".to_string(),
        description: "A book about Rust".to_string(),
        category_id: "cat-1".to_string(),
        quantity: 3,
        file_path: Some(format!("pdfs/{id}.pdf")),
        cover_path: Some(format!("covers/{id}.jpg")),
        owner_id: owner_id.to_string(),
        created_at: now,
        updated_at: now,
    }
}

fn sample_update() -> BookUpdate {
    BookUpdate {
        title: "Updated Title".to_string(),
        author: "Updated Author".to_string(),
        description: "Updated description".to_string(),
        category_id: "cat-2".to_string(),
        quantity: 7,
        file_path: None,
        cover_path: None,
    }
}

fn sample_category(id: &str, name: &str) -> CategoryRecord {
    CategoryRecord {
        id: id.to_string(),
        name: name.to_string(),
        created_at: Utc::now(),
    }
}

// ============================================================================
// Book tests
// ============================================================================

#[test]
fn test_put_and_get_book() {
    let (_dir, db) = test_db();
    let book = sample_book("book-1", "user-1");

    db.put_book(&book).unwrap();

    let retrieved = db.get_book("book-1").unwrap().expect("book should exist");
    assert_eq!(retrieved.id, "book-1");
    assert_eq!(retrieved.title, "The Rust Programming Language");
    assert_eq!(retrieved.author, "Steve Klabnik");
    assert_eq!(retrieved.quantity, 3);
    assert_eq!(retrieved.file_path, Some("pdfs/book-1.pdf".to_string()));
    assert_eq!(retrieved.cover_path, Some("covers/book-1.jpg".to_string()));
    assert_eq!(retrieved.owner_id, "user-1");
}

#[test]
fn test_get_book_not_found() {
    let (_dir, db) = test_db();
    assert!(db.get_book("nonexistent").unwrap().is_none());
}

#[test]
fn test_get_all_books() {
    let (_dir, db) = test_db();
    db.put_book(&sample_book("a", "user-1")).unwrap();
    db.put_book(&sample_book("b", "user-2")).unwrap();

    let books = db.get_all_books().unwrap();
    assert_eq!(books.len(), 2);
}

#[test]
fn test_get_books_by_owner() {
    let (_dir, db) = test_db();
    db.put_book(&sample_book("o-a", "user-1")).unwrap();
    db.put_book(&sample_book("o-b", "user-1")).unwrap();
    db.put_book(&sample_book("o-c", "user-2")).unwrap();

    let user1_books = db.get_books_by_owner("user-1").unwrap();
    assert_eq!(user1_books.len(), 2);

    let user2_books = db.get_books_by_owner("user-2").unwrap();
    assert_eq!(user2_books.len(), 1);
    assert_eq!(user2_books[0].id, "o-c");

    let empty = db.get_books_by_owner("nonexistent").unwrap();
    assert!(empty.is_empty());
}

#[test]
fn test_update_book_fields() {
    let (_dir, db) = test_db();
    db.put_book(&sample_book("upd-1", "user-1")).unwrap();

    let updated = db
        .update_book("upd-1", &sample_update())
        .unwrap()
        .expect("book should exist");

    assert_eq!(updated.title, "Updated Title");
    assert_eq!(updated.author, "Updated Author");
    assert_eq!(updated.description, "Updated description");
    assert_eq!(updated.category_id, "cat-2");
    assert_eq!(updated.quantity, 7);
    // Owner is never touched by an update
    assert_eq!(updated.owner_id, "user-1");
}

#[test]
fn test_update_book_keeps_file_keys_when_absent() {
    let (_dir, db) = test_db();
    db.put_book(&sample_book("upd-2", "user-1")).unwrap();

    let updated = db.update_book("upd-2", &sample_update()).unwrap().unwrap();

    assert_eq!(updated.file_path, Some("pdfs/upd-2.pdf".to_string()));
    assert_eq!(updated.cover_path, Some("covers/upd-2.jpg".to_string()));
}

#[test]
fn test_update_book_replaces_file_keys() {
    let (_dir, db) = test_db();
    db.put_book(&sample_book("upd-3", "user-1")).unwrap();

    let mut update = sample_update();
    update.file_path = Some("pdfs/new.pdf".to_string());
    update.cover_path = Some("covers/new.png".to_string());

    let updated = db.update_book("upd-3", &update).unwrap().unwrap();
    assert_eq!(updated.file_path, Some("pdfs/new.pdf".to_string()));
    assert_eq!(updated.cover_path, Some("covers/new.png".to_string()));
}

#[test]
fn test_update_book_not_found() {
    let (_dir, db) = test_db();
    assert!(db
        .update_book("nonexistent", &sample_update())
        .unwrap()
        .is_none());
}

#[test]
fn test_delete_book() {
    let (_dir, db) = test_db();
    db.put_book(&sample_book("del-1", "user-1")).unwrap();

    assert!(db.delete_book("del-1").unwrap());
    assert!(db.get_book("del-1").unwrap().is_none());
}

#[test]
fn test_delete_book_not_found() {
    let (_dir, db) = test_db();
    assert!(!db.delete_book("nonexistent").unwrap());
}

#[test]
fn test_delete_book_cleans_owner_index() {
    let (_dir, db) = test_db();
    db.put_book(&sample_book("del-o", "user-x")).unwrap();
    db.put_book(&sample_book("keep-o", "user-x")).unwrap();

    db.delete_book("del-o").unwrap();

    let remaining = db.get_books_by_owner("user-x").unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, "keep-o");
}

#[test]
fn test_delete_last_book_removes_owner_entry() {
    let (_dir, db) = test_db();
    db.put_book(&sample_book("only", "user-solo")).unwrap();

    db.delete_book("only").unwrap();

    let empty = db.get_books_by_owner("user-solo").unwrap();
    assert!(empty.is_empty());
}

// ============================================================================
// Category tests
// ============================================================================

#[test]
fn test_put_and_get_category() {
    let (_dir, db) = test_db();
    db.put_category(&sample_category("cat-1", "Fiction"))
        .unwrap();

    let retrieved = db
        .get_category("cat-1")
        .unwrap()
        .expect("category should exist");
    assert_eq!(retrieved.name, "Fiction");
}

#[test]
fn test_category_exists() {
    let (_dir, db) = test_db();
    db.put_category(&sample_category("cat-2", "History"))
        .unwrap();

    assert!(db.category_exists("cat-2").unwrap());
    assert!(!db.category_exists("nonexistent").unwrap());
}

#[test]
fn test_get_all_categories() {
    let (_dir, db) = test_db();
    db.put_category(&sample_category("c-a", "Fiction")).unwrap();
    db.put_category(&sample_category("c-b", "Science")).unwrap();

    let categories = db.get_all_categories().unwrap();
    assert_eq!(categories.len(), 2);
}

// ============================================================================
// Purge tests
// ============================================================================

#[test]
fn test_purge_all() {
    let (_dir, db) = test_db();
    db.put_book(&sample_book("p1", "user-1")).unwrap();
    db.put_book(&sample_book("p2", "user-2")).unwrap();
    db.put_category(&sample_category("pc", "Fiction")).unwrap();

    let stats = db.purge_all().unwrap();
    assert_eq!(stats.books, 2);
    assert_eq!(stats.categories, 1);

    assert!(db.get_all_books().unwrap().is_empty());
    assert!(db.get_all_categories().unwrap().is_empty());
    assert!(db.get_books_by_owner("user-1").unwrap().is_empty());
}
