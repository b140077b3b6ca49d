use redb::TableDefinition;

/// Book records: uuid -> BookRecord (msgpack)
pub const BOOKS: TableDefinition<&str, &[u8]> = TableDefinition::new("books");

/// Category records: uuid -> CategoryRecord (msgpack)
pub const CATEGORIES: TableDefinition<&str, &[u8]> = TableDefinition::new("categories");

/// Owner index: owner_id -> msgpack Vec of book UUIDs
pub const OWNER_BOOKS: TableDefinition<&str, &[u8]> = TableDefinition::new("owner_books");
