/// Database row types — these map directly to SQLite rows.
/// Distinct from the courier-types API models to keep the DB layer independent.

pub struct UserRow {
    pub username: String,
    pub password_hash: String,
    pub created_at: String,
}

pub struct MessageRow {
    pub id: i64,
    pub content: String,
    pub kind: String,
    pub created_at: String,
}
