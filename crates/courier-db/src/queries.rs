use crate::Database;
use crate::models::{MessageRow, UserRow};
use anyhow::Result;
use rusqlite::Connection;

impl Database {
    // -- Users --

    pub fn create_user(&self, username: &str, password_hash: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (username, password_hash) VALUES (?1, ?2)",
                (username, password_hash),
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_username(conn, username))
    }

    // -- Messages --

    /// Insert a message row and return its assigned id. The row is durably
    /// visible to any read that starts after this returns.
    pub fn insert_message(&self, content: &str, kind: &str) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (content, kind) VALUES (?1, ?2)",
                (content, kind),
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn list_messages(&self, limit: u32, offset: u64) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| query_messages(conn, limit, offset))
    }

    pub fn get_message(&self, id: i64) -> Result<Option<MessageRow>> {
        self.with_conn(|conn| query_message_by_id(conn, id))
    }
}

fn query_user_by_username(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn
        .prepare("SELECT username, password_hash, created_at FROM users WHERE username = ?1")?;

    let row = stmt
        .query_row([username], |row| {
            Ok(UserRow {
                username: row.get(0)?,
                password_hash: row.get(1)?,
                created_at: row.get(2)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_messages(conn: &Connection, limit: u32, offset: u64) -> Result<Vec<MessageRow>> {
    // Newest first: id is the monotonic ordering key
    let mut stmt = conn.prepare(
        "SELECT id, content, kind, created_at FROM messages
         ORDER BY id DESC
         LIMIT ?1 OFFSET ?2",
    )?;

    let rows = stmt
        .query_map(rusqlite::params![limit, offset as i64], |row| {
            Ok(MessageRow {
                id: row.get(0)?,
                content: row.get(1)?,
                kind: row.get(2)?,
                created_at: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_message_by_id(conn: &Connection, id: i64) -> Result<Option<MessageRow>> {
    let mut stmt =
        conn.prepare("SELECT id, content, kind, created_at FROM messages WHERE id = ?1")?;

    let row = stmt
        .query_row([id], |row| {
            Ok(MessageRow {
                id: row.get(0)?,
                content: row.get(1)?,
                kind: row.get(2)?,
                created_at: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Database;

    #[test]
    fn user_round_trip() {
        let db = Database::open_in_memory().unwrap();
        db.create_user("alice", "$argon2id$fake").unwrap();

        let user = db.get_user_by_username("alice").unwrap().unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.password_hash, "$argon2id$fake");

        assert!(db.get_user_by_username("bob").unwrap().is_none());
    }

    #[test]
    fn duplicate_username_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        db.create_user("alice", "h1").unwrap();
        assert!(db.create_user("alice", "h2").is_err());
    }

    #[test]
    fn insert_assigns_increasing_ids() {
        let db = Database::open_in_memory().unwrap();
        let first = db.insert_message("one", "text").unwrap();
        let second = db.insert_message("two", "text").unwrap();
        assert!(second > first);
    }

    #[test]
    fn list_returns_newest_first() {
        let db = Database::open_in_memory().unwrap();
        for i in 0..15 {
            db.insert_message(&format!("msg {i}"), "text").unwrap();
        }

        let page = db.list_messages(10, 0).unwrap();
        assert_eq!(page.len(), 10);
        assert_eq!(page[0].content, "msg 14");
        assert_eq!(page[9].content, "msg 5");
        assert!(page.windows(2).all(|w| w[0].id > w[1].id));
    }

    #[test]
    fn list_offset_skips_newest() {
        let db = Database::open_in_memory().unwrap();
        for i in 0..5 {
            db.insert_message(&format!("msg {i}"), "text").unwrap();
        }

        let second_page = db.list_messages(2, 2).unwrap();
        assert_eq!(second_page.len(), 2);
        assert_eq!(second_page[0].content, "msg 2");
        assert_eq!(second_page[1].content, "msg 1");
    }

    #[test]
    fn get_message_by_id() {
        let db = Database::open_in_memory().unwrap();
        let id = db.insert_message("/uploads/report.pdf", "file").unwrap();

        let row = db.get_message(id).unwrap().unwrap();
        assert_eq!(row.content, "/uploads/report.pdf");
        assert_eq!(row.kind, "file");

        assert!(db.get_message(999).unwrap().is_none());
    }

    #[test]
    fn unknown_kind_is_rejected_by_schema() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.insert_message("x", "video").is_err());
    }
}
