use serde::{Deserialize, Serialize};

/// How a message's `content` column is to be interpreted: the literal text
/// body, or a locator pointing at a blob on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    File,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::Text => "text",
            MessageKind::File => "file",
        }
    }

    /// Parse the kind column as stored in SQLite.
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "text" => Some(MessageKind::Text),
            "file" => Some(MessageKind::File),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_db_column() {
        for kind in [MessageKind::Text, MessageKind::File] {
            assert_eq!(MessageKind::from_db(kind.as_str()), Some(kind));
        }
        assert_eq!(MessageKind::from_db("video"), None);
    }
}
