use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::require_text;
use crate::error::{invalid_input_error, Error};

pub const MAX_MESSAGE_LENGTH: usize = 1000;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GuestbookEntry {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub message: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewGuestbookEntry {
    pub name: String,
    pub message: String,
}

impl GuestbookEntry {
    pub fn new(params: NewGuestbookEntry) -> Result<Self, Error> {
        let message = require_text("message", &params.message)?;

        if message.chars().count() > MAX_MESSAGE_LENGTH {
            return Err(invalid_input_error().with_details(format!(
                "message must be at most {} characters",
                MAX_MESSAGE_LENGTH
            )));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            name: require_text("name", &params.name)?,
            message,
        })
    }
}

#[test]
fn new_entry_test() {
    let entry = GuestbookEntry::new(NewGuestbookEntry {
        name: "Dan ".into(),
        message: "Keep on driving!".into(),
    })
    .unwrap();

    assert_eq!(entry.name, "Dan");
    assert_eq!(entry.message, "Keep on driving!");
}

#[test]
fn rejects_long_or_empty_message_test() {
    let long = GuestbookEntry::new(NewGuestbookEntry {
        name: "Jing".into(),
        message: "a".repeat(MAX_MESSAGE_LENGTH + 1),
    });
    assert!(long.is_err());

    let empty = GuestbookEntry::new(NewGuestbookEntry {
        name: "Jing".into(),
        message: "".into(),
    });
    assert_eq!(empty.unwrap_err().details.as_deref(), Some("message must not be empty"));
}
