//! Bot API wire types and reply-keyboard builders.
//!
//! Only the update fields the bots actually read are modeled; everything
//! else in the payload is ignored during deserialization.

use serde::Deserialize;

/// One entry from `getUpdates`.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
    pub my_chat_member: Option<ChatMemberUpdated>,
}

/// An incoming chat message.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
    pub location: Option<Location>,
    #[serde(default)]
    pub photo: Vec<PhotoSize>,
    pub document: Option<Document>,
}

impl Message {
    /// The uploaded file, if any. Documents win over photos; for photos the
    /// largest rendition (last in the list) is taken.
    pub fn file(&self) -> Option<FileRef> {
        if let Some(doc) = &self.document {
            return Some(FileRef {
                file_id: doc.file_id.clone(),
                file_name: doc.file_name.clone(),
            });
        }
        self.photo.last().map(|p| FileRef {
            file_id: p.file_id.clone(),
            file_name: None,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// A shared GPS point.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoSize {
    pub file_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub file_id: String,
    pub file_name: Option<String>,
}

/// Inline-keyboard button press.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    pub message: Option<Message>,
    pub data: Option<String>,
}

/// Change in the bot's own membership status for a chat, delivered when a
/// user opens, blocks, or unblocks the bot.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatMemberUpdated {
    pub chat: Chat,
    pub new_chat_member: ChatMember,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatMember {
    pub status: String,
}

/// A file reference extracted from a message, ready for `getFile`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    pub file_id: String,
    pub file_name: Option<String>,
}

impl FileRef {
    /// Filename to store the upload under. Photos carry no name, so they get
    /// a synthetic one derived from the file id.
    pub fn upload_name(&self) -> String {
        match &self.file_name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("photo_{}.jpg", self.file_id),
        }
    }
}

// ── Outgoing keyboards ──────────────────────────────────────────────

/// Reply markup attached to an outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyboard {
    /// No markup at all.
    None,
    /// Remove any custom keyboard the user currently sees.
    Remove,
    /// Custom reply keyboard.
    Reply {
        rows: Vec<Vec<ReplyButton>>,
        /// Hide after one use. Persistent menus leave this off.
        one_time: bool,
    },
    /// Inline keyboard under the message.
    Inline(Vec<Vec<InlineButton>>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyButton {
    pub text: String,
    pub request_location: bool,
}

impl ReplyButton {
    pub fn text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            request_location: false,
        }
    }

    pub fn location(text: &str) -> Self {
        Self {
            text: text.to_string(),
            request_location: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineButton {
    pub text: String,
    pub callback_data: String,
}

impl InlineButton {
    pub fn new(text: &str, callback_data: &str) -> Self {
        Self {
            text: text.to_string(),
            callback_data: callback_data.to_string(),
        }
    }
}

impl Keyboard {
    /// `reply_markup` JSON for sendMessage, or `None` for no markup.
    pub fn to_markup(&self) -> Option<serde_json::Value> {
        match self {
            Keyboard::None => None,
            Keyboard::Remove => Some(serde_json::json!({ "remove_keyboard": true })),
            Keyboard::Reply { rows, one_time } => {
                let keyboard: Vec<Vec<serde_json::Value>> = rows
                    .iter()
                    .map(|row| {
                        row.iter()
                            .map(|b| {
                                if b.request_location {
                                    serde_json::json!({
                                        "text": b.text,
                                        "request_location": true,
                                    })
                                } else {
                                    serde_json::json!({ "text": b.text })
                                }
                            })
                            .collect()
                    })
                    .collect();
                Some(serde_json::json!({
                    "keyboard": keyboard,
                    "resize_keyboard": true,
                    "one_time_keyboard": one_time,
                }))
            }
            Keyboard::Inline(rows) => {
                let keyboard: Vec<Vec<serde_json::Value>> = rows
                    .iter()
                    .map(|row| {
                        row.iter()
                            .map(|b| {
                                serde_json::json!({
                                    "text": b.text,
                                    "callback_data": b.callback_data,
                                })
                            })
                            .collect()
                    })
                    .collect();
                Some(serde_json::json!({ "inline_keyboard": keyboard }))
            }
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_with_text_message_parses() {
        let raw = serde_json::json!({
            "update_id": 42,
            "message": {
                "message_id": 7,
                "from": {"id": 111, "first_name": "Abebe", "username": "abebe_k"},
                "chat": {"id": 111},
                "text": "hello"
            }
        });
        let update: Update = serde_json::from_value(raw).unwrap();
        assert_eq!(update.update_id, 42);
        let msg = update.message.unwrap();
        assert_eq!(msg.text.as_deref(), Some("hello"));
        assert_eq!(msg.from.unwrap().username.as_deref(), Some("abebe_k"));
    }

    #[test]
    fn update_with_location_parses() {
        let raw = serde_json::json!({
            "update_id": 1,
            "message": {
                "message_id": 2,
                "chat": {"id": 5},
                "location": {"latitude": 9.005, "longitude": 38.763}
            }
        });
        let update: Update = serde_json::from_value(raw).unwrap();
        let loc = update.message.unwrap().location.unwrap();
        assert!((loc.latitude - 9.005).abs() < f64::EPSILON);
    }

    #[test]
    fn update_with_callback_query_parses() {
        let raw = serde_json::json!({
            "update_id": 3,
            "callback_query": {
                "id": "cb1",
                "from": {"id": 9, "first_name": "Sara"},
                "message": {"message_id": 55, "chat": {"id": 9}},
                "data": "edit_phone"
            }
        });
        let update: Update = serde_json::from_value(raw).unwrap();
        let cb = update.callback_query.unwrap();
        assert_eq!(cb.data.as_deref(), Some("edit_phone"));
        assert_eq!(cb.message.unwrap().chat.id, 9);
    }

    #[test]
    fn update_with_membership_change_parses() {
        let raw = serde_json::json!({
            "update_id": 4,
            "my_chat_member": {
                "chat": {"id": 77},
                "from": {"id": 77, "first_name": "Sara"},
                "old_chat_member": {"status": "kicked"},
                "new_chat_member": {"status": "member"}
            }
        });
        let update: Update = serde_json::from_value(raw).unwrap();
        let change = update.my_chat_member.unwrap();
        assert_eq!(change.chat.id, 77);
        assert_eq!(change.new_chat_member.status, "member");
    }

    #[test]
    fn document_wins_over_photo() {
        let raw = serde_json::json!({
            "message_id": 1,
            "chat": {"id": 1},
            "document": {"file_id": "doc1", "file_name": "cv.pdf"},
            "photo": [{"file_id": "p_small"}, {"file_id": "p_big"}]
        });
        let msg: Message = serde_json::from_value(raw).unwrap();
        let file = msg.file().unwrap();
        assert_eq!(file.file_id, "doc1");
        assert_eq!(file.upload_name(), "cv.pdf");
    }

    #[test]
    fn largest_photo_rendition_is_taken() {
        let raw = serde_json::json!({
            "message_id": 1,
            "chat": {"id": 1},
            "photo": [{"file_id": "p_small"}, {"file_id": "p_big"}]
        });
        let msg: Message = serde_json::from_value(raw).unwrap();
        let file = msg.file().unwrap();
        assert_eq!(file.file_id, "p_big");
        assert_eq!(file.upload_name(), "photo_p_big.jpg");
    }

    #[test]
    fn message_without_file() {
        let raw = serde_json::json!({
            "message_id": 1,
            "chat": {"id": 1},
            "text": "no file here"
        });
        let msg: Message = serde_json::from_value(raw).unwrap();
        assert!(msg.file().is_none());
    }

    #[test]
    fn reply_keyboard_markup_json() {
        let kb = Keyboard::Reply {
            rows: vec![vec![ReplyButton::text("Yes"), ReplyButton::text("No")]],
            one_time: true,
        };
        let markup = kb.to_markup().unwrap();
        assert_eq!(markup["keyboard"][0][0]["text"], "Yes");
        assert_eq!(markup["one_time_keyboard"], true);
        assert_eq!(markup["resize_keyboard"], true);
    }

    #[test]
    fn location_button_sets_request_location() {
        let kb = Keyboard::Reply {
            rows: vec![vec![ReplyButton::location("Share")]],
            one_time: true,
        };
        let markup = kb.to_markup().unwrap();
        assert_eq!(markup["keyboard"][0][0]["request_location"], true);
    }

    #[test]
    fn plain_reply_button_omits_request_location() {
        let kb = Keyboard::Reply {
            rows: vec![vec![ReplyButton::text("Skip")]],
            one_time: false,
        };
        let markup = kb.to_markup().unwrap();
        assert!(markup["keyboard"][0][0].get("request_location").is_none());
        assert_eq!(markup["one_time_keyboard"], false);
    }

    #[test]
    fn inline_keyboard_markup_json() {
        let kb = Keyboard::Inline(vec![vec![InlineButton::new("Phone", "edit_phone")]]);
        let markup = kb.to_markup().unwrap();
        assert_eq!(markup["inline_keyboard"][0][0]["callback_data"], "edit_phone");
    }

    #[test]
    fn remove_keyboard_markup_json() {
        let markup = Keyboard::Remove.to_markup().unwrap();
        assert_eq!(markup["remove_keyboard"], true);
    }

    #[test]
    fn no_keyboard_has_no_markup() {
        assert!(Keyboard::None.to_markup().is_none());
    }
}
