//! Telegram transport: wire types, keyboards, and the Bot API client.

pub mod api;
pub mod types;

pub use api::{FileFetcher, Outbox, TelegramApi, UpdateStream};
pub use types::{
    CallbackQuery, Chat, ChatMember, ChatMemberUpdated, FileRef, InlineButton, Keyboard, Location,
    Message, ReplyButton, Update, User,
};
