//! The two bot dispatchers. Each consumes one update stream, keeps
//! per-chat sessions, and routes events into the flow state machines.

pub mod registry;
pub mod requests;

pub use registry::RegistryBot;
pub use requests::RequestsBot;

/// Extracts a leading slash command from message text.
///
/// The persistent menu buttons send their full label ("/register ምዝገባ"),
/// so only the first whitespace token counts, and a "@botname" suffix
/// from group chats is stripped.
pub fn command(text: &str) -> Option<&str> {
    let token = text.split_whitespace().next()?;
    if !token.starts_with('/') {
        return None;
    }
    match token.split_once('@') {
        Some((bare, _)) => Some(bare),
        None => Some(token),
    }
}
