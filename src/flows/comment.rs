//! Free-form feedback attached to an existing registration.

use crate::records::{ProfessionalDirectory, ProfessionalField};
use crate::sheets::RowHandle;
use crate::telegram::Keyboard;

use super::prompts;
use super::{FlowEvent, Reply, Step};

/// Stores the next text message in the registration's comment column.
pub struct CommentFlow {
    row: RowHandle,
    directory: ProfessionalDirectory,
}

impl CommentFlow {
    pub fn new(row: RowHandle, directory: ProfessionalDirectory) -> Self {
        Self { row, directory }
    }

    pub fn entry_reply() -> Reply {
        Reply::with_keyboard(prompts::ASK_COMMENT, Keyboard::Remove)
    }

    pub async fn handle(&mut self, event: FlowEvent) -> Step {
        let FlowEvent::Text(text) = event else {
            return Step::ignore();
        };
        match self
            .directory
            .write_field(self.row, ProfessionalField::Comment, &text)
            .await
        {
            Ok(()) => Step::done(Reply::with_keyboard(
                prompts::COMMENT_SAVED,
                prompts::registry_main_menu(),
            )),
            Err(e) => {
                tracing::error!(row = self.row, error = %e, "comment save failed");
                Step::done(Reply::with_keyboard(
                    prompts::SERVICE_UNAVAILABLE,
                    prompts::registry_main_menu(),
                ))
            }
        }
    }
}
