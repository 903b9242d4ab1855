//! Registration removal, guarded by a yes/no confirmation.

use crate::records::ProfessionalDirectory;
use crate::sheets::RowHandle;

use super::prompts;
use super::{FlowEvent, Reply, Step};

/// One-question flow: the next affirmative answer deletes the row, anything
/// else leaves it alone. Either way the session ends.
pub struct DeleteFlow {
    row: RowHandle,
    directory: ProfessionalDirectory,
}

impl DeleteFlow {
    pub fn new(row: RowHandle, directory: ProfessionalDirectory) -> Self {
        Self { row, directory }
    }

    /// The confirmation question, sent by the dispatcher when the flow starts.
    pub fn entry_reply() -> Reply {
        Reply::with_keyboard(prompts::DELETE_CONFIRM, prompts::yes_no_keyboard())
    }

    pub async fn handle(&mut self, event: FlowEvent) -> Step {
        let FlowEvent::Text(text) = event else {
            return Step::ignore();
        };
        if !prompts::is_affirmative(&text) {
            return Step::done(Reply::with_keyboard(
                prompts::DELETE_CANCELLED,
                prompts::registry_main_menu(),
            ));
        }
        match self.directory.delete(self.row).await {
            Ok(()) => Step::done(Reply::with_keyboard(
                prompts::PROFILE_DELETED,
                prompts::registry_main_menu(),
            )),
            Err(e) => {
                tracing::error!(row = self.row, error = %e, "profile deletion failed");
                Step::done(Reply::with_keyboard(
                    prompts::SERVICE_UNAVAILABLE,
                    prompts::registry_main_menu(),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::{MemoryStore, RecordStore};
    use std::sync::Arc;

    fn seeded() -> (Arc<MemoryStore>, DeleteFlow) {
        let store = Arc::new(MemoryStore::with_rows(vec![vec![
            "55".into(),
            "user".into(),
            "Someone".into(),
        ]]));
        let directory = ProfessionalDirectory::new(Arc::clone(&store) as Arc<dyn RecordStore>);
        let flow = DeleteFlow::new(2, directory);
        (store, flow)
    }

    #[tokio::test]
    async fn affirmative_button_deletes_the_row() {
        let (store, mut flow) = seeded();
        let step = flow.handle(FlowEvent::Text("Yes አዎ✅".into())).await;
        assert!(step.is_done());
        assert_eq!(step.replies[0].text, prompts::PROFILE_DELETED);
        assert!(store.dump().await.is_empty());
    }

    #[tokio::test]
    async fn negative_button_keeps_the_row() {
        let (store, mut flow) = seeded();
        let step = flow.handle(FlowEvent::Text("No አይ❌".into())).await;
        assert!(step.is_done());
        assert_eq!(step.replies[0].text, prompts::DELETE_CANCELLED);
        assert_eq!(store.dump().await.len(), 1);
    }

    #[tokio::test]
    async fn unrelated_text_cancels_instead_of_deleting() {
        let (store, mut flow) = seeded();
        let step = flow.handle(FlowEvent::Text("wait, hold on".into())).await;
        assert!(step.is_done());
        assert_eq!(step.replies[0].text, prompts::DELETE_CANCELLED);
        assert_eq!(store.dump().await.len(), 1);
    }

    #[tokio::test]
    async fn backend_failure_is_reported() {
        let (store, mut flow) = seeded();
        store.set_failing(true);
        let step = flow.handle(FlowEvent::Text("yes".into())).await;
        assert!(step.is_done());
        assert_eq!(step.replies[0].text, prompts::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn non_text_input_is_ignored() {
        let (_, mut flow) = seeded();
        let step = flow
            .handle(FlowEvent::Location {
                latitude: 1.0,
                longitude: 2.0,
            })
            .await;
        assert!(step.replies.is_empty());
        assert!(!step.is_done());
    }
}
