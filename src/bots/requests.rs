//! Dispatcher for the professional requests bot.
//!
//! Simpler than the registry dispatcher: two menu buttons start the two
//! flows, `/cancel` ends them, and any other message outside a flow just
//! gets the welcome menu again.

use std::sync::Arc;

use futures::StreamExt;

use crate::flows::prompts;
use crate::flows::{ComplaintFlow, FlowEvent, Reply, RequestFlow, Step};
use crate::records::{RequestLog, HANDLE_UNAVAILABLE};
use crate::session::SessionStore;
use crate::telegram::{Message, Outbox, Update, UpdateStream};

use super::command;

pub enum RequestsFlow {
    Request(RequestFlow),
    Complaint(ComplaintFlow),
}

impl RequestsFlow {
    async fn handle(&mut self, event: FlowEvent) -> Step {
        match self {
            RequestsFlow::Request(flow) => flow.handle(event).await,
            RequestsFlow::Complaint(flow) => flow.handle(event).await,
        }
    }
}

pub struct RequestsBot {
    outbox: Arc<dyn Outbox>,
    log: RequestLog,
    sessions: Arc<SessionStore<RequestsFlow>>,
}

impl RequestsBot {
    pub fn new(
        outbox: Arc<dyn Outbox>,
        log: RequestLog,
        sessions: Arc<SessionStore<RequestsFlow>>,
    ) -> Self {
        Self {
            outbox,
            log,
            sessions,
        }
    }

    /// Consumes the update stream until it ends.
    pub async fn run(&self, mut updates: UpdateStream) {
        tracing::info!("requests bot dispatcher started");
        while let Some(update) = updates.next().await {
            self.dispatch(update).await;
        }
        tracing::info!("requests bot update stream ended");
    }

    pub async fn dispatch(&self, update: Update) {
        if let Some(query) = update.callback_query {
            // This bot sends no inline keyboards; just stop the spinner.
            if let Err(e) = self.outbox.answer_callback(&query.id).await {
                tracing::debug!(error = %e, "callback ack failed");
            }
            return;
        }
        if let Some(message) = update.message {
            self.handle_message(message).await;
        }
    }

    async fn handle_message(&self, message: Message) {
        let chat_id = message.chat.id;
        let identity = message.from.as_ref().map_or(chat_id, |u| u.id);
        let handle = message
            .from
            .as_ref()
            .and_then(|u| u.username.clone())
            .unwrap_or_else(|| HANDLE_UNAVAILABLE.to_string());

        if let Some(text) = &message.text {
            if command(text) == Some("/cancel") {
                self.sessions.clear(chat_id).await;
                self.send(
                    chat_id,
                    &Reply::with_keyboard(
                        prompts::REQUESTS_CANCELLED,
                        prompts::requests_main_menu(),
                    ),
                )
                .await;
                return;
            }
        }

        let Some(event) = FlowEvent::from_message(&message) else {
            return;
        };
        if self.step_session(chat_id, event.clone()).await {
            return;
        }

        let FlowEvent::Text(text) = event else {
            return;
        };
        if text == prompts::REQUEST_BUTTON {
            let flow = RequestFlow::new(identity, &handle, self.log.clone());
            self.sessions
                .begin(chat_id, RequestsFlow::Request(flow))
                .await;
            self.send(chat_id, &RequestFlow::entry_reply()).await;
            return;
        }
        if text == prompts::COMPLAINT_BUTTON {
            let flow = ComplaintFlow::new(identity, &handle, self.log.clone());
            self.sessions
                .begin(chat_id, RequestsFlow::Complaint(flow))
                .await;
            self.send(chat_id, &ComplaintFlow::entry_reply()).await;
            return;
        }
        // /start and anything else outside a flow both get the menu.
        self.send(
            chat_id,
            &Reply::with_keyboard(prompts::REQUESTS_WELCOME, prompts::requests_main_menu()),
        )
        .await;
    }

    async fn step_session(&self, chat_id: i64, event: FlowEvent) -> bool {
        let Some(mut flow) = self.sessions.take(chat_id).await else {
            return false;
        };
        let step = flow.handle(event).await;
        for reply in &step.replies {
            self.send(chat_id, reply).await;
        }
        if !step.is_done() {
            self.sessions.resume(chat_id, flow).await;
        }
        true
    }

    async fn send(&self, chat_id: i64, reply: &Reply) {
        if let Err(e) = self.outbox.send_reply(chat_id, reply).await {
            tracing::error!(chat_id, error = %e, "send failed");
            if e.is_network() {
                let _ = self.outbox.send_text(chat_id, prompts::NETWORK_ERROR).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bots::testing::{location_update, text_update, RecordingOutbox};
    use crate::records::ANYWHERE;
    use crate::sheets::{MemoryStore, RecordStore};
    use std::time::Duration;

    fn bot_over(store: Arc<MemoryStore>) -> (RequestsBot, Arc<RecordingOutbox>) {
        let outbox = RecordingOutbox::new();
        let bot = RequestsBot::new(
            Arc::clone(&outbox) as Arc<dyn Outbox>,
            RequestLog::new(store as Arc<dyn RecordStore>),
            Arc::new(SessionStore::new(Duration::from_secs(3600))),
        );
        (bot, outbox)
    }

    #[tokio::test]
    async fn anything_outside_a_flow_gets_the_menu() {
        let (bot, outbox) = bot_over(Arc::new(MemoryStore::new()));
        bot.dispatch(text_update(1, "/start")).await;
        bot.dispatch(text_update(1, "hello?")).await;
        assert_eq!(
            outbox.texts(),
            vec![prompts::REQUESTS_WELCOME, prompts::REQUESTS_WELCOME]
        );
    }

    #[tokio::test]
    async fn request_button_walks_to_an_appended_row() {
        let store = Arc::new(MemoryStore::new());
        let (bot, outbox) = bot_over(Arc::clone(&store));

        bot.dispatch(text_update(9, prompts::REQUEST_BUTTON)).await;
        bot.dispatch(text_update(9, "Sara Alemu")).await;
        bot.dispatch(text_update(9, "0912345678")).await;
        bot.dispatch(text_update(9, "Plumber")).await;
        bot.dispatch(text_update(9, prompts::NEAR_ME_BUTTON)).await;
        bot.dispatch(location_update(9, 9.03, 38.74)).await;
        bot.dispatch(text_update(9, "Bole, 03")).await;
        bot.dispatch(text_update(9, "5")).await;

        let rows = store.dump().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], "Sara Alemu");
        assert_eq!(rows[0][4], "9.03, 38.74");
        assert_eq!(rows[0][8], "9");
        assert_eq!(rows[0][9], "tester");
        assert!(outbox.texts().contains(&prompts::REQUEST_SAVED.to_string()));
        assert_eq!(bot.sessions.len().await, 0);
    }

    #[tokio::test]
    async fn anywhere_request_skips_location() {
        let store = Arc::new(MemoryStore::new());
        let (bot, _) = bot_over(Arc::clone(&store));

        bot.dispatch(text_update(9, prompts::REQUEST_BUTTON)).await;
        bot.dispatch(text_update(9, "Sara")).await;
        bot.dispatch(text_update(9, "0912345678")).await;
        bot.dispatch(text_update(9, "Electrician")).await;
        bot.dispatch(text_update(9, prompts::ANYWHERE_BUTTON)).await;
        bot.dispatch(text_update(9, "Adama")).await;
        bot.dispatch(text_update(9, "3")).await;

        assert_eq!(store.dump().await[0][4], ANYWHERE);
    }

    #[tokio::test]
    async fn complaint_button_appends_a_complaint_row() {
        let store = Arc::new(MemoryStore::new());
        let (bot, outbox) = bot_over(Arc::clone(&store));

        bot.dispatch(text_update(9, prompts::COMPLAINT_BUTTON)).await;
        bot.dispatch(text_update(9, "nobody called me back")).await;

        let rows = store.dump().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][7], "nobody called me back");
        assert!(outbox
            .texts()
            .contains(&prompts::COMPLAINT_SAVED.to_string()));
    }

    #[tokio::test]
    async fn cancel_ends_an_open_request() {
        let store = Arc::new(MemoryStore::new());
        let (bot, outbox) = bot_over(Arc::clone(&store));

        bot.dispatch(text_update(9, prompts::REQUEST_BUTTON)).await;
        bot.dispatch(text_update(9, "/cancel")).await;
        assert_eq!(bot.sessions.len().await, 0);
        assert!(outbox
            .texts()
            .contains(&prompts::REQUESTS_CANCELLED.to_string()));
        assert!(store.dump().await.is_empty());
    }
}
