//! Dispatcher for the professionals directory bot.
//!
//! Routes each update into the chat's active flow, or starts one from the
//! menu commands. `/cancel` always ends the active flow; every other input
//! while a flow is open belongs to that flow, including slash commands.

use std::sync::Arc;

use futures::StreamExt;

use crate::flows::prompts;
use crate::flows::{
    CommentFlow, DeleteFlow, EditFlow, FileIntake, FlowEvent, RegistrationFlow, Reply, Step,
    UploadFolders,
};
use crate::records::{ProfessionalDirectory, ProfileView, HANDLE_NOT_SET};
use crate::session::SessionStore;
use crate::telegram::{CallbackQuery, ChatMemberUpdated, Message, Outbox, Update, UpdateStream};

use super::command;

/// Whatever flow a chat is in the middle of.
pub enum RegistryFlow {
    Registration(RegistrationFlow),
    Edit(EditFlow),
    Delete(DeleteFlow),
    Comment(CommentFlow),
}

impl RegistryFlow {
    async fn handle(&mut self, event: FlowEvent) -> Step {
        match self {
            RegistryFlow::Registration(flow) => flow.handle(event).await,
            RegistryFlow::Edit(flow) => flow.handle(event).await,
            RegistryFlow::Delete(flow) => flow.handle(event).await,
            RegistryFlow::Comment(flow) => flow.handle(event).await,
        }
    }
}

pub struct RegistryBot {
    outbox: Arc<dyn Outbox>,
    directory: ProfessionalDirectory,
    intake: Arc<FileIntake>,
    folders: UploadFolders,
    sessions: Arc<SessionStore<RegistryFlow>>,
}

impl RegistryBot {
    pub fn new(
        outbox: Arc<dyn Outbox>,
        directory: ProfessionalDirectory,
        intake: Arc<FileIntake>,
        folders: UploadFolders,
        sessions: Arc<SessionStore<RegistryFlow>>,
    ) -> Self {
        Self {
            outbox,
            directory,
            intake,
            folders,
            sessions,
        }
    }

    /// Consumes the update stream until it ends.
    pub async fn run(&self, mut updates: UpdateStream) {
        tracing::info!("registry bot dispatcher started");
        while let Some(update) = updates.next().await {
            self.dispatch(update).await;
        }
        tracing::info!("registry bot update stream ended");
    }

    pub async fn dispatch(&self, update: Update) {
        if let Some(change) = update.my_chat_member {
            self.handle_membership(change).await;
        } else if let Some(query) = update.callback_query {
            self.handle_callback(query).await;
        } else if let Some(message) = update.message {
            self.handle_message(message).await;
        }
    }

    /// A switch to "member" status means the user just opened or unblocked
    /// the bot; greet them without waiting for /start.
    async fn handle_membership(&self, change: ChatMemberUpdated) {
        if change.new_chat_member.status != "member" {
            return;
        }
        self.send(
            change.chat.id,
            &Reply::with_keyboard(prompts::NEW_MEMBER_WELCOME, prompts::registry_main_menu()),
        )
        .await;
    }

    async fn handle_callback(&self, query: CallbackQuery) {
        // Ack first so the client stops its spinner even if nothing matches.
        if let Err(e) = self.outbox.answer_callback(&query.id).await {
            tracing::debug!(error = %e, "callback ack failed");
        }
        let Some(message) = &query.message else {
            return;
        };
        let chat_id = message.chat.id;
        if let Err(e) = self
            .outbox
            .clear_reply_markup(chat_id, message.message_id)
            .await
        {
            tracing::debug!(chat_id, error = %e, "clearing inline keyboard failed");
        }
        let Some(data) = query.data else {
            return;
        };
        self.step_session(chat_id, FlowEvent::Callback(data)).await;
    }

    async fn handle_message(&self, message: Message) {
        let chat_id = message.chat.id;
        let identity = message.from.as_ref().map_or(chat_id, |u| u.id);
        let handle = message
            .from
            .as_ref()
            .and_then(|u| u.username.clone())
            .unwrap_or_else(|| HANDLE_NOT_SET.to_string());

        if let Some(text) = &message.text {
            if command(text) == Some("/cancel") {
                self.sessions.clear(chat_id).await;
                self.send(
                    chat_id,
                    &Reply::with_keyboard(prompts::CANCELLED, prompts::registry_main_menu()),
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
        match command(&text) {
            Some("/start") => {
                self.send(
                    chat_id,
                    &Reply::with_keyboard(
                        prompts::REGISTRY_WELCOME,
                        prompts::registry_main_menu(),
                    ),
                )
                .await;
            }
            Some("/register") => self.start_registration(chat_id, identity, handle).await,
            Some("/profile") => self.show_profile(chat_id, identity).await,
            Some("/editprofile") => self.start_edit(chat_id, identity).await,
            Some("/deleteprofile") => self.start_delete(chat_id, identity).await,
            Some("/comment") => self.start_comment(chat_id, identity).await,
            // Stray text outside a flow is left unanswered.
            _ => {}
        }
    }

    /// Feeds the event to the chat's flow if it has one. Returns whether the
    /// event was consumed.
    async fn step_session(&self, chat_id: i64, event: FlowEvent) -> bool {
        let Some(mut flow) = self.sessions.take(chat_id).await else {
            return false;
        };
        let step = flow.handle(event).await;
        self.send_all(chat_id, &step.replies).await;
        if !step.is_done() {
            self.sessions.resume(chat_id, flow).await;
        }
        true
    }

    async fn start_registration(&self, chat_id: i64, identity: i64, handle: String) {
        if self.directory.find_by_identity(identity).await.is_some() {
            self.send(
                chat_id,
                &Reply::with_keyboard(prompts::ALREADY_REGISTERED, prompts::registry_main_menu()),
            )
            .await;
            return;
        }
        let flow = RegistrationFlow::new(
            identity,
            handle,
            self.directory.clone(),
            Arc::clone(&self.intake),
            self.folders.clone(),
        );
        self.sessions
            .begin(chat_id, RegistryFlow::Registration(flow))
            .await;
        self.send(chat_id, &RegistrationFlow::entry_reply()).await;
    }

    async fn show_profile(&self, chat_id: i64, identity: i64) {
        let reply = match self.directory.find_by_identity(identity).await {
            Some(row) => match ProfileView::from_row(&row) {
                Some(view) => Reply::with_keyboard(
                    prompts::profile_card(&view),
                    prompts::registry_main_menu(),
                ),
                None => Reply::with_keyboard(
                    prompts::PROFILE_INCOMPLETE,
                    prompts::registry_main_menu(),
                ),
            },
            None => Reply::with_keyboard(
                prompts::NOT_REGISTERED_PROFILE,
                prompts::registry_main_menu(),
            ),
        };
        self.send(chat_id, &reply).await;
    }

    async fn start_edit(&self, chat_id: i64, identity: i64) {
        let Some(row) = self.directory.find_by_identity(identity).await else {
            self.send(
                chat_id,
                &Reply::with_keyboard(prompts::NOT_REGISTERED_EDIT, prompts::registry_main_menu()),
            )
            .await;
            return;
        };
        let flow = EditFlow::new(
            row.row,
            self.directory.clone(),
            Arc::clone(&self.intake),
            self.folders.clone(),
        );
        self.sessions.begin(chat_id, RegistryFlow::Edit(flow)).await;
        self.send(chat_id, &EditFlow::entry_reply()).await;
    }

    async fn start_delete(&self, chat_id: i64, identity: i64) {
        let Some(row) = self.directory.find_by_identity(identity).await else {
            self.send(
                chat_id,
                &Reply::with_keyboard(prompts::NOT_REGISTERED, prompts::registry_main_menu()),
            )
            .await;
            return;
        };
        let flow = DeleteFlow::new(row.row, self.directory.clone());
        self.sessions
            .begin(chat_id, RegistryFlow::Delete(flow))
            .await;
        self.send(chat_id, &DeleteFlow::entry_reply()).await;
    }

    async fn start_comment(&self, chat_id: i64, identity: i64) {
        let Some(row) = self.directory.find_by_identity(identity).await else {
            self.send(
                chat_id,
                &Reply::with_keyboard(prompts::NOT_REGISTERED, prompts::registry_main_menu()),
            )
            .await;
            return;
        };
        let flow = CommentFlow::new(row.row, self.directory.clone());
        self.sessions
            .begin(chat_id, RegistryFlow::Comment(flow))
            .await;
        self.send(chat_id, &CommentFlow::entry_reply()).await;
    }

    async fn send(&self, chat_id: i64, reply: &Reply) {
        if let Err(e) = self.outbox.send_reply(chat_id, reply).await {
            tracing::error!(chat_id, error = %e, "send failed");
            if e.is_network() {
                let _ = self.outbox.send_text(chat_id, prompts::NETWORK_ERROR).await;
            }
        }
    }

    async fn send_all(&self, chat_id: i64, replies: &[Reply]) {
        for reply in replies {
            self.send(chat_id, reply).await;
        }
    }
}
