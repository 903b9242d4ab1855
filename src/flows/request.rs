//! The requests bot's two intake forms: professional requests and
//! complaints. Both append one row to the requests sheet when they finish.
//!
//! Several steps guard against the persistent menu buttons: pressing
//! "request" or "complaint" mid-form re-prompts instead of recording the
//! button label as an answer.

use crate::records::{request_timestamp, FilterMode, RequestLog, RequestRecord, ANYWHERE};
use crate::telegram::Keyboard;
use crate::validate::is_valid_phone;

use super::prompts;
use super::{FlowEvent, Reply, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequestState {
    FullName,
    Phone,
    ProfessionType,
    Filter,
    ShareLocation,
    Address,
    Count,
}

/// Multi-step professional request form.
pub struct RequestFlow {
    log: RequestLog,
    state: RequestState,
    draft: RequestRecord,
}

impl RequestFlow {
    pub fn new(identity: i64, handle: &str, log: RequestLog) -> Self {
        Self {
            log,
            state: RequestState::FullName,
            draft: RequestRecord {
                identity,
                handle: handle.to_string(),
                ..RequestRecord::default()
            },
        }
    }

    pub fn entry_reply() -> Reply {
        Reply::with_keyboard(prompts::ASK_REQUESTER_NAME, Keyboard::Remove)
    }

    pub async fn handle(&mut self, event: FlowEvent) -> Step {
        match self.state {
            RequestState::FullName => match event {
                FlowEvent::Text(text) => {
                    if prompts::is_requests_menu_button(&text) {
                        return Step::stay(Reply::text(prompts::IN_PROGRESS_NAME));
                    }
                    self.draft.requester_name = text;
                    self.state = RequestState::Phone;
                    Step::stay(Reply::text(prompts::ASK_REQUESTER_PHONE))
                }
                _ => Step::ignore(),
            },
            RequestState::Phone => match event {
                FlowEvent::Text(text) => {
                    if prompts::is_requests_menu_button(&text) {
                        return Step::stay(Reply::text(prompts::IN_PROGRESS_PHONE));
                    }
                    if !is_valid_phone(&text) {
                        return Step::stay(Reply::text(prompts::REQUESTS_INVALID_PHONE));
                    }
                    self.draft.phone = text;
                    self.state = RequestState::ProfessionType;
                    Step::stay(Reply::text(prompts::ASK_PROFESSIONAL_TYPE))
                }
                _ => Step::ignore(),
            },
            RequestState::ProfessionType => match event {
                FlowEvent::Text(text) => {
                    if prompts::is_requests_menu_button(&text) {
                        return Step::stay(Reply::text(prompts::IN_PROGRESS_TYPE));
                    }
                    self.draft.profession = text;
                    self.state = RequestState::Filter;
                    Step::stay(Reply::with_keyboard(
                        prompts::ASK_FILTER,
                        prompts::filter_keyboard(),
                    ))
                }
                _ => Step::ignore(),
            },
            RequestState::Filter => match event {
                FlowEvent::Text(text) if text == prompts::NEAR_ME_BUTTON => {
                    self.draft.filter = FilterMode::NearMe.as_str().to_string();
                    self.state = RequestState::ShareLocation;
                    Step::stay(Reply::with_keyboard(
                        prompts::ASK_SHARE_LOCATION,
                        prompts::share_location_keyboard(),
                    ))
                }
                FlowEvent::Text(text) if text == prompts::ANYWHERE_BUTTON => {
                    self.draft.filter = FilterMode::Anywhere.as_str().to_string();
                    self.draft.location = ANYWHERE.to_string();
                    self.state = RequestState::Address;
                    Step::stay(Reply::with_keyboard(prompts::ASK_ADDRESS, Keyboard::Remove))
                }
                FlowEvent::Text(_) => Step::stay(Reply::with_keyboard(
                    prompts::INVALID_FILTER,
                    prompts::filter_keyboard(),
                )),
                _ => Step::ignore(),
            },
            RequestState::ShareLocation => match event {
                FlowEvent::Location {
                    latitude,
                    longitude,
                } => {
                    self.draft.location = format!("{latitude}, {longitude}");
                    self.state = RequestState::Address;
                    Step::stay(Reply::with_keyboard(
                        prompts::LOCATION_THANKS_ASK_ADDRESS,
                        Keyboard::Remove,
                    ))
                }
                FlowEvent::Text(_) => Step::stay(Reply::with_keyboard(
                    prompts::REQUESTS_LOCATION_INVALID,
                    prompts::share_location_keyboard(),
                )),
                _ => Step::ignore(),
            },
            RequestState::Address => match event {
                FlowEvent::Text(text) => {
                    if prompts::is_requests_menu_button(&text) {
                        return Step::stay(Reply::text(prompts::IN_PROGRESS_ADDRESS));
                    }
                    self.draft.address = text;
                    self.state = RequestState::Count;
                    Step::stay(Reply::with_keyboard(
                        prompts::ASK_COUNT,
                        prompts::count_keyboard(),
                    ))
                }
                _ => Step::ignore(),
            },
            RequestState::Count => match event {
                FlowEvent::Text(text) => {
                    self.draft.count = text;
                    self.draft.submitted_at = request_timestamp();
                    match self.log.append(&self.draft).await {
                        Ok(()) => Step::done(Reply::with_keyboard(
                            prompts::REQUEST_SAVED,
                            prompts::requests_main_menu(),
                        )),
                        Err(e) => {
                            tracing::error!(identity = self.draft.identity, error = %e, "request append failed");
                            Step::done(Reply::with_keyboard(
                                prompts::REQUEST_SAVE_FAILED,
                                prompts::requests_main_menu(),
                            ))
                        }
                    }
                }
                _ => Step::ignore(),
            },
        }
    }
}

/// Single-step complaint form.
pub struct ComplaintFlow {
    log: RequestLog,
    identity: i64,
    handle: String,
}

impl ComplaintFlow {
    pub fn new(identity: i64, handle: &str, log: RequestLog) -> Self {
        Self {
            log,
            identity,
            handle: handle.to_string(),
        }
    }

    pub fn entry_reply() -> Reply {
        Reply::with_keyboard(prompts::ASK_COMPLAINT, Keyboard::Remove)
    }

    pub async fn handle(&mut self, event: FlowEvent) -> Step {
        let FlowEvent::Text(text) = event else {
            return Step::ignore();
        };
        if prompts::is_requests_menu_button(&text) {
            return Step::stay(Reply::text(prompts::IN_PROGRESS_COMPLAINT));
        }
        let record = RequestRecord::complaint(&text, self.identity, &self.handle);
        match self.log.append(&record).await {
            Ok(()) => Step::done(Reply::with_keyboard(
                prompts::COMPLAINT_SAVED,
                prompts::requests_main_menu(),
            )),
            Err(e) => {
                tracing::error!(identity = self.identity, error = %e, "complaint append failed");
                Step::done(Reply::with_keyboard(
                    prompts::COMPLAINT_SAVE_FAILED,
                    prompts::requests_main_menu(),
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

    fn setup() -> (Arc<MemoryStore>, RequestLog) {
        let store = Arc::new(MemoryStore::new());
        let log = RequestLog::new(Arc::clone(&store) as Arc<dyn RecordStore>);
        (store, log)
    }

    fn text(s: &str) -> FlowEvent {
        FlowEvent::Text(s.into())
    }

    fn coords() -> FlowEvent {
        FlowEvent::Location {
            latitude: 9.03,
            longitude: 38.74,
        }
    }

    #[tokio::test]
    async fn near_me_request_walks_through_location_sharing() {
        let (store, log) = setup();
        let mut flow = RequestFlow::new(42, "asker", log);

        let step = flow.handle(text("Sara Alemu")).await;
        assert_eq!(step.replies[0].text, prompts::ASK_REQUESTER_PHONE);
        flow.handle(text("0912345678")).await;
        flow.handle(text("Plumber")).await;

        let step = flow.handle(text(prompts::NEAR_ME_BUTTON)).await;
        assert_eq!(step.replies[0].text, prompts::ASK_SHARE_LOCATION);

        let step = flow.handle(coords()).await;
        assert_eq!(step.replies[0].text, prompts::LOCATION_THANKS_ASK_ADDRESS);

        flow.handle(text("Bole, 03")).await;
        let step = flow.handle(text("5")).await;
        assert!(step.is_done());
        assert_eq!(step.replies[0].text, prompts::REQUEST_SAVED);

        let rows = store.dump().await;
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row[0], "Sara Alemu");
        assert_eq!(row[1], "0912345678");
        assert_eq!(row[2], "Plumber");
        assert_eq!(row[3], "Near Me");
        assert_eq!(row[4], "9.03, 38.74");
        assert_eq!(row[5], "Bole, 03");
        assert_eq!(row[6], "5");
        assert_eq!(row[7], "");
        assert_eq!(row[8], "42");
        assert_eq!(row[9], "asker");
        assert_eq!(row[10].len(), "2026-01-01 00:00:00".len());
    }

    #[tokio::test]
    async fn anywhere_never_asks_for_location() {
        let (store, log) = setup();
        let mut flow = RequestFlow::new(42, "asker", log);
        flow.handle(text("Sara")).await;
        flow.handle(text("0912345678")).await;
        flow.handle(text("Electrician")).await;

        let step = flow.handle(text(prompts::ANYWHERE_BUTTON)).await;
        assert_eq!(step.replies[0].text, prompts::ASK_ADDRESS);

        flow.handle(text("Adama")).await;
        flow.handle(text("3")).await;

        let row = &store.dump().await[0];
        assert_eq!(row[3], "Anywhere");
        assert_eq!(row[4], ANYWHERE);
    }

    #[tokio::test]
    async fn unknown_filter_answer_reprompts() {
        let (_, log) = setup();
        let mut flow = RequestFlow::new(1, "u", log);
        flow.handle(text("A")).await;
        flow.handle(text("0912345678")).await;
        flow.handle(text("Carpenter")).await;

        let step = flow.handle(text("near me please")).await;
        assert!(!step.is_done());
        assert_eq!(step.replies[0].text, prompts::INVALID_FILTER);
    }

    #[tokio::test]
    async fn menu_buttons_do_not_become_answers() {
        let (store, log) = setup();
        let mut flow = RequestFlow::new(1, "u", log);

        let step = flow.handle(text(prompts::REQUEST_BUTTON)).await;
        assert!(!step.is_done());
        assert_eq!(step.replies[0].text, prompts::IN_PROGRESS_NAME);

        let step = flow.handle(text("Real Name")).await;
        assert_eq!(step.replies[0].text, prompts::ASK_REQUESTER_PHONE);

        let step = flow.handle(text(prompts::COMPLAINT_BUTTON)).await;
        assert_eq!(step.replies[0].text, prompts::IN_PROGRESS_PHONE);
        assert!(store.dump().await.is_empty());
    }

    #[tokio::test]
    async fn invalid_phone_reprompts_until_valid() {
        let (_, log) = setup();
        let mut flow = RequestFlow::new(1, "u", log);
        flow.handle(text("Name")).await;

        let step = flow.handle(text("12345")).await;
        assert_eq!(step.replies[0].text, prompts::REQUESTS_INVALID_PHONE);
        let step = flow.handle(text("+251911000000")).await;
        assert_eq!(step.replies[0].text, prompts::ASK_PROFESSIONAL_TYPE);
    }

    #[tokio::test]
    async fn text_instead_of_location_reprompts() {
        let (_, log) = setup();
        let mut flow = RequestFlow::new(1, "u", log);
        flow.handle(text("Name")).await;
        flow.handle(text("0912345678")).await;
        flow.handle(text("Mason")).await;
        flow.handle(text(prompts::NEAR_ME_BUTTON)).await;

        let step = flow.handle(text("Addis Ababa")).await;
        assert!(!step.is_done());
        assert_eq!(step.replies[0].text, prompts::REQUESTS_LOCATION_INVALID);

        let step = flow.handle(coords()).await;
        assert_eq!(step.replies[0].text, prompts::LOCATION_THANKS_ASK_ADDRESS);
    }

    #[tokio::test]
    async fn append_failure_is_reported() {
        let (store, log) = setup();
        let mut flow = RequestFlow::new(1, "u", log);
        flow.handle(text("Name")).await;
        flow.handle(text("0912345678")).await;
        flow.handle(text("Mason")).await;
        flow.handle(text(prompts::ANYWHERE_BUTTON)).await;
        flow.handle(text("Adama")).await;

        store.set_failing(true);
        let step = flow.handle(text("10")).await;
        assert!(step.is_done());
        assert_eq!(step.replies[0].text, prompts::REQUEST_SAVE_FAILED);
    }

    #[tokio::test]
    async fn complaint_fills_only_the_tail_columns() {
        let (store, log) = setup();
        let mut flow = ComplaintFlow::new(7, "upset_user", log);
        let step = flow.handle(text("the plumber never showed up")).await;
        assert!(step.is_done());
        assert_eq!(step.replies[0].text, prompts::COMPLAINT_SAVED);

        let row = &store.dump().await[0];
        for cell in &row[0..7] {
            assert_eq!(cell, "");
        }
        assert_eq!(row[7], "the plumber never showed up");
        assert_eq!(row[8], "7");
        assert_eq!(row[9], "upset_user");
        assert!(!row[10].is_empty());
    }

    #[tokio::test]
    async fn every_complaint_is_its_own_row() {
        let (store, log) = setup();
        let mut first = ComplaintFlow::new(7, "u", log.clone());
        first.handle(text("first complaint")).await;
        let mut second = ComplaintFlow::new(7, "u", log);
        second.handle(text("second complaint")).await;

        let rows = store.dump().await;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][7], "first complaint");
        assert_eq!(rows[1][7], "second complaint");
    }

    #[tokio::test]
    async fn complaint_guard_blocks_menu_buttons() {
        let (store, log) = setup();
        let mut flow = ComplaintFlow::new(7, "u", log);
        let step = flow.handle(text(prompts::REQUEST_BUTTON)).await;
        assert!(!step.is_done());
        assert_eq!(step.replies[0].text, prompts::IN_PROGRESS_COMPLAINT);
        assert!(store.dump().await.is_empty());
    }
}
