//! Professional registration: the full data-collection form.
//!
//! Ordered states: full name, profession, phone, location, region, then the
//! two upload collections, then a single write of the assembled row. The
//! entry guard against double registration lives in the dispatcher, which
//! refuses to start this flow for an already-registered identity.

use std::sync::Arc;

use crate::records::{ProfessionalDirectory, ProfessionalRecord, NOT_SHARED, SKIPPED};
use crate::telegram::Keyboard;
use crate::validate::is_valid_phone;

use super::files::{Collect, CollectorTexts, FileCollector, FileIntake, FileSet, UploadFolders};
use super::prompts;
use super::{FlowEvent, Reply, Step};

enum RegistrationState {
    FullName,
    Profession,
    Phone,
    Location,
    Region,
    Testimonials(FileCollector),
    Education(FileCollector),
}

pub struct RegistrationFlow {
    directory: ProfessionalDirectory,
    intake: Arc<FileIntake>,
    folders: UploadFolders,
    state: RegistrationState,
    draft: ProfessionalRecord,
}

impl RegistrationFlow {
    pub fn new(
        identity: i64,
        handle: String,
        directory: ProfessionalDirectory,
        intake: Arc<FileIntake>,
        folders: UploadFolders,
    ) -> Self {
        Self {
            directory,
            intake,
            folders,
            state: RegistrationState::FullName,
            draft: ProfessionalRecord {
                identity,
                handle,
                ..ProfessionalRecord::default()
            },
        }
    }

    /// The opening prompt, sent by the dispatcher when the flow starts.
    pub fn entry_reply() -> Reply {
        Reply::with_keyboard(prompts::ASK_FULL_NAME, Keyboard::Remove)
    }

    pub async fn handle(&mut self, event: FlowEvent) -> Step {
        match &mut self.state {
            RegistrationState::FullName => match event {
                FlowEvent::Text(text) => {
                    self.draft.full_name = text;
                    self.state = RegistrationState::Profession;
                    Step::stay(Reply::text(prompts::ASK_PROFESSION))
                }
                _ => Step::ignore(),
            },
            RegistrationState::Profession => match event {
                FlowEvent::Text(text) => {
                    self.draft.profession = text;
                    self.state = RegistrationState::Phone;
                    Step::stay(Reply::text(prompts::ASK_PHONE))
                }
                _ => Step::ignore(),
            },
            RegistrationState::Phone => match event {
                FlowEvent::Text(text) => {
                    if !is_valid_phone(&text) {
                        return Step::stay(Reply::text(prompts::INVALID_PHONE));
                    }
                    self.draft.phone = text;
                    self.state = RegistrationState::Location;
                    Step::stay(Reply::with_keyboard(
                        prompts::ASK_LOCATION,
                        prompts::registration_location_keyboard(),
                    ))
                }
                _ => Step::ignore(),
            },
            RegistrationState::Location => {
                // Location is optional: any text counts as declining.
                let location = match event {
                    FlowEvent::Location {
                        latitude,
                        longitude,
                    } => format!("{latitude}, {longitude}"),
                    FlowEvent::Text(_) => NOT_SHARED.to_string(),
                    _ => return Step::ignore(),
                };
                self.draft.location = location;
                self.state = RegistrationState::Region;
                Step::stay(Reply::text(prompts::ASK_REGION))
            }
            RegistrationState::Region => match event {
                FlowEvent::Text(text) => {
                    self.draft.region = text;
                    self.state = RegistrationState::Testimonials(FileCollector::new(
                        self.folders.testimonials.clone(),
                        CollectorTexts::TESTIMONIALS,
                    ));
                    Step::stay(Reply::with_keyboard(
                        prompts::ASK_TESTIMONIALS,
                        prompts::skip_done_keyboard(),
                    ))
                }
                _ => Step::ignore(),
            },
            RegistrationState::Testimonials(collector) => {
                match collector.handle(&event, &self.intake).await {
                    Collect::Collecting(reply) => Step::stay(reply),
                    Collect::Finished(set) => {
                        let mut replies = Vec::new();
                        self.draft.testimonials = match set {
                            FileSet::Links(links) => links,
                            FileSet::Skipped => SKIPPED.to_string(),
                            FileSet::Nothing => {
                                replies.push(Reply::with_keyboard(
                                    prompts::NO_TESTIMONIALS_UPLOADED,
                                    Keyboard::Remove,
                                ));
                                String::new()
                            }
                        };
                        self.state = RegistrationState::Education(FileCollector::new(
                            self.folders.education.clone(),
                            CollectorTexts::EDUCATION,
                        ));
                        replies.push(Reply::with_keyboard(
                            prompts::ASK_EDUCATION,
                            prompts::skip_done_keyboard(),
                        ));
                        Step::stay_many(replies)
                    }
                }
            }
            RegistrationState::Education(collector) => {
                match collector.handle(&event, &self.intake).await {
                    Collect::Collecting(reply) => Step::stay(reply),
                    Collect::Finished(set) => {
                        let mut replies = Vec::new();
                        self.draft.education = match set {
                            FileSet::Links(links) => links,
                            FileSet::Skipped => SKIPPED.to_string(),
                            FileSet::Nothing => {
                                replies.push(Reply::with_keyboard(
                                    prompts::NO_EDUCATION_UPLOADED,
                                    Keyboard::Remove,
                                ));
                                String::new()
                            }
                        };
                        self.finish(replies).await
                    }
                }
            }
        }
    }

    /// Persists the assembled record and closes the flow either way. The
    /// row is re-resolved inside `write_record`, so a row created since the
    /// entry guard ran is overwritten instead of duplicated.
    async fn finish(&mut self, mut replies: Vec<Reply>) -> Step {
        match self.directory.write_record(&self.draft).await {
            Ok(()) => replies.push(Reply::with_keyboard(
                prompts::REGISTRATION_SAVED,
                prompts::registry_main_menu(),
            )),
            Err(e) => {
                tracing::error!(
                    identity = self.draft.identity,
                    error = %e,
                    "failed to save registration"
                );
                replies.push(Reply::with_keyboard(
                    prompts::registration_save_failed(&e.to_string()),
                    prompts::registry_main_menu(),
                ));
            }
        }
        Step::done_many(replies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::files::testing::{file_event, stub_intake};
    use crate::records::ProfessionalField;
    use crate::sheets::{MemoryStore, RecordStore};
    use std::sync::Arc;

    fn text(s: &str) -> FlowEvent {
        FlowEvent::Text(s.into())
    }

    fn flow(store: Arc<MemoryStore>) -> RegistrationFlow {
        let (intake, _) = stub_intake();
        RegistrationFlow::new(
            777,
            "abebe_k".into(),
            ProfessionalDirectory::new(store as Arc<dyn RecordStore>),
            Arc::new(intake),
            UploadFolders {
                testimonials: "t-folder".into(),
                education: "e-folder".into(),
            },
        )
    }

    /// Feeds everything up to and including the region step.
    async fn drive_to_testimonials(flow: &mut RegistrationFlow) {
        flow.handle(text("Abebe Kebede")).await;
        flow.handle(text("Electrician")).await;
        flow.handle(text("0911223344")).await;
        flow.handle(FlowEvent::Location {
            latitude: 9.03,
            longitude: 38.74,
        })
        .await;
        let step = flow.handle(text("Addis Ababa, Arada, 05")).await;
        assert_eq!(step.replies[0].text, prompts::ASK_TESTIMONIALS);
    }

    #[tokio::test]
    async fn full_registration_writes_one_row() {
        let store = Arc::new(MemoryStore::new());
        let mut flow = flow(Arc::clone(&store));
        drive_to_testimonials(&mut flow).await;

        flow.handle(file_event("t1")).await;
        flow.handle(text("Done ጨርሻያለው✅ ")).await;
        let step = flow.handle(text("Skip እለፍ⏭️")).await;

        assert!(step.is_done());
        assert_eq!(step.replies.last().unwrap().text, prompts::REGISTRATION_SAVED);

        let rows = store.dump().await;
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row[ProfessionalField::Identity.index()], "777");
        assert_eq!(row[ProfessionalField::Handle.index()], "abebe_k");
        assert_eq!(row[ProfessionalField::FullName.index()], "Abebe Kebede");
        assert_eq!(row[ProfessionalField::Phone.index()], "0911223344");
        assert_eq!(row[ProfessionalField::Location.index()], "9.03, 38.74");
        assert_eq!(
            row[ProfessionalField::Region.index()],
            "Addis Ababa, Arada, 05"
        );
        assert!(row[ProfessionalField::Testimonials.index()].contains("t1.pdf"));
        assert_eq!(row[ProfessionalField::Education.index()], SKIPPED);
        assert_eq!(row[ProfessionalField::DeleteFlag.index()], "");
        assert_eq!(row[ProfessionalField::Comment.index()], "");
    }

    #[tokio::test]
    async fn invalid_phone_self_loops_until_valid() {
        let store = Arc::new(MemoryStore::new());
        let mut flow = flow(store);
        flow.handle(text("Abebe")).await;
        flow.handle(text("Plumber")).await;

        let step = flow.handle(text("12345")).await;
        assert_eq!(step.replies[0].text, prompts::INVALID_PHONE);
        let step = flow.handle(text("abc1234567")).await;
        assert_eq!(step.replies[0].text, prompts::INVALID_PHONE);

        let step = flow.handle(text("+251912345678")).await;
        assert_eq!(step.replies[0].text, prompts::ASK_LOCATION);
    }

    #[tokio::test]
    async fn any_text_at_location_means_not_shared() {
        let store = Arc::new(MemoryStore::new());
        let mut flow = flow(Arc::clone(&store));
        flow.handle(text("Abebe")).await;
        flow.handle(text("Plumber")).await;
        flow.handle(text("0911000000")).await;
        let step = flow.handle(text("Skip / አሳልፍ")).await;
        assert_eq!(step.replies[0].text, prompts::ASK_REGION);
        flow.handle(text("Bahir Dar")).await;
        flow.handle(text("skip")).await;
        flow.handle(text("skip")).await;

        let rows = store.dump().await;
        assert_eq!(rows[0][ProfessionalField::Location.index()], NOT_SHARED);
        assert_eq!(rows[0][ProfessionalField::Testimonials.index()], SKIPPED);
    }

    #[tokio::test]
    async fn done_with_no_uploads_notices_then_moves_on() {
        let store = Arc::new(MemoryStore::new());
        let mut flow = flow(Arc::clone(&store));
        drive_to_testimonials(&mut flow).await;

        let step = flow.handle(text("done")).await;
        assert_eq!(step.replies.len(), 2);
        assert_eq!(step.replies[0].text, prompts::NO_TESTIMONIALS_UPLOADED);
        assert_eq!(step.replies[1].text, prompts::ASK_EDUCATION);
        assert!(!step.is_done());

        flow.handle(text("done")).await;
        let rows = store.dump().await;
        assert_eq!(rows[0][ProfessionalField::Testimonials.index()], "");
        assert_eq!(rows[0][ProfessionalField::Education.index()], "");
    }

    #[tokio::test]
    async fn save_failure_reports_and_still_ends() {
        let store = Arc::new(MemoryStore::new());
        store.set_failing(true);
        let mut flow = flow(Arc::clone(&store));
        drive_to_testimonials(&mut flow).await;
        flow.handle(text("skip")).await;
        let step = flow.handle(text("skip")).await;

        assert!(step.is_done());
        assert!(step.replies[0].text.contains("Error saving your data"));
        assert!(store.dump().await.is_empty());
    }

    #[tokio::test]
    async fn name_step_ignores_non_text_input() {
        let store = Arc::new(MemoryStore::new());
        let mut flow = flow(store);
        let step = flow.handle(file_event("early")).await;
        assert!(step.replies.is_empty());
        assert!(!step.is_done());

        let step = flow.handle(text("Abebe")).await;
        assert_eq!(step.replies[0].text, prompts::ASK_PROFESSION);
    }
}
