//! Post-registration editing of individual fields.
//!
//! The field menu is an inline keyboard; the chosen field decides which of
//! three update paths runs (plain text, location, file collection), each
//! of which writes exactly one column and ends the session. Unlike the
//! registration form, several invalid inputs here abort the session
//! outright instead of re-prompting.

use std::sync::Arc;

use crate::records::{ProfessionalDirectory, ProfessionalField, NOT_SHARED, SKIPPED};
use crate::sheets::RowHandle;
use crate::telegram::Keyboard;
use crate::validate::is_valid_phone;

use super::files::{Collect, CollectorTexts, FileCollector, FileIntake, FileSet, UploadFolders};
use super::prompts;
use super::{FlowEvent, Reply, Step};

/// Callback data of the menu's cancel row.
pub const CANCEL_CALLBACK: &str = "edit_cancel";

/// The editable fields, each carrying its menu entry, prompt, update path,
/// and target column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    FullName,
    Profession,
    Phone,
    Location,
    Region,
    Testimonials,
    Education,
}

/// Which update path a field uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Text,
    Location,
    Files,
}

impl EditField {
    pub const ALL: [EditField; 7] = [
        EditField::FullName,
        EditField::Profession,
        EditField::Phone,
        EditField::Location,
        EditField::Region,
        EditField::Testimonials,
        EditField::Education,
    ];

    pub fn callback_data(&self) -> &'static str {
        match self {
            EditField::FullName => "edit_name",
            EditField::Profession => "edit_profession",
            EditField::Phone => "edit_phone",
            EditField::Location => "edit_location",
            EditField::Region => "edit_address",
            EditField::Testimonials => "edit_testimonials",
            EditField::Education => "edit_education",
        }
    }

    pub fn from_callback(data: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.callback_data() == data)
    }

    pub fn menu_label(&self) -> &'static str {
        match self {
            EditField::FullName => "📝 Full Name / ሙሉ ስም",
            EditField::Profession => "🛠️ Profession / ሙያ",
            EditField::Phone => "📞 Phone / ስልክ",
            EditField::Location => "📍 Location (GPS) / አካባቢ (GPS)",
            EditField::Region => "🗺️ Region/City/Woreda / ክልል/ከተማ/ወረዳ",
            EditField::Testimonials => "📄 Testimonials / ምስክር ወረቀቶች",
            EditField::Education => "🎓 Educational Docs / የትምህርት ማስረጃ",
        }
    }

    pub fn prompt(&self) -> &'static str {
        match self {
            EditField::FullName => prompts::EDIT_NAME_PROMPT,
            EditField::Profession => prompts::EDIT_PROFESSION_PROMPT,
            EditField::Phone => prompts::EDIT_PHONE_PROMPT,
            EditField::Location => prompts::EDIT_LOCATION_PROMPT,
            EditField::Region => prompts::EDIT_ADDRESS_PROMPT,
            EditField::Testimonials => prompts::EDIT_TESTIMONIALS_PROMPT,
            EditField::Education => prompts::EDIT_EDUCATION_PROMPT,
        }
    }

    pub fn kind(&self) -> EditKind {
        match self {
            EditField::Location => EditKind::Location,
            EditField::Testimonials | EditField::Education => EditKind::Files,
            _ => EditKind::Text,
        }
    }

    /// The one column this field writes.
    pub fn target(&self) -> ProfessionalField {
        match self {
            EditField::FullName => ProfessionalField::FullName,
            EditField::Profession => ProfessionalField::Profession,
            EditField::Phone => ProfessionalField::Phone,
            EditField::Location => ProfessionalField::Location,
            EditField::Region => ProfessionalField::Region,
            EditField::Testimonials => ProfessionalField::Testimonials,
            EditField::Education => ProfessionalField::Education,
        }
    }

    pub fn label(&self) -> &'static str {
        self.target().label()
    }
}

enum EditState {
    FieldSelection,
    NewValue(EditField),
    NewLocation,
    NewFiles {
        field: EditField,
        collector: FileCollector,
    },
}

pub struct EditFlow {
    row: RowHandle,
    directory: ProfessionalDirectory,
    intake: Arc<FileIntake>,
    folders: UploadFolders,
    state: EditState,
}

impl EditFlow {
    pub fn new(
        row: RowHandle,
        directory: ProfessionalDirectory,
        intake: Arc<FileIntake>,
        folders: UploadFolders,
    ) -> Self {
        Self {
            row,
            directory,
            intake,
            folders,
            state: EditState::FieldSelection,
        }
    }

    /// The field menu, sent by the dispatcher when the flow starts.
    pub fn entry_reply() -> Reply {
        Reply::with_keyboard(prompts::EDIT_MENU_TITLE, prompts::edit_menu_keyboard())
    }

    pub async fn handle(&mut self, event: FlowEvent) -> Step {
        match &mut self.state {
            EditState::FieldSelection => match event {
                FlowEvent::Callback(data) if data == CANCEL_CALLBACK => Step::done_many(vec![
                    Reply::text(prompts::EDIT_CANCELLED),
                    Reply::with_keyboard(prompts::MAIN_MENU_TITLE, prompts::registry_main_menu()),
                ]),
                FlowEvent::Callback(data) => match EditField::from_callback(&data) {
                    Some(field) => self.select_field(field),
                    // Unknown selections end the whole edit session.
                    None => Step::done_many(vec![
                        Reply::text(prompts::INVALID_EDIT_OPTION),
                        Reply::with_keyboard(
                            prompts::MAIN_MENU_TITLE,
                            prompts::registry_main_menu(),
                        ),
                    ]),
                },
                _ => Step::ignore(),
            },
            EditState::NewValue(field) => {
                let field = *field;
                match event {
                    FlowEvent::Text(text) => {
                        if field == EditField::Phone && !is_valid_phone(&text) {
                            return Step::stay(Reply::text(prompts::INVALID_PHONE_EDIT));
                        }
                        self.write_value(field, &text).await
                    }
                    _ => Step::ignore(),
                }
            }
            EditState::NewLocation => match event {
                FlowEvent::Location {
                    latitude,
                    longitude,
                } => {
                    let value = format!("{latitude}, {longitude}");
                    self.write_value(EditField::Location, &value).await
                }
                FlowEvent::Text(text) if prompts::is_skip_signal(&text) => {
                    self.write_value(EditField::Location, NOT_SHARED).await
                }
                // Stricter than registration: unexpected text aborts.
                FlowEvent::Text(_) => Step::done(Reply::with_keyboard(
                    prompts::EDIT_LOCATION_INVALID,
                    prompts::registry_main_menu(),
                )),
                _ => Step::ignore(),
            },
            EditState::NewFiles { field, collector } => {
                let field = *field;
                match collector.handle(&event, &self.intake).await {
                    Collect::Collecting(reply) => Step::stay(reply),
                    Collect::Finished(FileSet::Links(links)) => {
                        self.write_files(field, &links).await
                    }
                    Collect::Finished(FileSet::Skipped) => self.write_files(field, SKIPPED).await,
                    Collect::Finished(FileSet::Nothing) => Step::done(Reply::with_keyboard(
                        prompts::no_new_files(field.label()),
                        prompts::registry_main_menu(),
                    )),
                }
            }
        }
    }

    fn select_field(&mut self, field: EditField) -> Step {
        let reply = match field.kind() {
            EditKind::Text => {
                self.state = EditState::NewValue(field);
                Reply::with_keyboard(field.prompt(), Keyboard::Remove)
            }
            EditKind::Location => {
                self.state = EditState::NewLocation;
                Reply::with_keyboard(field.prompt(), prompts::edit_location_keyboard())
            }
            EditKind::Files => {
                let folder = if field == EditField::Testimonials {
                    self.folders.testimonials.clone()
                } else {
                    self.folders.education.clone()
                };
                self.state = EditState::NewFiles {
                    field,
                    collector: FileCollector::new(folder, CollectorTexts::EDITING),
                };
                Reply::with_keyboard(field.prompt(), prompts::skip_done_keyboard())
            }
        };
        Step::stay(reply)
    }

    async fn write_value(&self, field: EditField, value: &str) -> Step {
        match self
            .directory
            .write_field(self.row, field.target(), value)
            .await
        {
            Ok(()) => Step::done(Reply::with_keyboard(
                prompts::field_updated(field.label()),
                prompts::registry_main_menu(),
            )),
            Err(e) => {
                tracing::error!(row = self.row, field = %field.target(), error = %e, "field update failed");
                Step::done(Reply::with_keyboard(
                    prompts::UPDATE_FAILED,
                    prompts::registry_main_menu(),
                ))
            }
        }
    }

    async fn write_files(&self, field: EditField, value: &str) -> Step {
        match self
            .directory
            .write_field(self.row, field.target(), value)
            .await
        {
            Ok(()) => Step::done(Reply::with_keyboard(
                prompts::files_updated(field.label()),
                prompts::registry_main_menu(),
            )),
            Err(e) => {
                tracing::error!(row = self.row, field = %field.target(), error = %e, "file links update failed");
                Step::done(Reply::with_keyboard(
                    prompts::files_update_failed(field.label()),
                    prompts::registry_main_menu(),
                ))
            }
        }
    }
}
