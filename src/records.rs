//! Data model for the two sheets and the operations the flows run on them.
//!
//! The professionals sheet holds one row per registered professional
//! (columns A through K); the requests sheet is an append-only log of
//! service requests and complaints with the same width.

use std::fmt;
use std::sync::Arc;

use crate::error::SheetError;
use crate::sheets::{RecordStore, RowHandle, SheetRow};

/// Location value when the user declined to share GPS.
pub const NOT_SHARED: &str = "Not shared";
/// File-set value when the user skipped the upload step without files.
pub const SKIPPED: &str = "Skipped";
/// Location value when a requester wants professionals from anywhere.
pub const ANYWHERE: &str = "Anywhere";
/// Stored handle when a registering professional has no username.
pub const HANDLE_NOT_SET: &str = "Not set";
/// Stored handle when a requester has no username.
pub const HANDLE_UNAVAILABLE: &str = "N/A";

/// Separator between collected file links in one cell.
pub const LINK_SEPARATOR: &str = ", ";

/// Columns of the professionals sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfessionalField {
    Identity,
    Handle,
    FullName,
    Profession,
    Phone,
    Location,
    Region,
    DeleteFlag,
    Comment,
    Testimonials,
    Education,
}

impl ProfessionalField {
    /// Column letter in the sheet.
    pub fn column(&self) -> &'static str {
        match self {
            ProfessionalField::Identity => "A",
            ProfessionalField::Handle => "B",
            ProfessionalField::FullName => "C",
            ProfessionalField::Profession => "D",
            ProfessionalField::Phone => "E",
            ProfessionalField::Location => "F",
            ProfessionalField::Region => "G",
            ProfessionalField::DeleteFlag => "H",
            ProfessionalField::Comment => "I",
            ProfessionalField::Testimonials => "J",
            ProfessionalField::Education => "K",
        }
    }

    /// 0-based position within a row.
    pub fn index(&self) -> usize {
        (self.column().as_bytes()[0] - b'A') as usize
    }

    /// How the field is named in messages to the user.
    pub fn label(&self) -> &'static str {
        match self {
            ProfessionalField::Identity => "identity",
            ProfessionalField::Handle => "username",
            ProfessionalField::FullName => "full name",
            ProfessionalField::Profession => "profession",
            ProfessionalField::Phone => "phone",
            ProfessionalField::Location => "location",
            ProfessionalField::Region => "region/city/woreda",
            ProfessionalField::DeleteFlag => "delete flag",
            ProfessionalField::Comment => "comment",
            ProfessionalField::Testimonials => "testimonials",
            ProfessionalField::Education => "educational docs",
        }
    }
}

impl fmt::Display for ProfessionalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A complete professional registration, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfessionalRecord {
    pub identity: i64,
    pub handle: String,
    pub full_name: String,
    pub profession: String,
    pub phone: String,
    pub location: String,
    pub region: String,
    pub comment: String,
    pub testimonials: String,
    pub education: String,
}

impl ProfessionalRecord {
    /// The 11-column row written to the sheet. Column H stays empty, it is
    /// only used transiently by deletion tooling.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.identity.to_string(),
            self.handle.clone(),
            self.full_name.clone(),
            self.profession.clone(),
            self.phone.clone(),
            self.location.clone(),
            self.region.clone(),
            String::new(),
            self.comment.clone(),
            self.testimonials.clone(),
            self.education.clone(),
        ]
    }
}

/// The subset of a row shown by the profile command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub full_name: String,
    pub profession: String,
    pub phone: String,
    pub location: String,
}

impl ProfileView {
    /// `None` when the row is too short to hold the profile columns.
    pub fn from_row(row: &SheetRow) -> Option<Self> {
        if row.values.len() <= ProfessionalField::Location.index() {
            return None;
        }
        Some(Self {
            full_name: row.cell(ProfessionalField::FullName.index()).to_string(),
            profession: row.cell(ProfessionalField::Profession.index()).to_string(),
            phone: row.cell(ProfessionalField::Phone.index()).to_string(),
            location: row.cell(ProfessionalField::Location.index()).to_string(),
        })
    }
}

/// How a requester wants professionals filtered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    NearMe,
    Anywhere,
}

impl FilterMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterMode::NearMe => "Near Me",
            FilterMode::Anywhere => "Anywhere",
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Local wall-clock timestamp in the log's format.
pub fn request_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

// ── Professionals directory ─────────────────────────────────────────

/// High-level operations on the professionals sheet.
#[derive(Clone)]
pub struct ProfessionalDirectory {
    store: Arc<dyn RecordStore>,
}

impl ProfessionalDirectory {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Finds the row whose identity column matches.
    ///
    /// Fail-soft: a read error is logged and treated as "not registered",
    /// so a flaky backend degrades entry guards instead of blocking them.
    pub async fn find_by_identity(&self, identity: i64) -> Option<SheetRow> {
        let needle = identity.to_string();
        match self.store.rows().await {
            Ok(rows) => rows
                .into_iter()
                .find(|r| r.cell(ProfessionalField::Identity.index()) == needle),
            Err(e) => {
                tracing::error!(identity, error = %e, "directory lookup failed");
                None
            }
        }
    }

    /// Writes one field of an existing registration.
    pub async fn write_field(
        &self,
        row: RowHandle,
        field: ProfessionalField,
        value: &str,
    ) -> Result<(), SheetError> {
        self.store.update_cell(row, field.column(), value).await
    }

    /// Persists a finished registration.
    ///
    /// The row is looked up again right before writing: the sheet may have
    /// changed while the form was open. An existing row is overwritten in
    /// place, otherwise a new one is appended.
    pub async fn write_record(&self, record: &ProfessionalRecord) -> Result<(), SheetError> {
        let values = record.to_row();
        match self.find_by_identity(record.identity).await {
            Some(existing) => self.store.update_row(existing.row, &values).await,
            None => self.store.append_row(&values).await,
        }
    }

    /// Removes a registration row.
    pub async fn delete(&self, row: RowHandle) -> Result<(), SheetError> {
        self.store.delete_row(row).await
    }
}

// ── Requests log ────────────────────────────────────────────────────

/// One row of the requests sheet. Requests fill the first seven columns,
/// complaints only the comment column; both carry identity, handle, and a
/// timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestRecord {
    pub requester_name: String,
    pub phone: String,
    pub profession: String,
    pub filter: String,
    pub location: String,
    pub address: String,
    pub count: String,
    pub comment: String,
    pub identity: i64,
    pub handle: String,
    pub submitted_at: String,
}

impl RequestRecord {
    pub fn complaint(comment: &str, identity: i64, handle: &str) -> Self {
        Self {
            comment: comment.to_string(),
            identity,
            handle: handle.to_string(),
            submitted_at: request_timestamp(),
            ..Self::default()
        }
    }

    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.requester_name.clone(),
            self.phone.clone(),
            self.profession.clone(),
            self.filter.clone(),
            self.location.clone(),
            self.address.clone(),
            self.count.clone(),
            self.comment.clone(),
            self.identity.to_string(),
            self.handle.clone(),
            self.submitted_at.clone(),
        ]
    }
}

/// Append-only view of the requests sheet.
#[derive(Clone)]
pub struct RequestLog {
    store: Arc<dyn RecordStore>,
}

impl RequestLog {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn append(&self, record: &RequestRecord) -> Result<(), SheetError> {
        self.store.append_row(&record.to_row()).await
    }
}

// ── Tests ───────────────────────────────────────────────────────────
