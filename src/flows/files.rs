//! Repeated-upload collection shared by the registration and edit flows.
//!
//! While collecting, every incoming file is fetched from the transport and
//! pushed to object storage right away; the user keeps uploading until they
//! signal done or skip. The two signals exit with different values when
//! nothing was uploaded, and the enclosing flow decides what each value
//! means for its field.

use std::sync::Arc;

use crate::drive::ObjectUploader;
use crate::error::Error;
use crate::records::LINK_SEPARATOR;
use crate::telegram::{FileFetcher, FileRef};

use super::prompts;
use super::{FlowEvent, Reply};

/// Destination folders for the two document kinds.
#[derive(Debug, Clone)]
pub struct UploadFolders {
    pub testimonials: String,
    pub education: String,
}

/// Fetch-then-store pipeline for one uploaded file.
#[derive(Clone)]
pub struct FileIntake {
    fetcher: Arc<dyn FileFetcher>,
    uploader: Arc<dyn ObjectUploader>,
}

impl FileIntake {
    pub fn new(fetcher: Arc<dyn FileFetcher>, uploader: Arc<dyn ObjectUploader>) -> Self {
        Self { fetcher, uploader }
    }

    /// Downloads the file's bytes and stores them, returning the share link.
    pub async fn ingest(&self, file: &FileRef, folder_id: &str) -> Result<String, Error> {
        let bytes = self.fetcher.fetch(&file.file_id).await?;
        let link = self
            .uploader
            .upload(folder_id, &file.upload_name(), bytes)
            .await?;
        Ok(link)
    }
}

/// In-collection replies, which differ between the enclosing flows.
#[derive(Debug, Clone, Copy)]
pub struct CollectorTexts {
    pub received: &'static str,
    pub guidance: &'static str,
}

impl CollectorTexts {
    pub const TESTIMONIALS: Self = Self {
        received: prompts::TESTIMONIAL_RECEIVED,
        guidance: prompts::REGISTRATION_FILE_GUIDANCE,
    };

    pub const EDUCATION: Self = Self {
        received: prompts::EDUCATION_RECEIVED,
        guidance: prompts::REGISTRATION_FILE_GUIDANCE,
    };

    pub const EDITING: Self = Self {
        received: prompts::EDIT_FILE_RECEIVED,
        guidance: prompts::EDIT_FILE_GUIDANCE,
    };
}

/// What one event did to the collection.
#[derive(Debug, Clone, PartialEq)]
pub enum Collect {
    /// Still collecting; send this reply.
    Collecting(Reply),
    /// An exit signal arrived.
    Finished(FileSet),
}

/// The value a finished collection hands to the enclosing flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSet {
    /// At least one upload; links joined in upload order.
    Links(String),
    /// Skip signal with nothing uploaded.
    Skipped,
    /// Done signal with nothing uploaded.
    Nothing,
}

/// One in-progress upload collection.
pub struct FileCollector {
    folder_id: String,
    texts: CollectorTexts,
    links: Vec<String>,
}

impl FileCollector {
    pub fn new(folder_id: impl Into<String>, texts: CollectorTexts) -> Self {
        Self {
            folder_id: folder_id.into(),
            texts,
            links: Vec::new(),
        }
    }

    pub fn count(&self) -> usize {
        self.links.len()
    }

    /// Feeds one event into the collection.
    ///
    /// Skip is checked before done: the decorated button texts are matched
    /// by substring and a message could conceivably contain both words.
    /// An ingest failure keeps the collection open so the user can retry
    /// the same file.
    pub async fn handle(&mut self, event: &FlowEvent, intake: &FileIntake) -> Collect {
        match event {
            FlowEvent::Text(text) if prompts::is_skip_signal(text) => {
                if self.links.is_empty() {
                    Collect::Finished(FileSet::Skipped)
                } else {
                    Collect::Finished(FileSet::Links(self.links.join(LINK_SEPARATOR)))
                }
            }
            FlowEvent::Text(text) if prompts::is_done_signal(text) => {
                if self.links.is_empty() {
                    Collect::Finished(FileSet::Nothing)
                } else {
                    Collect::Finished(FileSet::Links(self.links.join(LINK_SEPARATOR)))
                }
            }
            FlowEvent::File(file) => match intake.ingest(file, &self.folder_id).await {
                Ok(link) => {
                    self.links.push(link);
                    Collect::Collecting(Reply::with_keyboard(
                        self.texts.received,
                        prompts::skip_done_keyboard(),
                    ))
                }
                Err(e) => {
                    tracing::error!(file_id = %file.file_id, error = %e, "file ingest failed");
                    Collect::Collecting(Reply::with_keyboard(
                        prompts::UPLOAD_RETRY,
                        prompts::skip_done_keyboard(),
                    ))
                }
            },
            _ => Collect::Collecting(Reply::with_keyboard(
                self.texts.guidance,
                prompts::skip_done_keyboard(),
            )),
        }
    }
}

// ── Test doubles ────────────────────────────────────────────────────


#[cfg(test)]
mod tests {
    use super::testing::{file_event, stub_intake};
    use super::*;
    use crate::flows::FlowEvent;

    fn collector() -> FileCollector {
        FileCollector::new("folder-a", CollectorTexts::TESTIMONIALS)
    }

    fn text(s: &str) -> FlowEvent {
        FlowEvent::Text(s.into())
    }

    #[tokio::test]
    async fn skip_with_no_uploads_yields_skipped() {
        let (intake, _) = stub_intake();
        let mut c = collector();
        let got = c.handle(&text("Skip እለፍ⏭️"), &intake).await;
        assert_eq!(got, Collect::Finished(FileSet::Skipped));
    }

    #[tokio::test]
    async fn done_with_no_uploads_yields_nothing() {
        let (intake, _) = stub_intake();
        let mut c = collector();
        let got = c.handle(&text("Done ጨርሻያለው✅ "), &intake).await;
        assert_eq!(got, Collect::Finished(FileSet::Nothing));
    }

    #[tokio::test]
    async fn uploads_accumulate_in_order_and_join_on_done() {
        let (intake, uploader) = stub_intake();
        let mut c = collector();

        for id in ["f1", "f2", "f3"] {
            match c.handle(&file_event(id), &intake).await {
                Collect::Collecting(reply) => {
                    assert_eq!(reply.text, prompts::TESTIMONIAL_RECEIVED)
                }
                other => panic!("expected to keep collecting, got {other:?}"),
            }
        }
        assert_eq!(c.count(), 3);
        assert_eq!(uploader.upload_count(), 3);

        match c.handle(&text("done"), &intake).await {
            Collect::Finished(FileSet::Links(joined)) => {
                let links: Vec<&str> = joined.split(", ").collect();
                assert_eq!(links.len(), 3);
                assert!(links[0].contains("/1/f1.pdf"));
                assert!(links[2].contains("/3/f3.pdf"));
            }
            other => panic!("expected joined links, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn skip_after_uploads_still_joins_links() {
        let (intake, _) = stub_intake();
        let mut c = collector();
        c.handle(&file_event("f1"), &intake).await;
        match c.handle(&text("skip"), &intake).await {
            Collect::Finished(FileSet::Links(joined)) => assert!(joined.contains("f1.pdf")),
            other => panic!("expected joined links, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn failed_upload_keeps_collecting_for_retry() {
        let (intake, uploader) = stub_intake();
        let mut c = collector();

        uploader.set_failing(true);
        match c.handle(&file_event("f1"), &intake).await {
            Collect::Collecting(reply) => assert_eq!(reply.text, prompts::UPLOAD_RETRY),
            other => panic!("expected retry prompt, got {other:?}"),
        }
        assert_eq!(c.count(), 0);

        uploader.set_failing(false);
        c.handle(&file_event("f1"), &intake).await;
        assert_eq!(c.count(), 1);
    }

    #[tokio::test]
    async fn unrelated_text_reprompts_with_guidance() {
        let (intake, _) = stub_intake();
        let mut c = collector();
        match c.handle(&text("here you go"), &intake).await {
            Collect::Collecting(reply) => {
                assert_eq!(reply.text, prompts::REGISTRATION_FILE_GUIDANCE)
            }
            other => panic!("expected guidance, got {other:?}"),
        }
        assert_eq!(c.count(), 0);
    }

    #[tokio::test]
    async fn skip_wins_when_both_signals_appear() {
        let (intake, _) = stub_intake();
        let mut c = collector();
        let got = c.handle(&text("skip and done"), &intake).await;
        assert_eq!(got, Collect::Finished(FileSet::Skipped));
    }
}
