use crate::{
    error::Error,
    record::{ApiCallRecord, Attachment},
};
use async_trait::async_trait;
use std::{
    fmt::Debug,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

pub type SinkError = Box<dyn std::error::Error + Send + Sync>;

/// Where call records go once a call has completed.
#[async_trait]
pub trait RecordSink: Debug + Send + Sync {
    async fn attach(&self, name: &str, attachment: Attachment) -> Result<(), SinkError>;
}

#[async_trait]
impl<S: RecordSink + ?Sized> RecordSink for Arc<S> {
    async fn attach(&self, name: &str, attachment: Attachment) -> Result<(), SinkError> {
        (**self).attach(name, attachment).await
    }
}

/// Collects the attachments of a single test. Create one per test, never
/// share it between tests.
#[derive(Debug, Default)]
pub struct CallLog {
    attachments: Mutex<Vec<(String, Attachment)>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attachments(&self) -> Result<Vec<(String, Attachment)>, Error> {
        Ok(self.attachments.lock()?.clone())
    }

    /// Decodes every record attachment, in the order the calls completed.
    pub fn records(&self) -> Result<Vec<ApiCallRecord>, Error> {
        self.attachments
            .lock()?
            .iter()
            .filter(|(_, attachment)| attachment.is_record())
            .map(|(_, attachment)| ApiCallRecord::from_attachment(attachment))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.attachments
            .lock()
            .map(|attachments| attachments.len())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Empties the log, handing back everything collected so far.
    pub fn take(&self) -> Result<Vec<(String, Attachment)>, Error> {
        Ok(std::mem::take(&mut *self.attachments.lock()?))
    }
}

#[async_trait]
impl RecordSink for CallLog {
    async fn attach(&self, name: &str, attachment: Attachment) -> Result<(), SinkError> {
        self.attachments
            .lock()
            .map_err(|_| Error::PoisonedLock)?
            .push((name.into(), attachment));

        Ok(())
    }
}

const MAX_STEM_LENGTH: usize = 100;

/// Writes every attachment to its own file in a report directory.
#[derive(Debug)]
pub struct DirectorySink {
    directory: PathBuf,
    written: AtomicUsize,
}

impl DirectorySink {
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
            written: AtomicUsize::new(0),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// The sequence prefix keeps names unique, so the stem is cut to stay
    /// well below file system name limits.
    fn file_name(sequence: usize, name: &str, content_type: &str) -> String {
        let stem = name
            .chars()
            .take(MAX_STEM_LENGTH)
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect::<String>();
        let extension = if content_type.contains("json") { "json" } else { "txt" };

        format!("{:03}-{}.{}", sequence, stem, extension)
    }
}

#[async_trait]
impl RecordSink for DirectorySink {
    async fn attach(&self, name: &str, attachment: Attachment) -> Result<(), SinkError> {
        let sequence = self.written.fetch_add(1, Ordering::SeqCst);
        let path = self
            .directory
            .join(Self::file_name(sequence, name, &attachment.content_type));

        tokio::fs::create_dir_all(&self.directory).await?;
        tokio::fs::write(&path, attachment.body.as_bytes()).await?;

        Ok(())
    }
}
