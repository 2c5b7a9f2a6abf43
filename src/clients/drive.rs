use crate::config::DriveConfig;
use crate::constants::drive::{FOLDER_MIME_TYPE, LIST_FIELDS, MAX_PAGES};
use crate::models::drive::{DriveFile, DriveFileList};
use crate::services::ports::{FileDownloader, FileListing};
use anyhow::{Context, Result, bail};
use reqwest::Client;
use futures::stream::{self, Stream, StreamExt};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Builder for the Drive `q` search expression.
///
/// ```rust
/// use zplex::clients::drive::DriveQuery;
///
/// let q = DriveQuery::new().in_parents("root123").folders_only().trashed(false);
/// assert_eq!(
///     q.build(),
///     "'root123' in parents and mimeType = 'application/vnd.google-apps.folder' and trashed = false"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriveQuery {
    clauses: Vec<String>,
}

impl DriveQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn in_parents(mut self, folder_id: &str) -> Self {
        self.clauses.push(format!("'{}' in parents", escape(folder_id)));
        self
    }

    #[must_use]
    pub fn mime_type_equals(mut self, mime_type: &str) -> Self {
        self.clauses.push(format!("mimeType = '{}'", escape(mime_type)));
        self
    }

    #[must_use]
    pub fn mime_type_not_equals(mut self, mime_type: &str) -> Self {
        self.clauses.push(format!("mimeType != '{}'", escape(mime_type)));
        self
    }

    #[must_use]
    pub fn folders_only(self) -> Self {
        self.mime_type_equals(FOLDER_MIME_TYPE)
    }

    #[must_use]
    pub fn files_only(self) -> Self {
        self.mime_type_not_equals(FOLDER_MIME_TYPE)
    }

    #[must_use]
    pub fn trashed(mut self, trashed: bool) -> Self {
        self.clauses.push(format!("trashed = {trashed}"));
        self
    }

    #[must_use]
    pub fn build(&self) -> String {
        self.clauses.join(" and ")
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

#[derive(Clone)]
pub struct DriveClient {
    client: Client,
    base_url: String,
    access_token: String,
    page_size: u32,
}

impl DriveClient {
    pub fn new(config: &DriveConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent("zplex/0.1")
            .connect_timeout(Duration::from_secs(u64::from(config.request_timeout_seconds)))
            .build()
            .context("Failed to build Drive HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
            page_size: config.page_size,
        })
    }

    pub async fn list_files(&self, query: &DriveQuery) -> Result<Vec<DriveFile>> {
        let url = format!("{}/files", self.base_url);
        let q = query.build();
        let page_size = self.page_size.to_string();

        let mut files = Vec::new();
        let mut page_token: Option<String> = None;

        for _ in 0..MAX_PAGES {
            let mut params = vec![
                ("q", q.as_str()),
                ("fields", LIST_FIELDS),
                ("pageSize", page_size.as_str()),
                ("orderBy", "name"),
                ("supportsAllDrives", "true"),
                ("includeItemsFromAllDrives", "true"),
            ];
            if let Some(token) = page_token.as_deref() {
                params.push(("pageToken", token));
            }

            let response = self
                .client
                .get(&url)
                .bearer_auth(&self.access_token)
                .query(&params)
                .send()
                .await
                .context("Failed to connect to Drive")?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                bail!("Drive API error: {status} - {body}");
            }

            let page: DriveFileList = response
                .json()
                .await
                .context("Failed to parse Drive file listing")?;

            files.extend(page.files);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => {
                    debug!(count = files.len(), query = %q, "Drive listing complete");
                    return Ok(files);
                }
            }
        }

        warn!(query = %q, "Drive listing truncated after {} pages", MAX_PAGES);
        Ok(files)
    }

    /// Streams a file's content to `dest`, returning the number of bytes written.
    pub async fn download_file(&self, file_id: &str, dest: &Path) -> Result<u64> {
        let url = format!("{}/files/{}", self.base_url, file_id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[("alt", "media"), ("supportsAllDrives", "true")])
            .send()
            .await
            .context("Failed to connect to Drive")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("Drive download error: {status} - {body}");
        }

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let chunks = stream::unfold(response, |mut response| async move {
            match response.chunk().await {
                Ok(Some(chunk)) => Some((Ok(chunk), response)),
                Ok(None) => None,
                Err(e) => {
                    let err = anyhow::Error::from(e).context("Drive download interrupted");
                    Some((Err(err), response))
                }
            }
        });

        write_via_partial(chunks, dest).await
    }
}

/// `<dest>.part`, next to the destination.
fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

/// Writes `chunks` to `<dest>.part`, then renames it into place.
///
/// The partial file is removed if any step fails.
async fn write_via_partial<S, B>(chunks: S, dest: &Path) -> Result<u64>
where
    S: Stream<Item = Result<B>>,
    B: AsRef<[u8]>,
{
    let partial = partial_path(dest);

    let result: Result<u64> = async {
        let mut file = tokio::fs::File::create(&partial)
            .await
            .with_context(|| format!("Failed to create {}", partial.display()))?;

        futures::pin_mut!(chunks);
        let mut written = 0u64;
        while let Some(chunk) = chunks.next().await {
            let chunk = chunk?;
            file.write_all(chunk.as_ref()).await?;
            written += chunk.as_ref().len() as u64;
        }
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&partial, dest)
            .await
            .with_context(|| format!("Failed to move download to {}", dest.display()))?;
        Ok(written)
    }
    .await;

    if result.is_err() {
        match tokio::fs::remove_file(&partial).await {
            Ok(()) => debug!("Removed partial download {}", partial.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove partial download {}: {}", partial.display(), e),
        }
    }

    result
}

#[async_trait::async_trait]
impl FileListing for DriveClient {
    async fn list_files(&self, query: &DriveQuery) -> Result<Vec<DriveFile>> {
        Self::list_files(self, query).await
    }
}

#[async_trait::async_trait]
impl FileDownloader for DriveClient {
    async fn download(&self, file_id: &str, dest: &Path) -> Result<u64> {
        self.download_file(file_id, dest).await
    }
}
