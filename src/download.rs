//! Fetching generated artifacts to disk.
//!
//! This is what "navigating to the download target" means for a terminal
//! client: the artifact is streamed into the configured output directory.

use crate::config::DownloadConfig;
use anyhow::{anyhow, Context, Result};
use futures::StreamExt;
use reqwest::{Client, Url};
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// File name used when the URL has no usable last segment.
const FALLBACK_FILE_NAME: &str = "artifact";

/// Download `url` into the configured output directory and return the path written.
///
/// The body goes to a temporary file beside the target, which only replaces
/// the target once the whole body has been written. A failed download leaves
/// the directory as it was.
pub async fn fetch_artifact(http: &Client, url: &str, download: &DownloadConfig) -> Result<PathBuf> {
    let output_dir = &download.output_dir;

    // Overrides the client-wide timeout, which is sized for generation calls
    let response = http
        .get(url)
        .timeout(download.timeout())
        .send()
        .await
        .with_context(|| format!("Failed to request {}", url))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(anyhow!("Download failed with status {}: {}", status, body));
    }

    tokio::fs::create_dir_all(output_dir)
        .await
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

    let path = output_dir.join(file_name_from_url(url));
    let partial = tempfile::Builder::new()
        .prefix(".promptgen-")
        .suffix(".part")
        .tempfile_in(output_dir)
        .with_context(|| format!("Failed to create temporary file in {}", output_dir.display()))?;
    // Dropping `temp_path` on any early return deletes the partial file
    let (file, temp_path) = partial.into_parts();
    let mut file = tokio::fs::File::from_std(file);

    let mut stream = response.bytes_stream();
    let mut written = 0usize;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.context("Download interrupted")?;
        file.write_all(&chunk).await?;
        written += chunk.len();
    }
    file.flush().await?;
    drop(file);

    temp_path
        .persist(&path)
        .with_context(|| format!("Failed to move download into {}", path.display()))?;

    debug!("Wrote {} bytes", written);
    info!("Saved {} to {}", url, path.display());
    Ok(path)
}

/// Last non-empty path segment of `url`, ignoring query and fragment.
pub fn file_name_from_url(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|url| {
            url.path_segments()?
                .filter(|segment| !segment.is_empty())
                .last()
                .map(str::to_string)
        })
        .filter(|segment| segment != "." && segment != "..")
        .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock_service;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use futures::stream;
    use std::path::Path;
    use std::time::Duration;

    fn download_config(output_dir: &Path) -> DownloadConfig {
        DownloadConfig {
            output_dir: output_dir.to_path_buf(),
            timeout_secs: 5,
        }
    }

    fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_file_name_from_url() {
        assert_eq!(
            file_name_from_url("http://localhost:8000/output/generated.pptx"),
            "generated.pptx"
        );
        assert_eq!(file_name_from_url("http://localhost:8000/files/x.zip?v=2#top"), "x.zip");
        assert_eq!(file_name_from_url("http://localhost:8000/files/"), "files");
    }

    #[test]
    fn test_file_name_fallback() {
        assert_eq!(file_name_from_url("http://localhost:8000"), "artifact");
        assert_eq!(file_name_from_url("http://localhost:8000/"), "artifact");
        assert_eq!(file_name_from_url("http://localhost:8000/a/.."), "artifact");
        assert_eq!(file_name_from_url("/output/generated.pptx"), "artifact");
    }

    #[tokio::test]
    async fn test_fetch_artifact_writes_file() {
        let router = Router::new().route("/output/generated.pptx", get(|| async { "slide bytes" }));
        let base = mock_service::spawn(router).await;
        let dir = tempfile::tempdir().unwrap();
        let output_dir = dir.path().join("decks");

        let path = fetch_artifact(
            &Client::new(),
            &format!("{}/output/generated.pptx", base),
            &download_config(&output_dir),
        )
        .await
        .unwrap();

        assert_eq!(path, output_dir.join("generated.pptx"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "slide bytes");
        assert_eq!(dir_entries(&output_dir), vec!["generated.pptx".to_string()]);
    }

    #[tokio::test]
    async fn test_fetch_artifact_replaces_previous_file() {
        let router = Router::new().route("/output/generated.pptx", get(|| async { "new deck" }));
        let base = mock_service::spawn(router).await;
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("generated.pptx"), "old deck").unwrap();

        let path = fetch_artifact(
            &Client::new(),
            &format!("{}/output/generated.pptx", base),
            &download_config(dir.path()),
        )
        .await
        .unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new deck");
    }

    #[tokio::test]
    async fn test_fetch_artifact_not_found() {
        let router = Router::new().route(
            "/output/generated.pptx",
            get(|| async { (StatusCode::NOT_FOUND, "gone") }),
        );
        let base = mock_service::spawn(router).await;
        let dir = tempfile::tempdir().unwrap();

        let err = fetch_artifact(
            &Client::new(),
            &format!("{}/output/generated.pptx", base),
            &download_config(dir.path()),
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("404"));
        assert!(!dir.path().join("generated.pptx").exists());
    }

    #[tokio::test]
    async fn test_interrupted_download_keeps_previous_file() {
        let router = Router::new().route(
            "/output/generated.pptx",
            get(|| async {
                let body = stream::iter([Ok::<_, std::io::Error>("PARTIAL")]).chain(stream::once(
                    async {
                        tokio::time::sleep(Duration::from_millis(200)).await;
                        Err(std::io::Error::other("connection reset"))
                    },
                ));
                Body::from_stream(body)
            }),
        );
        let base = mock_service::spawn(router).await;
        let dir = tempfile::tempdir().unwrap();
        let previous = dir.path().join("generated.pptx");
        std::fs::write(&previous, "GOOD PREVIOUS DECK").unwrap();

        let result = fetch_artifact(
            &Client::new(),
            &format!("{}/output/generated.pptx", base),
            &download_config(dir.path()),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&previous).unwrap(), "GOOD PREVIOUS DECK");
        assert_eq!(dir_entries(dir.path()), vec!["generated.pptx".to_string()]);
    }

    #[tokio::test]
    async fn test_download_timeout_is_separate_from_client_timeout() {
        let router = Router::new().route(
            "/output/generated.pptx",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                "slow deck"
            }),
        );
        let base = mock_service::spawn(router).await;
        let dir = tempfile::tempdir().unwrap();
        let http = Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .unwrap();

        let path = fetch_artifact(
            &http,
            &format!("{}/output/generated.pptx", base),
            &download_config(dir.path()),
        )
        .await
        .unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "slow deck");
    }
}
