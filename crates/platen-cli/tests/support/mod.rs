//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use platen_cli::cli::Profile;
use platen_cli::config::{PlatenConfig, SitePaths};
use platen_cli::dev::{GenerateRequest, ServerManager, SiteBuilder, SiteGenerator};
use platen_cli::{BuildError, Result};
use std::fs;
use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;

/// Generator that writes a one-page site and counts its runs.
///
/// With `fail_after = Some(n)`, every run after the n-th fails.
pub struct FakeGenerator {
    runs: AtomicUsize,
    fail_after: Option<usize>,
    delay: Duration,
}

impl FakeGenerator {
    pub fn new() -> Self {
        Self {
            runs: AtomicUsize::new(0),
            fail_after: None,
            delay: Duration::ZERO,
        }
    }

    pub fn failing_after(runs: usize) -> Self {
        Self {
            fail_after: Some(runs),
            ..Self::new()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::new()
        }
    }

    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SiteGenerator for FakeGenerator {
    fn name(&self) -> &str {
        "fake"
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<String> {
        let run = self.runs.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail_after.is_some_and(|limit| run > limit) {
            return Err(BuildError::GeneratorFailed {
                program: "fake".to_string(),
                status: "exit code 1".to_string(),
                output: format!("CRITICAL: run {} failed", run),
            }
            .into());
        }

        tokio::fs::create_dir_all(&request.output_dir).await?;
        tokio::fs::write(
            request.output_dir.join("index.html"),
            format!("<h1>run {}</h1>", run),
        )
        .await?;
        Ok(format!("Done: processed run {}", run))
    }

    async fn version(&self) -> Result<String> {
        Ok("fake 1.0".to_string())
    }
}

/// A project with a content directory and the default layout.
pub struct Site {
    pub temp: TempDir,
    pub paths: SitePaths,
}

impl Site {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let paths = PlatenConfig::default().paths(temp.path());
        fs::create_dir_all(paths.content_dir.join("posts")).unwrap();
        fs::write(paths.content_dir.join("posts/first.md"), "Title: First\n").unwrap();
        Self { temp, paths }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn builder(&self, generator: Arc<FakeGenerator>) -> Arc<SiteBuilder> {
        Arc::new(SiteBuilder::new(self.paths.clone(), generator))
    }

    pub fn manager(&self, generator: Arc<FakeGenerator>) -> Arc<ServerManager> {
        Arc::new(ServerManager::new(
            IpAddr::V4(Ipv4Addr::LOCALHOST),
            self.builder(generator),
        ))
    }

    pub fn write_collection(&self, csv: &str) {
        fs::write(&self.paths.collection_csv, csv).unwrap();
    }
}

pub const DEV: Profile = Profile::Development;

/// Wait until `check` holds, polling every 20ms for up to 5s.
pub async fn eventually(mut check: impl FnMut() -> bool) -> bool {
    for _ in 0..250 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    check()
}

/// Plain HTTP GET against a local server, returning the raw response.
pub async fn http_get(port: u16, path: &str) -> std::io::Result<String> {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let mut stream = tokio::net::TcpStream::connect(("127.0.0.1", port)).await?;
    let request = format!(
        "GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        path
    );
    stream.write_all(request.as_bytes()).await?;
    let mut response = String::new();
    stream.read_to_string(&mut response).await?;
    Ok(response)
}
