use anyhow::{Context as _, anyhow};
use bytes::Bytes;
use reqwest::header::HeaderMap;
use url::Url;

/// Thin HTTP client for the content document. One attempt per request: a
/// failed or non-success fetch is reported to the caller, which degrades.
#[derive(Clone)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new(user_agent: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("build reqwest client")?;
        Ok(Self { client })
    }

    pub async fn get_bytes(&self, url: Url) -> anyhow::Result<(Bytes, HeaderMap)> {
        if url.scheme() == "file" {
            let path = url
                .to_file_path()
                .map_err(|()| anyhow!("{} is not a local path", url))?;
            let bytes = std::fs::read(&path).with_context(|| format!("read {}", path.display()))?;
            return Ok((Bytes::from(bytes), HeaderMap::new()));
        }

        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("GET {}", url))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!("GET {} failed with status {}", url, status));
        }

        let headers = resp.headers().clone();
        let bytes = resp.bytes().await.context("read response body")?;
        tracing::debug!(%url, bytes = bytes.len(), "fetched");
        Ok((bytes, headers))
    }
}
