use std::future::Future;

use anyhow::{anyhow, bail, Result};
use reqwest::{redirect, Url};
use tracing::debug;

const MAX_REDIRECTS: usize = 10;
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Where page HTML comes from.
pub trait PageSource: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Plain GET over HTTP(S), locked to a single host.
pub struct HttpSource {
    client: reqwest::Client,
    allowed_domain: String,
}

impl HttpSource {
    pub fn new(allowed_domain: &str) -> Result<Self> {
        let domain = allowed_domain.to_string();
        let policy = redirect::Policy::custom(move |attempt| {
            if attempt.previous().len() > MAX_REDIRECTS {
                return attempt.error("too many redirects");
            }
            match check_domain(attempt.url(), &domain) {
                Ok(()) => attempt.follow(),
                Err(e) => attempt.error(e.to_string()),
            }
        });

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .redirect(policy)
            .build()?;

        Ok(Self {
            client,
            allowed_domain: allowed_domain.to_string(),
        })
    }
}

impl PageSource for HttpSource {
    async fn fetch(&self, url: &str) -> Result<String> {
        let url = Url::parse(url)?;
        check_domain(&url, &self.allowed_domain)?;

        debug!("GET {}", url);
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }
}

fn check_domain(url: &Url, allowed: &str) -> Result<()> {
    let host = url
        .host_str()
        .ok_or_else(|| anyhow!("url has no host: {}", url))?;
    if !host.eq_ignore_ascii_case(allowed) {
        bail!("forbidden domain: {}", host);
    }
    Ok(())
}
