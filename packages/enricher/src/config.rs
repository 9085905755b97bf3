use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::kernel::credentials::{
    CredentialProvider, SecretString, StaticCredential, TrendsCookieProvider,
};
use crate::kernel::search_interest::{
    SearchInterestConfig, DEFAULT_ANCHOR_TERM, DEFAULT_ATTEMPTS, DEFAULT_BACKOFF,
};

const DEFAULT_OMDB_BASE_URL: &str = "http://www.omdbapi.com/";
const DEFAULT_CANDIDATES_PATH: &str = "data/raw/movies_gather.csv";
const DEFAULT_MASTER_PATH: &str = "data/processed/movies_master.csv";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub omdb_api_key: SecretString,
    pub omdb_base_url: String,
    pub trends_base_url: String,
    pub trends_nid_cookie: Option<SecretString>,
    pub anchor_term: String,
    pub trends_attempts: u32,
    pub trends_backoff: Duration,
    pub candidates_path: PathBuf,
    pub master_path: PathBuf,
}

impl Config {
    /// Load configuration from the process environment. Callers load `.env`
    /// first if they want it.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup (environment, test maps).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let trends_attempts: u32 = match var("TRENDS_ATTEMPTS") {
            Some(v) => v
                .trim()
                .parse()
                .context("TRENDS_ATTEMPTS must be a positive integer")?,
            None => DEFAULT_ATTEMPTS,
        };
        if trends_attempts == 0 {
            bail!("TRENDS_ATTEMPTS must be at least 1");
        }

        let trends_backoff = match var("TRENDS_BACKOFF_MS") {
            Some(v) => Duration::from_millis(
                v.trim()
                    .parse()
                    .context("TRENDS_BACKOFF_MS must be a number of milliseconds")?,
            ),
            None => DEFAULT_BACKOFF,
        };

        Ok(Self {
            omdb_api_key: var("OMDB_API_KEY")
                .map(SecretString::new)
                .context("OMDB_API_KEY must be set")?,
            omdb_base_url: var("OMDB_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OMDB_BASE_URL.to_string()),
            trends_base_url: var("TRENDS_BASE_URL")
                .unwrap_or_else(|| trends_client::BASE_URL.to_string()),
            trends_nid_cookie: var("TRENDS_NID_COOKIE").map(SecretString::new),
            anchor_term: var("TRENDS_ANCHOR_TERM")
                .unwrap_or_else(|| DEFAULT_ANCHOR_TERM.to_string()),
            trends_attempts,
            trends_backoff,
            candidates_path: var("CANDIDATES_PATH")
                .unwrap_or_else(|| DEFAULT_CANDIDATES_PATH.to_string())
                .into(),
            master_path: var("MASTER_PATH")
                .unwrap_or_else(|| DEFAULT_MASTER_PATH.to_string())
                .into(),
        })
    }

    pub fn search_interest(&self) -> SearchInterestConfig {
        SearchInterestConfig {
            anchor_term: self.anchor_term.clone(),
            attempts: self.trends_attempts,
            backoff: self.trends_backoff,
        }
    }

    /// A configured cookie wins; otherwise one is requested from the Trends site.
    pub fn credential_provider(&self) -> Box<dyn CredentialProvider> {
        match &self.trends_nid_cookie {
            Some(cookie) => Box::new(StaticCredential::new(cookie.clone())),
            None => Box::new(TrendsCookieProvider::new(self.trends_base_url.clone())),
        }
    }
}
