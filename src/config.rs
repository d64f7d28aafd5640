use clap::{ArgAction, Parser};

use crate::pipeline::RunOptions;

pub const TARGET_URL: &str = "https://www.scrapethissite.com/pages/simple/";
pub const TARGET_DOMAIN: &str = "www.scrapethissite.com";
pub const TABLE_NAME: &str = "Countries";

/// Set by the Lambda runtime; its presence means we are running as a function.
const LAMBDA_RUNTIME_ENV: &str = "AWS_LAMBDA_RUNTIME_API";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "country_scraper",
    about = "Scrape country populations into DynamoDB"
)]
pub struct Config {
    /// Page to scrape
    #[arg(long, env = "COUNTRY_SCRAPER_URL", default_value = TARGET_URL)]
    pub url: String,
    /// Only this host may be fetched (redirects included)
    #[arg(long, env = "COUNTRY_SCRAPER_ALLOWED_DOMAIN", default_value = TARGET_DOMAIN)]
    pub allowed_domain: String,
    /// DynamoDB table receiving the records
    #[arg(long, env = "COUNTRY_SCRAPER_TABLE", default_value = TABLE_NAME)]
    pub table: String,
    /// Re-read every written item by key
    #[arg(long, env = "COUNTRY_SCRAPER_READ_BACK", default_value_t = true, action = ArgAction::Set)]
    pub read_back: bool,
}

impl Config {
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            url: self.url.clone(),
            read_back: self.read_back,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Standalone,
    Lambda,
}

impl RunMode {
    pub fn detect() -> Self {
        match std::env::var_os(LAMBDA_RUNTIME_ENV) {
            Some(v) if !v.is_empty() => RunMode::Lambda,
            _ => RunMode::Standalone,
        }
    }
}
