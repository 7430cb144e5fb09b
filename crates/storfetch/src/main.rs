//! storfetch - download SHA-256 named objects from stor
//!
//! Reads text from stdin, picks out every SHA-256 hex digest and downloads
//! the matching objects into a directory.
//!
//! ```text
//! echo EE2BF0BFD365EBF829F8D07B197B7A15F39760CD14C6D3BFDFBAD2B145CB72B8 | storfetch -u http://stor.example.com .
//! ```

mod extract;
mod summary;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use storfetch_fetch::{
    DEFAULT_TIMEOUT, Engine, EngineOptions, Endpoints, Naming, PathTemplate, ReqwestClient, Secondary,
    parse_base_url,
};
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use crate::extract::DigestLines;
use crate::summary::Summary;

#[derive(Parser, Debug)]
#[command(name = "storfetch", version, about)]
struct Cli {
    /// Directory for downloaded files
    download_dir: PathBuf,

    /// Storage URL
    #[arg(short = 'u', long)]
    storage: String,

    /// Max concurrent downloads
    #[arg(long, default_value_t = storfetch_fetch::DEFAULT_WORKERS)]
    max: usize,

    /// Hash downloads without writing them anywhere
    #[arg(long)]
    devnull: bool,

    /// More talkative output
    #[arg(short, long)]
    verbose: bool,

    /// Connection timeout in seconds, -1 disables it
    #[arg(long, default_value_t = 30, allow_negative_numbers = true, value_parser = clap::value_parser!(i64).range(-1..))]
    timeout: i64,

    /// Log and print the statistics as JSON
    #[arg(long)]
    json: bool,

    /// Exponential retry start delay in milliseconds
    #[arg(long, default_value_t = 100)]
    delay: u64,

    /// Count of download attempts per object
    #[arg(long, default_value_t = storfetch_fetch::DEFAULT_RETRY_ATTEMPTS)]
    attempts: u32,

    /// Downloaded file suffix, e.g. '.dat' gives SHA.dat
    #[arg(long, default_value = "")]
    suffix: String,

    /// Upper case file names (not applied to the suffix)
    #[arg(long)]
    upper: bool,

    /// Secondary endpoint tried before the storage, e.g. a bucket URL
    #[arg(long)]
    secondary: Option<String>,

    /// Object path on the secondary endpoint
    #[arg(long, default_value = storfetch_fetch::DEFAULT_TEMPLATE)]
    secondary_template: String,
}

impl Cli {
    fn options(&self) -> EngineOptions {
        EngineOptions::default()
            .workers(self.max)
            .timeout(timeout_from_secs(self.timeout))
            .retry_delay(Duration::from_millis(self.delay))
            .max_attempts(self.attempts)
            .discard(self.devnull)
            .naming(Naming::default().upper_case(self.upper).suffix(self.suffix.as_str()))
    }

    fn endpoints(&self) -> anyhow::Result<Endpoints> {
        let primary = parse_base_url(&self.storage).context("invalid --storage")?;
        let mut endpoints = Endpoints::new(primary);

        if let Some(secondary) = &self.secondary {
            let base = parse_base_url(secondary).context("invalid --secondary")?;
            let template = PathTemplate::parse(&self.secondary_template).context("invalid --secondary-template")?;
            endpoints = endpoints.with_secondary(Secondary::with_template(base, template));
        }
        Ok(endpoints)
    }
}

/// `-1` disables the timeout and `0` keeps the default.
fn timeout_from_secs(secs: i64) -> Option<Duration> {
    match secs {
        0 => Some(DEFAULT_TIMEOUT),
        secs if secs < 0 => None,
        secs => Some(Duration::from_secs(secs.unsigned_abs())),
    }
}

fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json);

    let start = Instant::now();
    let options = cli.options();
    let client = ReqwestClient::new(options.timeout, options.workers).context("failed to build HTTP client")?;
    let mut engine = Engine::start(client, cli.endpoints()?, &cli.download_dir, options)?;

    let mut lines = DigestLines::new(BufReader::new(tokio::io::stdin()));
    while let Some(digests) = lines.next_line().await {
        for digest in digests {
            engine.submit(digest).await?;
        }
    }

    let report = engine.drain().await?;
    let summary = Summary::new(&report, start.elapsed());
    summary.log();
    if cli.json {
        println!("{}", summary.to_json()?);
    }

    Ok(if summary.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
