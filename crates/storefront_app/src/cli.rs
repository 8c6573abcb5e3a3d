use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use storefront_core::SortDirection;
use storefront_engine::GraphqlSettings;
use storefront_logging::{LogDestination, LogSettings, LOG_FILE};

/// Browse the storefront catalog from the terminal.
#[derive(Debug, Parser)]
#[command(name = "storefront", version)]
pub struct Cli {
    /// GraphQL endpoint of the catalog.
    #[arg(long, default_value = "https://mock.shop/api")]
    pub endpoint: String,

    /// Products requested per page.
    #[arg(long, default_value_t = 8)]
    pub page_size: u32,

    /// Only list products of this collection id.
    #[arg(long)]
    pub collection: Option<String>,

    /// Title sort direction.
    #[arg(long, value_enum, default_value_t = Sort::Asc)]
    pub sort: Sort,

    /// Stop after this many pages.
    #[arg(long, default_value_t = 1)]
    pub pages: usize,

    /// Print the available collections instead of products.
    #[arg(long)]
    pub list_collections: bool,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Where log output goes.
    #[arg(long, value_enum, default_value_t = LogTarget::Terminal)]
    pub log: LogTarget,

    /// Log file used by `--log file` and `--log both`.
    #[arg(long, default_value = LOG_FILE)]
    pub log_file: PathBuf,

    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Sort {
    Asc,
    Desc,
}

impl From<Sort> for SortDirection {
    fn from(sort: Sort) -> Self {
        match sort {
            Sort::Asc => SortDirection::Asc,
            Sort::Desc => SortDirection::Desc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

impl Cli {
    pub fn level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    pub fn log_settings(&self) -> LogSettings {
        LogSettings {
            destination: self.log.into(),
            level: self.level(),
            file: self.log_file.clone(),
        }
    }

    pub fn settings(&self) -> GraphqlSettings {
        GraphqlSettings {
            endpoint: self.endpoint.clone(),
            page_size: self.page_size,
            request_timeout: Duration::from_secs(self.timeout_secs),
            ..GraphqlSettings::default()
        }
    }
}
