//! Configuration from command line arguments and optional config files.

use crate::core::Difficulty;
use crate::error::{Error, Result};
use crate::worker::DEFAULT_BATCH_SIZE;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which mining path drives the demo chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MinerKind {
    /// Mine synchronously on the current thread.
    Inline,
    /// Mine on a blocking worker with cancellation and progress reporting.
    Worker,
}

/// Log verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Plain,
    Json,
}

/// Application configuration.
///
/// Every option can come from the command line or from a YAML/JSON config
/// file; command line values win over file values.
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "powchain", version, about = "Proof-of-work blockchain demo")]
pub struct Config {
    /// Leading zero bits required of every block hash (0-255)
    #[arg(short, long)]
    pub difficulty: Option<u32>,

    /// Number of blocks to mine after the genesis block
    #[arg(short, long)]
    pub blocks: Option<usize>,

    /// Raise the difficulty by one every N blocks (0 disables stepping)
    #[arg(long)]
    pub difficulty_step: Option<usize>,

    /// Payload prefix for generated blocks
    #[arg(long)]
    pub payload_prefix: Option<String>,

    /// Mining strategy
    #[arg(short, long, value_enum)]
    pub miner: Option<MinerKind>,

    /// Nonces scanned per batch on the worker path
    #[arg(long)]
    pub batch_size: Option<u64>,

    /// Log level
    #[arg(short, long, value_enum, env = "POWCHAIN_LOG_LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Log output format
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Print the resolved configuration and exit
    #[arg(long)]
    #[serde(default)]
    pub print_config: bool,

    /// Print the finished chain as JSON instead of the text summary
    #[arg(long)]
    #[serde(default)]
    pub json: bool,

    /// Path to a YAML or JSON config file
    #[arg(short, long)]
    #[serde(skip)]
    pub config_file: Option<PathBuf>,
}

impl Config {
    /// Parse the command line and merge in the config file when given.
    pub async fn load() -> Result<Self> {
        let mut config = Self::parse();
        if let Some(path) = config.config_file.clone() {
            let file = Self::from_file(&path).await?;
            config.merge_with_file(file);
        }
        config.validate()?;
        Ok(config)
    }

    /// Read a configuration file, selecting the format by extension.
    pub async fn from_file(path: &Path) -> Result<Self> {
        let contents = tokio::fs::read_to_string(path).await?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(serde_json::from_str(&contents)?),
            Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&contents)?),
            _ => Err(Error::config(format!(
                "unsupported config file format: {}",
                path.display()
            ))),
        }
    }

    /// Fill unset options from a config file; command line values win.
    fn merge_with_file(&mut self, file: Config) {
        if self.difficulty.is_none() {
            self.difficulty = file.difficulty;
        }
        if self.blocks.is_none() {
            self.blocks = file.blocks;
        }
        if self.difficulty_step.is_none() {
            self.difficulty_step = file.difficulty_step;
        }
        if self.payload_prefix.is_none() {
            self.payload_prefix = file.payload_prefix;
        }
        if self.miner.is_none() {
            self.miner = file.miner;
        }
        if self.batch_size.is_none() {
            self.batch_size = file.batch_size;
        }
        if self.log_level.is_none() {
            self.log_level = file.log_level;
        }
        if self.log_format.is_none() {
            self.log_format = file.log_format;
        }
        self.print_config = self.print_config || file.print_config;
        self.json = self.json || file.json;
    }

    /// Reject combinations the demo cannot run with.
    pub fn validate(&self) -> Result<()> {
        // Construction checks the static range.
        let base = Difficulty::new(self.difficulty())?;

        if self.batch_size() == 0 {
            return Err(Error::config("batch size must be greater than zero"));
        }

        // Stepping must stay in range across the whole run.
        let step = self.difficulty_step();
        if step != 0 && self.blocks() > 0 {
            let bumps = ((self.blocks() - 1) / step + 1) as u32;
            Difficulty::new(base.value() + bumps).map_err(|_| {
                Error::config(format!(
                    "difficulty {} with step {} exceeds {} over {} blocks",
                    base,
                    step,
                    Difficulty::MAX,
                    self.blocks()
                ))
            })?;
        }

        Ok(())
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty.unwrap_or(8)
    }

    pub fn blocks(&self) -> usize {
        self.blocks.unwrap_or(3)
    }

    pub fn difficulty_step(&self) -> usize {
        self.difficulty_step.unwrap_or(0)
    }

    pub fn payload_prefix(&self) -> &str {
        self.payload_prefix
            .as_deref()
            .unwrap_or("this is the block")
    }

    pub fn miner(&self) -> MinerKind {
        self.miner.unwrap_or(MinerKind::Inline)
    }

    pub fn batch_size(&self) -> u64 {
        self.batch_size.unwrap_or(DEFAULT_BATCH_SIZE)
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level.unwrap_or(LogLevel::Info)
    }

    pub fn log_format(&self) -> LogFormat {
        self.log_format.unwrap_or(LogFormat::Plain)
    }
}
