use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use feed_engine::DEFAULT_ENDPOINT;

pub const DEFAULT_SETTINGS_DIR: &str = ".newsfeed";

#[derive(Parser, Debug)]
#[command(name = "newsfeed", version, about = "Search-driven, infinitely scrolling news feed")]
pub struct Args {
    #[arg(long, default_value = DEFAULT_ENDPOINT, help = "Search API endpoint")]
    pub endpoint: String,
    #[arg(long, help = "API key; stored in the settings file for later runs")]
    pub api_key: Option<String>,
    #[arg(long, default_value = DEFAULT_SETTINGS_DIR, help = "Directory holding settings.ron")]
    pub settings_dir: PathBuf,
    #[arg(long, value_enum, default_value_t = LogTarget::File)]
    pub log: LogTarget,
    #[arg(short, long, help = "Log at debug level")]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
}
