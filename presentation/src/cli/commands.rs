//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use relay_domain::ParamMap;
use serde_json::Value;
use std::path::PathBuf;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, colored text
    Text,
    /// JSON output
    Json,
}

/// CLI arguments for tool-relay
#[derive(Parser, Debug)]
#[command(name = "tool-relay")]
#[command(author, version, about = "Resolve, recognize and dispatch tool calls without hallucinated results")]
#[command(long_about = r#"
tool-relay maps tool names and free-text requests onto a fixed set of
canonical tools and dispatches them to an executor. Every attempt ends in
exactly one outcome; nothing that failed is ever reported as done.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./relay.toml        Project-level config
3. ~/.config/tool-relay/config.toml   Global config

Example:
  tool-relay dispatch bash -p command="ls -la"
  tool-relay ask "скачай данные с https://example.com"
  tool-relay resolve Run-Command
  tool-relay self-test --concurrency 8
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Describe what would run instead of running it
    #[arg(long, global = true)]
    pub dry_run: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Dispatch a tool by name or alias
    Dispatch {
        /// Tool name, alias or spelling variant
        name: String,

        #[command(flatten)]
        args: CallArgs,

        /// Original request text to record with the call
        #[arg(long, value_name = "TEXT")]
        text: Option<String>,
    },

    /// Recognize the tool from free text and dispatch it
    Ask {
        /// The request, in English or Russian
        text: String,

        /// Skip recognition and use this tool
        #[arg(short, long, value_name = "NAME")]
        tool: Option<String>,

        /// Confidence a match needs before it is dispatched
        #[arg(long, value_name = "F")]
        min_confidence: Option<f64>,

        #[command(flatten)]
        args: ContextArgs,
    },

    /// Rank candidate tools for free text without dispatching
    Suggest {
        text: String,

        #[arg(short, long, default_value_t = 5)]
        limit: usize,
    },

    /// Show the canonical name, aliases or suggestions for a name
    Resolve { name: String },

    /// Hand a request to a named agent
    Agent {
        name: String,

        #[command(flatten)]
        args: CallArgs,
    },

    /// Run a named flow
    Flow {
        name: String,

        #[command(flatten)]
        args: CallArgs,
    },

    /// List capabilities the executor currently offers
    Tools,

    /// Dispatch every canonical name and alias and check where it lands
    SelfTest {
        /// Maximum calls in flight
        #[arg(long, value_name = "N")]
        concurrency: Option<usize>,

        /// Run against the configured executor instead of a dry run
        #[arg(long)]
        live: bool,
    },
}

/// Parameters and context for a call
#[derive(Args, Debug, Clone, Default)]
pub struct CallArgs {
    /// Call parameter (repeatable); the value is parsed as JSON when possible
    #[arg(short = 'p', long = "param", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub params: Vec<(String, Value)>,

    #[command(flatten)]
    pub context: ContextArgs,
}

impl CallArgs {
    pub fn params(&self) -> ParamMap {
        self.params.iter().cloned().collect()
    }

    pub fn context(&self) -> ParamMap {
        self.context.context()
    }
}

/// Call context entries
#[derive(Args, Debug, Clone, Default)]
pub struct ContextArgs {
    /// Context entry passed alongside the call (repeatable)
    #[arg(long = "context", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub entries: Vec<(String, Value)>,
}

impl ContextArgs {
    pub fn context(&self) -> ParamMap {
        self.entries.iter().cloned().collect()
    }
}

/// Parse `key=value`. `n=3` gives a number, `flag=true` a boolean and
/// `q=hello world` a string; later duplicates override earlier ones.
pub fn parse_key_value(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{}'", raw));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}
