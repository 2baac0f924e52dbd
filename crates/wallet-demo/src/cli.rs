#![forbid(unsafe_code)]

//! Command-line argument parsing for the wallet demo.
//!
//! Parses args manually to keep the binary lean. Supports environment
//! variable overrides via the `WALLET_DEMO_*` prefix; explicit flags win.

use std::env;
use std::path::PathBuf;
use std::process;

use wallet_engine::WalletConfig;

use crate::error::{DemoError, Result};

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
Wallet Demo: a grid of passes you can search, reorder, and shred

USAGE:
    wallet-demo [OPTIONS]

OPTIONS:
    --cards=N            Number of generated cards (default: 50)
    --seed=N             Generator seed (default: 24301)
    --stack-scroll=N     Rows scrolled when switching to stack mode (default: 4)
    --log=PATH           Write logs to PATH
    --no-mouse           Disable mouse event capture
    --exit-after-ms=N    Quit after N milliseconds (for testing)
    --help, -h           Show this help message
    --version, -V        Show version

KEYBINDINGS:
    drag a card          Reorder
    click a card         Open details (Esc or click outside to close)
    click ✕              Shred the card
    type                 Search; Backspace edits, Esc clears
    Tab                  Toggle grid / stack
    Del                  Shred the hovered card
    ↑ ↓ PgUp PgDn wheel  Scroll
    Ctrl+C / Ctrl+Q      Quit

ENVIRONMENT VARIABLES:
    WALLET_DEMO_CARDS          Override --cards
    WALLET_DEMO_SEED           Override --seed
    WALLET_DEMO_LOG            Override --log
    RUST_LOG                   Log filter directives (default: info)
    WALLET_DEMO_EXIT_AFTER_MS  Override --exit-after-ms";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    pub cards: u32,
    pub seed: u64,
    pub stack_scroll: i32,
    /// Log file; logging is off without one.
    pub log: Option<PathBuf>,
    /// Whether mouse events are enabled.
    pub mouse: bool,
    /// Auto-exit after this many milliseconds (0 = disabled).
    pub exit_after_ms: u64,
}

/// What the binary should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(Opts),
    Help,
    Version,
}

impl Default for Opts {
    fn default() -> Self {
        let config = WalletConfig::default();
        Self {
            cards: config.card_count,
            seed: config.seed,
            stack_scroll: config.stack_scroll,
            log: None,
            mouse: true,
            exit_after_ms: 0,
        }
    }
}

impl Opts {
    /// Parse the process arguments and environment, printing help or the
    /// version and exiting when asked to.
    pub fn parse() -> Self {
        let args: Vec<String> = env::args().skip(1).collect();
        match Self::from_sources(&args, |key| env::var(key).ok()) {
            Ok(Command::Run(opts)) => opts,
            Ok(Command::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Command::Version) => {
                println!("wallet-demo {VERSION}");
                process::exit(0);
            }
            Err(err) => {
                eprintln!("{err}");
                process::exit(1);
            }
        }
    }

    /// Parse `args` with `env` as the environment lookup.
    ///
    /// Unparseable environment values are ignored; unparseable flags are an
    /// error.
    pub fn from_sources(args: &[String], env: impl Fn(&str) -> Option<String>) -> Result<Command> {
        let mut opts = Self::default();

        if let Some(n) = env("WALLET_DEMO_CARDS").and_then(|v| v.parse().ok()) {
            opts.cards = n;
        }
        if let Some(n) = env("WALLET_DEMO_SEED").and_then(|v| v.parse().ok()) {
            opts.seed = n;
        }
        if let Some(path) = env("WALLET_DEMO_LOG").filter(|v| !v.is_empty()) {
            opts.log = Some(PathBuf::from(path));
        }
        if let Some(n) = env("WALLET_DEMO_EXIT_AFTER_MS").and_then(|v| v.parse().ok()) {
            opts.exit_after_ms = n;
        }

        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Command::Help),
                "--version" | "-V" => return Ok(Command::Version),
                "--no-mouse" => opts.mouse = false,
                other => {
                    if let Some(val) = other.strip_prefix("--cards=") {
                        opts.cards = number("--cards", val)?;
                    } else if let Some(val) = other.strip_prefix("--seed=") {
                        opts.seed = number("--seed", val)?;
                    } else if let Some(val) = other.strip_prefix("--stack-scroll=") {
                        opts.stack_scroll = number("--stack-scroll", val)?;
                    } else if let Some(val) = other.strip_prefix("--exit-after-ms=") {
                        opts.exit_after_ms = number("--exit-after-ms", val)?;
                    } else if let Some(val) = other.strip_prefix("--log=") {
                        opts.log = Some(PathBuf::from(val));
                    } else {
                        return Err(DemoError::Config(format!(
                            "unknown argument '{other}' (try --help)"
                        )));
                    }
                }
            }
        }
        Ok(Command::Run(opts))
    }

    /// Engine configuration for these options.
    #[must_use]
    pub fn config(&self) -> WalletConfig {
        WalletConfig::default()
            .card_count(self.cards)
            .seed(self.seed)
            .stack_scroll(self.stack_scroll)
    }
}

fn number<T: std::str::FromStr>(flag: &str, val: &str) -> Result<T> {
    val.parse()
        .map_err(|_| DemoError::Config(format!("{flag} expects a number, got '{val}'")))
}
