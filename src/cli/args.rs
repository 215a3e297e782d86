//! Command-line argument parsing for supportcrew
//!
//! Provides clap-based CLI with one subcommand per orchestration protocol.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// supportcrew - Multi-agent customer support orchestration
#[derive(Parser, Debug)]
#[command(name = "supportcrew")]
#[command(version)]
#[command(about = "Route, answer and escalate support requests with cooperating agents", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log filter (overrides logging.filter), e.g. "debug" or "supportcrew=trace"
    #[arg(long)]
    pub log_filter: Option<String>,

    /// Answer instantly instead of simulating tool latency
    #[arg(long)]
    pub no_latency: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Ask router and support agents in parallel
    Request {
        /// Customer query
        query: String,
    },

    /// Run the sequential escalation pipeline and open a ticket
    Escalate {
        /// Issue description
        issue: String,
    },

    /// Notify a customer
    Notify {
        /// Recipient user id
        user_id: String,

        /// Message body
        message: String,
    },

    /// Run every protocol once, pausing the session in between
    Demo {
        /// Seconds the session stays paused
        #[arg(long, default_value_t = 2)]
        pause_secs: u64,
    },

    /// Print session metrics for a fresh session
    Metrics,
}

impl Args {
    /// Effective log filter
    pub fn log_filter<'a>(&'a self, configured: &'a str) -> &'a str {
        self.log_filter.as_deref().unwrap_or(configured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request() {
        let args = Args::try_parse_from(["supportcrew", "request", "billing issue"]).unwrap();
        assert_eq!(
            args.command,
            Commands::Request {
                query: "billing issue".to_string()
            }
        );
        assert!(!args.no_latency);
    }

    #[test]
    fn test_parse_notify_with_flags() {
        let args = Args::try_parse_from([
            "supportcrew",
            "--no-latency",
            "--log-filter",
            "debug",
            "notify",
            "user-1",
            "hello",
        ])
        .unwrap();
        assert!(args.no_latency);
        assert_eq!(args.log_filter("info"), "debug");
        assert_eq!(
            args.command,
            Commands::Notify {
                user_id: "user-1".to_string(),
                message: "hello".to_string()
            }
        );
    }

    #[test]
    fn test_demo_default_pause() {
        let args = Args::try_parse_from(["supportcrew", "demo"]).unwrap();
        assert_eq!(args.command, Commands::Demo { pause_secs: 2 });
        assert_eq!(args.log_filter("warn"), "warn");
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Args::try_parse_from(["supportcrew"]).is_err());
    }
}
