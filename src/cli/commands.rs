//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "aura")]
#[command(about = "AURA - Borrower settlement negotiation engine", long_about = None)]
pub struct Cli {
    /// JSON file with seed defaults and policy constants
    #[arg(short, long, env = "AURA_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a scripted negotiation over the demo borrowers
    Demo,

    /// Show the policy offer for a borrower profile
    Decide {
        /// Funds available now
        #[arg(short, long)]
        wallet: u64,

        /// Amount overdue
        #[arg(short, long)]
        missed: u64,

        /// Borrower display name
        #[arg(short, long, default_value = "Borrower")]
        name: String,
    },

    /// Drive a negotiation session interactively from stdin
    Session,
}

/// One line of the interactive session
#[derive(Parser, Debug, PartialEq)]
#[command(no_binary_name = true, disable_help_flag = true)]
pub struct SessionLine {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum SessionCommand {
    /// Send an offer (policy defaults unless overridden)
    Start {
        user_id: String,

        /// Offer amount override
        #[arg(short, long)]
        offer: Option<u64>,

        /// Expiry window override in days
        #[arg(short, long)]
        expiry: Option<u32>,
    },

    /// Accept the current offer
    Accept { user_id: String },

    /// Submit a borrower counter-offer as free text
    Counter {
        user_id: String,

        #[arg(trailing_var_arg = true, num_args = 1.., allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// Show the policy decision for a borrower
    Decide { user_id: String },

    /// Offer every eligible pending borrower
    Auto,

    /// Clear the session and reseed the demo borrowers
    Reset,

    /// Select the borrower shown in the chat view
    Select { user_id: String },

    /// Show a borrower's record and recent chat
    Show { user_id: String },

    /// Show the session summary
    Summary,

    /// End the session
    Quit,
}

impl SessionLine {
    /// Parse a whitespace-separated command line
    pub fn parse_line(line: &str) -> Result<Self, clap::Error> {
        Self::try_parse_from(line.split_whitespace())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_start_with_overrides() {
        let line = SessionLine::parse_line("start USR1001 --offer 750 -e 10").unwrap();
        assert_eq!(
            line.command,
            SessionCommand::Start {
                user_id: "USR1001".to_string(),
                offer: Some(750),
                expiry: Some(10),
            }
        );
    }

    #[test]
    fn test_parse_counter_text() {
        let line = SessionLine::parse_line("counter USR1001 I can only give ₹300").unwrap();
        match line.command {
            SessionCommand::Counter { user_id, text } => {
                assert_eq!(user_id, "USR1001");
                assert_eq!(text.join(" "), "I can only give ₹300");
            }
            other => panic!("Wrong command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_unknown_command() {
        assert!(SessionLine::parse_line("refund USR1001").is_err());
    }

    #[test]
    fn test_cli_decide() {
        let cli = Cli::try_parse_from(["aura", "decide", "--wallet", "2000", "--missed", "3000"])
            .unwrap();
        match cli.command {
            Commands::Decide { wallet, missed, name } => {
                assert_eq!(wallet, 2000);
                assert_eq!(missed, 3000);
                assert_eq!(name, "Borrower");
            }
            other => panic!("Wrong command: {:?}", other),
        }
    }
}
