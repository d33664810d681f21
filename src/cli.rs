//! Command-line interface definition for chatstore
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands to list, inspect, extend, and delete chat sessions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::history::Role;

/// chatstore - durable chat-session history
///
/// Inspect and edit the chat history the app keeps on this device.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatstore")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: String,

    /// Override the storage path (sled database or file directory)
    #[arg(long)]
    pub storage_path: Option<PathBuf>,

    /// Return storage and decode failures instead of swallowing them
    #[arg(long)]
    pub strict: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for chatstore
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List stored sessions, newest first
    List,

    /// Print the transcript of one session
    Show {
        /// Session id
        id: String,
    },

    /// Open a session, creating it with the greeting if it does not exist
    Open {
        /// Session id; a new epoch-millisecond id is generated when omitted
        #[arg(long)]
        id: Option<String>,
    },

    /// Append one message to a session
    Append {
        /// Session id
        id: String,

        /// Author of the message
        #[arg(short, long, value_enum, default_value = "user")]
        role: RoleArg,

        /// Message text
        text: String,
    },

    /// Delete a session
    Delete {
        /// Session id
        id: String,
    },

    /// Remove the whole chat history
    Clear,
}

/// Message author as accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleArg {
    /// Person using the app
    User,
    /// Remote endpoint
    Bot,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::User => Role::User,
            RoleArg::Bot => Role::Bot,
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
