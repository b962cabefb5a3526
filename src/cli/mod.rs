//! CLI module for Matcha Accounts
//!
//! Provides subcommands:
//! - `serve`: HTTP server for account registration
//! - `migrate`: apply PostgreSQL migrations and exit

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

/// Matcha Accounts - user registration service
#[derive(Parser)]
#[command(name = "matcha-accounts")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Apply pending database migrations
    Migrate,
}
