//! CLI module for the dandi gateway

pub mod serve;

use clap::{Parser, Subcommand};

/// Dandi Gateway - API key management and GitHub repository summarization
#[derive(Parser)]
#[command(name = "dandi-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Serve,
}
