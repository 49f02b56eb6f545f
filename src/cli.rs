//! Command-line interface definition for Mikoko Guardian
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for chat, one-shot prompts and direct tool use.

use clap::{Parser, Subcommand};

/// Mikoko Guardian - mangrove conservation assistant for coastal Kenya
///
/// Ask about mangrove species, conservation sites, blue carbon and
/// restoration planning, either through the agent or directly.
#[derive(Parser, Debug, Clone)]
#[command(name = "mikoko")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Override the model from config
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Mikoko Guardian
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start interactive chat with the Mikoko Guardian agent
    Chat,

    /// Send a single prompt to the agent and print the answer
    Run {
        /// Prompt to execute
        #[arg(short, long)]
        prompt: String,
    },

    /// Identify a mangrove species by common, Swahili or scientific name
    Species {
        /// Species name to look up
        #[arg(required_unless_present = "list")]
        name: Option<String>,

        /// List all known species
        #[arg(short, long)]
        list: bool,

        /// Print the raw JSON report
        #[arg(long)]
        json: bool,
    },

    /// Show information about a coastal conservation site
    Site {
        /// Site name to look up
        #[arg(required_unless_present = "list")]
        location: Option<String>,

        /// List all known sites
        #[arg(short, long)]
        list: bool,

        /// Print the raw JSON report
        #[arg(long)]
        json: bool,
    },

    /// Estimate carbon storage for an area of mangrove forest
    Carbon {
        /// Area in hectares
        area: f64,

        /// Forest maturity: young, mature or old-growth
        #[arg(short, long)]
        age: Option<String>,

        /// Print the raw JSON report
        #[arg(long)]
        json: bool,
    },

    /// Build a restoration plan for a site
    Plan {
        /// Site to restore
        location: String,

        /// Area to restore in hectares
        #[arg(short, long)]
        area: Option<f64>,

        /// Print the raw JSON report
        #[arg(long)]
        json: bool,
    },

    /// Ask the model a general mangrove question
    Ask {
        /// Question text
        question: String,
    },

    /// Show the resolved configuration
    Config,
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: "config/config.yaml".to_string(),
            verbose: false,
            model: None,
            command: Commands::Chat,
        }
    }
}
