//! CLI entry point for townsquare.

pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::ENV_CONFIG_FILE;

/// townsquare client and proxy
#[derive(Parser, Debug)]
#[command(name = "townsquare", version, about = "townsquare API client and same-origin proxy")]
pub struct Cli {
    /// TOML config file layered under the environment
    #[arg(long, global = true, env = ENV_CONFIG_FILE)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the same-origin proxy server
    Serve(ServeArgs),
    /// Log in and call one API path, printing the JSON response
    Call(CallArgs),
}

/// Arguments for `townsquare serve`. Flags override config and env.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Backend API prefix, e.g. http://localhost:8080/api
    #[arg(long)]
    pub backend_url: Option<String>,
}

/// Arguments for `townsquare call`.
#[derive(Args, Debug)]
pub struct CallArgs {
    /// API path, e.g. /api/users/me
    pub path: String,

    /// HTTP method
    #[arg(short = 'X', long, default_value = "GET")]
    pub method: String,

    /// JSON request body
    #[arg(short, long)]
    pub data: Option<String>,

    /// Account email; without it the call is made without logging in
    #[arg(long, env = "TOWNSQUARE_EMAIL")]
    pub email: Option<String>,

    /// Account password
    #[arg(long, env = "TOWNSQUARE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
