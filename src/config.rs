/// Configuration management for the complaint server.
/// Handles command-line argument parsing and config structure.
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "Complaint Server")]
#[command(about = "Complaint management backend", long_about = None)]
pub struct Config {
    /// Server port (default: 4000)
    #[arg(long, default_value = "4000")]
    pub port: u16,

    /// SQLite database file path (default: complaints.db)
    #[arg(long, default_value = "complaints.db")]
    pub database: PathBuf,

    /// Shared secret used to sign and verify bearer tokens
    #[arg(long, env = "JWT_SECRET", default_value = "secret")]
    pub jwt_secret: String,

    /// PID file path (optional) - write server PID to this file on startup
    #[arg(long)]
    pub pidfile: Option<PathBuf>,
}

impl Config {
    /// Parse command-line arguments into Config
    pub fn from_args() -> Self {
        Config::parse()
    }
}
