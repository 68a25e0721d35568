//! Command line interface.
//!
//! - `assessment-intake` / `assessment-intake serve`: run the HTTP server
//! - `assessment-intake hash-password [PASSWORD]`: print an Argon2id hash

use std::io::BufRead;

use clap::{Parser, Subcommand};

/// Lead-intake assessment form service
#[derive(Parser, Debug)]
#[command(name = "assessment-intake")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Start the HTTP server (the default)
    Serve,

    /// Print an Argon2id hash for INTAKE_ADMIN_PASSWORD_HASH and exit
    HashPassword {
        /// Password to hash; read from stdin when omitted
        #[arg(env = "INTAKE_ADMIN_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    pub fn command(&self) -> &Command {
        self.command.as_ref().unwrap_or(&Command::Serve)
    }
}

/// Read one password line from `input`, without the trailing newline.
pub fn read_password(input: impl BufRead) -> Result<String, String> {
    let line = input
        .lines()
        .next()
        .ok_or("No password given on stdin")?
        .map_err(|e| format!("Failed to read password: {e}"))?;
    if line.is_empty() {
        return Err("Password must not be empty".to_string());
    }
    Ok(line)
}
