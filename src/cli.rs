//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// Sharelinker - sharing captions, referral links and click tracking
#[derive(Parser, Debug)]
#[command(name = "sharelinker")]
#[command(version)]
#[command(about = "Sharing captions, referral links and click tracking service", long_about = None)]
pub struct Cli {
    /// Configuration file path (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server and the scheduled jobs (default)
    Serve,

    /// Run a scheduled job once and exit
    Job {
        #[command(subcommand)]
        job: JobCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobCommands {
    /// Delete sharing events older than the retention window
    Cleanup,
    /// Generate the weekly sharing report
    Report,
}

/// Configuration management commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    /// 未指定子命令时默认启动服务
    pub fn command_or_default(self) -> Commands {
        self.command.unwrap_or(Commands::Serve)
    }
}
