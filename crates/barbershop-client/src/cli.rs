//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::output::OutputFormat;

/// barbershop - Book a haircut from the terminal
#[derive(Debug, Parser)]
#[command(name = "barbershop")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "BARBERSHOP_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    /// Log every normalization fallback to stderr as JSON lines
    #[arg(long, global = true)]
    pub trace: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Base URL of the booking backend
    #[arg(long, env = "BARBERSHOP_API_URL", global = true)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Maximum name length (truncated with ellipsis)
    #[arg(long, global = true)]
    pub max_name_length: Option<usize>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Returns the output format based on CLI flags.
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Tty
        }
    }
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List barbers
    Barbers,

    /// List services with price and duration
    Services,

    /// Show a barber's free slots
    ///
    /// Without --date, lists the days that still have free slots.
    Slots {
        /// Barber identifier
        #[arg(long, short)]
        barber: String,

        /// Day to show (YYYY-MM-DD or DD/MM/YYYY)
        #[arg(long, short)]
        date: Option<String>,
    },

    /// Book a slot
    Book {
        /// Barber identifier
        #[arg(long)]
        barber: String,

        /// Service identifier
        #[arg(long)]
        service: String,

        /// Time slot identifier
        #[arg(long)]
        slot: String,

        /// Client identifier (defaults to the logged-in user)
        #[arg(long)]
        client: Option<String>,

        /// Send identifiers even if they are not UUIDs
        #[arg(long)]
        no_validate: bool,
    },

    /// List reservations
    Reservas,

    /// Show today's agenda (barbers)
    Agenda,

    /// Mark an appointment as attended
    Attend {
        /// Appointment identifier
        id: String,
    },

    /// Cancel an appointment
    Cancel {
        /// Appointment identifier
        id: String,
    },

    /// Log in and store the session
    Login {
        /// Account email
        #[arg(long, short)]
        email: String,

        /// Password, or a reference: `env::VAR` or `pass::path/in/store`
        #[arg(long, short, env = "BARBERSHOP_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Log out and forget the session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Normalize a saved API response offline
    Normalize {
        /// What the file holds
        #[arg(value_enum)]
        kind: NormalizeKind,

        /// JSON file, or `-` for stdin
        file: PathBuf,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Response kinds accepted by `normalize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NormalizeKind {
    Barbers,
    Services,
    Slots,
    Reservas,
    Appointments,
    User,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}
