use clap::{Args, Parser, Subcommand};

/// Command-line interface definition for webpunch
#[derive(Parser)]
#[command(
    name = "webpunch",
    version = env!("CARGO_PKG_VERSION"),
    about = "Punch-clock client: punch in/out, sync with the punch store and review worked hours",
    long_about = None
)]
pub struct Cli {
    /// Override local database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Override punch store path
    #[arg(global = true, long = "store")]
    pub store: Option<String>,

    /// Treat the punch store as unreachable
    #[arg(global = true, long = "offline")]
    pub offline: bool,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Pin the clock to a local time (YYYY-MM-DD HH:MM)
    #[arg(global = true, long = "now", hide = true)]
    pub now: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
pub struct PunchArgs {
    /// Latitude where the punch was made
    #[arg(long = "lat", requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude where the punch was made
    #[arg(long = "lon", requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// Punch time instead of now (YYYY-MM-DD HH:MM, local time)
    #[arg(long = "at")]
    pub at: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the configuration, the local database and the punch store
    Init,

    /// Manage the configuration file (view, check or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Punch in
    In(PunchArgs),

    /// Punch out, closing the most recent open session
    Out(PunchArgs),

    /// Push pending changes and reconcile with the punch store
    Sync,

    /// List punches, sessions or worked-time periods
    List {
        #[arg(long = "punches", group = "view", help = "List every punch")]
        punches: bool,

        #[arg(long = "sessions", group = "view", help = "List work sessions")]
        sessions: bool,

        #[arg(long = "days", group = "view", help = "Worked time per day")]
        days: bool,

        #[arg(long = "weeks", group = "view", help = "Worked time per week")]
        weeks: bool,

        #[arg(
            long = "pay-periods",
            group = "view",
            help = "Worked time per pay period (default)"
        )]
        pay_periods: bool,

        #[arg(long = "json", help = "Print JSON instead of a table")]
        json: bool,
    },

    /// Flag a punch for review
    Flag {
        /// Punch id
        id: String,

        #[arg(long = "unset", help = "Remove the flag")]
        unset: bool,
    },

    /// Delete a punch
    Del {
        /// Punch id
        id: String,
    },

    /// Show open sessions and today's totals
    Status,

    /// Forget pending local changes and the cached punches
    Reset,

    /// Print or manage the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}
