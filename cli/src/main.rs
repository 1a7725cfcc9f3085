use clap::{Parser, Subcommand};

mod commands;
mod util;

use util::LogFormat;

#[derive(Parser)]
#[command(
    name = "alertchan",
    version,
    about = "alertchan: expand, flatten and validate alert notification channel definitions"
)]
struct Cli {
    /// Log output format (logs go to stderr)
    #[arg(long, env = "ALERTCHAN_LOG_FORMAT", value_enum, default_value = "json", global = true)]
    log_format: LogFormat,

    /// Print single-line JSON instead of pretty output
    #[arg(long, global = true)]
    compact: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the channel to submit from a declarative resource
    Expand {
        /// Resource JSON file (use '-' for stdin)
        #[arg(long, short = 'f')]
        file: String,
    },
    /// Write a backend channel record back into a declarative resource
    Flatten {
        /// Channel record JSON file as returned by the backend
        #[arg(long)]
        record: String,
        /// Resource JSON file holding current attributes and persisted state
        #[arg(long)]
        resource: String,
        /// Also set the resource id and policy_ids from the record
        #[arg(long)]
        data_source: bool,
        /// Treat the read as an import regardless of persisted state
        #[arg(long)]
        import: bool,
    },
    /// Check a channel record's configuration before submission
    Validate {
        /// Channel record JSON file (use '-' for stdin)
        #[arg(long)]
        record: String,
    },
    /// Print the OpenAPI schemas of the channel record types
    Schema,
}

fn main() {
    // Load .env if present
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    util::init_tracing(cli.log_format);

    let code = match cli.command {
        Commands::Expand { file } => commands::expand::run(&file, cli.compact),
        Commands::Flatten {
            record,
            resource,
            data_source,
            import,
        } => commands::flatten::run(&record, &resource, data_source, import, cli.compact),
        Commands::Validate { record } => commands::validate::run(&record, cli.compact),
        Commands::Schema => commands::schema::run(cli.compact),
    };

    std::process::exit(code);
}
