use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tally_core::{DateRange, TransactionDraft, TransactionFilter, TransactionType, current_year, parse_iso_date};
use tally_ingest::{CsvDialect, ExportFormat};
use tally_sync::ImportMode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod context;
mod render;
mod state;

use commands::DraftPatch;
use context::AppContext;

#[derive(Parser, Debug)]
#[command(
    name = "tally",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TALLY_BUILD_SHA"), ")"),
    about = "Track income and expenses from the terminal"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(flatten)]
    Ledger(LedgerCommand),

    /// Print the recommended categories
    Categories,

    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Commands that read or write the transaction store.
#[derive(Subcommand, Debug)]
enum LedgerCommand {
    /// Record a new transaction
    Add {
        /// income or expense
        #[arg(long = "type")]
        kind: String,
        #[arg(long)]
        amount: String,
        #[arg(long)]
        category: String,
        #[arg(long, default_value = "")]
        description: String,
        /// YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Change fields of an existing transaction
    Edit {
        id: String,
        #[arg(long = "type")]
        kind: Option<String>,
        #[arg(long)]
        amount: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        date: Option<String>,
    },

    Delete {
        id: String,
    },

    /// Show transaction history, newest first
    List {
        #[command(flatten)]
        filter: FilterArgs,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Totals, category breakdown and monthly buckets
    Summary {
        /// Year for the monthly buckets (default: current year)
        #[arg(long)]
        year: Option<i32>,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Write all transactions to a file
    Export {
        #[arg(long, value_enum, default_value_t = FormatArg::Csv)]
        format: FormatArg,
        /// lenient or rfc4180 (default: from config)
        #[arg(long)]
        dialect: Option<CsvDialect>,
        /// Output path (default: tally-YYYY-MM-DD.<ext>)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Import a CSV file or JSON backup
    Import {
        file: PathBuf,
        /// Skip validation and accept every structurally valid row
        #[arg(long)]
        trust: bool,
        #[arg(long)]
        dialect: Option<CsvDialect>,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config.toml if none exists
    Init,
    /// Print the effective configuration
    Show,
}

#[derive(clap::Args, Debug, Default)]
struct FilterArgs {
    /// income or expense
    #[arg(long = "type")]
    kind: Option<String>,
    #[arg(long)]
    category: Option<String>,
    /// all, today, week, month or year
    #[arg(long)]
    range: Option<DateRange>,
    /// Start date (inclusive), YYYY-MM-DD
    #[arg(long)]
    from: Option<String>,
    /// End date (inclusive), YYYY-MM-DD
    #[arg(long)]
    to: Option<String>,
}

impl FilterArgs {
    fn build(self, ctx: &AppContext) -> Result<TransactionFilter> {
        let mut filter = TransactionFilter::new();
        if let Some(range) = self.range {
            filter = filter.with_range(range, ctx.today());
        }
        if let Some(kind) = self.kind {
            let kind = TransactionType::parse_strict(&kind).with_context(|| format!("unknown type: {kind}"))?;
            filter = filter.with_kind(kind);
        }
        if let Some(category) = self.category {
            filter = filter.with_category(category);
        }
        if let Some(from) = self.from {
            filter = filter.with_start(parse_iso_date(&from).with_context(|| format!("invalid --from date: {from}"))?);
        }
        if let Some(to) = self.to {
            filter = filter.with_end(parse_iso_date(&to).with_context(|| format!("invalid --to date: {to}"))?);
        }
        Ok(filter)
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Json => ExportFormat::Json,
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    match cli.command {
        Command::Ledger(command) => {
            let ctx = AppContext::open(config::load_config()?)?;
            run(&ctx, command)
        }
        Command::Categories => {
            print!("{}", render::category_lists());
            Ok(())
        }
        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(),
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                println!("# {}", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
                Ok(())
            }
        },
    }
}

fn run(ctx: &AppContext, command: LedgerCommand) -> Result<()> {
    match command {
        LedgerCommand::Add {
            kind,
            amount,
            category,
            description,
            date,
        } => {
            let date = date.unwrap_or_else(|| ctx.today().format("%Y-%m-%d").to_string());
            let draft = TransactionDraft::new(kind, amount, category, description, date);
            let id = commands::add(ctx, &draft)?;
            println!("Added {id}");
        }

        LedgerCommand::Edit {
            id,
            kind,
            amount,
            category,
            description,
            date,
        } => {
            let patch = DraftPatch {
                kind,
                amount,
                category,
                description,
                date,
            };
            commands::edit(ctx, &id, patch)?;
            println!("Updated {id}");
        }

        LedgerCommand::Delete { id } => {
            commands::delete(ctx, &id)?;
            println!("Deleted {id}");
        }

        LedgerCommand::List { filter, json } => {
            let filter = filter.build(ctx)?;
            let txns = commands::list(ctx, &filter)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&txns)?);
            } else {
                print!("{}", render::transaction_table(&txns, ctx.currency(), filter.is_active()));
            }
        }

        LedgerCommand::Summary { year, filter } => {
            let year = year.unwrap_or_else(|| current_year(ctx.tz));
            let filter = filter.build(ctx)?;
            let view = commands::summary(ctx, filter, year);
            print!("{}", render::summary_report(ctx.session.greeting_name(), &view, ctx.currency()));
        }

        LedgerCommand::Export { format, dialect, out } => {
            let dialect = dialect.unwrap_or(ctx.config.import.dialect);
            match commands::export_to(ctx, format.into(), dialect, out)? {
                Some(path) => println!("Exported to {}", path.display()),
                None => println!("No transactions to export"),
            }
        }

        LedgerCommand::Import { file, trust, dialect } => {
            let mode = if trust { ImportMode::TrustFile } else { ctx.config.import.mode };
            let dialect = dialect.unwrap_or(ctx.config.import.dialect);
            let report = commands::import_from(ctx, &file, mode, dialect)?;
            print!("{}", render::import_report(&report));
        }
    }

    Ok(())
}
