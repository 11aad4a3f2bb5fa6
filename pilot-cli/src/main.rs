use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use pilot_core::{
    FinancialProjectionEngine, ScenarioAdjustments, ScenarioBaseline, depletion_date,
    expense_breakdown,
};
use serde_json::json;
use std::path::PathBuf;

mod config;
mod logging;
mod report;
mod state;
mod sync;

use config::Config;
use state::CompanyStore;
use sync::{SyncOptions, SyncOutcome};

#[derive(Parser, Debug)]
#[command(
    name = "founderpilot",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("FOUNDERPILOT_BUILD_SHA"), ")"),
    about = "Runway, burn rate and insights from a startup's ledger"
)]
struct Cli {
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ingest a ledger CSV, recompute the snapshot and replace the insight batch
    Sync {
        #[arg(long)]
        company: String,

        /// Ledger export (id,date,description,amount,kind,category,recurring)
        #[arg(long)]
        csv: PathBuf,

        /// MRR growth in percent (default: computed from recurring revenue)
        #[arg(long)]
        growth: Option<f64>,

        /// Months the export covers (default: config metrics.window_months)
        #[arg(long)]
        window: Option<u32>,

        /// Abort if any ledger row is rejected
        #[arg(long)]
        strict: bool,
    },

    /// Show the stored snapshot
    Snapshot {
        #[arg(long)]
        company: String,
    },

    /// List stored insights
    Insights {
        #[arg(long)]
        company: String,

        /// Include resolved insights
        #[arg(long)]
        all: bool,
    },

    /// Mark an insight as resolved
    Resolve {
        #[arg(long)]
        company: String,

        insight_id: String,
    },

    /// Month-by-month cash projection
    Project {
        #[arg(long)]
        company: String,

        /// Override starting cash
        #[arg(long)]
        cash: Option<f64>,

        /// Override monthly burn
        #[arg(long)]
        burn: Option<f64>,
    },

    /// What-if scenario against the stored snapshot
    Simulate {
        #[arg(long)]
        company: String,

        /// Revenue increase, 0-100 (%)
        #[arg(long, default_value_t = 0.0)]
        revenue_increase: f64,

        /// Cost reduction, 0-100 (%)
        #[arg(long, default_value_t = 0.0)]
        cost_reduction: f64,

        /// One-time additional funding
        #[arg(long, default_value_t = 0.0)]
        funding: f64,
    },

    /// Expense totals by category for a ledger CSV
    Breakdown {
        #[arg(long)]
        csv: PathBuf,
    },

    /// Config file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config.toml if none exists
    Init,
    /// Print the effective config
    Show,
}

struct App {
    home: PathBuf,
    config: Config,
    store: CompanyStore,
    json: bool,
}

impl App {
    fn load(json: bool) -> Result<Self> {
        let home = state::ensure_home()?;
        let config = config::load_config(&home)?;
        let store = CompanyStore::new(&home);
        Ok(Self {
            home,
            config,
            store,
            json,
        })
    }

    fn engine(&self) -> FinancialProjectionEngine {
        FinancialProjectionEngine::new(self.config.engine_config())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let app = App::load(cli.json)?;
    tracing::debug!(home = %app.home.display(), "loaded config");

    match cli.command {
        Command::Sync {
            company,
            csv,
            growth,
            window,
            strict,
        } => print_sync(
            &app,
            &SyncOptions {
                company,
                csv,
                growth,
                window,
                strict,
            },
        )?,

        Command::Snapshot { company } => {
            let snap = app
                .store
                .load_snapshot(&company)?
                .with_context(|| format!("no snapshot for {company}; run: founderpilot sync --company {company} --csv <file>"))?;
            let zero_cash = depletion_date(snap.cash_on_hand, snap.monthly_burn, app.config.today()?);
            if app.json {
                report::print_json(&json!({ "snapshot": snap, "zeroCashDate": zero_cash }))?;
            } else {
                report::print_snapshot(&snap, zero_cash);
            }
        }

        Command::Insights { company, all } => {
            let insights: Vec<_> = app
                .store
                .load_insights(&company)?
                .into_iter()
                .filter(|i| all || i.is_pending())
                .collect();
            if app.json {
                report::print_json(&insights)?;
            } else {
                report::print_insights(&insights);
            }
        }

        Command::Resolve {
            company,
            insight_id,
        } => {
            let insight = app.store.resolve_insight(&company, &insight_id)?;
            if app.json {
                report::print_json(&insight)?;
            } else {
                println!("Resolved: {} ({})", insight.title, insight.id);
            }
        }

        Command::Project {
            company,
            cash,
            burn,
        } => {
            let stored = app.store.load_snapshot(&company)?;
            let (cash, burn) = match (cash, burn, stored) {
                (Some(c), Some(b), _) => (c, b),
                (c, b, Some(s)) => (c.unwrap_or(s.cash_on_hand), b.unwrap_or(s.monthly_burn)),
                (_, _, None) => bail!(
                    "no snapshot for {company}; pass --cash and --burn or run sync first"
                ),
            };
            let points = app.engine().projector().project(cash, burn, app.config.today()?);
            if app.json {
                report::print_json(&points)?;
            } else {
                report::print_projection(&points);
            }
        }

        Command::Simulate {
            company,
            revenue_increase,
            cost_reduction,
            funding,
        } => {
            let snap = app
                .store
                .load_snapshot(&company)?
                .with_context(|| format!("no snapshot for {company}; run sync first"))?;
            let result = app.engine().simulate(
                ScenarioBaseline::from(&snap),
                ScenarioAdjustments::new(revenue_increase, cost_reduction, funding),
                app.config.today()?,
            );
            if app.json {
                report::print_json(&result)?;
            } else {
                report::print_simulation(&result);
            }
        }

        Command::Breakdown { csv } => {
            let import = sync::read_ledger(&csv)?;
            let categories = expense_breakdown(&import.transactions);
            if app.json {
                report::print_json(&categories)?;
            } else {
                report::print_breakdown(&categories);
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(&app.home)?,
            ConfigCommand::Show => {
                if app.json {
                    report::print_json(&app.config)?;
                } else {
                    println!("# {}", config::config_path(&app.home).display());
                    print!("{}", toml::to_string_pretty(&app.config)?);
                }
            }
        },
    }

    Ok(())
}

fn print_sync(app: &App, opts: &SyncOptions) -> Result<()> {
    let out = sync::run_sync(&app.store, &app.config, app.config.today()?, opts)?;
    let SyncOutcome {
        import,
        growth,
        analysis,
    } = out;

    if app.json {
        return report::print_json(&analysis);
    }

    println!(
        "Parsed {} transactions from {} ({} rejected, covering {} month(s))",
        import.transactions.len(),
        opts.csv.display(),
        import.rejected.len(),
        import.window_months()
    );
    for err in &import.rejected {
        println!("  skipped {err}");
    }
    println!();
    report::print_snapshot(&analysis.snapshot, analysis.zero_cash_date);
    if let Some(g) = growth {
        println!("MRR growth:       {:+.1}%", g);
    }
    println!("\n## Insights\n");
    report::print_insights(&analysis.insights);
    println!("\n## Projection\n");
    report::print_projection(&analysis.projection);

    Ok(())
}
