//! Chain Inspector CLI: offline summaries of chain exports and session
//! state management.
//!
//! Usage:
//!   chain-inspector summary <chains.json>
//!   chain-inspector groups <chains.json> --by variable --field dataset_name
//!   chain-inspector outliers <chains.json> [--column cv_score]
//!   chain-inspector session show|clear [--db path]

use chain_inspector::color::CategoricalPalette;
use chain_inspector::filter::OutlierReport;
use chain_inspector::grouping::ExpressionGroup;
use chain_inspector::{
    compute_groups, ChainSet, GroupingStrategy, InspectorConfig, JsonFileRepository, OpenStore,
    SessionPersistence, SessionStore, SqliteSessionStore,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "chain-inspector",
    version,
    about = "Analytics state engine for pipeline-chain comparison"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Path to a YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Print counts and distinct values of a chain export
    Summary {
        /// Path to a chain export (JSON)
        chains: PathBuf,
    },
    /// Group the chains of an export with one strategy
    Groups {
        /// Path to a chain export (JSON)
        chains: PathBuf,
        /// Grouping strategy
        #[arg(long, value_enum)]
        by: GroupBy,
        /// Field for variable grouping
        #[arg(long, default_value = "dataset_name")]
        field: String,
        /// Score column for range and top-k grouping
        #[arg(long)]
        column: Option<String>,
        /// Bin count for range grouping
        #[arg(long, default_value_t = 5)]
        bins: usize,
        /// K for top-k grouping
        #[arg(long, default_value_t = 5)]
        k: usize,
        /// Rank lowest scores first in top-k grouping
        #[arg(long)]
        ascending: bool,
        /// YAML file with expression groups
        #[arg(long)]
        expressions: Option<PathBuf>,
    },
    /// Report IQR outliers for a score column
    Outliers {
        /// Path to a chain export (JSON)
        chains: PathBuf,
        /// Score column (defaults to the configured score column)
        #[arg(long)]
        column: Option<String>,
    },
    /// Inspect or wipe persisted session state
    Session {
        #[command(subcommand)]
        action: SessionAction,
        /// Path to SQLite session database
        #[arg(long, global = true)]
        db: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum GroupBy {
    Variable,
    Range,
    TopK,
    Branch,
    Expression,
}

#[derive(Subcommand)]
enum SessionAction {
    /// Print every stored snapshot
    Show,
    /// Remove every stored snapshot
    Clear,
}

/// Get the default session database path (~/.local/share/chain-inspector/session.db)
fn default_db_path() -> PathBuf {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"));
    data_dir.join("chain-inspector").join("session.db")
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .try_init();
}

fn load_config(path: Option<&Path>) -> Result<InspectorConfig, String> {
    match path {
        Some(path) => InspectorConfig::load(path)
            .map_err(|e| format!("Failed to load config {}: {}", path.display(), e)),
        None => Ok(InspectorConfig::default()),
    }
}

fn load_chains(path: &Path) -> Result<ChainSet, String> {
    let runtime =
        tokio::runtime::Runtime::new().map_err(|e| format!("Failed to start runtime: {}", e))?;
    let repository = JsonFileRepository::new(path);
    let chains = runtime
        .block_on(repository.load_all())
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    Ok(ChainSet::new(chains))
}

fn load_expressions(path: &Path) -> Result<Vec<ExpressionGroup>, String> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    serde_yaml::from_str(&raw).map_err(|e| format!("Invalid expression groups: {}", e))
}

fn cmd_summary(chains: &ChainSet) -> i32 {
    println!("Chains: {}", chains.len());
    println!("Datasets ({}): {}", chains.datasets().len(), chains.datasets().join(", "));
    println!(
        "Model classes ({}): {}",
        chains.model_classes().len(),
        chains.model_classes().join(", ")
    );
    println!("Metrics ({}): {}", chains.metrics().len(), chains.metrics().join(", "));

    let mut task_types: BTreeMap<&str, usize> = BTreeMap::new();
    for chain in chains.iter() {
        *task_types.entry(chain.task_type.as_str()).or_default() += 1;
    }
    for (task_type, count) in task_types {
        println!("  {}: {}", task_type, count);
    }
    0
}

fn cmd_groups(chains: &ChainSet, strategy: &GroupingStrategy) -> i32 {
    let groups = compute_groups(chains, strategy, CategoricalPalette::default());
    if groups.is_empty() {
        println!("No groups.");
        return 0;
    }
    for group in &groups {
        println!("{}  {}  ({} chains)", group.color, group.label, group.len());
        for id in &group.chain_ids {
            println!("    {}", id);
        }
    }
    0
}

fn cmd_outliers(chains: &ChainSet, column: &str) -> i32 {
    let report = OutlierReport::compute(chains, column);
    let Some(bounds) = report.bounds else {
        println!(
            "Not enough values in '{}' ({} found, at least 4 needed).",
            column, report.sample_size
        );
        return 0;
    };
    println!(
        "{}: n={} q1={:.4} q3={:.4} fences=[{:.4}, {:.4}]",
        column, report.sample_size, bounds.q1, bounds.q3, bounds.lower, bounds.upper
    );
    if report.outliers.is_empty() {
        println!("No outliers.");
        return 0;
    }
    let mut ids: Vec<_> = report.outliers.iter().collect();
    ids.sort();
    for id in ids {
        let score = chains.get(id).and_then(|c| c.score(column));
        match score {
            Some(score) => println!("  {}  {:.4}", id, score),
            None => println!("  {}", id),
        }
    }
    0
}

fn cmd_session_show(store: &SqliteSessionStore, prefix: &str) -> i32 {
    let keys = match store.keys(&format!("{}:", prefix)) {
        Ok(keys) => keys,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    if keys.is_empty() {
        println!("No session state.");
        return 0;
    }
    for key in keys {
        match store.get(&key) {
            Ok(Some(value)) => println!("{}\t{}", key, value),
            Ok(None) => {}
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        }
    }
    0
}

fn cmd_session_clear(store: SqliteSessionStore, prefix: &str) -> i32 {
    let persistence = SessionPersistence::new(Arc::new(store), prefix);
    match persistence.clear() {
        Ok(removed) => {
            println!("Removed {} snapshot(s)", removed);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn strategy_for(
    by: GroupBy,
    field: String,
    column: String,
    bins: usize,
    k: usize,
    ascending: bool,
    expressions: Option<PathBuf>,
) -> Result<GroupingStrategy, String> {
    Ok(match by {
        GroupBy::Variable => GroupingStrategy::ByVariable { field },
        GroupBy::Range => GroupingStrategy::ByRange { column, bins },
        GroupBy::TopK => GroupingStrategy::ByTopK {
            column,
            k,
            ascending,
        },
        GroupBy::Branch => GroupingStrategy::ByBranch,
        GroupBy::Expression => {
            let path = expressions.ok_or("--expressions is required for expression grouping")?;
            GroupingStrategy::ByExpression {
                groups: load_expressions(&path)?,
            }
        }
    })
}

fn run(cli: Cli) -> Result<i32, String> {
    let config = load_config(cli.config.as_deref())?;
    let code = match cli.command {
        Commands::Summary { chains } => cmd_summary(&load_chains(&chains)?),
        Commands::Groups {
            chains,
            by,
            field,
            column,
            bins,
            k,
            ascending,
            expressions,
        } => {
            let column = column.unwrap_or_else(|| config.default_score_column.clone());
            let strategy = strategy_for(by, field, column, bins, k, ascending, expressions)?;
            cmd_groups(&load_chains(&chains)?, &strategy)
        }
        Commands::Outliers { chains, column } => {
            let column = column.unwrap_or_else(|| config.default_score_column.clone());
            cmd_outliers(&load_chains(&chains)?, &column)
        }
        Commands::Session { action, db } => {
            let db_path = db.unwrap_or_else(default_db_path);
            let store = SqliteSessionStore::open(&db_path)
                .map_err(|e| format!("Failed to open session database: {}", e))?;
            match action {
                SessionAction::Show => cmd_session_show(&store, &config.session_key_prefix),
                SessionAction::Clear => cmd_session_clear(store, &config.session_key_prefix),
            }
        }
    };
    Ok(code)
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };
    std::process::exit(code);
}
