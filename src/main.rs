//! chef-search command line.
//!
//! Usage:
//! ```bash
//! # Three fats, at least one at portion 20, no meat, total count at most 4
//! chef-search --catalog chefIndi.json --defaults defaultIngredients.json \
//!     --must-have Fat,3 --must-have Butter,Lard,1,20 --avoid Meat --perk ,-4
//!
//! # Load the profile from a file, skip confirmation, print JSON
//! chef-search --catalog chefIndi.json --config run.toml --yes --json
//!
//! # Deterministic memory budget of one million stored states
//! chef-search --catalog chefIndi.json --max-states 1000000 -v
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use chef_search::catalog::{CatalogProvider, JsonCatalogProvider};
use chef_search::config::ChefConfig;
use chef_search::context::SearchContext;
use chef_search::report::summarize;
use chef_search::search::{
    EvictionReport, LeaderboardUpdate, ProgressSnapshot, SearchEngine, SearchObserver,
    SearchResult, StateBudget,
};
use clap::Parser;
use dialoguer::Confirm;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DIVIDER: &str = "==========";

#[derive(Parser)]
#[command(
    name = "chef-search",
    about = "Best-first recipe search over an ingredient catalog",
    long_about = "Search ingredient combinations that meet must-have, avoid, perk and required-tag \
                  conditions while buying as little as possible and cooking as fast and cheap as possible"
)]
struct ChefArgs {
    /// Catalog JSON (`match` pairing table and `indi` ingredient list)
    #[arg(long, value_name = "PATH")]
    catalog: PathBuf,

    /// JSON array of ingredient names available without buying
    #[arg(long, value_name = "PATH")]
    defaults: Option<PathBuf>,

    /// TOML run configuration; flags below are applied on top of it
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Must-have condition NAME[,NAME...][,COUNT[,PORTION]]
    #[arg(long = "must-have", value_name = "GROUP")]
    must_have: Vec<String>,

    /// Perk KEY[,COUNT[,PORTION]]; a blank KEY counts all ingredients
    #[arg(long, value_name = "GROUP", allow_hyphen_values = true)]
    perk: Vec<String>,

    /// Required tag TAG[,PERCENT]
    #[arg(long = "required-tag", value_name = "GROUP")]
    required_tag: Vec<String>,

    /// Names or tags to avoid, comma separated
    #[arg(long, value_name = "A,B")]
    avoid: Option<String>,

    /// Ingredients already bought, comma separated
    #[arg(long, value_name = "A,B")]
    ingredients: Option<String>,

    /// Number of ingredients that may be bought without penalty
    #[arg(long)]
    ingredient_points: Option<usize>,

    /// Weight of cooking time; 0 ignores it (salads, pies)
    #[arg(long)]
    cooking_time_factor: Option<f64>,

    /// Number of best recipes to keep and print
    #[arg(long)]
    leaderboard_size: Option<usize>,

    /// Stop by cost multiple even when cooking time matters
    #[arg(long)]
    no_stop_by_cooking_time: bool,

    /// Stop once a recipe costs this many times the best closed one
    #[arg(long, value_name = "MULTIPLE")]
    stop_by_cost: Option<f64>,

    /// Drop DROP of the open set once memory is THRESHOLD full, both in [0.1, 1.0]
    #[arg(long, num_args = 2, value_names = ["DROP", "THRESHOLD"])]
    memory_threshold: Option<Vec<f64>>,

    /// Measure memory as stored states out of this budget instead of process memory
    #[arg(long)]
    max_states: Option<usize>,

    /// Stop after expanding this many recipes
    #[arg(long)]
    max_closed: Option<usize>,

    /// Print the final leaderboard as JSON instead of progress lines
    #[arg(long)]
    json: bool,

    /// Do not ask for confirmation
    #[arg(long, short = 'y')]
    yes: bool,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

impl ChefArgs {
    /// Applies flags on top of a loaded configuration.
    fn apply(&self, config: &mut ChefConfig) {
        config.must_have.extend(self.must_have.iter().cloned());
        config.perks.extend(self.perk.iter().cloned());
        config.required_tags.extend(self.required_tag.iter().cloned());
        config.avoid.extend(self.avoid.iter().cloned());
        if let Some(list) = &self.ingredients {
            config.ingredients.extend(
                list.split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string),
            );
        }

        let search = &mut config.search;
        if let Some(n) = self.ingredient_points {
            search.ingredient_points = n;
        }
        if let Some(modifier) = self.cooking_time_factor {
            search.cooking_time_modifier = modifier;
        }
        if let Some(k) = self.leaderboard_size {
            search.leaderboard_size = k;
        }
        if self.no_stop_by_cooking_time {
            search.stop_by_cooking_time = false;
        }
        if let Some(multiple) = self.stop_by_cost {
            search.stop_by_cost_multiple = multiple;
        }
        if let Some([drop_rate, threshold]) = self.memory_threshold.as_deref() {
            search.open_set_drop_rate = *drop_rate;
            search.memory_full_threshold = *threshold;
        }
        if let Some(n) = self.max_closed {
            search.max_closed = Some(n);
        }
    }
}

/// Prints leaderboard changes and progress to the terminal.
struct ConsoleObserver {
    quiet: bool,
}

impl SearchObserver for ConsoleObserver {
    fn on_progress(&mut self, progress: &ProgressSnapshot) {
        if self.quiet {
            return;
        }
        eprint!(
            "\r[{} closed, {} open, cost multiple {:.2}%, memory usage {:.2}%]",
            progress.closed,
            progress.open,
            progress.cost_multiple * 100.0,
            progress.memory_usage * 100.0
        );
    }

    fn on_leaderboard(&mut self, update: &LeaderboardUpdate<'_>) {
        if self.quiet {
            return;
        }
        println!(
            "\n{DIVIDER} [after {} searched, best {} below] {DIVIDER}",
            update.known,
            update.ranked.len()
        );
        for summary in update.summaries() {
            println!("{summary}");
        }
    }

    fn on_eviction(&mut self, report: &EvictionReport) {
        if !self.quiet {
            eprintln!(
                "\nmemory usage {:.2}%, {} dropped, {} kept",
                report.memory_usage * 100.0,
                report.dropped,
                report.retained
            );
        }
    }

    fn on_finish(&mut self, result: &SearchResult) {
        if !self.quiet {
            println!(
                "\n{} after {} closed, {} known",
                result.outcome, result.closed, result.known
            );
        }
    }
}

fn print_config(context: &SearchContext, config: &ChefConfig) {
    let profile = context.profile();
    println!("Here is your config:");
    for cond in &profile.must_have {
        let keys: Vec<&str> = cond.keys.iter().map(String::as_str).collect();
        println!(
            "  must have {} of [{}] at portion {}+",
            cond.count,
            keys.join(", "),
            cond.portion
        );
    }
    for perk in &profile.perks {
        if perk.is_total_count() {
            println!("  perk: ingredient count {}", perk.count);
        } else {
            println!(
                "  perk: {} x{} at portion {}+",
                perk.key, perk.count, perk.portion
            );
        }
    }
    for required in &profile.required_tags {
        println!("  required tag {} at {}%", required.tag, required.percent);
    }
    if !profile.avoid.is_empty() {
        let avoid: Vec<&str> = profile.avoid.iter().map(String::as_str).collect();
        println!("  avoid [{}]", avoid.join(", "));
    }
    println!(
        "  {} ingredients, {} already available",
        context.catalog().len(),
        context.possessed_count()
    );
    let search = &config.search;
    println!(
        "  ingredient points {}, cooking time factor {}, leaderboard {}",
        search.ingredient_points, search.cooking_time_modifier, search.leaderboard_size
    );
    if search.stops_by_cooking_time() {
        println!("  stop when cooking time grows");
    } else {
        println!("  stop at cost multiple {}", search.stop_by_cost_multiple);
    }
    println!(
        "  drop {:.0}% of the open set when memory is {:.0}% full",
        search.open_set_drop_rate * 100.0,
        search.memory_full_threshold * 100.0
    );
}

fn main() -> Result<()> {
    let args = ChefArgs::parse();

    let default_filter = if args.verbose {
        "chef_search=debug"
    } else {
        "chef_search=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => ChefConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ChefConfig::new(),
    };
    args.apply(&mut config);
    config.search = config.search.clamped();
    let profile = config.profile().context("invalid condition")?;

    let mut provider = JsonCatalogProvider::new(&args.catalog);
    if let Some(path) = &args.defaults {
        provider = provider.with_available(path);
    }
    let catalog = provider
        .load_catalog()
        .with_context(|| format!("failed to load catalog {}", args.catalog.display()))?;
    let available = provider
        .load_available()
        .context("failed to load default ingredients")?;
    let context = SearchContext::new(catalog, profile)
        .with_possessed(available.iter().chain(config.ingredients.iter()));

    print_config(&context, &config);
    if !args.yes
        && !Confirm::new()
            .with_prompt("Continue with this config?")
            .default(true)
            .interact()?
    {
        info!("aborted");
        return Ok(());
    }

    let mut engine = SearchEngine::new(&context, config.search.clone())?;
    if let Some(max_states) = args.max_states {
        engine = engine.with_memory_probe(StateBudget::new(max_states));
    }
    let mut observer = ConsoleObserver { quiet: args.json };
    let result = engine.run(&mut observer);

    if args.json {
        let summaries = summarize(&context, &result.leaderboard);
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    }
    Ok(())
}
