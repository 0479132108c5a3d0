use clap::{Args, Parser, Subcommand};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use roster_draw::roster::{current_timestamp, RosterStore};
use roster_draw::{
    build_reel_with, draw, format_float, format_percent, normalize, select_group, winner_index,
    Candidate, DrawConfig, DrawRequest, ReelSeed, WeightModel,
};

#[derive(Parser)]
#[command(name = "roster-draw", about = "Weighted classroom draws")]
struct Cli {
    /// Roster JSON file.
    #[arg(long, global = true, env = "ROSTER_PATH", default_value = "data/roster.json")]
    roster: PathBuf,
    /// Draw config TOML file. Falls back to DRAW_CONFIG_PATH, then config/draw.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show each candidate's weight and probability.
    Probabilities(ProbabilitiesArgs),
    /// Draw candidates; history is untouched unless --confirm is given.
    Draw(DrawArgs),
    /// Record a draw that was shown and accepted.
    Confirm(ConfirmArgs),
    /// Print the reel for one slot.
    Reel(ReelArgs),
    /// Zero all draw counts and clear the draw log.
    Reset,
    History(HistoryArgs),
    Add(AddArgs),
    /// Delete a candidate from the roster and its groups.
    Remove(RemoveArgs),
    /// Record a new grade for a candidate.
    Grade(GradeArgs),
    /// Manage named groups.
    Group(GroupArgs),
}

#[derive(Args, Debug, Clone)]
struct ProbabilitiesArgs {
    #[arg(long, value_delimiter = ',', conflicts_with = "group_name")]
    group: Vec<u64>,
    #[arg(long)]
    group_name: Option<String>,
    #[arg(long, default_value = "value")]
    sort: String,
}

#[derive(Args, Debug, Clone)]
struct DrawArgs {
    #[arg(long, default_value_t = 1, allow_hyphen_values = true)]
    count: i64,
    #[arg(long, value_delimiter = ',', conflicts_with = "group_name")]
    group: Vec<u64>,
    #[arg(long)]
    group_name: Option<String>,
    #[arg(long)]
    spin_id: Option<u64>,
    #[arg(long)]
    confirm: bool,
    #[arg(long)]
    show_reels: bool,
}

#[derive(Args, Debug, Clone)]
struct ConfirmArgs {
    #[arg(long, value_delimiter = ',', required = true)]
    ids: Vec<u64>,
}

#[derive(Args, Debug, Clone)]
struct ReelArgs {
    #[arg(long)]
    winner: Option<u64>,
    #[arg(long, default_value_t = 0)]
    spin_id: u64,
    #[arg(long, default_value_t = 0)]
    reel_id: u64,
}

#[derive(Args, Debug, Clone)]
struct HistoryArgs {
    #[arg(long, default_value_t = 10)]
    limit: usize,
}

#[derive(Args, Debug, Clone)]
struct AddArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    grade: Option<f64>,
}

#[derive(Args, Debug, Clone)]
struct RemoveArgs {
    #[arg(long)]
    id: u64,
}

#[derive(Args, Debug, Clone)]
struct GradeArgs {
    #[arg(long)]
    id: u64,
    #[arg(long, allow_hyphen_values = true)]
    grade: f64,
}

#[derive(Args, Debug, Clone)]
struct GroupArgs {
    #[command(subcommand)]
    action: GroupCommand,
}

#[derive(Subcommand, Debug, Clone)]
enum GroupCommand {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, value_delimiter = ',', required = true)]
        members: Vec<u64>,
    },
    Remove {
        #[arg(long)]
        name: String,
    },
    List,
}

#[tokio::main]
async fn main() {
    load_dotenv();
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let (config, config_path) = DrawConfig::load(cli.config)?;
    if let Some(path) = config_path.as_ref().filter(|path| path.exists()) {
        info!(path = %path.display(), "loaded draw config");
    }
    let store = RosterStore::load(cli.roster).await?;

    match cli.command {
        Command::Probabilities(args) => run_probabilities(&store, &config, args).await,
        Command::Draw(args) => run_draw(&store, &config, args).await,
        Command::Confirm(args) => run_confirm(&store, args).await,
        Command::Reel(args) => run_reel(&store, &config, args).await,
        Command::Reset => run_reset(&store).await,
        Command::History(args) => run_history(&store, args).await,
        Command::Add(args) => run_add(&store, args).await,
        Command::Remove(args) => run_remove(&store, args).await,
        Command::Grade(args) => run_grade(&store, args).await,
        Command::Group(args) => run_group(&store, args).await,
    }
}

async fn run_probabilities(
    store: &RosterStore,
    config: &DrawConfig,
    args: ProbabilitiesArgs,
) -> Result<(), String> {
    let pool = scoped_pool(store, &args.group, args.group_name.as_deref()).await?;
    if pool.is_empty() {
        println!("No candidates in {}", store.path().display());
        return Ok(());
    }

    let model = WeightModel::new(&config.weights);
    let weights = model.weights(&pool);
    let probs = normalize(&weights).map_err(|err| err.to_string())?;

    let mut rows: Vec<(&Candidate, f64, f64)> = pool
        .iter()
        .zip(weights.iter().copied())
        .zip(probs.iter().copied())
        .map(|((candidate, weight), prob)| (candidate, weight, prob))
        .collect();
    match args.sort.to_lowercase().as_str() {
        "name" => rows.sort_by(|a, b| a.0.name.to_lowercase().cmp(&b.0.name.to_lowercase())),
        _ => rows.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(Ordering::Equal)),
    }

    for (candidate, weight, prob) in rows {
        println!(
            "{:>8}  {:<20} draws {:>3}  weight {}  probability {}",
            candidate.id,
            candidate.name,
            candidate.draw_count,
            format_float(weight, 4),
            format_percent(prob)
        );
    }
    Ok(())
}

async fn run_draw(store: &RosterStore, config: &DrawConfig, args: DrawArgs) -> Result<(), String> {
    let pool = scoped_pool(store, &args.group, args.group_name.as_deref()).await?;
    let request = DrawRequest::new(pool, args.count);
    let result = draw(&request, &config.weights).map_err(|err| err.to_string())?;

    if result.is_empty() {
        println!("Nothing drawn: the pool is empty or count is 0");
        return Ok(());
    }

    let spin_id = args.spin_id.unwrap_or_else(|| current_timestamp().max(0) as u64);
    println!(
        "Drew {} of {} candidates (spin {}):",
        result.picks.len(),
        request.pool.len(),
        spin_id
    );

    for (slot, pick) in result.picks.iter().enumerate() {
        let seed = ReelSeed::new(spin_id, slot as u64, Some(pick.id)).value();
        let reel = build_reel_with(&request.pool, Some(pick), seed, &config.reel);
        let stop = winner_index(&reel, pick)
            .map(|index| index.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>3}. {} (id {})  reel {} items, stops at {}",
            slot + 1,
            pick.name,
            pick.id,
            reel.len(),
            stop
        );
        if args.show_reels {
            println!("     {}", reel_names(&reel));
        }
    }

    if args.confirm {
        if let Some(record) = store.confirm_draw(&result.ids()).await? {
            println!("Confirmed as draw #{}", record.id);
        }
    }
    Ok(())
}

async fn run_confirm(store: &RosterStore, args: ConfirmArgs) -> Result<(), String> {
    match store.confirm_draw(&args.ids).await? {
        Some(record) => {
            let names: Vec<&str> = record.drawn.iter().map(|entry| entry.name.as_str()).collect();
            println!("Confirmed draw #{}: {}", record.id, names.join(", "));
        }
        None => println!("Nothing to confirm"),
    }
    Ok(())
}

async fn run_reel(store: &RosterStore, config: &DrawConfig, args: ReelArgs) -> Result<(), String> {
    let pool = store.candidates().await;
    let winner = match args.winner {
        Some(id) => Some(
            pool.iter()
                .find(|candidate| candidate.id == id)
                .cloned()
                .ok_or_else(|| format!("candidate {} is not in the roster", id))?,
        ),
        None => None,
    };

    let seed = ReelSeed::new(args.spin_id, args.reel_id, args.winner).value();
    let reel = build_reel_with(&pool, winner.as_ref(), seed, &config.reel);
    println!("{}", reel_names(&reel));
    if let Some(index) = winner.as_ref().and_then(|winner| winner_index(&reel, winner)) {
        println!("winner index: {}", index);
    }
    Ok(())
}

async fn run_reset(store: &RosterStore) -> Result<(), String> {
    store.reset().await?;
    println!("Draw history reset");
    Ok(())
}

async fn run_history(store: &RosterStore, args: HistoryArgs) -> Result<(), String> {
    let history = store.history(args.limit).await;
    if history.is_empty() {
        println!("No draws recorded");
        return Ok(());
    }
    for record in history {
        let names: Vec<&str> = record.drawn.iter().map(|entry| entry.name.as_str()).collect();
        println!("#{} at {}: {}", record.id, record.drawn_at, names.join(", "));
    }
    Ok(())
}

async fn run_add(store: &RosterStore, args: AddArgs) -> Result<(), String> {
    let candidate = store.add_candidate(&args.name, args.grade).await?;
    println!("Added {} (id {})", candidate.name, candidate.id);
    Ok(())
}

async fn run_remove(store: &RosterStore, args: RemoveArgs) -> Result<(), String> {
    let removed = store.remove_candidate(args.id).await?;
    println!("Removed {} (id {})", removed.name, removed.id);
    Ok(())
}

async fn run_grade(store: &RosterStore, args: GradeArgs) -> Result<(), String> {
    let candidate = store.record_grade(args.id, args.grade).await?;
    println!("Recorded grade {} for {}", format_float(args.grade, 1), candidate.name);
    Ok(())
}

async fn run_group(store: &RosterStore, args: GroupArgs) -> Result<(), String> {
    match args.action {
        GroupCommand::Add { name, members } => {
            let group = store.add_group(&name, &members).await?;
            println!("Added group {} with {} members", group.name, group.members.len());
        }
        GroupCommand::Remove { name } => {
            if store.remove_group(&name).await? {
                println!("Removed group {}", name);
            } else {
                println!("No group named {}", name);
            }
        }
        GroupCommand::List => {
            let groups = store.groups().await;
            if groups.is_empty() {
                println!("No groups defined");
            }
            for group in groups {
                let pool = store.group_pool(&group.name).await?;
                let names: Vec<&str> = pool.iter().map(|candidate| candidate.name.as_str()).collect();
                println!("{}: {}", group.name, names.join(", "));
            }
        }
    }
    Ok(())
}

async fn scoped_pool(
    store: &RosterStore,
    group: &[u64],
    group_name: Option<&str>,
) -> Result<Vec<Candidate>, String> {
    if let Some(name) = group_name {
        return store.group_pool(name).await;
    }
    let pool = store.candidates().await;
    if group.is_empty() {
        return Ok(pool);
    }
    select_group(&pool, group).map_err(|err| err.to_string())
}

fn reel_names(reel: &[Candidate]) -> String {
    reel.iter()
        .map(|candidate| candidate.name.as_str())
        .collect::<Vec<_>>()
        .join(" | ")
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("roster_draw=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let manifest_path = Path::new(manifest_dir).join(".env");
    let _ = dotenvy::from_path(manifest_path);
}
