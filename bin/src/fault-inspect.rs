use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use op_challenger_fault::{Claim, Depth, Game, GameState, Position};
use std::{collections::HashMap, fs, path::PathBuf};
use tracing::Level;

/// Arguments for the `fault-inspect` binary.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Verbosity level (0-4)
    #[arg(long, short, help = "Verbosity level (0-4)", action = ArgAction::Count, env = "VERBOSITY")]
    v: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Describe the node at a generalized index and the moves against it.
    Position {
        /// The generalized index, in decimal or 0x-prefixed hex.
        gindex: Position,
        /// The maximum depth of the game tree.
        #[arg(long, short = 'd', env = "FAULT_MAX_DEPTH")]
        max_depth: u64,
    },
    /// Re-root the node at a generalized index onto an ancestor depth.
    Relative {
        /// The generalized index, in decimal or 0x-prefixed hex.
        gindex: Position,
        /// The depth of the ancestor subtree root.
        ancestor_depth: u64,
    },
    /// Load a JSON array of claims and report how they relate.
    Claims {
        /// Path to the JSON claim file.
        path: PathBuf,
        /// The maximum depth of the game tree.
        #[arg(long, short = 'd', env = "FAULT_MAX_DEPTH")]
        max_depth: u64,
    },
}

fn main() -> Result<()> {
    // Parse the command arguments
    let Args { v, command } = Args::parse();

    // Initialize the tracing subscriber
    init_tracing_subscriber(v)?;

    match command {
        Command::Position { gindex, max_depth } => {
            describe_position(&gindex, game_depth(max_depth)?)
        }
        Command::Relative {
            gindex,
            ancestor_depth,
        } => {
            let relative = gindex.relative_to_ancestor_at_depth(Depth::new(ancestor_depth))?;
            println!("{gindex} -> {relative}");
            Ok(())
        }
        Command::Claims { path, max_depth } => inspect_claims(path, game_depth(max_depth)?),
    }
}

/// Validates the max game depth passed on the command line.
fn game_depth(max_depth: u64) -> Result<Depth> {
    let max_depth = Depth::new(max_depth).ensure_supported()?;
    tracing::debug!(target: "fault-inspect", "Inspecting a game of max depth {}", max_depth);
    Ok(max_depth)
}

/// Prints the coordinates, trace index and moves of a [Position].
fn describe_position(position: &Position, max_depth: Depth) -> Result<()> {
    if position.depth() > max_depth {
        return Err(anyhow!(
            "position {} is below the max game depth {}",
            position,
            max_depth
        ));
    }

    println!("position:    {position}");
    println!("trace index: {}", position.trace_index(max_depth)?);

    // Moves out of the tree are not errors here; there is simply no such move.
    if position.depth() < max_depth {
        println!("attack:      {}", position.attack()?);
        match position.defend() {
            Ok(defense) => println!("defend:      {defense}"),
            Err(e) => tracing::debug!(target: "fault-inspect", "No defense against {}: {}", position, e),
        }
    }
    if let Ok(parent) = position.parent() {
        println!("parent:      {parent}");
    }

    Ok(())
}

/// Admits every claim in the file at `path` into a [GameState], reporting the claims that are
/// rejected and the claims that defend their parent.
fn inspect_claims(path: PathBuf, max_depth: Depth) -> Result<()> {
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed to read claim file {}", path.display()))?;
    let claims: Vec<Claim> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse claim file {}", path.display()))?;
    tracing::info!(target: "fault-inspect", "Loaded {} claims from {}", claims.len(), path.display());

    let mut game = GameState::new(max_depth);
    // Maps the index each claim carries in the file to its slot in the game.
    let mut slots: HashMap<usize, usize> = HashMap::new();
    for mut claim in claims {
        let file_index = claim.contract_index;
        if game.is_duplicate(&claim) {
            println!("claim {file_index} duplicates an earlier claim, skipping");
            continue;
        }
        if !claim.is_root() {
            match slots.get(&claim.parent_index) {
                Some(&slot) => claim.parent_index = slot,
                None => {
                    println!(
                        "claim {file_index} rejected: parent claim {} was not admitted",
                        claim.parent_index
                    );
                    continue;
                }
            }
        }
        claim.contract_index = game.len();
        match game.put(claim) {
            Ok(()) => {
                slots.insert(file_index, game.len() - 1);
            }
            Err(e) => {
                tracing::warn!(target: "fault-inspect", "Rejected claim {}: {}", file_index, e);
                println!("claim {file_index} rejected: {e}");
            }
        }
    }

    for claim in game.claims() {
        let relation = if claim.is_root() {
            "root"
        } else if game.defends_parent(claim) {
            "defends parent"
        } else {
            "does not defend parent"
        };
        println!(
            "slot {} at {} value {:?}: {}",
            claim.contract_index,
            claim.position(),
            claim.value(),
            relation
        );
    }

    Ok(())
}

/// Initializes the tracing subscriber
///
/// # Arguments
/// * `verbosity_level` - The verbosity level (0-4)
///
/// # Returns
/// * `Result<()>` - Ok if successful, Err otherwise.
fn init_tracing_subscriber(verbosity_level: u8) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(match verbosity_level {
            0 => Level::ERROR,
            1 => Level::WARN,
            2 => Level::INFO,
            3 => Level::DEBUG,
            _ => Level::TRACE,
        })
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).map_err(|e| anyhow!(e))
}
