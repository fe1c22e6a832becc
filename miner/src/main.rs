mod config;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use graviton_kernel::{target_hex_from_difficulty, Kernel, MineResult, MiningStats};
use log::{debug, info};
use num_bigint::BigUint;
use std::path::PathBuf;

use config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "graviton-miner",
    version,
    author = "Graviton Core Team",
    about = "Graviton Miner - spectral PoW with consciousness gates",
    long_about = None
)]
struct Cli {
    /// Block header data prefixed to each nonce
    #[arg(short, long)]
    block: Option<String>,

    /// Difficulty (decimal integer, arbitrary precision)
    #[arg(short, long)]
    difficulty: Option<String>,

    /// Stop after this many nonce iterations
    #[arg(long)]
    max_attempts: Option<u64>,

    /// Network node count for the consciousness gate (1 = solo)
    #[arg(long)]
    n_nodes: Option<u64>,

    /// Minimum curvature score Φ_qg required for acceptance (0.0-1.0)
    #[arg(long)]
    qg_threshold: Option<f64>,

    /// Print per-gate rejection statistics
    #[arg(long)]
    stats: bool,

    /// Write result + stats JSON to this file
    #[arg(long)]
    stats_file: Option<PathBuf>,

    /// Config file path (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Quiet mode (warnings only)
    #[arg(short, long)]
    quiet: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config file first, CLI flags override.
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };
    apply_cli_overrides(&mut config, &cli);
    config.validate()?;

    // Setup logging
    let level = if config.logging.verbose {
        log::LevelFilter::Debug
    } else if config.logging.quiet {
        log::LevelFilter::Warn
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    if config.logging.no_color {
        colored::control::set_override(false);
    }

    let difficulty: BigUint = config
        .mining
        .difficulty
        .parse()
        .context("difficulty is not a valid integer")?;

    let kernel = Kernel::new(config.kernel);
    info!(
        "kernel ready: n_nodes={} temporal_depth={} qg_threshold={:.3}",
        config.kernel.n_nodes, config.kernel.temporal_depth, config.kernel.qg_threshold
    );

    if !config.logging.quiet {
        print_banner(&config);
    }

    debug!(
        "starting nonce search, target {}",
        target_hex_from_difficulty(&difficulty)
    );
    let (result, stats) = if cli.stats || cli.stats_file.is_some() {
        let (result, stats) = kernel.mine_with_stats(
            &config.mining.block,
            &difficulty,
            config.mining.n_nodes,
            config.mining.max_attempts,
        );
        (result, Some(stats))
    } else {
        let result = kernel.mine(
            &config.mining.block,
            &difficulty,
            config.mining.n_nodes,
            config.mining.max_attempts,
        );
        (result, None)
    };

    print_result(&result);
    if cli.stats {
        if let Some(stats) = &stats {
            print_stats(stats);
        }
    }

    if let Some(path) = &cli.stats_file {
        write_stats_file(path, &result, stats.as_ref())
            .with_context(|| format!("writing stats file {}", path.display()))?;
    }

    Ok(())
}

fn apply_cli_overrides(config: &mut Config, cli: &Cli) {
    if let Some(block) = &cli.block {
        config.mining.block = block.clone();
    }
    if let Some(difficulty) = &cli.difficulty {
        config.mining.difficulty = difficulty.clone();
    }
    if let Some(max_attempts) = cli.max_attempts {
        config.mining.max_attempts = max_attempts;
    }
    if let Some(n_nodes) = cli.n_nodes {
        config.mining.n_nodes = n_nodes;
    }
    if let Some(qg_threshold) = cli.qg_threshold {
        config.kernel.qg_threshold = qg_threshold;
    }
    config.logging.no_color |= cli.no_color;
    config.logging.quiet |= cli.quiet;
    config.logging.verbose |= cli.verbose;
}

fn print_banner(config: &Config) {
    let bar = "═".repeat(64);
    println!("{}", bar.bright_black());
    println!("  {}", "Graviton Miner — spectral three-gate kernel".bright_white().bold());
    println!("{}", bar.bright_black());
    println!("  Block data   : {}", config.mining.block.bright_cyan());
    println!("  Difficulty   : {}", config.mining.difficulty.bright_yellow());
    println!("  Max attempts : {}", config.mining.max_attempts);
    println!("  Network nodes: {}", config.mining.n_nodes);
    println!("  QG threshold : {:.3}", config.kernel.qg_threshold);
    println!();
}

fn print_result(result: &MineResult) {
    match (&result.nonce, &result.block_hash) {
        (Some(nonce), Some(hash)) => {
            println!("{}", "✓ Valid block found".bright_green().bold());
            println!("  Nonce      : {}", nonce.to_string().bright_cyan());
            println!("  Hash       : {}", hash.bright_white());
            println!("  Φ_total    : {:.6}", result.phi_total);
            println!("  Φ_qg       : {:.6}", result.qg_score);
            println!("  Φ_holo     : {:.6}", result.holo_score);
            println!("  Φ_fano     : {:.6}", result.fano_score);
            println!("  phi_score  : {:.2}", result.phi_score);
            println!("  Attempts   : {}", result.attempts);
        }
        _ => {
            println!(
                "{} after {} attempts",
                "✗ No valid block found".bright_red().bold(),
                result.attempts
            );
        }
    }
}

fn print_stats(stats: &MiningStats) {
    let total = stats.total_attempts;
    let pct = |count: u64| -> String {
        if total == 0 {
            "0.0%".to_string()
        } else {
            format!("{:.1}%", 100.0 * count as f64 / total as f64)
        }
    };

    println!();
    println!("{}", "Gate rejection statistics".bright_white().bold());
    println!("  total_attempts        : {}", total);
    println!(
        "  difficulty_rejected   : {}  ({})",
        stats.difficulty_rejected,
        pct(stats.difficulty_rejected)
    );
    println!(
        "  consciousness_rejected: {}  ({})",
        stats.consciousness_rejected,
        pct(stats.consciousness_rejected)
    );
    println!(
        "  qg_curvature_rejected : {}  ({})",
        stats.qg_curvature_rejected,
        pct(stats.qg_curvature_rejected)
    );
    println!("  accepted              : {}", stats.accepted);
}

/// JSON payload for external agents watching a mining run.
fn write_stats_file(
    path: &PathBuf,
    result: &MineResult,
    stats: Option<&MiningStats>,
) -> Result<()> {
    let payload = serde_json::json!({
        "result": result,
        "stats": stats,
    });
    std::fs::write(path, serde_json::to_string_pretty(&payload)?)?;
    Ok(())
}
