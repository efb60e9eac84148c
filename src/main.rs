//! powchain demo driver.
//!
//! Builds a small proof-of-work chain from the configured parameters and
//! prints a per-block summary (or the chain as JSON). Mining runs either
//! inline on the current thread or on the async CPU worker with ctrl-c
//! cancellation.

use powchain::{
    config::{Config, LogFormat, MinerKind},
    progress::TracingObserver,
    Block, BlockHeader, Chain, CpuMiner, Difficulty, Payload, Result, APP_NAME, APP_VERSION,
};

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().await?;
    init_logging(&config);

    if config.print_config {
        print_configuration(&config)?;
        return Ok(());
    }

    info!("Starting {} v{}", APP_NAME, APP_VERSION);
    info!(
        difficulty = config.difficulty(),
        blocks = config.blocks(),
        miner = ?config.miner(),
        "configuration resolved"
    );

    let cancel = CancellationToken::new();
    spawn_ctrl_c_handler(cancel.clone());

    let chain = build_chain(&config, cancel).await?;

    if config.json {
        println!("{}", serde_json::to_string_pretty(&chain)?);
    } else {
        print_summary(&chain);
    }

    Ok(())
}

/// Initialize the tracing subscriber from the resolved configuration.
///
/// `RUST_LOG` wins over the configured level when set.
fn init_logging(config: &Config) {
    let level: tracing::Level = config.log_level().into();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    match config.log_format() {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(fmt::layer().json().with_target(false))
                .with(filter)
                .init();
        }
        LogFormat::Plain => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(false))
                .with(filter)
                .init();
        }
    }
}

/// Cancel the token on the first ctrl-c so a long worker search can stop
/// between batches.
fn spawn_ctrl_c_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("ctrl-c received, stopping mining");
            cancel.cancel();
        }
    });
}

/// Mine the demo chain: a genesis block plus the configured number of
/// payload blocks, stepping the difficulty up every `difficulty_step`
/// blocks when stepping is enabled.
async fn build_chain(config: &Config, cancel: CancellationToken) -> Result<Chain> {
    let mut chain = Chain::new(Difficulty::new(config.difficulty())?)?;
    let step = config.difficulty_step();

    for index in 0..config.blocks() {
        if step != 0 && index % step == 0 {
            let raised = Difficulty::new(chain.difficulty().value() + 1)?;
            info!(difficulty = %raised, "raising difficulty");
            chain.set_difficulty(raised);
        }

        let payload = Payload::from(format!("{}[{}]", config.payload_prefix(), index));
        match config.miner() {
            MinerKind::Inline => {
                chain.push_observed(payload, &mut TracingObserver)?;
            }
            MinerKind::Worker => {
                mine_on_worker(config, &mut chain, payload, cancel.clone()).await?;
            }
        }
        info!(
            index = index + 1,
            hash = %chain.last().hash(),
            nonce = %chain.last().nonce(),
            "block appended"
        );
    }

    Ok(chain)
}

/// Mine one block on the CPU worker and append it, forwarding worker
/// progress snapshots to the log.
async fn mine_on_worker(
    config: &Config,
    chain: &mut Chain,
    payload: Payload,
    cancel: CancellationToken,
) -> Result<()> {
    let difficulty = chain.difficulty();
    let header = BlockHeader::now(payload, Some(*chain.last().hash()));

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<powchain::progress::MiningProgress>();
    let progress_task = tokio::spawn(async move {
        while let Some(progress) = rx.recv().await {
            info!(
                attempts = progress.attempts,
                hash_rate = %progress.hash_rate(),
                "mining in progress"
            );
        }
    });

    let miner = CpuMiner::new(config.batch_size());
    let solution = miner.mine(header.clone(), difficulty, cancel, Some(tx)).await;
    let _ = progress_task.await;
    let solution = solution?;

    let block = Block::from_parts(header, difficulty, solution.nonce, solution.hash);
    chain.append(block)?;
    Ok(())
}

/// Print the resolved configuration as YAML.
fn print_configuration(config: &Config) -> Result<()> {
    let config_yaml = serde_yaml::to_string(config)?;
    println!("{}", config_yaml);
    Ok(())
}

/// Per-block summary in the classic demo shape, with a fresh verification
/// pass for every block.
fn print_summary(chain: &Chain) {
    for block in chain.blocks() {
        println!("=================");
        println!("hash    : {}", block.hash());
        println!("time    : {:x}", block.timestamp());
        println!(
            "Prehash : {}",
            block
                .previous_hash()
                .map(|h| h.to_string())
                .unwrap_or_default()
        );
        println!("Data    : {}", block.payload());
        println!("Diff    : {}", block.difficulty());
        println!("Pass    : {}", block.verify());
    }
}
