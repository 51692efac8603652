//! chanvote: offline tooling over a node's configuration store and ledger.

use std::path::PathBuf;

use anyhow::Context;
use chanvote_election::{Election, ElectionParams};
use chanvote_messages::AddressCommand;
use chanvote_node::{NodeConfig, VotingNode};
use chanvote_types::Address;
use chanvote_utils::{init_logging, LogFormat};
use clap::Parser;

#[derive(Parser)]
#[command(name = "chanvote", about = "Polls over broadcast channels")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "CHANVOTE_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the keys file and the ledger.
    #[arg(long, env = "CHANVOTE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "CHANVOTE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "CHANVOTE_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Validate election parameters and print their content hash.
    Hash {
        #[arg(long)]
        question: String,
        #[arg(long = "answer", required = true)]
        answers: Vec<String>,
        #[arg(long = "voter", required = true)]
        voters: Vec<String>,
    },
    /// Print a portable election file.
    Show { file: PathBuf },
    /// List joined elections.
    List,
    /// Leave a joined election.
    Leave { address: String },
    /// Print the votes recorded for a channel.
    Votes { address: String },
}

fn resolve_config(cli: &Cli) -> anyhow::Result<NodeConfig> {
    let mut config = match &cli.config {
        Some(path) => NodeConfig::from_toml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => NodeConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    Ok(config)
}

/// Stand-in address backend: this tool never derives or joins channels.
fn offline(command: &AddressCommand) -> Result<Vec<Address>, String> {
    Err(format!("{} needs a running address service", command.name()))
}

fn print_election(election: &Election) {
    println!("{election}");
    println!("  question: {}", election.question());
    for (i, answer) in election.answers().iter().enumerate() {
        println!("  answer {i}: {answer}");
    }
    for voter in election.voters() {
        println!("  voter: {voter}");
    }
    println!("  hash: {}", election.content_hash());
    println!("  chan: {}", election.chan_address());
    println!("  state: {}", election.state());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    init_logging(config.log_format, &config.log_level)?;
    tracing::debug!(data_dir = %config.data_dir.display(), "configuration resolved");

    match cli.command {
        Command::Hash {
            question,
            answers,
            voters,
        } => {
            let voters = voters.into_iter().map(Address::new).collect();
            let draft = ElectionParams::new(question, answers, voters)
                .validate()?
                .bind_hash()?;
            println!("hash:  {}", draft.content_hash());
            println!("label: {}", draft.chan_label());
        }
        Command::Show { file } => {
            let election = Election::read_from_file(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            print_election(&election);
        }
        Command::List => {
            let (node, _work) = VotingNode::open(&config, offline)?;
            for election in node.elections().await {
                println!("{}  {}", election.chan_address(), election.question());
            }
        }
        Command::Leave { address } => {
            let (node, _work) = VotingNode::open(&config, offline)?;
            let election = node.leave(&Address::new(address)).await?;
            println!("left {election}");
        }
        Command::Votes { address } => {
            let (node, _work) = VotingNode::open(&config, offline)?;
            for vote in node.votes(&Address::new(address))? {
                println!(
                    "{}  {}  answer {}",
                    vote.received_at, vote.voter_address, vote.answer_index
                );
            }
        }
    }
    Ok(())
}
