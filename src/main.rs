use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use pitchcrew::{
    AgentConfig, HumanReport, OpenAiClient, OpenAiConfig, ServerConfig, analyze_deck, read_deck,
    run_server, segment_deck, write_json_report,
};

#[derive(Parser)]
#[command(name = "pitchcrew")]
#[command(author, version, about = "Pitch deck feedback from clarity and investor agents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the analysis API over HTTP
    Serve {
        /// Address to bind
        #[arg(long, env = "BIND", default_value = "0.0.0.0")]
        bind: String,

        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value = "3000")]
        port: u16,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Analyze a deck file and write the feedback report
    Analyze {
        /// Deck text file, or - for stdin
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the JSON report (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output file for a human-readable report (text)
        #[arg(long)]
        human_readable: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show how a deck is split into slides without calling the model
    Segment {
        /// Deck text file, or - for stdin
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            bind,
            port,
            verbose,
        } => {
            setup_logging(verbose);
            let client = OpenAiClient::new(OpenAiConfig::from_env()?);
            run_server(ServerConfig { bind, port }, client, AgentConfig::default()).await
        }
        Commands::Analyze {
            input,
            output,
            human_readable,
            verbose,
        } => {
            setup_logging(verbose);
            analyze_file(input, output, human_readable).await
        }
        Commands::Segment { input } => {
            setup_logging(false);
            segment_file(input)
        }
    }
}

fn setup_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    subscriber.try_init().ok();
}

async fn analyze_file(
    input: PathBuf,
    output: Option<PathBuf>,
    human_readable: Option<PathBuf>,
) -> Result<()> {
    info!("Loading deck from {:?}", input);
    let deck = read_deck(&input)?;

    let client = OpenAiClient::new(OpenAiConfig::from_env()?);
    let feedback = analyze_deck(&client, &deck, &AgentConfig::default()).await;

    match output {
        Some(path) => {
            write_json_report(&feedback, &path)?;
            info!("Report written to {:?}", path);
        }
        None => {
            let json =
                serde_json::to_string_pretty(&feedback).context("Failed to serialize report")?;
            println!("{}", json);
        }
    }

    if let Some(path) = human_readable {
        HumanReport::new(&feedback).write_file(&path)?;
        info!("Human-readable report written to {:?}", path);
    }

    Ok(())
}

fn segment_file(input: PathBuf) -> Result<()> {
    let deck = read_deck(&input)?;
    let slides = segment_deck(&deck);

    println!("{} slides", slides.len());
    for slide in &slides {
        println!("[{}] {:<15} {}", slide.id, slide.slide_type.as_str(), slide.title);
    }

    Ok(())
}
