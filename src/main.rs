use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use msc::export::export_cypher_dump;
use msc::{SimplePreprocessor, StopWords, StorageBackend, Summarizer, SummarizerConfig, WeigherKind};

const SAMPLE: [&str; 4] = [
    "The wife of a former U.S. president Bill Clinton, Hillary Clinton, visited China last Monday.",
    "Hillary Clinton wanted to visit China last month but postponed her plans till Monday last week.",
    "Hillary Clinton paid a visit to the People Republic of China on Monday.",
    "Last week the Secretary State Ms. Clinton visited Chinese officials.",
];

#[derive(Parser, Debug)]
#[command(name = "msc", about = "Summarize related sentences into one via a word graph")]
struct Cli {
    /// Input file, one block of text per line (defaults to a built-in sample)
    #[arg(long)]
    input: Option<PathBuf>,
    /// Stop-word list, one word per line (defaults to a built-in English list)
    #[arg(long)]
    stop_words: Option<PathBuf>,
    /// Path to config file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Edge weigher, overrides the config file
    #[arg(long)]
    weigher: Option<WeigherKind>,
    /// Write a Cypher dump of the word graph here after the run
    #[arg(long)]
    dump: Option<PathBuf>,
    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let mut config = match &cli.config {
        Some(path) => SummarizerConfig::load(path)?,
        None => SummarizerConfig::default(),
    };
    if let Some(weigher) = cli.weigher {
        config.weigher = weigher;
    }

    let sentences = match &cli.input {
        Some(path) => read_blocks(path)?,
        None => SAMPLE.iter().map(|s| s.to_string()).collect(),
    };
    let stop_words = match &cli.stop_words {
        Some(path) => StopWords::load(path)?,
        None => StopWords::english(),
    };

    let summarizer = Summarizer::from_config(&config, Arc::new(SimplePreprocessor::new()))?;
    match summarizer.process(&sentences, &stop_words)? {
        Some(summary) => println!(" >> {summary}"),
        None => info!("No summary available."),
    }

    if let Some(path) = &cli.dump {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        export_cypher_dump(summarizer.graph().backend(), &mut writer)?;
        writer.flush()?;
        info!(path = %path.display(), "word graph dumped");
    }
    summarizer.graph().backend().shutdown()?;
    Ok(())
}

fn read_blocks(path: &Path) -> anyhow::Result<Vec<String>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(text.lines().map(str::trim).filter(|l| !l.is_empty()).map(String::from).collect())
}
