use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use framenet_lexicon::batch::{self, EntryOutcome, LuEntry};
use framenet_lexicon::error::{LexiconError, Result};
use framenet_lexicon::{
    check_consistency, get_luid, rdf, stats, ImportOptions, LexiconConfig, LexiconContext, Lexicon,
};

#[derive(Parser)]
#[command(name = "framenet-lexicon")]
#[command(about = "Consistency-preserving editing of FrameNet-style lexicons")]
#[command(version)]
#[command(after_long_help = r#"
EXAMPLES:
    # Create an empty lexicon from English FrameNet
    framenet-lexicon init ./dfn --source ~/nltk_data/corpora/framenet_v17

    # Add one LU described in a JSON file
    framenet-lexicon add-lu ./dfn president.json --source ~/nltk_data/corpora/framenet_v17

    # Add a batch of LUs
    framenet-lexicon add-lus ./dfn lus.json --source ~/nltk_data/corpora/framenet_v17

    # Look up an LU id
    framenet-lexicon get-luid ./dfn Appellations president N

    # Verify luIndex.xml, frame/*.xml and lu/*.xml agree
    framenet-lexicon check ./dfn

    # Import the frame annotations of a NAF file
    framenet-lexicon import-naf ./dfn wiki_1.naf --source ~/nltk_data/corpora/framenet_v17 \
        --corpus HDD --description HistoricalDistanceData
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an empty lexicon from a source lexicon
    Init {
        /// Directory of the new lexicon (replaced if it exists)
        target: PathBuf,

        /// Source lexicon, e.g. English FrameNet
        #[arg(long)]
        source: PathBuf,
    },

    /// Add one lexical unit described by a JSON object
    AddLu {
        lexicon: PathBuf,

        /// JSON file with one LU entry
        entry: PathBuf,

        /// Source lexicon providing LU templates
        #[arg(long)]
        source: PathBuf,
    },

    /// Add every lexical unit of a {"lus": [...]} JSON file
    AddLus {
        lexicon: PathBuf,

        json: PathBuf,

        /// Source lexicon providing LU templates
        #[arg(long)]
        source: PathBuf,
    },

    /// Remove a lexical unit by id
    RemoveLu { lexicon: PathBuf, id: u64 },

    /// Find the id of an LU by frame, lemma and POS
    GetLuid {
        lexicon: PathBuf,
        frame: String,
        lemma: String,
        pos: String,
    },

    /// Check the three-location invariant
    Check {
        lexicon: PathBuf,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Show descriptive statistics
    Stats {
        lexicon: PathBuf,

        /// Write an HTML report to this file
        #[arg(long)]
        html: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Import the frame annotations of a NAF document as full text
    ImportNaf {
        lexicon: PathBuf,

        naf: PathBuf,

        /// Source lexicon providing fulltextIndex.xml and its stylesheet
        #[arg(long)]
        source: PathBuf,

        /// Short corpus name, e.g. HDD
        #[arg(long)]
        corpus: String,

        /// Corpus description, required to match for a known corpus
        #[arg(long)]
        description: String,

        /// Replace the document if it was imported before
        #[arg(long)]
        overwrite: bool,

        /// Remove all full-text files of the lexicon first
        #[arg(long)]
        start_from_scratch: bool,
    },

    /// Export the lexicon as Lemon N-Triples
    Rdf {
        lexicon: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

fn context(config: &LexiconConfig, source: &Path) -> Result<LexiconContext> {
    LexiconContext::load(config.clone(), source)
}

pub fn init(target: &Path, source: &Path) -> Result<()> {
    let source = Lexicon::load(source)?;
    framenet_lexicon::initialize(target, &source)?;
    println!("Initialized empty lexicon at {}", target.display());
    Ok(())
}

pub fn add_lu(config: &LexiconConfig, lexicon: &Path, entry: &Path, source: &Path) -> Result<()> {
    let context = context(config, source)?;
    let entry = LuEntry::from_json_str(&fs::read_to_string(entry)?)?;
    let request = entry.to_request()?;

    if framenet_lexicon::add_lu(lexicon, &context, &request)? {
        let lexicon = Lexicon::load(lexicon)?;
        let lookup = get_luid(&lexicon, &entry.frame, lemma_of(&entry.lu_name), &entry.pos);
        println!("Added {} to {}: {}", entry.lu_name, entry.frame, lookup);
    } else {
        println!("{} is already part of {}, not added", entry.lu_name, entry.frame);
    }
    Ok(())
}

fn lemma_of(lu_name: &str) -> &str {
    framenet_lexicon::split_lu_name(lu_name)
        .map(|(lemma, _)| lemma)
        .unwrap_or(lu_name)
}

pub fn add_lus(config: &LexiconConfig, lexicon: &Path, json: &Path, source: &Path) -> Result<()> {
    let context = context(config, source)?;
    let batch = batch::read_batch_file(json)?;

    let progress = ProgressBar::new(batch.lus.len() as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}") {
        progress.set_style(style);
    }

    let summary = batch::add_lus(lexicon, &context, &batch.lus, |entry, outcome| {
        progress.set_message(entry.lu_name.clone());
        if let EntryOutcome::Failed(reason) = outcome {
            progress.println(format!("{}: {}", entry.lu_name, reason));
        }
        progress.inc(1);
    })?;
    progress.finish_and_clear();

    println!("Added {} LUs, {} failed", summary.added, summary.failed);
    Ok(())
}

pub fn remove_lu(config: &LexiconConfig, lexicon: &Path, id: u64) -> Result<()> {
    framenet_lexicon::remove_lu(lexicon, config, id)?;
    println!("Removed LU {}", id);
    Ok(())
}

pub fn get_luid_command(lexicon: &Path, frame: &str, lemma: &str, pos: &str) -> Result<()> {
    let lexicon = Lexicon::load(lexicon)?;
    let lookup = get_luid(&lexicon, frame, lemma, pos);
    match lookup.id() {
        Some(id) => println!("{}", id),
        None => println!("{}", lookup.reason()),
    }
    Ok(())
}

/// Prints the consistency report; returns whether the lexicon is consistent.
pub fn check(lexicon: &Path, format: &str) -> Result<bool> {
    let report = check_consistency(lexicon)?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.is_consistent() {
        println!("{} LUs checked, lexicon is consistent", report.checked);
    } else {
        println!(
            "{} LUs checked, {} inconsistent:",
            report.checked,
            report.issues.len()
        );
        for issue in &report.issues {
            println!("  {}", issue);
        }
    }
    Ok(report.is_consistent())
}

pub fn show_stats(lexicon: &Path, html: Option<&Path>, format: &str) -> Result<()> {
    let lexicon = Lexicon::load(lexicon)?;

    if let Some(path) = html {
        fs::write(path, stats::stats_html(&lexicon))?;
        println!("Written the descriptive statistics to {}", path.display());
        return Ok(());
    }

    let tables = stats::all_stats(&lexicon);
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&tables)?);
        return Ok(());
    }

    for table in tables {
        println!("{}", table.title);
        println!("  {:<32} {}", table.headers[0], table.headers[1]);
        for (label, value) in &table.rows {
            println!("  {:<32} {}", label, value);
        }
        println!();
    }
    Ok(())
}

pub fn import_naf(
    config: &LexiconConfig,
    lexicon: &Path,
    naf: &Path,
    source: &Path,
    options: &ImportOptions,
) -> Result<()> {
    let context = context(config, source)?;
    let summary = framenet_lexicon::import_naf(lexicon, &context, naf, options)?;
    println!(
        "Written {} sentences and {} annotation sets to {} ({} predicates skipped)",
        summary.sentences,
        summary.annotation_sets,
        summary.document.display(),
        summary.skipped
    );
    Ok(())
}

pub fn export_rdf(config: &LexiconConfig, lexicon: &Path, output: Option<&Path>) -> Result<()> {
    let loaded = Lexicon::load(lexicon)?;
    let context = LexiconContext::new(config.clone(), loaded.clone());
    let triples = rdf::export_ntriples(&loaded, &context)?;

    match output {
        Some(path) => {
            fs::write(path, triples)?;
            println!("Written RDF to {}", path.display());
        }
        None => print!("{}", triples),
    }
    Ok(())
}

pub fn load_config(path: Option<&Path>) -> Result<LexiconConfig> {
    LexiconConfig::load_or_default(path).map_err(|e| match e {
        LexiconError::Io(io) => LexiconError::Config(format!(
            "cannot read {}: {}",
            path.map(|p| p.display().to_string()).unwrap_or_default(),
            io
        )),
        other => other,
    })
}
