mod cli;

use clap::Parser;
use framenet_lexicon::ImportOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "framenet_lexicon=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();
    let config = cli::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Init { target, source } => {
            cli::init(&target, &source)?;
        }
        Commands::AddLu {
            lexicon,
            entry,
            source,
        } => {
            cli::add_lu(&config, &lexicon, &entry, &source)?;
        }
        Commands::AddLus {
            lexicon,
            json,
            source,
        } => {
            cli::add_lus(&config, &lexicon, &json, &source)?;
        }
        Commands::RemoveLu { lexicon, id } => {
            cli::remove_lu(&config, &lexicon, id)?;
        }
        Commands::GetLuid {
            lexicon,
            frame,
            lemma,
            pos,
        } => {
            cli::get_luid_command(&lexicon, &frame, &lemma, &pos)?;
        }
        Commands::Check { lexicon, format } => {
            if !cli::check(&lexicon, &format)? {
                std::process::exit(1);
            }
        }
        Commands::Stats {
            lexicon,
            html,
            format,
        } => {
            cli::show_stats(&lexicon, html.as_deref(), &format)?;
        }
        Commands::ImportNaf {
            lexicon,
            naf,
            source,
            corpus,
            description,
            overwrite,
            start_from_scratch,
        } => {
            let options = ImportOptions::new(corpus, description)
                .with_overwrite(overwrite)
                .with_start_from_scratch(start_from_scratch);
            cli::import_naf(&config, &lexicon, &naf, &source, &options)?;
        }
        Commands::Rdf { lexicon, output } => {
            cli::export_rdf(&config, &lexicon, output.as_deref())?;
        }
    }

    Ok(())
}
