//! Command-line front end for schema acquisition and CSV generation.

use anyhow::{Context, bail};
use autoagents_llm::LLMProvider;
use autoagents_llm::backends::anthropic::Anthropic;
use autoagents_llm::backends::openai::OpenAI;
use autoagents_llm::builder::LLMBuilder;
use clap::{Parser, Subcommand};
use log::{debug, info};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::sync::Arc;
use synthschema::config::{AuthorProvider, SynthConfig};
use synthschema::core::{LlmSchemaAuthor, SchemaAuthor, SchemaStore, TemplateAuthor};
use synthschema::{Pipeline, write_csv};

#[derive(Parser, Debug)]
#[command(name = "synthschema", version, about = "Synthetic tabular data from plain-language descriptions")]
struct Cli {
    /// Path to a config file (skips layered discovery)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate records for a description and write them as CSV
    Generate {
        /// Plain-language description of the dataset
        #[arg(long)]
        description: String,
        /// Number of records to generate
        #[arg(long, default_value_t = 10)]
        rows: usize,
        /// Output file (defaults to stdout)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Fixed RNG seed for reproducible records
        #[arg(long)]
        seed: Option<u64>,
        /// Serve keyword templates instead of calling a provider
        #[arg(long)]
        demo: bool,
    },
    /// Print the schema resolved for a description as JSON
    Schema {
        /// Plain-language description of the dataset
        #[arg(long)]
        description: String,
        /// Serve keyword templates instead of calling a provider
        #[arg(long)]
        demo: bool,
    },
    /// Inspect or reset the schema cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand, Debug)]
enum CacheAction {
    /// Print cache statistics as JSON
    Stats,
    /// List cached keys
    Keys,
    /// Remove every cached schema
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_ref())?;

    match cli.command {
        Command::Generate {
            description,
            rows,
            output,
            seed,
            demo,
        } => {
            if demo {
                config.author.provider = AuthorProvider::Demo;
            }
            if seed.is_some() {
                config.generation.seed = seed;
            }
            let pipeline = Pipeline::new(&config, build_author(&config)?)
                .context("failed to initialize pipeline")?;
            let dataset = pipeline
                .generate(&description, rows)
                .await
                .context("failed to generate dataset")?;
            match output {
                Some(path) => {
                    let file = File::create(&path)
                        .with_context(|| format!("failed to create {}", path.display()))?;
                    write_csv(&dataset, BufWriter::new(file)).context("failed to write CSV")?;
                    info!(
                        "wrote dataset (path={}, rows={}, domain={})",
                        path.display(),
                        dataset.len(),
                        dataset.domain
                    );
                }
                None => write_csv(&dataset, io::stdout().lock()).context("failed to write CSV")?,
            }
        }
        Command::Schema { description, demo } => {
            if demo {
                config.author.provider = AuthorProvider::Demo;
            }
            let pipeline = Pipeline::new(&config, build_author(&config)?)
                .context("failed to initialize pipeline")?;
            let schema = pipeline
                .schema(&description)
                .await
                .context("failed to resolve schema")?;
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        Command::Cache { action } => {
            if !config.cache.enabled {
                bail!("schema cache is disabled in the active config");
            }
            let store = SchemaStore::open(&config.cache.path).with_context(|| {
                format!("failed to open schema cache at {}", config.cache.path)
            })?;
            match action {
                CacheAction::Stats => {
                    println!("{}", serde_json::to_string_pretty(&store.stats())?);
                }
                CacheAction::Keys => {
                    for key in store.keys() {
                        println!("{}", key.as_str());
                    }
                }
                CacheAction::Clear => {
                    let removed = store.clear().context("failed to clear schema cache")?;
                    println!("removed {removed} cached schemas");
                }
            }
        }
    }
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<SynthConfig> {
    if let Some(path) = path {
        return SynthConfig::load_from_path(path)
            .with_context(|| format!("failed to load config from {}", path.display()));
    }
    let cwd = std::env::current_dir().context("failed to resolve working directory")?;
    let layered = SynthConfig::load_layered(&cwd).context("failed to load layered config")?;
    debug!("loaded layered config (layers={})", layered.layers.len());
    Ok(layered.config)
}

fn build_author(config: &SynthConfig) -> anyhow::Result<Arc<dyn SchemaAuthor>> {
    let provider = config.author.provider;
    if provider == AuthorProvider::Demo {
        info!("using demo templates for schema authoring");
        return Ok(Arc::new(TemplateAuthor::new()));
    }

    let key_var = config.author.api_key_var();
    let api_key = match std::env::var(key_var) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => bail!("{key_var} is not set; export it or pass --demo"),
    };
    let model = config.author.model.clone();
    let llm: Arc<dyn LLMProvider> = match provider {
        AuthorProvider::Anthropic => LLMBuilder::<Anthropic>::new()
            .api_key(api_key)
            .model(model.clone())
            .build()
            .context("failed to build Anthropic LLM provider")?,
        AuthorProvider::OpenAi | AuthorProvider::Demo => LLMBuilder::<OpenAI>::new()
            .api_key(api_key)
            .model(model.clone())
            .build()
            .context("failed to build OpenAI LLM provider")?,
    };
    info!(
        "schema author ready (provider={}, model={})",
        provider.as_str(),
        model
    );
    Ok(Arc::new(
        LlmSchemaAuthor::new(llm).with_label(format!("{}:{model}", provider.as_str())),
    ))
}
