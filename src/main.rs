//! # tarjama
//!
//! Renders Arabic organization names as business-style English and hands any
//! other text to an LLM-backed sentence translator.
//!
//! ## Usage
//!
//! ```text
//! # Route automatically between the name renderer and the translator
//! cargo run -- translate "شركة الخليج للتجارة"
//!
//! # Show how a text would be routed
//! cargo run -- route "هل تعمل الشركة اليوم؟"
//!
//! # Translate a file with one input per line into JSON lines
//! cargo run -- batch --input names.txt --output names.jsonl
//! ```
//!
//! Translator settings come from the environment (see `environment::Config`);
//! command-line flags override them.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use tarjama::batch::{read_inputs, translate_batch, write_rows};
use tarjama::environment::{Config, LlmBackend};
use tarjama::logging::{configure_logging, DEFAULT_FILTER, VERBOSE_FILTER};
use tarjama::routing::{explain, translate_smart};
use tarjama::text::{normalize, transliterate_token, TranslitOptions};
use tarjama::{LlmTranslator, OrgNameRenderer};

#[derive(Parser)]
#[clap(name = "tarjama", about = "Arabic organization names to English")]
struct Cli {
    /// JSON rule tables replacing the built-in ones
    #[clap(long, global = true)]
    tables: Option<PathBuf>,

    /// Log routing and rendering decisions
    #[clap(short, long, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render names, translate everything else
    Translate {
        #[clap(required = true)]
        text: String,

        #[clap(flatten)]
        llm: LlmArgs,
    },

    /// Render text as an organization name, skipping the router
    Render {
        #[clap(required = true)]
        text: String,
    },

    /// Print the routing report as JSON
    Route {
        #[clap(required = true)]
        text: String,
    },

    /// Phonetically transliterate each token
    Translit {
        #[clap(required = true)]
        text: String,

        /// Keep the literal "al-" before sun letters
        #[clap(long)]
        no_assimilation: bool,

        /// Keep a final ta marbuta as "t"
        #[clap(long)]
        no_ta_marbuta: bool,

        /// Do not double letters carrying a shadda
        #[clap(long)]
        no_gemination: bool,
    },

    /// Print the normalized text
    Normalize {
        #[clap(required = true)]
        text: String,
    },

    /// Translate a file with one input per line, writing JSON lines
    Batch {
        /// Input file
        #[clap(short, long)]
        input: PathBuf,

        /// Output file (stdout when omitted)
        #[clap(short, long)]
        output: Option<PathBuf>,

        /// Concurrent translator requests
        #[clap(short, long, default_value = "4")]
        concurrency: usize,

        #[clap(flatten)]
        llm: LlmArgs,
    },
}

#[derive(clap::Args)]
struct LlmArgs {
    /// LLM backend: ollama or openai
    #[clap(long)]
    llm_type: Option<String>,

    /// Model name
    #[clap(long)]
    model: Option<String>,

    /// Per-request timeout in seconds
    #[clap(long)]
    timeout: Option<u64>,
}

impl LlmArgs {
    fn apply(&self, config: &mut Config) -> Result<()> {
        if let Some(llm_type) = &self.llm_type {
            config.backend = LlmBackend::parse(llm_type)?;
        }
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(secs) = self.timeout {
            config.request_timeout = Duration::from_secs(secs);
        }
        Ok(())
    }
}

fn build_translator(config: &Config, llm: &LlmArgs) -> Result<LlmTranslator> {
    let mut config = config.clone();
    llm.apply(&mut config)?;
    let params = config.llm_params()?;
    info!("Using {:?} model '{}' for sentence translation", config.backend, config.model);
    Ok(LlmTranslator::new(params, config.request_timeout))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(path) = cli.tables {
        config.tables_path = Some(path);
    }

    let filter = if cli.verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    configure_logging(config.log_dir.as_deref(), filter);

    let tables = config.load_tables()?;
    let renderer = OrgNameRenderer::new(&tables);

    match cli.command {
        Commands::Translate { text, llm } => {
            let translator = build_translator(&config, &llm)?;
            let output = translate_smart(&text, &renderer, &translator).await?;
            println!("{}", output);
        }
        Commands::Render { text } => {
            println!("{}", renderer.render(&text));
        }
        Commands::Route { text } => {
            let report = explain(&text, &renderer);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Translit {
            text,
            no_assimilation,
            no_ta_marbuta,
            no_gemination,
        } => {
            let options = TranslitOptions {
                assimilate_article: !no_assimilation,
                ta_marbuta_as_a: !no_ta_marbuta,
                double_for_gemination: !no_gemination,
            };
            // Tokens keep their diacritics so gemination marks survive
            let output = text
                .split_whitespace()
                .map(|token| transliterate_token(token, options))
                .collect::<Vec<_>>()
                .join(" ");
            println!("{}", output);
        }
        Commands::Normalize { text } => {
            println!("{}", normalize(&text));
        }
        Commands::Batch {
            input,
            output,
            concurrency,
            llm,
        } => {
            let translator = build_translator(&config, &llm)?;
            let file = File::open(&input)
                .with_context(|| format!("Failed to open {}", input.display()))?;
            let inputs = read_inputs(BufReader::new(file))?;
            info!("Translating {} inputs from {}", inputs.len(), input.display());

            let rows = translate_batch(inputs, &renderer, &translator, concurrency).await;

            match output {
                Some(path) => {
                    let file = File::create(&path)
                        .with_context(|| format!("Failed to create {}", path.display()))?;
                    write_rows(&rows, BufWriter::new(file))?;
                }
                None => write_rows(&rows, io::stdout().lock())?,
            }
        }
    }

    Ok(())
}
