use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use synapse_core::{BrainConfig, NeuronSourceType, PromptBlockRef, QuerySpec, SynapseConfig};
use synapse_registry::personas::seed_defaults;
use synapse_registry::{BrainRegistry, PromptBlockRecord, PromptBlockRegistry, RegistryStore};
use synapse_retrieval::providers::{MockProvider, OpenAiClient};
use synapse_retrieval::{BrainSession, CompletionParams, LlmClient};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the synapse config file
    #[arg(short, long, default_value = "synapse.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register a brain over a corpus
    Register {
        /// Brain name (registry key)
        name: String,
        /// Filesystem path or registry name, depending on --source-type
        source: String,
        #[arg(long, value_enum, default_value_t = SourceTypeArg::Directory)]
        source_type: SourceTypeArg,
        /// Maximum characters per neuron before a file source is split
        #[arg(long, default_value_t = synapse_core::DEFAULT_CHUNK_MAX)]
        chunk_max: usize,
    },
    /// List registered brains
    Brains,
    /// Delete a registered brain
    Forget { name: String },
    /// Query a brain and print the synthesized instructions
    Query {
        /// Brain name
        brain: String,
        /// Question text
        query: String,
        /// Persona id to apply
        #[arg(long)]
        persona: Option<String>,
        /// Mode id to apply
        #[arg(long)]
        mode: Option<String>,
    },
    /// Manage personas
    Persona {
        #[command(subcommand)]
        command: PromptBlockCommand,
    },
    /// Manage modes
    Mode {
        #[command(subcommand)]
        command: PromptBlockCommand,
    },
    /// Install the default personas and modes
    Seed,
}

#[derive(Subcommand, Debug)]
enum PromptBlockCommand {
    Add {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        prompt_block: String,
    },
    Show { id: String },
    List,
    Delete { id: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SourceTypeArg {
    Directory,
    File,
    RegistryKeys,
    EntireRegistry,
}

impl From<SourceTypeArg> for NeuronSourceType {
    fn from(arg: SourceTypeArg) -> Self {
        match arg {
            SourceTypeArg::Directory => NeuronSourceType::Directory,
            SourceTypeArg::File => NeuronSourceType::File,
            SourceTypeArg::RegistryKeys => NeuronSourceType::RegistryKeys,
            SourceTypeArg::EntireRegistry => NeuronSourceType::EntireRegistry,
        }
    }
}

fn build_client(config: &SynapseConfig) -> Result<Arc<dyn LlmClient>> {
    match config.llm.provider.as_str() {
        "openai" => Ok(Arc::new(OpenAiClient::new(
            &config.llm.model,
            config.llm.base_url.as_deref(),
        )?)),
        "mock" => Ok(Arc::new(MockProvider::new(&config.llm.model))),
        other => bail!("Unknown LLM provider '{}'", other),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let config = SynapseConfig::load_or_default(&args.config);
    let store = RegistryStore::new(&config.storage.registry_dir);
    let brains = BrainRegistry::new(store.clone());

    match args.command {
        Command::Register {
            name,
            source,
            source_type,
            chunk_max,
        } => {
            let source_type = NeuronSourceType::from(source_type);
            if matches!(
                source_type,
                NeuronSourceType::Directory | NeuronSourceType::File
            ) && !PathBuf::from(&source).exists()
            {
                bail!("Source path does not exist: {}", source);
            }
            let cfg = BrainConfig::new(&name, source_type, source, chunk_max)?;
            brains.register(&cfg)?;
            println!("Registered brain '{}'", name);
        }
        Command::Brains => {
            for name in brains.list()? {
                let cfg = brains.get_config(&name)?;
                println!(
                    "{}  ({} -> {}, chunk_max {})",
                    name,
                    cfg.source_type.as_str(),
                    cfg.neuron_source,
                    cfg.chunk_max
                );
            }
        }
        Command::Forget { name } => {
            brains.delete(&name)?;
            println!("Deleted brain '{}'", name);
        }
        Command::Query {
            brain,
            query,
            persona,
            mode,
        } => {
            let client = build_client(&config)?;
            let params = CompletionParams {
                max_tokens: config.llm.max_tokens,
                temperature: config.llm.temperature,
            };

            let mut spec = QuerySpec::new(&brain, &query);
            if let Some(id) = persona {
                spec = spec.with_persona(PromptBlockRef::Id(id));
            }
            if let Some(id) = mode {
                spec = spec.with_mode(PromptBlockRef::Id(id));
            }

            info!(brain = %brain, "Querying brain");
            let mut session = BrainSession::new(store, client, params);
            let report = session.query(&spec.encode(), None).await?;
            eprintln!(
                "[{} neurons considered, {} relevant]",
                report.considered, report.relevant
            );
            println!("{}", report.answer);
        }
        Command::Persona { command } => {
            run_prompt_block_command(PromptBlockRegistry::personas(store), command)?;
        }
        Command::Mode { command } => {
            run_prompt_block_command(PromptBlockRegistry::modes(store), command)?;
        }
        Command::Seed => {
            let written = seed_defaults(&store)?;
            println!("Seeded {} default personas and modes", written);
        }
    }

    Ok(())
}

fn run_prompt_block_command(
    registry: PromptBlockRegistry,
    command: PromptBlockCommand,
) -> Result<()> {
    match command {
        PromptBlockCommand::Add {
            id,
            name,
            description,
            prompt_block,
        } => {
            registry.add(
                &id,
                &PromptBlockRecord {
                    name,
                    description,
                    prompt_block,
                },
            )?;
            println!("Added '{}'", id);
        }
        PromptBlockCommand::Show { id } => {
            let record = registry.get(&id)?;
            // Public-facing view: name and description, not the prompt text.
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "id": id,
                    "name": record.name,
                    "description": record.description,
                }))?
            );
        }
        PromptBlockCommand::List => {
            for id in registry.list()? {
                println!("{}", id);
            }
        }
        PromptBlockCommand::Delete { id } => {
            registry.delete(&id)?;
            println!("Deleted '{}'", id);
        }
    }
    Ok(())
}
