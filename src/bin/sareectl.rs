use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde_json::Value;

use saree_relay::prompt::assembler::ReferenceImages;
use saree_relay::prompt::templates::{self, Stage};
use saree_relay::studio::{self, MotifBatch, Rendering};
use saree_relay::utils::data_uri::InlineImage;
use saree_relay::utils::state_ops::build_state;
use saree_relay::{status, Config, GeminiClient, StatusStore};

#[derive(Parser, Debug)]
#[command(name = "sareectl", about = "CLI for the saree design relay", version)]
struct Cli {
    /// Override GOOGLE_API_KEY
    #[arg(global = true, long)]
    api_key: Option<String>,

    /// Override IMAGE_MODEL
    #[arg(global = true, long)]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a batch of motif options for one section
    Motifs {
        /// Section the motifs are for
        #[arg(long, value_parser = clap::builder::PossibleValuesParser::new(templates::SECTIONS))]
        section: String,
        /// Design keyword, e.g. Peacock
        #[arg(long)]
        keyword: String,
        /// Explicit prompt; defaults to the section's motif template
        #[arg(long, value_name = "TEXT")]
        prompt: Option<String>,
        /// Number of motifs to request
        #[arg(long, default_value_t = 4)]
        count: u32,
        /// Template inputs as key=value (repeatable), e.g. `zari=Silver`
        #[arg(long = "var", value_name = "KEY=VALUE")]
        vars: Vec<String>,
        /// Directory for generated images
        #[arg(long, value_name = "DIR", default_value = "motifs")]
        out_dir: PathBuf,
    },
    /// Render the final photographic design
    Finalize {
        #[command(flatten)]
        design: DesignArgs,
    },
    /// Render the first preview from section colors and zari alone
    Initial {
        #[command(flatten)]
        design: DesignArgs,
    },
    /// Render a live preview
    Preview {
        #[command(flatten)]
        design: DesignArgs,
    },
    /// Status log operations
    Status {
        #[command(subcommand)]
        cmd: StatusCmd,
    },
}

#[derive(clap::Args, Debug)]
struct DesignArgs {
    /// Explicit prompt; defaults to the design template rendered from --state
    #[arg(long, value_name = "TEXT")]
    prompt: Option<String>,
    /// Design state as dotted paths (repeatable), e.g. `body.color=#8B0000`
    #[arg(long = "state", value_name = "PATH=VALUE")]
    state: Vec<String>,
    /// Extra guidance appended to the templated prompt
    #[arg(long, value_name = "TEXT")]
    extra: Option<String>,
    /// Border reference image file
    #[arg(long, value_name = "PATH")]
    border: Option<PathBuf>,
    /// Body reference image file
    #[arg(long, value_name = "PATH")]
    body: Option<PathBuf>,
    /// Pallu reference image file
    #[arg(long, value_name = "PATH")]
    pallu: Option<PathBuf>,
    /// Output image path
    #[arg(long, value_name = "PATH", default_value = "saree.png")]
    out: PathBuf,
}

#[derive(Subcommand, Debug)]
enum StatusCmd {
    /// Record a status check
    Create {
        #[arg(long)]
        client_name: String,
    },
    /// List recorded status checks
    List {
        /// Output raw JSON instead of pretty lines
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    Config::dotenv_load();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("saree_relay=warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut conf = Config::new()?;
    if let Some(key) = cli.api_key {
        conf.image_api_key = Some(key);
    }
    if let Some(model) = cli.model {
        conf.image_model = model;
    }
    let client = GeminiClient::new(conf.image_api_url.clone(), conf.image_model.clone(), conf.image_api_key.clone());
    let policy = conf.generation_policy();

    match cli.command {
        Commands::Motifs { section, keyword, prompt, count, vars, out_dir } => {
            let prompt = match prompt {
                Some(p) => p,
                None => {
                    let mut inputs = build_state(&vars)?;
                    if let Some(obj) = inputs.as_object_mut() {
                        obj.insert("keyword".to_string(), Value::String(keyword.clone()));
                    }
                    templates::motif_prompt(&section, &inputs)?
                }
            };
            let batch = studio::generate_motifs(&client, &prompt, count, &section, &keyword, &policy).await;
            match batch {
                MotifBatch::Generated(images) => {
                    tokio::fs::create_dir_all(&out_dir).await?;
                    let stem = keyword.to_lowercase().replace(' ', "_");
                    for (i, image) in images.iter().enumerate() {
                        let path = out_dir.join(format!("{}_{}_{}.{}", section, stem, i + 1, extension_for(&image.mime_type)));
                        tokio::fs::write(&path, &image.bytes).await?;
                        println!("Saved {} ({} bytes)", path.display(), image.bytes.len());
                    }
                }
                MotifBatch::Degraded { placeholders, reason } => {
                    eprintln!("No motifs generated: {}", reason);
                    for url in placeholders {
                        println!("{}", url);
                    }
                    std::process::exit(1);
                }
            }
            Ok(())
        }
        Commands::Finalize { design } => run_design(&client, &policy, design, Stage::Final).await,
        Commands::Initial { design } => run_design(&client, &policy, design, Stage::Initial).await,
        Commands::Preview { design } => run_design(&client, &policy, design, Stage::Preview).await,
        Commands::Status { cmd } => {
            let store = status::open_store(&conf.database_url).await?;
            run_status(store.as_ref(), cmd).await
        }
    }
}

/// Runs `cmd` against `store`, closing the store whether or not `cmd` succeeded.
async fn run_status(store: &dyn StatusStore, cmd: StatusCmd) -> Result<(), Box<dyn std::error::Error>> {
    let result = async {
        match cmd {
            StatusCmd::Create { client_name } => {
                let record = store.create(&client_name).await?;
                println!("{}", serde_json::to_string_pretty(&record)?);
            }
            StatusCmd::List { json } => {
                let records = store.list().await?;
                if json {
                    println!("{}", serde_json::to_string(&records)?);
                } else {
                    for r in records {
                        println!("{}  {}  {}", r.timestamp.to_rfc3339(), r.id, r.client_name);
                    }
                }
            }
        }
        Ok::<(), Box<dyn std::error::Error>>(())
    }
    .await;
    store.close().await;
    result
}

async fn run_design(
    client: &GeminiClient,
    policy: &studio::GenerationPolicy,
    design: DesignArgs,
    stage: Stage,
) -> Result<(), Box<dyn std::error::Error>> {
    let images = ReferenceImages {
        body: read_reference(design.body.as_deref()).await?,
        border: read_reference(design.border.as_deref()).await?,
        pallu: read_reference(design.pallu.as_deref()).await?,
    };
    let state = build_state(&design.state)?;
    let prompt = match design.prompt {
        Some(p) => p,
        None => templates::design_prompt(&state, stage, Some(&images), design.extra.as_deref())?,
    };

    let rendering = match stage {
        Stage::Final => studio::finalize(client, &prompt, Some(&images), policy).await,
        Stage::Initial | Stage::Preview => studio::preview(client, &prompt, Some(&images), policy).await,
    };
    match rendering {
        Rendering::Generated(image) => {
            tokio::fs::write(&design.out, &image.bytes).await?;
            println!("Saved {} ({} bytes, {})", design.out.display(), image.bytes.len(), image.mime_type);
            Ok(())
        }
        Rendering::Degraded { placeholder, reason } => {
            eprintln!("Generation failed: {}", reason);
            if let Some(url) = placeholder {
                println!("{}", url);
            }
            std::process::exit(1);
        }
    }
}

async fn read_reference(path: Option<&Path>) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let Some(path) = path else { return Ok(None) };
    let bytes = tokio::fs::read(path).await?;
    let mime = mime_guess::from_path(path).first_or(mime_guess::mime::IMAGE_PNG);
    Ok(Some(InlineImage::new(mime.essence_str(), bytes).to_data_uri()))
}

fn extension_for(mime: &str) -> &'static str {
    match mime {
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "png",
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use saree_relay::status::StatusRecord;
    use saree_relay::{AppError, AppResult};

    use super::*;

    #[derive(Default)]
    struct BrokenStore {
        closed: AtomicBool,
    }

    #[async_trait]
    impl StatusStore for BrokenStore {
        async fn create(&self, _client_name: &str) -> AppResult<StatusRecord> {
            Err(AppError::Database(sqlx::Error::PoolClosed))
        }

        async fn list(&self) -> AppResult<Vec<StatusRecord>> {
            Err(AppError::Database(sqlx::Error::PoolClosed))
        }

        async fn close(&self) {
            self.closed.store(true, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_store_is_closed_when_command_fails() {
        let store = BrokenStore::default();
        assert!(run_status(&store, StatusCmd::List { json: true }).await.is_err());
        assert!(store.closed.load(Ordering::SeqCst));

        let store = BrokenStore::default();
        let cmd = StatusCmd::Create { client_name: "alice".into() };
        assert!(run_status(&store, cmd).await.is_err());
        assert!(store.closed.load(Ordering::SeqCst));
    }

    #[test]
    fn test_extension_for_known_types() {
        assert_eq!(extension_for("image/jpeg"), "jpg");
        assert_eq!(extension_for("image/png"), "png");
        assert_eq!(extension_for("application/octet-stream"), "png");
    }
}
