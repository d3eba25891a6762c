use crate::app_state::{AppState, Outcome};
use crate::config::{load_config, AppConfig};
use crate::features::FieldBinding;
use crate::model::ModelHandle;
use crate::web::build_router;
use anyhow::{bail, Context};
use axum::Router;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Top-level CLI interface
#[derive(Parser)]
#[command(name = "irisweb", version, about = "Iris species prediction web front-end")]
pub struct Cli {
    /// Config file (defaults to $IRIS_CONFIG or iris.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load the model and serve the prediction form over HTTP
    Serve {
        /// Host/IP to bind
        #[arg(long)]
        host: Option<String>,
        /// Port to bind
        #[arg(long)]
        port: Option<u16>,
        /// Model artifact to load
        #[arg(long)]
        model: Option<PathBuf>,
        /// How form fields map to features: by_name or positional
        #[arg(long)]
        field_binding: Option<FieldBinding>,
    },

    /// Predict a single sample from the command line
    Predict {
        #[arg(long)]
        model: Option<PathBuf>,
        /// Feature values in the model's feature order
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<String>,
    },

    /// Describe a model artifact
    Inspect {
        #[arg(long)]
        model: Option<PathBuf>,
    },
}

impl Cli {
    /// Load the config and apply any command-line overrides on top.
    pub fn resolve_config(&self) -> anyhow::Result<AppConfig> {
        let mut config = load_config(self.config.as_deref()).context("failed to load config")?;

        match &self.command {
            Commands::Serve {
                host,
                port,
                model,
                field_binding,
            } => {
                if let Some(host) = host {
                    config.host = host.clone();
                }
                if let Some(port) = port {
                    config.port = *port;
                }
                if let Some(model) = model {
                    config.model_path = model.clone();
                }
                if let Some(binding) = field_binding {
                    config.field_binding = *binding;
                }
            }
            Commands::Predict { model, .. } | Commands::Inspect { model } => {
                if let Some(model) = model {
                    config.model_path = model.clone();
                }
            }
        }

        Ok(config)
    }
}

pub async fn dispatch(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve { .. } => serve(config).await,
        Commands::Predict { values, .. } => {
            let model = load_model(&config)?;
            let fields: Vec<(String, String)> = model
                .feature_names()
                .iter()
                .cloned()
                .chain((model.n_features()..values.len()).map(|i| format!("extra_{i}")))
                .zip(values)
                .collect();

            let state = AppState::new(
                &AppConfig {
                    field_binding: FieldBinding::Positional,
                    ..config
                },
                model,
            )?;
            let outcome = state.submit(&fields);
            let text = state.outcome_text(&outcome);
            match outcome {
                Outcome::Predicted(_) => {
                    println!("{text}");
                    Ok(())
                }
                _ => bail!(text),
            }
        }
        Commands::Inspect { .. } => {
            let model = load_model(&config)?;
            let source = model.source().unwrap_or(config.model_path.as_path());
            println!("source:      {}", source.display());
            println!("algorithm:   {}", model.algorithm());
            println!("features:    {}", model.feature_names().join(", "));
            println!("classes:     {}", model.classes().join(", "));
            println!("fingerprint: {}", model.fingerprint());
            Ok(())
        }
    }
}

pub fn load_model(config: &AppConfig) -> anyhow::Result<ModelHandle> {
    ModelHandle::load(&config.model_path).with_context(|| {
        format!(
            "failed to load model artifact {}",
            config.model_path.display()
        )
    })
}

/// Everything `serve` does before binding: load the model and build the
/// router. Fails when the artifact is missing or invalid.
pub fn prepare(config: &AppConfig) -> anyhow::Result<Router> {
    let model = load_model(config)?;
    let state = AppState::new(config, model).context("failed to compile page template")?;
    Ok(build_router(Arc::new(state)))
}

pub async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let app = prepare(&config)?;

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    if config.debug {
        info!("Development mode: debug logging and error detail enabled");
    }
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
