//! Photopress CLI: submit an image to the upload service from the terminal.
//!
//! Set PHOTOPRESS_API_URL (or API_URL) and optionally PHOTOPRESS_API_KEY.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use photopress_api_client::{ApiClient, FormController, UploadOrchestrator};
use photopress_cli::{
    file_preview, init_tracing, load_config, log_state_change, render_outcome, submit_form,
    CheckReport, ConsoleProgress, FormSource,
};
use photopress_core::{validate_form, FileLoadError, UploadLimits};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "photopress", about = "Photopress image upload CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct FormArgs {
    /// Address the processed image is sent to
    #[arg(long, default_value = "")]
    email: String,
    /// Image quality: high, medium or low
    #[arg(long)]
    quality: Option<String>,
    /// Path to the image to upload
    #[arg(long)]
    file: Option<PathBuf>,
    /// Override the content type guessed from the file extension
    #[arg(long)]
    content_type: Option<String>,
}

impl From<FormArgs> for FormSource {
    fn from(args: FormArgs) -> Self {
        Self {
            email: args.email,
            quality: args.quality,
            file: args.file,
            content_type: args.content_type,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the form and upload the image
    Submit {
        #[command(flatten)]
        form: FormArgs,
        /// Credential service base URL
        #[arg(long, env = "PHOTOPRESS_API_URL")]
        api_url: Option<String>,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate the form without contacting the service
    Check {
        #[command(flatten)]
        form: FormArgs,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

async fn submit(form: FormArgs, api_url: Option<String>, json: bool) -> anyhow::Result<ExitCode> {
    let config = load_config(api_url)
        .context("Failed to load configuration. Set PHOTOPRESS_API_URL (or API_URL)")?;
    let client = ApiClient::from_config(&config)?;

    let mut controller =
        FormController::new(UploadOrchestrator::new(client), config.limits.clone())
            .with_observer(Arc::new(log_state_change));
    if !json {
        controller = controller.with_progress(Arc::new(ConsoleProgress));
    }

    let outcome = submit_form(&controller, form.into()).await?;

    if json {
        print_json(&outcome)?;
    } else {
        println!("{}", render_outcome(&outcome));
    }

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn check(form: FormArgs, json: bool) -> anyhow::Result<ExitCode> {
    let limits = UploadLimits::from_env()?;
    let source = FormSource::from(form);

    let result = match source.load_file(&limits) {
        Ok(file) => validate_form(source.into_input(file), &limits),
        Err(FileLoadError::Rejected(err)) => Err(err),
        Err(err) => return Err(err.into()),
    };

    match result {
        Ok(request) => {
            let report = CheckReport::from(&request);
            if json {
                print_json(&report)?;
            } else {
                println!(
                    "Ready to upload {} at quality {} for {}",
                    file_preview(&request.file),
                    report.quality,
                    report.email
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            if json {
                print_json(&serde_json::json!({ "valid": false, "message": err.to_string() }))?;
            } else {
                println!("{}", err);
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Submit {
            form,
            api_url,
            json,
        } => submit(form, api_url, json).await,
        Commands::Check { form, json } => check(form, json),
    }
}
