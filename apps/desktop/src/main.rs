use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{AnonymizerClient, Endpoints, FileDownloadSink, UploadController, UploadForm};
use shared::domain::{AnonymizationParams, SelectedFile};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod console;

use config::{load_settings, Settings};
use console::ConsoleNotifier;

#[derive(Parser, Debug)]
#[command(
    name = "anonymizer",
    about = "Preview CSV headers, mark sensitive columns and download an anonymized copy"
)]
struct Cli {
    /// TOML settings file (defaults to ./anonymizer.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    server_url: Option<String>,
    /// Where anonymized_file.csv is written.
    #[arg(long, global = true)]
    download_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the column headers of a CSV file.
    Preview { file: PathBuf },
    /// Upload a CSV file and save the anonymized result.
    Submit {
        file: PathBuf,
        /// Column to mark as sensitive; repeatable.
        #[arg(long = "column")]
        columns: Vec<String>,
        /// Raw comma-separated sensitive-columns text, applied before --column.
        #[arg(long)]
        sensitive: Option<String>,
        #[command(flatten)]
        params: ParamArgs,
    },
    /// Preview headers, pick sensitive columns by index, then submit.
    Interactive {
        file: PathBuf,
        #[command(flatten)]
        params: ParamArgs,
    },
}

#[derive(Args, Debug)]
struct ParamArgs {
    #[arg(long = "k")]
    k_value: Option<u32>,
    #[arg(long = "m")]
    m_value: Option<u32>,
    #[arg(long = "t")]
    t_value: Option<f64>,
}

impl ParamArgs {
    fn resolve(&self, defaults: AnonymizationParams) -> AnonymizationParams {
        AnonymizationParams {
            k_value: self.k_value.unwrap_or(defaults.k_value),
            m_value: self.m_value.unwrap_or(defaults.m_value),
            t_value: self.t_value.unwrap_or(defaults.t_value),
        }
    }
}

fn build_controller(settings: &Settings) -> Result<Arc<UploadController>> {
    let endpoints = Endpoints::new(
        &settings.server_url,
        &settings.upload_path,
        &settings.preview_path,
    )
    .context("invalid server endpoints")?;
    info!(upload = %endpoints.upload, preview = %endpoints.preview, "using endpoints");

    Ok(UploadController::new(
        Arc::new(AnonymizerClient::new(endpoints.preview)),
        Arc::new(ConsoleNotifier),
        Arc::new(FileDownloadSink::new(settings.download_dir.clone())),
        UploadForm::new(endpoints.upload, settings.params),
    ))
}

fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn run_interactive(controller: &UploadController) -> Result<bool> {
    let Ok(menu) = controller.preview_headers().await else {
        return Ok(false);
    };

    println!("Enter column numbers to mark them sensitive, an empty line to submit, or q to quit.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if line.eq_ignore_ascii_case("q") {
            controller.dismiss_menu();
            return Ok(true);
        }
        for token in line.split([',', ' ']).filter(|token| !token.is_empty()) {
            match token.parse::<usize>().ok().and_then(|index| menu.entry(index)) {
                Some(entry) => {
                    controller.select_menu_entry(entry).await;
                }
                None => eprintln!("no column numbered '{token}'"),
            }
        }
        println!(
            "Sensitive columns: {}",
            controller.sensitive_columns_text().await
        );
    }

    controller.dismiss_menu();
    Ok(controller.handle_form_submit().await.is_ok())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(server_url) = cli.server_url {
        settings.server_url = server_url;
    }
    if let Some(download_dir) = cli.download_dir {
        settings.download_dir = download_dir;
    }
    let controller = build_controller(&settings)?;

    let ok = match cli.command {
        Command::Preview { file } => {
            controller.select_file(SelectedFile::from_path(file)).await;
            controller.preview_headers().await.is_ok()
        }
        Command::Submit {
            file,
            columns,
            sensitive,
            params,
        } => {
            controller.select_file(SelectedFile::from_path(file)).await;
            controller.set_params(params.resolve(settings.params)).await;
            if let Some(raw) = sensitive {
                controller.set_sensitive_columns_text(&raw).await;
            }
            for column in &columns {
                controller.add_sensitive_column(column).await;
            }
            match controller.handle_form_submit().await {
                Ok(path) => {
                    println!("Saved {}", path.display());
                    true
                }
                Err(_) => false,
            }
        }
        Command::Interactive { file, params } => {
            controller.select_file(SelectedFile::from_path(file)).await;
            controller.set_params(params.resolve(settings.params)).await;
            run_interactive(&controller).await?
        }
    };

    Ok(exit_code(ok))
}
