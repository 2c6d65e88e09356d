use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use dialoguer::{Confirm, Input};
use indicatif::ProgressBar;

use airstore::api::{ExtractionApi, HttpExtractionApi};
use airstore::cli::{Cli, Commands};
use airstore::config::Config;
use airstore::error::AirStoreError;
use airstore::review::{self, ReviewAction};
use airstore::workflow::{Workflow, WorkflowFailure, WorkflowState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load().context("failed to load configuration")?;

    match cli.command {
        Commands::Upload { image, yes } => {
            run_upload(&config, &image, yes, cli.verbose).await?;
        }

        Commands::Config { set_api_url, show } => {
            let mut config = config;

            if let Some(url) = set_api_url {
                config
                    .set_api_url(url)
                    .context("failed to save configuration")?;
                println!("✔ API URL saved");
            }

            if show {
                println!("Configuration:");
                println!("  api url: {}", config.api_url());
                println!("  timeout: {}s", config.timeout_seconds);
                println!("  size guidance: {}MB", config.max_image_mb);
                println!("  config file: {}", Config::config_path()?.display());
            }
        }
    }

    Ok(())
}

async fn run_upload(config: &Config, image: &Path, yes: bool, verbose: bool) -> anyhow::Result<()> {
    println!("📒 airstore - ledger upload\n");

    let api = HttpExtractionApi::new(config.api_url(), Duration::from_secs(config.timeout_seconds))?;
    if verbose {
        println!("- backend: {}", api.base_url());
    }
    let mut workflow = Workflow::new(api);

    workflow
        .select_file(image)
        .with_context(|| format!("cannot select {}", image.display()))?;
    announce_selection(&workflow, config);

    loop {
        let saved = run_record(&mut workflow, yes, verbose).await?;
        if !saved || yes {
            return Ok(());
        }

        if !prompt_yes_no("Upload another page?")? {
            return Ok(());
        }
        workflow.reset_after_success()?;

        loop {
            let path: String = Input::new()
                .with_prompt("image path")
                .interact_text()
                .map_err(|e| AirStoreError::Prompt(e.to_string()))?;
            match workflow.select_file(Path::new(path.trim())) {
                Ok(()) => break,
                Err(err) => println!("  ✗ {}", err),
            }
        }
        announce_selection(&workflow, config);
    }
}

/// Drive one selected image through upload, review, and confirm.
///
/// Returns `Ok(true)` when the entries were saved, `Ok(false)` when the
/// user discarded or quit. In `--yes` mode failures become hard errors
/// instead of recovery prompts.
async fn run_record<A: ExtractionApi>(
    workflow: &mut Workflow<A>,
    yes: bool,
    verbose: bool,
) -> anyhow::Result<bool> {
    loop {
        let spinner = spinner("Running extraction...");
        workflow.upload().await?;
        spinner.finish_and_clear();

        match workflow.state() {
            WorkflowState::Reviewing => break,
            WorkflowState::Failed(WorkflowFailure::Upload(message)) => {
                println!("✗ {}", message);
                if yes {
                    return Err(AirStoreError::UploadFailed(message.clone()).into());
                }
                if !prompt_yes_no("Retry upload?")? {
                    return Ok(false);
                }
            }
            _ => break,
        }
    }

    if let Some(draft) = workflow.draft().get() {
        if verbose {
            println!("- record id: {}", draft.record_id());
        }
        println!("✔ Extracted {} entries\n", draft.len());
    }

    loop {
        if *workflow.state() == WorkflowState::Reviewing && !yes {
            loop {
                let entries = workflow.draft().snapshot();
                println!("{}", review::render_entries(&entries));
                match review::prompt_action(entries.len())? {
                    ReviewAction::Edit {
                        index,
                        field,
                        value,
                    } => workflow.edit_entry(index, field, value)?,
                    ReviewAction::Discard => {
                        workflow.discard()?;
                        println!("✔ Draft discarded");
                        return Ok(false);
                    }
                    ReviewAction::Confirm => break,
                    ReviewAction::Quit => {
                        println!("Nothing was saved.");
                        return Ok(false);
                    }
                }
            }
        }

        let spinner = spinner("Pushing to AirStore...");
        workflow.confirm().await?;
        spinner.finish_and_clear();

        match workflow.state() {
            WorkflowState::Succeeded => {
                println!("✅ Entries saved\n");
                return Ok(true);
            }
            WorkflowState::Failed(WorkflowFailure::Confirm(message)) => {
                println!("✗ {}", message);
                if yes {
                    return Err(AirStoreError::ConfirmFailed(message.clone()).into());
                }
                match prompt_confirm_recovery()? {
                    ConfirmRecovery::Retry => {}
                    ConfirmRecovery::Edit => workflow.resume_review()?,
                    ConfirmRecovery::Quit => {
                        println!("Draft left unconfirmed; nothing was saved.");
                        return Ok(false);
                    }
                }
            }
            _ => return Ok(false),
        }
    }
}

fn announce_selection<A: ExtractionApi>(workflow: &Workflow<A>, config: &Config) {
    let Some(file) = workflow.selected_file() else {
        return;
    };
    println!(
        "✔ Selected {} ({}x{}, {} KB)",
        file.file_name,
        file.preview.width,
        file.preview.height,
        file.size_bytes() / 1024
    );
    if file.exceeds_mb(config.max_image_mb) {
        println!(
            "⚠ Image exceeds the {}MB guidance; extraction may be slow or rejected",
            config.max_image_mb
        );
    }
}

enum ConfirmRecovery {
    Retry,
    Edit,
    Quit,
}

fn prompt_confirm_recovery() -> airstore::Result<ConfirmRecovery> {
    loop {
        let input: String = Input::new()
            .with_prompt("confirm failed ([r]etry / [e]dit / [q]uit)")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| AirStoreError::Prompt(e.to_string()))?;

        match input.trim() {
            "" | "r" | "retry" => return Ok(ConfirmRecovery::Retry),
            "e" | "edit" => return Ok(ConfirmRecovery::Edit),
            "q" | "quit" => return Ok(ConfirmRecovery::Quit),
            other => println!("  ✗ Unknown choice: {}", other),
        }
    }
}

fn prompt_yes_no(prompt: &str) -> airstore::Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(true)
        .interact()
        .map_err(|e| AirStoreError::Prompt(e.to_string()))
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
