use clap::Parser;
use configurator::cli::Cli;
use configurator::config::{watcher::ConfigWatcher, Settings};
use configurator::debounce::Debouncer;
use configurator::evaluate::{evaluate, Evaluation};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let assignments = cli.parsed_assignments().map_err(|e| anyhow::anyhow!(e))?;

    let settings = Settings::new_with_cli(&cli)?;
    let evaluation = evaluate(&settings, &assignments)?;
    print_evaluation(&evaluation)?;

    if !cli.watch {
        return if evaluation.is_valid() {
            Ok(())
        } else {
            let messages: Vec<String> = evaluation.errors.iter().map(|e| e.to_string()).collect();
            Err(anyhow::anyhow!("Validation failed:\n{}", messages.join("\n")))
        };
    }

    let root = cli
        .config
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    let paths = settings.watched_paths(&root);
    let window = Duration::from_millis(settings.form.touch_debounce_ms);

    let cli_for_reload = cli.clone();
    let debouncer = Arc::new(Debouncer::new(window, move || {
        info!("Change detected, re-evaluating...");
        let result = Settings::new_with_cli(&cli_for_reload)
            .and_then(|settings| evaluate(&settings, &assignments))
            .and_then(|evaluation| print_evaluation(&evaluation));
        if let Err(e) = result {
            error!("Failed to re-evaluate form: {}", e);
        }
    }));

    let debouncer_for_watcher = debouncer.clone();
    let _watcher = ConfigWatcher::new(paths, move || debouncer_for_watcher.call())?;

    info!("Watching for changes (debounce {:?}), press Ctrl+C to stop", window);
    tokio::signal::ctrl_c().await?;
    debouncer.cancel();

    Ok(())
}

fn print_evaluation(evaluation: &Evaluation) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(evaluation)?);
    Ok(())
}
