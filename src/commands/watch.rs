use super::load_config;
use super::summary::{print_report, print_view};
use colored::*;
use election_map::live::{poll, FileSource};
use election_map::LiveResults;
use std::path::Path;
use std::time::Duration;

/// Polls a payload file until interrupted or `cycles` have run.
pub async fn watch(
    config_path: Option<&Path>,
    source_path: &Path,
    interval_secs: u64,
    cycles: Option<u64>,
    json: bool,
) -> election_map::Result<()> {
    let mut live = LiveResults::new(load_config(config_path)?)?;
    let mut source = FileSource::new(source_path);

    println!(
        "👀 Watching {} every {}s",
        source_path.display().to_string().bright_cyan(),
        interval_secs
    );

    let polling = poll(
        &mut live,
        &mut source,
        Duration::from_secs(interval_secs.max(1)),
        cycles,
        |live, outcome| match outcome {
            Ok(report) => {
                print_report(report);
                let view = live.view();
                if json {
                    match serde_json::to_string(view.as_ref()) {
                        Ok(text) => println!("{}", text),
                        Err(e) => eprintln!("❌ Could not serialize view: {}", e),
                    }
                } else {
                    print_view(&view);
                }
            }
            Err(e) => eprintln!("{} {}", "❌ Poll failed, showing last results:".red(), e),
        },
    );

    tokio::select! {
        ran = polling => println!("✅ Finished after {} cycles", ran),
        _ = tokio::signal::ctrl_c() => println!("👋 Stopped"),
    }

    Ok(())
}
