use super::load_config;
use super::summary::{print_report, print_view};
use colored::*;
use election_map::live::SourceError;
use election_map::LiveResults;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

fn read_payload(path: &Path) -> Result<Value, SourceError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Merges payload files in order and prints the resulting view.
pub fn apply(config_path: Option<&Path>, payloads: &[PathBuf], json: bool) -> election_map::Result<()> {
    let mut live = LiveResults::new(load_config(config_path)?)?;

    for path in payloads {
        if !json {
            println!("📥 Applying {}", path.display().to_string().bright_cyan());
        }
        let payload = read_payload(path)?;
        let report = live.apply(&payload);
        print_report(&report);
    }

    let view = live.view();
    if json {
        match serde_json::to_string_pretty(view.as_ref()) {
            Ok(text) => println!("{}", text),
            Err(e) => return Err(SourceError::Json(e).into()),
        }
    } else {
        print_view(&view);
    }

    Ok(())
}
