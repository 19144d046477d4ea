mod apply;
mod info;
mod summary;
mod watch;

pub use apply::apply;
pub use info::info;
pub use watch::watch;

use election_map::ElectionConfig;
use std::path::Path;

/// Config from `--config`, or the built-in roster.
fn load_config(path: Option<&Path>) -> election_map::Result<ElectionConfig> {
    match path {
        Some(path) => Ok(ElectionConfig::load(path)?),
        None => Ok(ElectionConfig::default()),
    }
}
