//! Live district results for an election map.
//!
//! Feed payloads are merged into a [`store::VoteStore`]; each merge is
//! followed by a full re-derivation into an [`view::ElectionView`]: district
//! fills, the seat strip and popular-vote totals.

pub mod aggregate;
pub mod config;
pub mod decision;
pub mod formats;
pub mod live;
pub mod merge;
pub mod model;
pub mod seats;
pub mod store;
pub mod view;

pub use config::{ConfigError, ElectionConfig};
pub use live::{LiveResults, SourceError};
pub use view::ElectionView;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Source(#[from] SourceError),
}

pub type Result<T> = std::result::Result<T, Error>;
