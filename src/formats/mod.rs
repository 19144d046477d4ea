pub mod payload;

pub use payload::{Declaration, DistrictRow, UpdatePayload, VoteEntry};
