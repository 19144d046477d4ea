pub mod district;
pub mod party;
pub mod swing;

pub use district::{Candidate, District};
pub use party::{Party, PartyCode};
pub use swing::Swing;
