pub mod engine;
mod errors;
pub mod models;
pub(crate) mod timestamp;

pub use engine::score_round;
pub use errors::ScoringError;
pub use models::*;

/// Active-player bounds for a single round.
pub mod table_size {
    /// Fewest players that may take part in a round
    pub const MIN_ACTIVE: usize = 4;
    /// Most players that may take part in a round
    pub const MAX_ACTIVE: usize = 6;
    /// Smallest roster that rotates a sitting-out player
    pub const MIN_ROSTER_FOR_SITTING_OUT: usize = 5;
}
