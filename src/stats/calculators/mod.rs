mod average_points;
mod overview;
mod partnerships;
mod running_totals;
mod solo;
mod streaks;
mod team_dominance;
mod totals;
mod win_rate;

pub use average_points::average_points;
pub use overview::session_overview;
pub use partnerships::partnership_performance;
pub use running_totals::running_totals;
pub use solo::solo_stats;
pub use streaks::streaks;
pub use team_dominance::team_dominance;
pub use totals::{cumulative_totals, standings};
pub use win_rate::win_rates;
