//! Greedy choices: activity selection and coin change.

mod activity;
mod coin_change;

pub use activity::{activity_selection, Activity, ActivityCell, ActivityEvent, ActivityOptions, ActivityStatus, ActivityStep, SortKey};
pub use coin_change::{coin_change, CoinEvent, CoinStep, MAX_COINS};
