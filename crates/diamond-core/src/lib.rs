// Library root: standings, tiebreak and leader-board engine for a round-robin
// softball tournament, plus the data model and configuration it runs on.

pub mod bracket;
pub mod config;
pub mod display;
pub mod error;
pub mod leaders;
pub mod model;
pub mod serde_utils;
pub mod snapshot;
pub mod standings;
