mod roster;

pub use roster::{InitReport, RosterStore, WriteOutcome};
