pub mod catalog;
pub mod detector;
pub mod poll_loop;

pub use poll_loop::{CycleOutcome, PollEngine};
