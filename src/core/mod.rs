pub mod calculator;
pub mod clock;
pub mod diff;
pub mod log;
pub mod model;
pub mod reconcile;
