pub mod initialize;
pub mod log;
pub mod migrate;
pub mod pending;
pub mod pool;
pub mod queries;
