pub mod location;
pub mod periods;
pub mod punch;
pub mod punch_kind;
pub mod session;
