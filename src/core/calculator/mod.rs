pub mod pairing;
pub mod periods;
