pub mod checker;
pub mod executor;
