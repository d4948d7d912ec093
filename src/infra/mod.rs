pub mod config;
pub mod stacks;
