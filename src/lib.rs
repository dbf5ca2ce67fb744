pub mod app;
pub mod assets;
pub mod cli;
pub mod config;
pub mod container;
pub mod decode;
pub mod graph;
pub mod index;
pub mod panels;
pub mod renderer;
pub mod session;
pub mod tree;

pub use app::{run_with_overrides, App};
