//! Core chatmark library: markup engine, renderers, formatting targets, config.

pub mod cjk;
pub mod config;
pub mod format;
pub mod markup;
pub mod render;
pub mod text_nodes;
