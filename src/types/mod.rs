//! Tipos compartilhados do polquiz.

pub mod config;
pub mod errors;
