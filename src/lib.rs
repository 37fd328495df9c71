//! # polquiz
//!
//! Servidor MCP de quizzes de orientação política.
//!
//! Administra três questionários (Political Compass, 8values e PolitiScales)
//! uma pergunta por chamada de ferramenta e, na última resposta, calcula as
//! pontuações e devolve um relatório com gráfico SVG.
//!
//! ## Módulos
//!
//! - [`cli`] - Interface de linha de comando
//! - [`mcp`] - Servidor MCP (Model Context Protocol)
//! - [`quiz`] - Catálogos, sessão e normalização
//! - [`render`] - Relatórios e gráficos SVG
//! - [`types`] - Configuração e erros

#[cfg(feature = "cli")]
pub mod cli;
pub mod mcp;
pub mod quiz;
pub mod render;
pub mod types;

pub use types::config::Config;
pub use types::errors::{PolquizError, PolquizResult};
