//! Interface de linha de comando do polquiz.

pub mod commands;
pub mod interactive;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// polquiz - quizzes de orientação política via MCP.
#[derive(Parser, Debug)]
#[command(name = "polquiz")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Arquivo de configuração.
    #[arg(short, long, default_value = "polquiz.toml")]
    pub config: PathBuf,

    /// Modo verbose.
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Modo silencioso.
    #[arg(short, long)]
    pub quiet: bool,

    /// Comando a executar.
    #[command(subcommand)]
    pub command: Commands,
}

/// Comandos disponíveis.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inicializa configuração no diretório atual.
    Init {
        /// Diretório de destino (padrão: diretório atual).
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Inicia o servidor MCP (stdio).
    Serve,

    /// Lista os quizzes disponíveis.
    Quizzes,

    /// Responde a um quiz no terminal.
    Take {
        /// Quiz: political_compass, 8values ou politiscales.
        quiz: String,

        /// Semente fixa para a ordem das perguntas.
        #[arg(long)]
        seed: Option<u64>,

        /// Grava o gráfico SVG do resultado neste arquivo.
        #[arg(long)]
        svg: Option<PathBuf>,
    },

    /// Configura opções interativamente.
    Config,

    /// Mostra versão.
    Version,
}
