//! Implementação dos comandos CLI do polquiz.

use std::path::{Path, PathBuf};

use crate::quiz::{Catalog, QuizVariant, ResponseScale};
use crate::types::config::{Config, CONFIG_FILE};
use crate::PolquizResult;

/// Initializes configuration in the specified directory.
pub async fn init(path: Option<PathBuf>) -> PolquizResult<()> {
    let target_dir = path.unwrap_or_else(|| PathBuf::from("."));

    if !target_dir.exists() {
        std::fs::create_dir_all(&target_dir)?;
        tracing::info!("Directory created: {}", target_dir.display());
    }

    let config_path = target_dir.join(CONFIG_FILE);

    if config_path.exists() {
        println!("Configuration already exists at: {}", config_path.display());
        println!("Use 'polquiz config' to modify.");
        return Ok(());
    }

    Config::default_config().save(&config_path)?;

    println!("polquiz initialized successfully!");
    println!("Configuration created at: {}", config_path.display());
    println!();
    println!("Next steps:");
    println!("  1. List the quizzes: polquiz quizzes");
    println!("  2. Try one in the terminal: polquiz take political_compass");
    println!("  3. Add to your MCP client: polquiz serve");

    Ok(())
}

/// Inicia o servidor MCP.
pub async fn serve(config: &Config) -> PolquizResult<()> {
    use crate::mcp::McpServer;

    tracing::debug!(
        shuffle = config.quiz.shuffle,
        seed = ?config.quiz.seed,
        svg = config.render.svg,
        "Configuration loaded"
    );

    let mut server = McpServer::new(config.clone())?;
    server.run().await
}

/// Lista os quizzes com contagem de perguntas e fingerprint do catálogo.
pub fn quizzes() -> PolquizResult<()> {
    println!("Available quizzes:\n");

    for variant in QuizVariant::ALL {
        let catalog = Catalog::builtin(variant)?;
        let levels = ResponseScale::for_variant(variant).levels().count();
        let axes = catalog.axis_totals().len();

        println!(
            "  {:<18} {:>3} questions  {} axes  {} levels  catalog {}",
            variant.key(),
            catalog.len(),
            axes,
            levels,
            catalog.short_fingerprint()
        );
        println!(
            "  {:<18} tools: {p}, {p}_reset, {p}_status",
            "",
            p = variant.tool_prefix()
        );
    }

    Ok(())
}

/// Responde a um quiz no terminal.
pub async fn take(
    quiz: &str,
    seed: Option<u64>,
    svg: Option<&Path>,
    config: &Config,
) -> PolquizResult<()> {
    let variant: QuizVariant = quiz.parse()?;

    let mut config = config.clone();
    if seed.is_some() {
        config.quiz.seed = seed;
    }
    if svg.is_some() {
        config.render.svg = true;
    }

    super::interactive::run_quiz(variant, &config, svg)
}

/// Configura opções interativamente.
pub async fn config_cmd(config_path: &Path) -> PolquizResult<()> {
    use super::interactive::{run_interactive_config, show_config_summary};

    if config_path.exists() {
        let config = Config::load(config_path)?;
        show_config_summary(&config);
    }

    run_interactive_config(config_path)
}

/// Mostra versão.
pub fn version() {
    println!("polquiz {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Political orientation quizzes over MCP");
    for variant in QuizVariant::ALL {
        println!("  - {}", variant.title());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_writes_default_config() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("nested");

        init(Some(target.clone())).await.unwrap();

        let config = Config::load(target.join(CONFIG_FILE)).unwrap();
        assert_eq!(config.general.log_level, "info");
        assert!(config.quiz.shuffle);
    }

    #[tokio::test]
    async fn test_init_keeps_existing_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[quiz]\nshuffle = false\n").unwrap();

        init(Some(dir.path().to_path_buf())).await.unwrap();

        let config = Config::load(&path).unwrap();
        assert!(!config.quiz.shuffle);
    }

    #[tokio::test]
    async fn test_take_unknown_quiz() {
        let result = take("horoscope", None, None, &Config::default()).await;
        assert!(matches!(
            result,
            Err(crate::types::errors::PolquizError::UnknownQuiz(_))
        ));
    }

    #[test]
    fn test_quizzes_lists_builtin_catalogs() {
        assert!(quizzes().is_ok());
    }
}
