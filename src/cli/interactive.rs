//! Modo interativo do polquiz.
//!
//! Quiz no terminal (dialoguer + indicatif) sobre o mesmo núcleo de sessão
//! usado pelo servidor MCP, e edição interativa da configuração.

use std::path::Path;

use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};

use crate::quiz::{QuizSession, QuizTurn, QuizVariant};
use crate::types::config::Config;
use crate::PolquizResult;

// ═══════════════════════════════════════════════════════════════════════════
// Quiz no terminal
// ═══════════════════════════════════════════════════════════════════════════

fn progress_bar(total: usize) -> ProgressBar {
    let bar = ProgressBar::new(total as u64);
    let style = ProgressStyle::with_template("{prefix} [{bar:30.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    bar.set_style(style);
    bar
}

/// Executa um quiz completo no terminal.
///
/// O usuário pode sair no meio; nesse caso o status parcial é impresso.
pub fn run_quiz(variant: QuizVariant, config: &Config, svg_out: Option<&Path>) -> PolquizResult<()> {
    let theme = ColorfulTheme::default();
    let mut session = QuizSession::from_config(variant, config)?;

    let labels: Vec<&str> = session.scale().levels().map(|l| l.label()).collect();
    let mut items = labels.clone();
    items.push("Quit");

    let bar = progress_bar(session.total());
    bar.set_prefix(variant.title());

    println!("\n{} ({} questions)\n", variant.title(), session.total());

    let mut turn = session.advance("")?;
    loop {
        match turn {
            QuizTurn::Question {
                number, total, text, ..
            } => {
                let prompt = format!("[{}/{}] {}", number, total, text);
                let selection = bar.suspend(|| {
                    Select::with_theme(&theme)
                        .with_prompt(prompt)
                        .items(&items)
                        .default(labels.len() / 2)
                        .interact()
                })?;

                let Some(label) = labels.get(selection) else {
                    bar.abandon();
                    println!("\n{}", session.status().to_text());
                    return Ok(());
                };

                turn = session.advance(label)?;
                bar.inc(1);
            }
            QuizTurn::Complete(summary) => {
                bar.finish_and_clear();
                println!("\n{}\n", summary.report);

                if let Some(path) = svg_out {
                    match &summary.graphic {
                        Some(svg) => {
                            std::fs::write(path, svg)?;
                            println!("Chart written to {}", path.display());
                        }
                        None => tracing::warn!("SVG rendering disabled; nothing written"),
                    }
                }
                return Ok(());
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Configuração
// ═══════════════════════════════════════════════════════════════════════════

/// Executa a configuração interativa.
pub fn run_interactive_config(config_path: &Path) -> PolquizResult<()> {
    let theme = ColorfulTheme::default();

    println!("\npolquiz Interactive Configuration\n");

    let mut config = if config_path.exists() {
        Config::load(config_path)?
    } else {
        println!("Creating new configuration...\n");
        Config::default_config()
    };

    loop {
        let options = vec![
            "General Settings",
            "Quiz",
            "Charts",
            "Save and Exit",
            "Exit without Saving",
        ];

        let selection = Select::with_theme(&theme)
            .with_prompt("What would you like to configure?")
            .items(&options)
            .default(0)
            .interact()?;

        match selection {
            0 => configure_general(&theme, &mut config)?,
            1 => configure_quiz(&theme, &mut config)?,
            2 => configure_render(&theme, &mut config)?,
            3 => {
                config.save(config_path)?;
                println!("\n✓ Configuration saved to: {}\n", config_path.display());
                break;
            }
            4 => {
                if Confirm::with_theme(&theme)
                    .with_prompt("Really exit without saving?")
                    .default(false)
                    .interact()?
                {
                    println!("\nExiting without saving.\n");
                    break;
                }
            }
            _ => {}
        }
    }

    Ok(())
}

fn configure_general(theme: &ColorfulTheme, config: &mut Config) -> PolquizResult<()> {
    let log_levels = vec!["error", "warn", "info", "debug", "trace"];
    let current_idx = log_levels
        .iter()
        .position(|&l| l == config.general.log_level)
        .unwrap_or(2);

    let idx = Select::with_theme(theme)
        .with_prompt("Log level")
        .items(&log_levels)
        .default(current_idx)
        .interact()?;
    config.general.log_level = log_levels[idx].to_string();

    let log_formats = vec!["text", "json"];
    let current_format_idx = log_formats
        .iter()
        .position(|&f| f == config.general.log_format)
        .unwrap_or(0);

    let idx = Select::with_theme(theme)
        .with_prompt("Log format")
        .items(&log_formats)
        .default(current_format_idx)
        .interact()?;
    config.general.log_format = log_formats[idx].to_string();

    println!("\n✓ General settings updated.\n");
    Ok(())
}

fn configure_quiz(theme: &ColorfulTheme, config: &mut Config) -> PolquizResult<()> {
    config.quiz.shuffle = Confirm::with_theme(theme)
        .with_prompt("Shuffle question order?")
        .default(config.quiz.shuffle)
        .interact()?;

    // vazio = semente do relógio
    let seed: String = Input::with_theme(theme)
        .with_prompt("Fixed seed (empty to seed from the clock)")
        .default(config.quiz.seed.map(|s| s.to_string()).unwrap_or_default())
        .allow_empty(true)
        .validate_with(|input: &String| -> Result<(), &str> {
            if input.trim().is_empty() || input.trim().parse::<u64>().is_ok() {
                Ok(())
            } else {
                Err("enter a non-negative integer")
            }
        })
        .interact_text()?;
    config.quiz.seed = seed.trim().parse().ok();

    println!("\n✓ Quiz options updated.\n");
    Ok(())
}

fn configure_render(theme: &ColorfulTheme, config: &mut Config) -> PolquizResult<()> {
    config.render.svg = Confirm::with_theme(theme)
        .with_prompt("Include an SVG chart in the result?")
        .default(config.render.svg)
        .interact()?;

    if config.render.svg {
        config.render.size = Input::with_theme(theme)
            .with_prompt("Chart width (px, minimum 200)")
            .default(config.render.size)
            .interact_text()?;
    }

    println!("\n✓ Chart options updated.\n");
    Ok(())
}

/// Mostra um resumo da configuração.
pub fn show_config_summary(config: &Config) {
    println!("\nConfiguration Summary\n");
    println!("┌─────────────────────────────────────────┐");
    println!("│ General                                 │");
    println!("├─────────────────────────────────────────┤");
    println!("│ Log level: {:<28} │", config.general.log_level);
    println!("│ Log format: {:<27} │", config.general.log_format);
    println!("├─────────────────────────────────────────┤");
    println!("│ Quiz                                    │");
    println!("├─────────────────────────────────────────┤");
    println!(
        "│ Shuffle: {:<30} │",
        if config.quiz.shuffle { "Yes" } else { "No" }
    );
    println!(
        "│ Seed: {:<33} │",
        config
            .quiz
            .seed
            .map(|s| s.to_string())
            .unwrap_or_else(|| "clock".to_string())
    );
    println!("├─────────────────────────────────────────┤");
    println!("│ Charts                                  │");
    println!("├─────────────────────────────────────────┤");
    println!(
        "│ SVG: {:<34} │",
        if config.render.svg { "Yes" } else { "No" }
    );
    println!("│ Width: {:<30}px │", config.render.size);
    println!("└─────────────────────────────────────────┘");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_config_summary() {
        // só verifica que não entra em pânico
        let mut config = Config::default();
        show_config_summary(&config);

        config.quiz.seed = Some(12);
        config.render.svg = false;
        show_config_summary(&config);
    }

    #[test]
    fn test_progress_bar_length() {
        let bar = progress_bar(62);
        assert_eq!(bar.length(), Some(62));
    }
}
