//! Renderização dos resultados.
//!
//! Cada variante tem um renderer que transforma o [`NormalizedResult`] em um
//! relatório de texto e um gráfico SVG. Renderers são puros: nenhum estado
//! compartilhado.

mod compass;
mod eightvalues;
mod politiscales;

pub use compass::CompassRenderer;
pub use eightvalues::EightValuesRenderer;
pub use politiscales::PolitiscalesRenderer;

use crate::quiz::{NormalizedResult, QuizVariant};
use crate::types::config::RenderConfig;

/// Relatório e gráfico de um resultado.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedResult {
    /// Relatório legível.
    pub report: String,

    /// Markup SVG (ausente quando desabilitado na configuração).
    pub graphic: Option<String>,
}

impl RenderedResult {
    /// Relatório com o SVG embutido em um bloco cercado.
    pub fn to_text(&self) -> String {
        match &self.graphic {
            Some(svg) => format!("{}\n\n```svg\n{}\n```", self.report, svg),
            None => self.report.clone(),
        }
    }
}

/// Transforma pontuações normalizadas em relatório + gráfico.
pub trait ResultRenderer: Send + Sync {
    fn render(&self, result: &NormalizedResult) -> RenderedResult;
}

/// Opções comuns aos gráficos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SvgOptions {
    pub enabled: bool,
    pub size: u32,
}

impl From<&RenderConfig> for SvgOptions {
    fn from(config: &RenderConfig) -> Self {
        Self {
            enabled: config.svg,
            size: config.size.max(200),
        }
    }
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self::from(&RenderConfig::default())
    }
}

/// Renderer de cada variante.
pub fn renderer_for(variant: QuizVariant, config: &RenderConfig) -> Box<dyn ResultRenderer> {
    let options = SvgOptions::from(config);
    match variant {
        QuizVariant::PoliticalCompass => Box::new(CompassRenderer::new(options)),
        QuizVariant::EightValues => Box::new(EightValuesRenderer::new(options)),
        QuizVariant::Politiscales => Box::new(PolitiscalesRenderer::new(options)),
    }
}

/// Escapa texto para uso dentro de SVG.
pub(crate) fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Cabeçalho comum de progresso para resultados parciais.
pub(crate) fn answered_line(result: &NormalizedResult) -> String {
    format!("Questions answered: {}/{}", result.answered, result.total)
}
