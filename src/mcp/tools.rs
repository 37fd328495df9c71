//! Handlers das ferramentas MCP do polquiz.
//!
//! Cada variante expõe três ferramentas (`<prefixo>` é `political_compass`,
//! `eightvalues` ou `politiscales`):
//!
//! 1. `<prefixo>` - Inicia o quiz ou responde à pergunta pendente
//! 2. `<prefixo>_reset` - Descarta a sessão atual
//! 3. `<prefixo>_status` - Progresso, pontuações parciais e distribuição

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::quiz::{QuizRegistry, QuizTurn, QuizVariant, ResponseScale};
use crate::types::config::Config;
use crate::types::errors::PolquizError;
use crate::PolquizResult;

use super::protocol::{ToolDescription, ToolResult};

// ═══════════════════════════════════════════════════════════════════════════
// Parâmetros das ferramentas
// ═══════════════════════════════════════════════════════════════════════════

/// Parâmetros da ferramenta de resposta.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnswerParams {
    /// Resposta à pergunta pendente. Ausente ou vazia inicia o quiz.
    #[serde(default)]
    pub response: Option<String>,
}

/// Operação pedida por uma ferramenta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ToolKind {
    Answer,
    Reset,
    Status,
}

/// Resolve o nome da ferramenta para (variante, operação).
fn resolve_tool(name: &str) -> Option<(QuizVariant, ToolKind)> {
    QuizVariant::ALL.into_iter().find_map(|variant| {
        let kind = match name.strip_prefix(variant.tool_prefix())? {
            "" => ToolKind::Answer,
            "_reset" => ToolKind::Reset,
            "_status" => ToolKind::Status,
            _ => return None,
        };
        Some((variant, kind))
    })
}

// ═══════════════════════════════════════════════════════════════════════════
// Handler de ferramentas
// ═══════════════════════════════════════════════════════════════════════════

/// Handler das ferramentas MCP.
///
/// Compartilhável entre chamadas concorrentes: cada sessão tem seu próprio
/// lock dentro do [`QuizRegistry`].
pub struct ToolHandler {
    registry: QuizRegistry,
}

impl ToolHandler {
    /// Cria o handler com uma sessão vazia por variante.
    pub fn new(config: Config) -> PolquizResult<Self> {
        let registry = QuizRegistry::from_config(&config)?;

        for variant in registry.variants() {
            tracing::debug!(variant = variant.key(), "Quiz session registered");
        }

        Ok(Self { registry })
    }

    /// Handler sobre um registro já montado.
    pub fn with_registry(registry: QuizRegistry) -> Self {
        Self { registry }
    }

    /// Lista todas as ferramentas disponíveis.
    pub fn list_tools() -> Vec<ToolDescription> {
        let mut tools = Vec::with_capacity(QuizVariant::ALL.len() * 3);

        for variant in QuizVariant::ALL {
            let prefix = variant.tool_prefix();
            let title = variant.title();
            let accepted = ResponseScale::for_variant(variant).vocabulary();

            tools.push(ToolDescription::new(
                prefix,
                format!(
                    "Take the {} quiz one question at a time. Call without a response to start; \
                     then answer each question with one of: {}. The last answer returns the result \
                     report with an SVG chart.",
                    title,
                    accepted.join(", ")
                ),
                json!({
                    "type": "object",
                    "properties": {
                        "response": {
                            "type": "string",
                            "description": "Answer to the pending question (omit to start)"
                        }
                    }
                }),
            ));
            tools.push(ToolDescription::new(
                format!("{}_reset", prefix),
                format!("Discard the current {} session and start over.", title),
                json!({ "type": "object", "properties": {} }),
            ));
            tools.push(ToolDescription::new(
                format!("{}_status", prefix),
                format!(
                    "Show {} progress, current scores and the response distribution without answering.",
                    title
                ),
                json!({ "type": "object", "properties": {} }),
            ));
        }

        tools
    }

    /// Processa uma chamada de ferramenta.
    pub async fn handle_tool_call(&self, name: &str, arguments: Value) -> ToolResult {
        tracing::info!(tool = name, "Processing tool call");

        match resolve_tool(name) {
            Some((variant, ToolKind::Answer)) => self.handle_answer(variant, arguments).await,
            Some((variant, ToolKind::Reset)) => self.handle_reset(variant).await,
            Some((variant, ToolKind::Status)) => self.handle_status(variant).await,
            None => ToolResult::error(format!("Unknown tool: {}", name)),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Handlers individuais
    // ═══════════════════════════════════════════════════════════════════════

    async fn handle_answer(&self, variant: QuizVariant, arguments: Value) -> ToolResult {
        // clientes às vezes mandam `null` em vez de `{}`
        let params: AnswerParams = if arguments.is_null() {
            AnswerParams::default()
        } else {
            match serde_json::from_value(arguments) {
                Ok(p) => p,
                Err(e) => return ToolResult::error(format!("Invalid parameters: {}", e)),
            }
        };

        let Some(handle) = self.registry.get(variant) else {
            return ToolResult::error(format!("Quiz not available: {}", variant.key()));
        };

        let token = params.response.unwrap_or_default();
        let outcome = handle.advance(&token).await;

        match outcome.result {
            Ok(QuizTurn::Question {
                number,
                total,
                text,
                ..
            }) => ToolResult::success(format_question(variant, number, total, &text)),
            Ok(QuizTurn::Complete(summary)) => ToolResult::success(summary.to_text()),
            Err(e @ PolquizError::AlreadyComplete(_)) => {
                let mut message = format!("{} (tool: {}_reset)", e, variant.tool_prefix());
                if let Some(summary) = outcome.cached_summary {
                    message.push_str("\n\n");
                    message.push_str(&summary);
                }
                ToolResult::error(message)
            }
            Err(e) => {
                tracing::debug!(variant = variant.key(), error = %e, "Rejected response");
                let mut message = e.to_string();
                if let Some(pending) = outcome.pending {
                    message.push_str("\n\nPending question: ");
                    message.push_str(&pending);
                }
                ToolResult::error(message)
            }
        }
    }

    async fn handle_reset(&self, variant: QuizVariant) -> ToolResult {
        let Some(handle) = self.registry.get(variant) else {
            return ToolResult::error(format!("Quiz not available: {}", variant.key()));
        };

        handle.reset().await;

        ToolResult::success(format!(
            "{} quiz reset. Call {} to start a new session.",
            variant.title(),
            variant.tool_prefix()
        ))
    }

    async fn handle_status(&self, variant: QuizVariant) -> ToolResult {
        let Some(handle) = self.registry.get(variant) else {
            return ToolResult::error(format!("Quiz not available: {}", variant.key()));
        };

        ToolResult::success(handle.status().await.to_text())
    }
}

/// Texto de uma pergunta emitida.
fn format_question(variant: QuizVariant, number: usize, total: usize, text: &str) -> String {
    let accepted: Vec<&str> = ResponseScale::for_variant(variant)
        .levels()
        .map(|level| level.token())
        .collect();
    format!(
        "# {} - Question {} of {}\n\n{}\n\nAnswer with one of: {}",
        variant.title(),
        number,
        total,
        text,
        accepted.join(", ")
    )
}

// ═══════════════════════════════════════════════════════════════════════════
// Testes
// ═══════════════════════════════════════════════════════════════════════════
