//! Máquina de estados de uma sessão de quiz.
//!
//! ```text
//! Empty ──advance("")──▶ InProgress ──advance(última resposta)──▶ Complete
//!   ▲                                                              │
//!   └────────────────────────────── reset ─────────────────────────┘
//! ```
//!
//! A sessão não é thread-safe por si só; o acesso concorrente passa pelo
//! [`QuizHandle`](super::QuizHandle), que mantém o lock durante toda a
//! chamada.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::render::{self, ResultRenderer};
use crate::types::config::Config;
use crate::types::errors::{PolquizError, PolquizResult};

use super::catalog::{Catalog, Question};
use super::codec::{ResponseLevel, ResponseScale};
use super::normalizer::{self, AxisTally, NormalizedResult, ScoreNormalizer};
use super::shuffle::{self, OrderSource};
use super::variant::QuizVariant;

/// Estado observável da sessão.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Nenhuma ordem gerada.
    Empty,
    /// Ordem gerada, quiz em andamento.
    InProgress,
    /// Todas as perguntas respondidas.
    Complete,
}

/// Resultado final de uma sessão.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSummary {
    pub result: NormalizedResult,
    pub report: String,
    pub graphic: Option<String>,
}

impl QuizSummary {
    /// Relatório com o SVG embutido.
    pub fn to_text(&self) -> String {
        render::RenderedResult {
            report: self.report.clone(),
            graphic: self.graphic.clone(),
        }
        .to_text()
    }
}

/// Resultado de um `advance`.
#[derive(Debug, Clone, PartialEq)]
pub enum QuizTurn {
    /// Próxima pergunta emitida.
    Question {
        /// Posição (1-based) na ordem da sessão.
        number: usize,
        total: usize,
        /// Índice no catálogo.
        index: usize,
        text: String,
    },
    /// Última resposta registrada; resultado calculado.
    Complete(QuizSummary),
}

impl QuizTurn {
    pub fn is_complete(&self) -> bool {
        matches!(self, QuizTurn::Complete(_))
    }
}

/// Contagem de um nível de resposta.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LevelCount {
    pub level: ResponseLevel,
    pub count: usize,
    pub percentage: f64,
}

/// Fotografia somente-leitura da sessão.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatusReport {
    pub variant: QuizVariant,
    pub phase: SessionPhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    pub answered: usize,
    pub total: usize,
    pub remaining: usize,
    pub completion_pct: f64,
    pub scores: NormalizedResult,
    pub distribution: Vec<LevelCount>,
}

impl StatusReport {
    /// Texto legível do status.
    pub fn to_text(&self) -> String {
        let mut lines = vec![
            format!("# {} Status", self.variant.title()),
            String::new(),
            format!("State: {}", phase_name(self.phase)),
            format!("Answered: {}/{}", self.answered, self.total),
            format!("Remaining: {}", self.remaining),
            format!("Completion: {:.1}%", self.completion_pct),
        ];
        if let Some(id) = &self.session_id {
            lines.push(format!("Session: {}", id));
        }

        lines.push(String::new());
        lines.push("Current Scores".to_string());
        for axis in &self.scores.axes {
            lines.push(format!("  {}: {:.2}", axis.name, axis.value));
        }
        for pair in &self.scores.pairs {
            lines.push(format!(
                "  {} {:.0}% | Neutral {:.0}% | {} {:.0}%",
                pair.left.name, pair.left.value, pair.neutral, pair.right.name, pair.right.value
            ));
        }
        lines.push(format!("  Label: {}", self.scores.label));

        lines.push(String::new());
        lines.push("Response Distribution".to_string());
        if self.distribution.is_empty() {
            lines.push("  (no responses yet)".to_string());
        }
        for entry in &self.distribution {
            lines.push(format!(
                "  {}: {} ({:.1}%)",
                entry.level.label(),
                entry.count,
                entry.percentage
            ));
        }

        lines.join("\n")
    }
}

fn missing_question(variant: QuizVariant, index: usize) -> PolquizError {
    PolquizError::other(format!(
        "question {} missing from {} catalog",
        index,
        variant.key()
    ))
}

fn phase_name(phase: SessionPhase) -> &'static str {
    match phase {
        SessionPhase::Empty => "not started",
        SessionPhase::InProgress => "in progress",
        SessionPhase::Complete => "complete",
    }
}

/// Progresso mutável; substituído inteiro no reset.
#[derive(Debug, Clone, Default, PartialEq)]
struct Progress {
    id: Option<Uuid>,
    started_at: Option<DateTime<Utc>>,
    order: Vec<usize>,
    cursor: usize,
    tally: AxisTally,
    responses: Vec<ResponseLevel>,
    summary: Option<QuizSummary>,
}

/// Sessão de quiz de uma variante.
pub struct QuizSession {
    variant: QuizVariant,
    catalog: Arc<Catalog>,
    scale: ResponseScale,
    normalizer: Box<dyn ScoreNormalizer>,
    renderer: Box<dyn ResultRenderer>,
    order_source: Box<dyn OrderSource>,
    progress: Progress,
}

impl std::fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizSession")
            .field("variant", &self.variant)
            .field("cursor", &self.progress.cursor)
            .field("answered", &self.progress.responses.len())
            .field("total", &self.catalog.len())
            .finish()
    }
}

impl QuizSession {
    /// Cria uma sessão vazia.
    ///
    /// Falha se o catálogo referenciar eixos que o normalizador da variante
    /// não conhece.
    pub fn new(
        catalog: Arc<Catalog>,
        renderer: Box<dyn ResultRenderer>,
        order_source: Box<dyn OrderSource>,
    ) -> PolquizResult<Self> {
        let variant = catalog.variant();
        let normalizer = normalizer::for_variant(variant, &catalog);
        catalog.validate_axes(&normalizer.axes())?;

        Ok(Self {
            variant,
            scale: ResponseScale::for_variant(variant),
            catalog,
            normalizer,
            renderer,
            order_source,
            progress: Progress::default(),
        })
    }

    /// Sessão com catálogo embutido e opções da configuração.
    pub fn from_config(variant: QuizVariant, config: &Config) -> PolquizResult<Self> {
        let catalog = Arc::new(Catalog::builtin(variant)?);
        Self::new(
            catalog,
            render::renderer_for(variant, &config.render),
            shuffle::order_source(config.quiz.shuffle, config.quiz.seed),
        )
    }

    /// Gera a ordem das perguntas, se ainda não existir.
    pub fn initialize_order(&mut self) {
        if !self.progress.order.is_empty() {
            return;
        }

        self.progress.order = self.order_source.permutation(self.catalog.len());
        let id = Uuid::new_v4();
        self.progress.id = Some(id);
        self.progress.started_at = Some(Utc::now());

        tracing::info!(
            variant = self.variant.key(),
            session_id = %id,
            questions = self.catalog.len(),
            "Quiz session started"
        );
    }

    /// Avança o quiz em um passo.
    ///
    /// `token` responde à pergunta emitida na chamada anterior; na primeira
    /// chamada é ignorado. Um token inválido deixa a sessão intacta e a
    /// mesma pergunta continua pendente.
    pub fn advance(&mut self, token: &str) -> PolquizResult<QuizTurn> {
        if self.progress.summary.is_some() {
            return Err(PolquizError::AlreadyComplete(self.variant.key().to_string()));
        }

        self.initialize_order();

        if self.progress.cursor == 0 {
            if !token.trim().is_empty() {
                tracing::debug!(
                    variant = self.variant.key(),
                    "Ignoring response on start call"
                );
            }
        } else {
            let level = self.scale.decode(token.trim())?;
            self.record(level)?;
        }

        let total = self.catalog.len();
        if self.progress.cursor == total {
            return Ok(QuizTurn::Complete(self.complete()));
        }

        let index = self.progress.order[self.progress.cursor];
        let question = self.lookup(index)?;
        let text = question.text.clone();
        self.progress.cursor += 1;

        tracing::debug!(
            variant = self.variant.key(),
            number = self.progress.cursor,
            total,
            index,
            "Question issued"
        );

        Ok(QuizTurn::Question {
            number: self.progress.cursor,
            total,
            index,
            text,
        })
    }

    /// Volta ao estado vazio.
    pub fn reset(&mut self) {
        if let Some(id) = self.progress.id {
            tracing::info!(
                variant = self.variant.key(),
                session_id = %id,
                answered = self.progress.responses.len(),
                "Quiz session reset"
            );
        }
        self.progress = Progress::default();
    }

    /// Fotografia da sessão; não altera estado.
    pub fn status(&self) -> StatusReport {
        let answered = self.answered_count();
        let total = self.catalog.len();

        let completion_pct = if total == 0 {
            0.0
        } else {
            (answered as f64 / total as f64 * 1000.0).round() / 10.0
        };

        StatusReport {
            variant: self.variant,
            phase: self.phase(),
            session_id: self.progress.id.map(|id| id.to_string()),
            started_at: self.progress.started_at,
            answered,
            total,
            remaining: total - answered,
            completion_pct,
            scores: self.current_scores(),
            distribution: self.distribution(),
        }
    }

    /// Pontuações normalizadas com as respostas registradas até agora.
    pub fn current_scores(&self) -> NormalizedResult {
        self.normalizer
            .normalize(&self.progress.tally, self.answered_count(), self.catalog.len())
    }

    /// Pergunta emitida e ainda não respondida.
    pub fn pending_question(&self) -> Option<&Question> {
        let cursor = self.progress.cursor;
        if cursor == 0 || self.progress.summary.is_some() || self.answered_count() == cursor {
            return None;
        }
        self.catalog.question(self.progress.order[cursor - 1])
    }

    pub fn variant(&self) -> QuizVariant {
        self.variant
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn scale(&self) -> &ResponseScale {
        &self.scale
    }

    pub fn phase(&self) -> SessionPhase {
        if self.progress.summary.is_some() {
            SessionPhase::Complete
        } else if self.progress.order.is_empty() {
            SessionPhase::Empty
        } else {
            SessionPhase::InProgress
        }
    }

    pub fn order(&self) -> &[usize] {
        &self.progress.order
    }

    pub fn cursor(&self) -> usize {
        self.progress.cursor
    }

    pub fn answered_count(&self) -> usize {
        self.progress.responses.len()
    }

    pub fn total(&self) -> usize {
        self.catalog.len()
    }

    pub fn responses(&self) -> &[ResponseLevel] {
        &self.progress.responses
    }

    pub fn accumulators(&self) -> &BTreeMap<String, f64> {
        &self.progress.tally.scores
    }

    pub fn tally(&self) -> &AxisTally {
        &self.progress.tally
    }

    /// Resultado final em cache, se a sessão estiver completa.
    pub fn summary(&self) -> Option<&QuizSummary> {
        self.progress.summary.as_ref()
    }

    fn lookup(&self, index: usize) -> PolquizResult<&Question> {
        self.catalog
            .question(index)
            .ok_or_else(|| missing_question(self.variant, index))
    }

    /// Pontua a pergunta pendente.
    fn record(&mut self, level: ResponseLevel) -> PolquizResult<()> {
        let index = self.progress.order[self.progress.cursor - 1];
        let multiplier = self.scale.multiplier(level);
        let max_multiplier = self.scale.max_multiplier();

        let catalog = Arc::clone(&self.catalog);
        let question = catalog
            .question(index)
            .ok_or_else(|| missing_question(self.variant, index))?;

        for (axis, delta) in question.contributions(multiplier) {
            self.progress.tally.add(axis, delta);
        }
        for (axis, reach) in question.reachable(max_multiplier) {
            self.progress.tally.add_maximum(axis, reach);
        }
        self.progress.responses.push(level);

        tracing::debug!(
            variant = self.variant.key(),
            index,
            level = level.token(),
            answered = self.progress.responses.len(),
            "Response recorded"
        );

        Ok(())
    }

    fn complete(&mut self) -> QuizSummary {
        let result = self.current_scores();
        let rendered = self.renderer.render(&result);

        tracing::info!(
            variant = self.variant.key(),
            label = %result.label,
            answered = result.answered,
            "Quiz complete"
        );

        let summary = QuizSummary {
            result,
            report: rendered.report,
            graphic: rendered.graphic,
        };
        self.progress.summary = Some(summary.clone());
        summary
    }

    fn distribution(&self) -> Vec<LevelCount> {
        let answered = self.answered_count();
        self.scale
            .levels()
            .filter_map(|level| {
                let count = self.progress.responses.iter().filter(|r| **r == level).count();
                (count > 0).then(|| LevelCount {
                    level,
                    count,
                    percentage: count as f64 / answered as f64 * 100.0,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::catalog::{Effect, Polarity};
    use crate::quiz::shuffle::SeededShuffle;
    use crate::render::{renderer_for, SvgOptions};
    use crate::types::config::RenderConfig;

    fn session(variant: QuizVariant, seed: u64) -> QuizSession {
        let catalog = Arc::new(Catalog::builtin(variant).unwrap());
        QuizSession::new(
            catalog,
            renderer_for(variant, &RenderConfig::default()),
            Box::new(SeededShuffle::with_seed(seed)),
        )
        .unwrap()
    }

    fn small_compass() -> QuizSession {
        let q = |text: &str, e: f64, s: f64| Question {
            index: 0,
            text: text.to_string(),
            effects: vec![
                Effect { axis: "economic".into(), weight: e, when: Polarity::Any },
                Effect { axis: "social".into(), weight: s, when: Polarity::Any },
            ],
        };
        let catalog = Catalog::from_questions(
            QuizVariant::PoliticalCompass,
            vec![q("one", 1.0, 0.0), q("two", 0.0, 2.0), q("three", -3.0, 1.0)],
        )
        .unwrap();

        QuizSession::new(
            Arc::new(catalog),
            renderer_for(QuizVariant::PoliticalCompass, &RenderConfig::default()),
            Box::new(shuffle::CatalogOrder),
        )
        .unwrap()
    }

    #[test]
    fn test_start_issues_first_question() {
        let mut s = session(QuizVariant::PoliticalCompass, 1);
        assert_eq!(s.phase(), SessionPhase::Empty);

        let turn = s.advance("").unwrap();
        match turn {
            QuizTurn::Question { number, total, .. } => {
                assert_eq!(number, 1);
                assert_eq!(total, 62);
            }
            other => panic!("expected question, got {:?}", other),
        }
        assert_eq!(s.cursor(), 1);
        assert_eq!(s.answered_count(), 0);
        assert_eq!(s.phase(), SessionPhase::InProgress);
        assert!(s.pending_question().is_some());
    }

    #[test]
    fn test_start_ignores_token() {
        let mut s = session(QuizVariant::EightValues, 1);
        s.advance("agree").unwrap();
        assert_eq!(s.answered_count(), 0);
        assert_eq!(s.cursor(), 1);
    }

    #[test]
    fn test_valid_answer_advances_by_one() {
        for variant in [
            QuizVariant::PoliticalCompass,
            QuizVariant::EightValues,
            QuizVariant::Politiscales,
        ] {
            let mut s = session(variant, 3);
            s.advance("").unwrap();

            // tokens de máquina e rótulos legíveis
            let vocabulary = s.scale().vocabulary();
            assert!(vocabulary.len() < s.total());

            for token in &vocabulary {
                let cursor = s.cursor();
                let answered = s.answered_count();

                let turn = s.advance(token).unwrap();
                assert!(!turn.is_complete());
                assert_eq!(s.cursor(), cursor + 1, "{}: {}", variant, token);
                assert_eq!(s.answered_count(), answered + 1, "{}: {}", variant, token);
            }
        }
    }

    #[test]
    fn test_invalid_answer_leaves_state_untouched() {
        let mut s = session(QuizVariant::Politiscales, 5);
        s.advance("").unwrap();
        s.advance("agree").unwrap();

        let before = s.progress.clone();
        let pending = s.pending_question().map(|q| q.index);

        let err = s.advance("invalid_token").unwrap_err();
        assert!(matches!(err, PolquizError::InvalidResponse { ref token, .. } if token == "invalid_token"));
        assert_eq!(s.progress, before);
        assert_eq!(s.pending_question().map(|q| q.index), pending);

        // resposta vazia depois do início também é inválida
        assert!(s.advance("").is_err());
        assert_eq!(s.progress, before);
    }

    #[test]
    fn test_initialize_order_is_idempotent() {
        let mut s = session(QuizVariant::PoliticalCompass, 11);
        s.initialize_order();
        let first = s.order().to_vec();
        s.initialize_order();
        assert_eq!(s.order(), first.as_slice());

        s.advance("").unwrap();
        s.advance("Agree").unwrap();
        assert_eq!(s.order(), first.as_slice());
    }

    #[test]
    fn test_order_is_permutation() {
        let mut s = session(QuizVariant::EightValues, 2);
        s.initialize_order();
        let mut order = s.order().to_vec();
        order.sort_unstable();
        assert_eq!(order, (0..70).collect::<Vec<_>>());
    }

    #[test]
    fn test_completion_exactly_at_total() {
        let mut s = small_compass();
        assert!(!s.advance("").unwrap().is_complete());
        assert!(!s.advance("agree").unwrap().is_complete());
        assert!(!s.advance("agree").unwrap().is_complete());
        assert_eq!(s.answered_count(), 2);

        let turn = s.advance("agree").unwrap();
        assert!(turn.is_complete());
        assert_eq!(s.answered_count(), 3);
        assert_eq!(s.phase(), SessionPhase::Complete);
        assert!(s.pending_question().is_none());
    }

    #[test]
    fn test_contributions_accumulate() {
        let mut s = small_compass();
        s.advance("").unwrap();
        s.advance("Strongly Agree").unwrap(); // one: economic +2
        s.advance("disagree").unwrap(); // two: social -2
        s.advance("agree").unwrap(); // three: economic -3, social +1

        assert_eq!(s.accumulators()["economic"], -1.0);
        assert_eq!(s.accumulators()["social"], -1.0);
        assert_eq!(
            s.responses(),
            &[
                ResponseLevel::StronglyAgree,
                ResponseLevel::Disagree,
                ResponseLevel::Agree
            ]
        );
    }

    #[test]
    fn test_after_completion_returns_already_complete() {
        let mut s = small_compass();
        s.advance("").unwrap();
        for _ in 0..3 {
            s.advance("agree").unwrap();
        }

        let before = s.progress.clone();
        assert!(matches!(
            s.advance("agree"),
            Err(PolquizError::AlreadyComplete(_))
        ));
        assert_eq!(s.progress, before);
        assert!(s.summary().is_some());
    }

    #[test]
    fn test_reset_from_any_state() {
        let mut s = small_compass();
        s.reset();
        assert_eq!(s.phase(), SessionPhase::Empty);

        s.advance("").unwrap();
        s.advance("agree").unwrap();
        s.reset();
        assert_eq!(s.cursor(), 0);
        assert_eq!(s.answered_count(), 0);
        assert!(s.responses().is_empty());
        assert!(s.order().is_empty());
        assert!(s.accumulators().is_empty());

        s.advance("").unwrap();
        for _ in 0..3 {
            s.advance("agree").unwrap();
        }
        s.reset();
        assert_eq!(s.phase(), SessionPhase::Empty);
        assert!(s.summary().is_none());

        // recomeça normalmente
        assert!(!s.advance("").unwrap().is_complete());
        assert_eq!(s.cursor(), 1);
    }

    #[test]
    fn test_status_does_not_mutate() {
        let mut s = session(QuizVariant::PoliticalCompass, 8);
        s.advance("").unwrap();
        s.advance("Agree").unwrap();
        s.advance("strongly_disagree").unwrap();

        let before = s.progress.clone();
        let status = s.status();
        assert_eq!(s.progress, before);

        assert_eq!(status.answered, 2);
        assert_eq!(status.remaining, 60);
        assert_eq!(status.completion_pct, 3.2);
        assert_eq!(status.distribution.len(), 2);
        assert!(status.session_id.is_some());

        let text = status.to_text();
        assert!(text.contains("Response Distribution"));
        assert!(text.contains("Agree: 1 (50.0%)"));
        assert!(text.contains("Strongly Disagree: 1 (50.0%)"));
    }

    #[test]
    fn test_status_on_empty_session() {
        let s = session(QuizVariant::Politiscales, 8);
        let status = s.status();

        assert_eq!(status.phase, SessionPhase::Empty);
        assert_eq!(status.answered, 0);
        assert_eq!(status.completion_pct, 0.0);
        assert!(status.distribution.is_empty());
        assert!(status.to_text().contains("(no responses yet)"));
    }

    #[test]
    fn test_summary_embeds_svg() {
        let mut s = small_compass();
        s.advance("").unwrap();
        let mut last = None;
        for _ in 0..3 {
            last = Some(s.advance("agree").unwrap());
        }

        match last {
            Some(QuizTurn::Complete(summary)) => {
                let text = summary.to_text();
                assert!(text.contains("Quadrant:"));
                assert!(text.contains("```svg"));
            }
            other => panic!("expected completion, got {:?}", other),
        }
    }

    #[test]
    fn test_svg_disabled_summary() {
        let catalog = Arc::new(Catalog::builtin(QuizVariant::PoliticalCompass).unwrap());
        let renderer = Box::new(crate::render::CompassRenderer::new(SvgOptions {
            enabled: false,
            size: 300,
        }));
        let mut s = QuizSession::new(catalog, renderer, Box::new(shuffle::CatalogOrder)).unwrap();

        s.advance("").unwrap();
        let mut turn = None;
        for _ in 0..62 {
            turn = Some(s.advance("disagree").unwrap());
        }
        match turn {
            Some(QuizTurn::Complete(summary)) => assert!(summary.graphic.is_none()),
            other => panic!("expected completion, got {:?}", other),
        }
    }
}
