//! Acesso concorrente às sessões.
//!
//! Uma sessão por variante, protegida por um mutex mantido durante todo o
//! `advance`, `reset` ou `status`. Pontuar a resposta anterior, checar a
//! conclusão e emitir a próxima pergunta formam uma única seção crítica.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::types::config::Config;
use crate::types::errors::{PolquizError, PolquizResult};

use super::session::{QuizSession, QuizTurn, StatusReport};
use super::variant::QuizVariant;

/// Resultado de um `advance` feito pelo handle.
///
/// Em caso de erro carrega também a pergunta pendente (para reapresentá-la)
/// ou o resumo em cache (quando o quiz já terminou).
#[derive(Debug)]
pub struct AdvanceOutcome {
    pub result: PolquizResult<QuizTurn>,
    pub pending: Option<String>,
    pub cached_summary: Option<String>,
}

/// Handle compartilhado de uma sessão.
#[derive(Debug)]
pub struct QuizHandle {
    variant: QuizVariant,
    session: Mutex<QuizSession>,
}

impl QuizHandle {
    pub fn new(session: QuizSession) -> Self {
        Self {
            variant: session.variant(),
            session: Mutex::new(session),
        }
    }

    pub fn variant(&self) -> QuizVariant {
        self.variant
    }

    /// Avança a sessão sob o lock.
    pub async fn advance(&self, token: &str) -> AdvanceOutcome {
        let mut session = self.session.lock().await;
        let result = session.advance(token);

        let (pending, cached_summary) = match &result {
            Err(PolquizError::AlreadyComplete(_)) => {
                (None, session.summary().map(|s| s.to_text()))
            }
            Err(_) => (session.pending_question().map(|q| q.text.clone()), None),
            Ok(_) => (None, None),
        };

        AdvanceOutcome {
            result,
            pending,
            cached_summary,
        }
    }

    /// Volta a sessão ao estado vazio.
    pub async fn reset(&self) {
        self.session.lock().await.reset();
    }

    /// Fotografia da sessão.
    pub async fn status(&self) -> StatusReport {
        self.session.lock().await.status()
    }

    /// Executa `f` com acesso exclusivo à sessão.
    pub async fn with_session<R>(&self, f: impl FnOnce(&mut QuizSession) -> R) -> R {
        let mut session = self.session.lock().await;
        f(&mut session)
    }
}

/// Uma sessão por variante, criadas na inicialização.
#[derive(Debug, Clone)]
pub struct QuizRegistry {
    handles: BTreeMap<QuizVariant, Arc<QuizHandle>>,
}

impl QuizRegistry {
    /// Carrega os três catálogos e cria as sessões.
    ///
    /// Um catálogo inválido aborta a inicialização.
    pub fn from_config(config: &Config) -> PolquizResult<Self> {
        let mut handles = BTreeMap::new();
        for variant in QuizVariant::ALL {
            let session = QuizSession::from_config(variant, config)?;
            handles.insert(variant, Arc::new(QuizHandle::new(session)));
        }
        Ok(Self { handles })
    }

    /// Registro com sessões já construídas.
    pub fn from_sessions(sessions: impl IntoIterator<Item = QuizSession>) -> Self {
        let handles = sessions
            .into_iter()
            .map(|s| (s.variant(), Arc::new(QuizHandle::new(s))))
            .collect();
        Self { handles }
    }

    /// Handle de uma variante.
    pub fn get(&self, variant: QuizVariant) -> Option<Arc<QuizHandle>> {
        self.handles.get(&variant).cloned()
    }

    /// Variantes registradas.
    pub fn variants(&self) -> impl Iterator<Item = QuizVariant> + '_ {
        self.handles.keys().copied()
    }
}
