//! Núcleo dos quizzes.
//!
//! - [`catalog`] - Perguntas e efeitos por eixo
//! - [`codec`] - Níveis de resposta e vocabulário aceito
//! - [`shuffle`] - Ordem das perguntas
//! - [`normalizer`] - Normalização das pontuações
//! - [`session`] - Máquina de estados da sessão
//! - [`handle`] - Acesso concorrente às sessões
//!
//! ## Exemplo
//!
//! ```rust,ignore
//! use polquiz::quiz::{QuizSession, QuizTurn, QuizVariant};
//! use polquiz::Config;
//!
//! let mut session = QuizSession::from_config(QuizVariant::PoliticalCompass, &Config::default())?;
//! let mut turn = session.advance("")?;
//! while let QuizTurn::Question { text, .. } = &turn {
//!     println!("{}", text);
//!     turn = session.advance("agree")?;
//! }
//! ```

pub mod catalog;
pub mod codec;
mod handle;
mod ideologies;
pub mod normalizer;
pub mod session;
pub mod shuffle;
mod variant;

pub use catalog::{Catalog, Effect, Polarity, Question};
pub use codec::{ResponseLevel, ResponseScale};
pub use handle::{AdvanceOutcome, QuizHandle, QuizRegistry};
pub use normalizer::{
    AxisTally, AxisValue, Badge, LinearBounded, NormalizedResult, PairValue, PairedWithNeutral,
    ScoreNormalizer,
};
pub use session::{LevelCount, QuizSession, QuizSummary, QuizTurn, SessionPhase, StatusReport};
pub use shuffle::{CatalogOrder, OrderSource, SeededShuffle};
pub use variant::QuizVariant;
