//! Geração da ordem das perguntas.
//!
//! Embaralhamento não-criptográfico: justo e imprevisível basta. A semente
//! vem do relógio por padrão, ou é fixada (configuração e testes).

use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Fonte de permutações de `[0, n)`.
pub trait OrderSource: Send + Sync {
    /// Gera uma permutação de `[0, n)`.
    fn permutation(&mut self, n: usize) -> Vec<usize>;
}

/// Embaralhamento uniforme (Fisher-Yates) com PRNG semeável.
#[derive(Debug, Clone)]
pub struct SeededShuffle {
    rng: StdRng,
    seed: u64,
}

impl SeededShuffle {
    /// Semente fixa: mesma sequência de ordens a cada execução.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Semente derivada do relógio.
    pub fn from_clock() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        Self::with_seed(seed)
    }

    /// Semente usada.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl OrderSource for SeededShuffle {
    fn permutation(&mut self, n: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(&mut self.rng);
        order
    }
}

/// Mantém a ordem do catálogo (`quiz.shuffle = false`).
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogOrder;

impl OrderSource for CatalogOrder {
    fn permutation(&mut self, n: usize) -> Vec<usize> {
        (0..n).collect()
    }
}

/// Fonte de ordem conforme a configuração.
pub fn order_source(shuffle: bool, seed: Option<u64>) -> Box<dyn OrderSource> {
    match (shuffle, seed) {
        (false, _) => Box::new(CatalogOrder),
        (true, Some(seed)) => Box::new(SeededShuffle::with_seed(seed)),
        (true, None) => Box::new(SeededShuffle::from_clock()),
    }
}
