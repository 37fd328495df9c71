//! Normalização de pontuações.
//!
//! Duas estratégias, escolhidas por variante na construção da sessão:
//!
//! - [`LinearBounded`] (political compass, 8values): `raw / scale + offset`,
//!   arredondado em 2 casas, com rótulo de quadrante.
//! - [`PairedWithNeutral`] (politiscales): porcentagem por polo sobre o máximo
//!   alcançável, neutro por par e badges acima de um limiar.

use std::collections::BTreeMap;

use serde::Serialize;

use super::catalog::Catalog;
use super::ideologies;
use super::variant::QuizVariant;

/// Acumuladores brutos por eixo.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AxisTally {
    /// Soma das contribuições por eixo.
    pub scores: BTreeMap<String, f64>,

    /// Soma das contribuições máximas alcançáveis por eixo.
    pub maxima: BTreeMap<String, f64>,
}

impl AxisTally {
    /// Soma uma contribuição a um eixo.
    pub fn add(&mut self, axis: &str, delta: f64) {
        *self.scores.entry(axis.to_string()).or_insert(0.0) += delta;
    }

    /// Soma um máximo alcançável a um eixo.
    pub fn add_maximum(&mut self, axis: &str, reach: f64) {
        *self.maxima.entry(axis.to_string()).or_insert(0.0) += reach;
    }

    /// Pontuação acumulada (0 se o eixo nunca foi tocado).
    pub fn score(&self, axis: &str) -> f64 {
        self.scores.get(axis).copied().unwrap_or(0.0)
    }

    /// Máximo acumulado (0 se o eixo nunca foi tocado).
    pub fn maximum(&self, axis: &str) -> f64 {
        self.maxima.get(axis).copied().unwrap_or(0.0)
    }
}

/// Valor normalizado de um eixo.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisValue {
    pub key: String,
    pub name: String,
    pub value: f64,

    /// Nomes dos extremos (baixo, alto), quando o eixo é bipolar.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poles: Option<[String; 2]>,
}

/// Par de polos com a fatia neutra.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairValue {
    pub left: AxisValue,
    pub right: AxisValue,
    pub neutral: f64,
}

/// Eixo sem par que ultrapassou o limiar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Badge {
    pub key: String,
    pub name: String,
    pub score: f64,
}

/// Visão normalizada e rotulada das pontuações.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedResult {
    pub variant: QuizVariant,
    pub answered: usize,
    pub total: usize,
    pub axes: Vec<AxisValue>,
    pub pairs: Vec<PairValue>,
    pub badges: Vec<Badge>,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ideology: Option<String>,
}

impl NormalizedResult {
    /// Valor de um eixo (linear) ou polo (pares).
    pub fn value(&self, key: &str) -> Option<f64> {
        self.axes
            .iter()
            .chain(self.pairs.iter().flat_map(|p| [&p.left, &p.right]))
            .find(|a| a.key == key)
            .map(|a| a.value)
    }

    /// Se todas as perguntas foram respondidas.
    pub fn is_complete(&self) -> bool {
        self.answered == self.total
    }
}

/// Estratégia de normalização.
pub trait ScoreNormalizer: Send + Sync {
    /// Eixos que a estratégia reconhece.
    fn axes(&self) -> Vec<&str>;

    /// Normaliza os acumuladores.
    fn normalize(&self, tally: &AxisTally, answered: usize, total: usize) -> NormalizedResult;
}

/// Arredonda em 2 casas decimais.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ═══════════════════════════════════════════════════════════════════════════
// Linear
// ═══════════════════════════════════════════════════════════════════════════

/// Eixo com escala linear fixa.
#[derive(Debug, Clone)]
pub struct LinearAxis {
    pub key: String,
    pub name: String,
    pub scale: f64,
    pub offset: f64,
    /// Ponto de referência para o sinal do quadrante.
    pub pivot: f64,
    pub poles: [String; 2],
}

impl LinearAxis {
    fn new(key: &str, name: &str, scale: f64, offset: f64, pivot: f64, poles: [&str; 2]) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            scale,
            offset,
            pivot,
            poles: poles.map(str::to_string),
        }
    }

    fn apply(&self, raw: f64, answered: usize) -> f64 {
        if answered == 0 || self.scale == 0.0 {
            return round2(self.offset);
        }
        round2(raw / self.scale + self.offset)
    }
}

/// Regra de quadrante sobre dois eixos.
///
/// Ordem dos ramos: `a>0 && b>0`, `a>0 && b<0`, `a<0 && b>0`, senão. Zero
/// exato em qualquer eixo cai no último ramo junto com (negativo, negativo).
#[derive(Debug, Clone)]
pub struct QuadrantRule {
    pub first: String,
    pub second: String,
    /// Rótulos: (+,+), (+,-), (-,+), demais.
    pub labels: [String; 4],
}

impl QuadrantRule {
    /// Classifica valores já centrados no pivô.
    pub fn classify(&self, a: f64, b: f64) -> &str {
        if a > 0.0 && b > 0.0 {
            &self.labels[0]
        } else if a > 0.0 && b < 0.0 {
            &self.labels[1]
        } else if a < 0.0 && b > 0.0 {
            &self.labels[2]
        } else {
            &self.labels[3]
        }
    }
}

/// Normalização linear limitada (political compass, 8values).
#[derive(Debug, Clone)]
pub struct LinearBounded {
    variant: QuizVariant,
    axes: Vec<LinearAxis>,
    quadrant: QuadrantRule,
    match_ideology: bool,
}

impl LinearBounded {
    /// Cria a estratégia com eixos e regra de quadrante explícitos.
    pub fn new(variant: QuizVariant, axes: Vec<LinearAxis>, quadrant: QuadrantRule) -> Self {
        Self {
            variant,
            axes,
            quadrant,
            match_ideology: false,
        }
    }

    /// Political compass: escalas calibradas para levar o intervalo teórico
    /// do catálogo a aproximadamente [-10, +10].
    pub fn political_compass() -> Self {
        Self::new(
            QuizVariant::PoliticalCompass,
            vec![
                LinearAxis::new("economic", "Economic", 9.4, 0.0, 0.0, ["Left", "Right"]),
                LinearAxis::new(
                    "social",
                    "Social",
                    15.2,
                    0.0,
                    0.0,
                    ["Libertarian", "Authoritarian"],
                ),
            ],
            QuadrantRule {
                first: "economic".to_string(),
                second: "social".to_string(),
                labels: [
                    "Authoritarian Right".to_string(),
                    "Libertarian Right".to_string(),
                    "Authoritarian Left".to_string(),
                    "Libertarian Left".to_string(),
                ],
            },
        )
    }

    /// 8values: cada eixo vai de 0 a 100 usando o total absoluto de pesos do
    /// catálogo (`scale = max / 50`, `offset = 50`).
    pub fn eightvalues(catalog: &Catalog) -> Self {
        let totals = catalog.axis_totals();
        let axis = |key: &str, name: &str, poles: [&str; 2]| {
            let max = totals.get(key).copied().unwrap_or(0.0);
            LinearAxis::new(key, name, max / 50.0, 50.0, 50.0, poles)
        };

        let mut normalizer = Self::new(
            QuizVariant::EightValues,
            vec![
                axis("econ", "Economic", ["Markets", "Equality"]),
                axis("dipl", "Diplomatic", ["Nation", "Globe"]),
                axis("govt", "Civil", ["Authority", "Liberty"]),
                axis("scty", "Societal", ["Tradition", "Progress"]),
            ],
            QuadrantRule {
                first: "econ".to_string(),
                second: "govt".to_string(),
                labels: [
                    "Libertarian Left".to_string(),
                    "Authoritarian Left".to_string(),
                    "Libertarian Right".to_string(),
                    "Authoritarian Right".to_string(),
                ],
            },
        );
        normalizer.match_ideology = true;
        normalizer
    }

    fn centered(&self, values: &[AxisValue], key: &str) -> f64 {
        self.axes
            .iter()
            .zip(values)
            .find(|(axis, _)| axis.key == key)
            .map(|(axis, value)| value.value - axis.pivot)
            .unwrap_or(0.0)
    }
}

impl ScoreNormalizer for LinearBounded {
    fn axes(&self) -> Vec<&str> {
        self.axes.iter().map(|a| a.key.as_str()).collect()
    }

    fn normalize(&self, tally: &AxisTally, answered: usize, total: usize) -> NormalizedResult {
        let axes: Vec<AxisValue> = self
            .axes
            .iter()
            .map(|axis| AxisValue {
                key: axis.key.clone(),
                name: axis.name.clone(),
                value: axis.apply(tally.score(&axis.key), answered),
                poles: Some(axis.poles.clone()),
            })
            .collect();

        let a = self.centered(&axes, &self.quadrant.first);
        let b = self.centered(&axes, &self.quadrant.second);
        let label = self.quadrant.classify(a, b).to_string();

        let ideology = if self.match_ideology && axes.len() == 4 {
            let values = [axes[0].value, axes[1].value, axes[2].value, axes[3].value];
            Some(ideologies::closest(&values).to_string())
        } else {
            None
        };

        NormalizedResult {
            variant: self.variant,
            answered,
            total,
            axes,
            pairs: Vec::new(),
            badges: Vec::new(),
            label,
            ideology,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Pares com neutro
// ═══════════════════════════════════════════════════════════════════════════

/// Um polo de um par.
#[derive(Debug, Clone)]
pub struct Pole {
    pub key: String,
    pub name: String,
    /// Palavra usada no rótulo quando o polo domina.
    pub slogan: String,
}

impl Pole {
    fn new(key: &str, name: &str, slogan: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            slogan: slogan.to_string(),
        }
    }
}

/// Eixo sem par, exibido como badge acima do limiar.
#[derive(Debug, Clone)]
pub struct BadgeAxis {
    pub key: String,
    pub name: String,
    pub threshold: f64,
}

impl BadgeAxis {
    fn new(key: &str, name: &str, threshold: f64) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            threshold,
        }
    }
}

/// Polos a partir dos quais a palavra entra no rótulo.
const SLOGAN_THRESHOLD: f64 = 50.0;

/// Normalização por pares com fatia neutra (politiscales).
#[derive(Debug, Clone)]
pub struct PairedWithNeutral {
    variant: QuizVariant,
    pairs: Vec<(Pole, Pole)>,
    badges: Vec<BadgeAxis>,
}

impl PairedWithNeutral {
    /// Cria a estratégia com pares e badges explícitos.
    pub fn new(variant: QuizVariant, pairs: Vec<(Pole, Pole)>, badges: Vec<BadgeAxis>) -> Self {
        Self {
            variant,
            pairs,
            badges,
        }
    }

    /// Eixos do politiscales.
    pub fn politiscales() -> Self {
        let pair = |l: (&str, &str, &str), r: (&str, &str, &str)| {
            (Pole::new(l.0, l.1, l.2), Pole::new(r.0, r.1, r.2))
        };

        Self::new(
            QuizVariant::Politiscales,
            vec![
                pair(
                    ("constructivism", "Constructivism", "Constructivist"),
                    ("essentialism", "Essentialism", "Essentialist"),
                ),
                pair(
                    ("rehabilitative_justice", "Rehabilitative Justice", "Rehabilitative"),
                    ("punitive_justice", "Punitive Justice", "Punitive"),
                ),
                pair(
                    ("progressive", "Progressive", "Progressive"),
                    ("conservative", "Conservative", "Conservative"),
                ),
                pair(
                    ("internationalism", "Internationalism", "Internationalist"),
                    ("nationalism", "Nationalism", "Nationalist"),
                ),
                pair(
                    ("communism", "Communism", "Communist"),
                    ("capitalism", "Capitalism", "Capitalist"),
                ),
                pair(
                    ("regulation", "Regulation", "Regulationist"),
                    ("laissez_faire", "Laissez-faire", "Laissez-faire"),
                ),
                pair(
                    ("ecology", "Ecology", "Ecologist"),
                    ("production", "Production", "Productivist"),
                ),
                pair(
                    ("revolution", "Revolution", "Revolutionary"),
                    ("reform", "Reform", "Reformist"),
                ),
            ],
            vec![
                BadgeAxis::new("anarchism", "Anarchism", 60.0),
                BadgeAxis::new("pragmatism", "Pragmatism", 50.0),
                BadgeAxis::new("feminism", "Feminism", 60.0),
                BadgeAxis::new("religion", "Religion", 50.0),
                BadgeAxis::new("conspiracy", "Conspiracy", 50.0),
                BadgeAxis::new("monarchism", "Monarchism", 50.0),
                BadgeAxis::new("veganism", "Veganism", 50.0),
            ],
        )
    }

    fn percentage(tally: &AxisTally, key: &str, answered: usize) -> f64 {
        let max = tally.maximum(key);
        if answered == 0 || max <= 0.0 {
            return 0.0;
        }
        round2((tally.score(key) / max * 100.0).clamp(0.0, 100.0))
    }

    fn pole_value(pole: &Pole, value: f64) -> AxisValue {
        AxisValue {
            key: pole.key.clone(),
            name: pole.name.clone(),
            value,
            poles: None,
        }
    }
}

impl ScoreNormalizer for PairedWithNeutral {
    fn axes(&self) -> Vec<&str> {
        self.pairs
            .iter()
            .flat_map(|(l, r)| [l.key.as_str(), r.key.as_str()])
            .chain(self.badges.iter().map(|b| b.key.as_str()))
            .collect()
    }

    fn normalize(&self, tally: &AxisTally, answered: usize, total: usize) -> NormalizedResult {
        let pairs: Vec<PairValue> = self
            .pairs
            .iter()
            .map(|(left, right)| {
                let l = Self::percentage(tally, &left.key, answered);
                let r = Self::percentage(tally, &right.key, answered);
                PairValue {
                    left: Self::pole_value(left, l),
                    right: Self::pole_value(right, r),
                    neutral: round2((100.0 - (l + r)).max(0.0)),
                }
            })
            .collect();

        let mut badges: Vec<Badge> = self
            .badges
            .iter()
            .filter_map(|badge| {
                let score = Self::percentage(tally, &badge.key, answered);
                (score > badge.threshold).then(|| Badge {
                    key: badge.key.clone(),
                    name: badge.name.clone(),
                    score,
                })
            })
            .collect();
        badges.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.key.cmp(&b.key)));

        let slogan: Vec<&str> = self
            .pairs
            .iter()
            .zip(&pairs)
            .filter_map(|((left, right), value)| {
                let (pole, score) = if value.right.value > value.left.value {
                    (right, value.right.value)
                } else {
                    (left, value.left.value)
                };
                (score >= SLOGAN_THRESHOLD).then_some(pole.slogan.as_str())
            })
            .collect();

        let label = if slogan.is_empty() {
            "Centrist".to_string()
        } else {
            slogan.join(" · ")
        };

        NormalizedResult {
            variant: self.variant,
            answered,
            total,
            axes: Vec::new(),
            pairs,
            badges,
            label,
            ideology: None,
        }
    }
}

/// Estratégia de normalização de cada variante.
pub fn for_variant(variant: QuizVariant, catalog: &Catalog) -> Box<dyn ScoreNormalizer> {
    match variant {
        QuizVariant::PoliticalCompass => Box::new(LinearBounded::political_compass()),
        QuizVariant::EightValues => Box::new(LinearBounded::eightvalues(catalog)),
        QuizVariant::Politiscales => Box::new(PairedWithNeutral::politiscales()),
    }
}
