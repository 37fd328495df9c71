//! Catálogo de perguntas.
//!
//! Os catálogos são arquivos JSON embutidos no binário e carregados uma única
//! vez na inicialização. Um catálogo malformado é um erro fatal de
//! configuração, nunca um erro por chamada.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::types::errors::{PolquizError, PolquizResult};

use super::variant::QuizVariant;

const POLITICAL_COMPASS_JSON: &str = include_str!("../../data/political_compass.json");
const EIGHTVALUES_JSON: &str = include_str!("../../data/8values.json");
const POLITISCALES_JSON: &str = include_str!("../../data/politiscales.json");

/// Quando um efeito é contabilizado.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// Sempre: contribuição = multiplicador × peso (com sinal).
    #[default]
    Any,
    /// Só quando o respondente concorda.
    Agree,
    /// Só quando o respondente discorda (usa o multiplicador em módulo).
    Disagree,
}

/// Efeito de uma pergunta sobre um eixo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Effect {
    /// Identificador do eixo.
    pub axis: String,

    /// Peso do efeito.
    pub weight: f64,

    /// Polaridade.
    #[serde(default)]
    pub when: Polarity,
}

impl Effect {
    /// Contribuição do efeito para um multiplicador de resposta.
    pub fn contribution(&self, multiplier: f64) -> f64 {
        match self.when {
            Polarity::Any => multiplier * self.weight,
            Polarity::Agree if multiplier > 0.0 => multiplier * self.weight,
            Polarity::Disagree if multiplier < 0.0 => -multiplier * self.weight,
            _ => 0.0,
        }
    }
}

/// Pergunta imutável do catálogo.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    /// Ordinal estável atribuído no carregamento.
    pub index: usize,

    /// Texto da afirmação.
    pub text: String,

    /// Efeitos sobre os eixos.
    pub effects: Vec<Effect>,
}

impl Question {
    /// Contribuições por eixo para o multiplicador dado.
    ///
    /// Efeitos que não disparam para essa polaridade são omitidos.
    pub fn contributions(&self, multiplier: f64) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.effects.iter().filter_map(move |effect| {
            let applies = match effect.when {
                Polarity::Any => true,
                Polarity::Agree => multiplier > 0.0,
                Polarity::Disagree => multiplier < 0.0,
            };
            applies.then(|| (effect.axis.as_str(), effect.contribution(multiplier)))
        })
    }

    /// Contribuição máxima alcançável por eixo ao responder esta pergunta.
    ///
    /// Efeitos de polaridades opostas sobre o mesmo eixo nunca disparam
    /// juntos, então vale o maior peso absoluto do eixo.
    pub fn reachable(&self, max_multiplier: f64) -> BTreeMap<&str, f64> {
        let mut reach: BTreeMap<&str, f64> = BTreeMap::new();
        for effect in &self.effects {
            let value = effect.weight.abs() * max_multiplier;
            let entry = reach.entry(effect.axis.as_str()).or_insert(0.0);
            if value > *entry {
                *entry = value;
            }
        }
        reach
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    variant: QuizVariant,
    questions: Vec<QuestionRecord>,
}

#[derive(Debug, Deserialize)]
struct QuestionRecord {
    text: String,
    #[serde(default)]
    effects: Vec<Effect>,
}

/// Conjunto ordenado de perguntas de uma variante.
#[derive(Debug, Clone)]
pub struct Catalog {
    variant: QuizVariant,
    questions: Vec<Question>,
    fingerprint: String,
}

impl Catalog {
    /// Carrega o catálogo embutido de uma variante.
    pub fn builtin(variant: QuizVariant) -> PolquizResult<Self> {
        let source = match variant {
            QuizVariant::PoliticalCompass => POLITICAL_COMPASS_JSON,
            QuizVariant::EightValues => EIGHTVALUES_JSON,
            QuizVariant::Politiscales => POLITISCALES_JSON,
        };

        let catalog = Self::from_json(source)?;
        if catalog.variant != variant {
            return Err(PolquizError::catalog(format!(
                "embedded catalog for {} declares variant {}",
                variant.key(),
                catalog.variant.key()
            )));
        }

        tracing::debug!(
            variant = variant.key(),
            questions = catalog.len(),
            fingerprint = %catalog.short_fingerprint(),
            "Catalog loaded"
        );

        Ok(catalog)
    }

    /// Faz o parse de um catálogo JSON e atribui os índices.
    pub fn from_json(source: &str) -> PolquizResult<Self> {
        let file: CatalogFile = serde_json::from_str(source)
            .map_err(|e| PolquizError::catalog(format!("malformed catalog JSON: {}", e)))?;

        let fingerprint = hex::encode(Sha256::digest(source.as_bytes()));
        let questions = file
            .questions
            .into_iter()
            .enumerate()
            .map(|(index, record)| Question {
                index,
                text: record.text,
                effects: record.effects,
            })
            .collect();

        let catalog = Self {
            variant: file.variant,
            questions,
            fingerprint,
        };
        catalog.check_integrity()?;
        Ok(catalog)
    }

    /// Cria um catálogo a partir de perguntas já montadas (índices reatribuídos).
    pub fn from_questions(variant: QuizVariant, questions: Vec<Question>) -> PolquizResult<Self> {
        let mut hasher = Sha256::new();
        let questions: Vec<Question> = questions
            .into_iter()
            .enumerate()
            .map(|(index, mut q)| {
                hasher.update(q.text.as_bytes());
                q.index = index;
                q
            })
            .collect();

        let catalog = Self {
            variant,
            questions,
            fingerprint: hex::encode(hasher.finalize()),
        };
        catalog.check_integrity()?;
        Ok(catalog)
    }

    fn check_integrity(&self) -> PolquizResult<()> {
        if self.questions.is_empty() {
            return Err(PolquizError::catalog(format!(
                "{} catalog has no questions",
                self.variant.key()
            )));
        }

        for question in &self.questions {
            if question.text.trim().is_empty() {
                return Err(PolquizError::catalog(format!(
                    "question {} has empty text",
                    question.index
                )));
            }
            if let Some(bad) = question.effects.iter().find(|e| !e.weight.is_finite()) {
                return Err(PolquizError::catalog(format!(
                    "question {} has non-finite weight on axis '{}'",
                    question.index, bad.axis
                )));
            }
        }

        Ok(())
    }

    /// Verifica que todo eixo referenciado é conhecido pelo normalizador.
    pub fn validate_axes(&self, known: &[&str]) -> PolquizResult<()> {
        for question in &self.questions {
            for effect in &question.effects {
                if !known.contains(&effect.axis.as_str()) {
                    return Err(PolquizError::catalog(format!(
                        "question {} references unknown axis '{}'",
                        question.index, effect.axis
                    )));
                }
            }
        }
        Ok(())
    }

    /// Variante do catálogo.
    pub fn variant(&self) -> QuizVariant {
        self.variant
    }

    /// Número de perguntas.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Catálogos carregados nunca são vazios; mantido por simetria com `len`.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Pergunta pelo índice.
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Todas as perguntas, em ordem de catálogo.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// SHA-256 (hex) da fonte do catálogo.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Primeiros 12 caracteres do fingerprint.
    pub fn short_fingerprint(&self) -> &str {
        &self.fingerprint[..12.min(self.fingerprint.len())]
    }

    /// Soma dos pesos absolutos por eixo em todo o catálogo.
    pub fn axis_totals(&self) -> BTreeMap<String, f64> {
        let mut totals = BTreeMap::new();
        for effect in self.questions.iter().flat_map(|q| q.effects.iter()) {
            *totals.entry(effect.axis.clone()).or_insert(0.0) += effect.weight.abs();
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalogs_load() {
        assert_eq!(Catalog::builtin(QuizVariant::PoliticalCompass).unwrap().len(), 62);
        assert_eq!(Catalog::builtin(QuizVariant::EightValues).unwrap().len(), 70);
        assert_eq!(Catalog::builtin(QuizVariant::Politiscales).unwrap().len(), 62);
    }

    #[test]
    fn test_indices_are_assigned_in_order() {
        let catalog = Catalog::builtin(QuizVariant::EightValues).unwrap();
        for (i, q) in catalog.questions().iter().enumerate() {
            assert_eq!(q.index, i);
        }
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let a = Catalog::builtin(QuizVariant::Politiscales).unwrap();
        let b = Catalog::builtin(QuizVariant::Politiscales).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
        assert_eq!(a.short_fingerprint().len(), 12);
    }

    #[test]
    fn test_empty_catalog_is_rejected() {
        let result = Catalog::from_json(r#"{"variant":"8values","questions":[]}"#);
        assert!(matches!(result, Err(PolquizError::Catalog(_))));
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        assert!(matches!(
            Catalog::from_json("{not json"),
            Err(PolquizError::Catalog(_))
        ));
    }

    #[test]
    fn test_unknown_axis_is_rejected() {
        let catalog = Catalog::from_json(
            r#"{"variant":"8values","questions":[{"text":"Q","effects":[{"axis":"moon","weight":1}]}]}"#,
        )
        .unwrap();
        assert!(catalog.validate_axes(&["econ"]).is_err());
        assert!(catalog.validate_axes(&["moon"]).is_ok());
    }

    #[test]
    fn test_polarity_contributions() {
        let effect = |when| Effect {
            axis: "x".to_string(),
            weight: 3.0,
            when,
        };

        assert_eq!(effect(Polarity::Any).contribution(-0.5), -1.5);
        assert_eq!(effect(Polarity::Agree).contribution(1.0), 3.0);
        assert_eq!(effect(Polarity::Agree).contribution(-1.0), 0.0);
        assert_eq!(effect(Polarity::Disagree).contribution(-1.0), 3.0);
        assert_eq!(effect(Polarity::Disagree).contribution(0.0), 0.0);
    }

    #[test]
    fn test_reachable_takes_largest_weight_per_axis() {
        let question = Question {
            index: 0,
            text: "Q".to_string(),
            effects: vec![
                Effect { axis: "a".into(), weight: 3.0, when: Polarity::Agree },
                Effect { axis: "a".into(), weight: 1.0, when: Polarity::Disagree },
                Effect { axis: "b".into(), weight: 2.0, when: Polarity::Disagree },
            ],
        };

        let reach = question.reachable(1.0);
        assert_eq!(reach["a"], 3.0);
        assert_eq!(reach["b"], 2.0);
    }

    #[test]
    fn test_axis_totals() {
        let catalog = Catalog::builtin(QuizVariant::EightValues).unwrap();
        let totals = catalog.axis_totals();
        assert_eq!(totals.len(), 4);
        assert!(totals.values().all(|t| *t > 0.0));
    }
}
