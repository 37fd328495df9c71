//! Níveis de resposta e decodificação de tokens.
//!
//! Cada variante aceita um vocabulário fechado (case-sensitive). Todo nível
//! tem duas grafias: o token de máquina (`strongly_agree`) e o rótulo legível
//! (`Strongly Agree`). Ambas mapeiam para o mesmo nível.

use serde::{Deserialize, Serialize};

use crate::types::errors::{PolquizError, PolquizResult};

use super::variant::QuizVariant;

/// Nível de concordância com uma afirmação.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ResponseLevel {
    StronglyDisagree,
    Disagree,
    Neutral,
    Agree,
    StronglyAgree,
}

impl ResponseLevel {
    /// Token de máquina.
    pub fn token(&self) -> &'static str {
        match self {
            ResponseLevel::StronglyDisagree => "strongly_disagree",
            ResponseLevel::Disagree => "disagree",
            ResponseLevel::Neutral => "neutral",
            ResponseLevel::Agree => "agree",
            ResponseLevel::StronglyAgree => "strongly_agree",
        }
    }

    /// Rótulo legível.
    pub fn label(&self) -> &'static str {
        match self {
            ResponseLevel::StronglyDisagree => "Strongly Disagree",
            ResponseLevel::Disagree => "Disagree",
            ResponseLevel::Neutral => "Neutral",
            ResponseLevel::Agree => "Agree",
            ResponseLevel::StronglyAgree => "Strongly Agree",
        }
    }
}

impl std::fmt::Display for ResponseLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Escala de respostas de uma variante: níveis aceitos e seus multiplicadores.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseScale {
    levels: Vec<(ResponseLevel, f64)>,
}

impl ResponseScale {
    /// Cria uma escala a partir de pares (nível, multiplicador).
    pub fn new(levels: Vec<(ResponseLevel, f64)>) -> Self {
        Self { levels }
    }

    /// Escala padrão de cada variante.
    pub fn for_variant(variant: QuizVariant) -> Self {
        use ResponseLevel::*;

        match variant {
            // Sem opção neutra.
            QuizVariant::PoliticalCompass => Self::new(vec![
                (StronglyDisagree, -2.0),
                (Disagree, -1.0),
                (Agree, 1.0),
                (StronglyAgree, 2.0),
            ]),
            QuizVariant::EightValues => Self::new(vec![
                (StronglyAgree, 1.0),
                (Agree, 0.5),
                (Neutral, 0.0),
                (Disagree, -0.5),
                (StronglyDisagree, -1.0),
            ]),
            QuizVariant::Politiscales => Self::new(vec![
                (StronglyAgree, 1.0),
                (Agree, 2.0 / 3.0),
                (Neutral, 0.0),
                (Disagree, -2.0 / 3.0),
                (StronglyDisagree, -1.0),
            ]),
        }
    }

    /// Níveis aceitos, na ordem de apresentação.
    pub fn levels(&self) -> impl Iterator<Item = ResponseLevel> + '_ {
        self.levels.iter().map(|(level, _)| *level)
    }

    /// Multiplicador de um nível (0 se o nível não pertence à escala).
    pub fn multiplier(&self, level: ResponseLevel) -> f64 {
        self.levels
            .iter()
            .find(|(l, _)| *l == level)
            .map(|(_, m)| *m)
            .unwrap_or(0.0)
    }

    /// Maior multiplicador absoluto da escala.
    pub fn max_multiplier(&self) -> f64 {
        self.levels.iter().map(|(_, m)| m.abs()).fold(0.0, f64::max)
    }

    /// Verifica se o nível pertence à escala.
    pub fn contains(&self, level: ResponseLevel) -> bool {
        self.levels.iter().any(|(l, _)| *l == level)
    }

    /// Vocabulário aceito (tokens de máquina seguidos dos rótulos).
    pub fn vocabulary(&self) -> Vec<String> {
        self.levels()
            .map(|l| l.token().to_string())
            .chain(self.levels().map(|l| l.label().to_string()))
            .collect()
    }

    /// Decodifica um token de resposta.
    pub fn decode(&self, token: &str) -> PolquizResult<ResponseLevel> {
        self.levels()
            .find(|level| level.token() == token || level.label() == token)
            .ok_or_else(|| PolquizError::InvalidResponse {
                token: token.to_string(),
                accepted: self.vocabulary(),
            })
    }

    /// Codifica um nível como token de máquina.
    pub fn encode(&self, level: ResponseLevel) -> Option<&'static str> {
        self.contains(level).then(|| level.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synonyms_decode_to_same_level() {
        let scale = ResponseScale::for_variant(QuizVariant::EightValues);
        assert_eq!(
            scale.decode("strongly_agree").unwrap(),
            scale.decode("Strongly Agree").unwrap()
        );
        assert_eq!(scale.decode("neutral").unwrap(), ResponseLevel::Neutral);
    }

    #[test]
    fn test_decode_is_case_sensitive() {
        let scale = ResponseScale::for_variant(QuizVariant::PoliticalCompass);
        assert!(scale.decode("Agree").is_ok());
        assert!(scale.decode("agree").is_ok());
        assert!(scale.decode("AGREE").is_err());
        assert!(scale.decode("strongly agree").is_err());
    }

    #[test]
    fn test_compass_has_no_neutral() {
        let scale = ResponseScale::for_variant(QuizVariant::PoliticalCompass);
        match scale.decode("neutral") {
            Err(PolquizError::InvalidResponse { token, accepted }) => {
                assert_eq!(token, "neutral");
                assert_eq!(accepted.len(), 8);
                assert!(accepted.contains(&"strongly_disagree".to_string()));
            }
            other => panic!("expected InvalidResponse, got {:?}", other),
        }
        assert_eq!(scale.encode(ResponseLevel::Neutral), None);
    }

    #[test]
    fn test_multipliers() {
        let compass = ResponseScale::for_variant(QuizVariant::PoliticalCompass);
        assert_eq!(compass.multiplier(ResponseLevel::StronglyAgree), 2.0);
        assert_eq!(compass.max_multiplier(), 2.0);

        let scales = ResponseScale::for_variant(QuizVariant::Politiscales);
        assert!((scales.multiplier(ResponseLevel::Agree) - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(scales.max_multiplier(), 1.0);
    }

    #[test]
    fn test_encode_roundtrip_token() {
        let scale = ResponseScale::for_variant(QuizVariant::Politiscales);
        for level in scale.levels() {
            let token = scale.encode(level).unwrap();
            assert_eq!(scale.decode(token).unwrap(), level);
        }
    }
}
