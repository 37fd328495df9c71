//! Variantes de quiz suportadas.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::errors::PolquizError;

/// Os três questionários administrados pelo servidor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QuizVariant {
    #[serde(rename = "political_compass")]
    PoliticalCompass,
    #[serde(rename = "8values")]
    EightValues,
    #[serde(rename = "politiscales")]
    Politiscales,
}

impl QuizVariant {
    /// Todas as variantes, na ordem em que são expostas.
    pub const ALL: [QuizVariant; 3] = [
        QuizVariant::PoliticalCompass,
        QuizVariant::EightValues,
        QuizVariant::Politiscales,
    ];

    /// Chave estável (usada no catálogo e na CLI).
    pub fn key(&self) -> &'static str {
        match self {
            QuizVariant::PoliticalCompass => "political_compass",
            QuizVariant::EightValues => "8values",
            QuizVariant::Politiscales => "politiscales",
        }
    }

    /// Nome legível.
    pub fn title(&self) -> &'static str {
        match self {
            QuizVariant::PoliticalCompass => "Political Compass",
            QuizVariant::EightValues => "8values",
            QuizVariant::Politiscales => "PolitiScales",
        }
    }

    /// Prefixo dos nomes das ferramentas MCP.
    ///
    /// Nomes de ferramentas não podem começar com dígito, por isso 8values
    /// vira `eightvalues`.
    pub fn tool_prefix(&self) -> &'static str {
        match self {
            QuizVariant::PoliticalCompass => "political_compass",
            QuizVariant::EightValues => "eightvalues",
            QuizVariant::Politiscales => "politiscales",
        }
    }
}

impl fmt::Display for QuizVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

impl FromStr for QuizVariant {
    type Err = PolquizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "political_compass" | "compass" => Ok(QuizVariant::PoliticalCompass),
            "8values" | "eightvalues" => Ok(QuizVariant::EightValues),
            "politiscales" => Ok(QuizVariant::Politiscales),
            _ => Err(PolquizError::UnknownQuiz(s.to_string())),
        }
    }
}
