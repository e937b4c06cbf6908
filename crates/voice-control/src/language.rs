//! Recognition locales the speech layer can be configured with.

use std::fmt;
use std::str::FromStr;

/// Locales offered for speech recognition. The move grammar accepts every
/// language's vocabulary at once; this only selects the recognizer's
/// acoustic model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecognitionLanguage {
    #[default]
    EnUs,
    PtBr,
    EsEs,
    FrFr,
    DeDe,
}

impl RecognitionLanguage {
    pub const ALL: [RecognitionLanguage; 5] = [
        RecognitionLanguage::EnUs,
        RecognitionLanguage::PtBr,
        RecognitionLanguage::EsEs,
        RecognitionLanguage::FrFr,
        RecognitionLanguage::DeDe,
    ];

    /// BCP-47 tag handed to the recognition stream.
    pub fn tag(self) -> &'static str {
        match self {
            RecognitionLanguage::EnUs => "en-US",
            RecognitionLanguage::PtBr => "pt-BR",
            RecognitionLanguage::EsEs => "es-ES",
            RecognitionLanguage::FrFr => "fr-FR",
            RecognitionLanguage::DeDe => "de-DE",
        }
    }
}

impl fmt::Display for RecognitionLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unsupported recognition language: {0}. Supported: en-US, pt-BR, es-ES, fr-FR, de-DE")]
pub struct LanguageParseError(String);

impl FromStr for RecognitionLanguage {
    type Err = LanguageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en-us" | "en" => Ok(RecognitionLanguage::EnUs),
            "pt-br" | "pt" => Ok(RecognitionLanguage::PtBr),
            "es-es" | "es" => Ok(RecognitionLanguage::EsEs),
            "fr-fr" | "fr" => Ok(RecognitionLanguage::FrFr),
            "de-de" | "de" => Ok(RecognitionLanguage::DeDe),
            _ => Err(LanguageParseError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        for lang in RecognitionLanguage::ALL {
            assert_eq!(lang.tag().parse::<RecognitionLanguage>().unwrap(), lang);
        }
    }

    #[test]
    fn parsing_is_case_insensitive() {
        assert_eq!(
            "PT-BR".parse::<RecognitionLanguage>().unwrap(),
            RecognitionLanguage::PtBr
        );
        assert!("klingon".parse::<RecognitionLanguage>().is_err());
    }

    #[test]
    fn default_is_english() {
        assert_eq!(RecognitionLanguage::default().tag(), "en-US");
    }
}
