//! Origin resolution: free-text place → canonical domestic city or foreign country.
//!
//! The cascade lives in [`resolver`]; its dictionaries in [`tables`] and
//! [`gazetteer`]; the pluggable scorer in [`similarity`].

pub mod gazetteer;
pub mod resolver;
pub mod similarity;
pub mod tables;

pub use gazetteer::Gazetteer;
pub use resolver::{GeoResolver, Resolution, ResolutionStage};
pub use similarity::{LevenshteinRatio, SimilarityScorer, TokenSortRatio};

/// Folds Latin accented letters to their base letter (`São` → `Sao`).
pub fn fold_diacritics(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => 'a',
            'Á' | 'À' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'É' | 'È' | 'Ê' | 'Ë' => 'E',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
            'ç' => 'c',
            'Ç' => 'C',
            'ñ' => 'n',
            'Ñ' => 'N',
            'ý' | 'ÿ' => 'y',
            'Ý' => 'Y',
            other => other,
        })
        .collect()
}

/// Punctuation-free, whitespace-collapsed text.
pub fn strip_punctuation(s: &str) -> String {
    let spaced = tables::PUNCTUATION.replace_all(s, " ");
    tables::WHITESPACE.replace_all(&spaced, " ").trim().to_string()
}

/// Comparison form shared by candidates and gazetteer entries.
pub fn match_key(s: &str) -> String {
    fold_diacritics(&strip_punctuation(s).to_lowercase())
}

/// `fazenda SÃO joão` → `Fazenda São João`.
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
