//! Versioned lookup tables behind the origin cascade.
//!
//! Every list here is plain data so it can be reviewed and extended without
//! touching the cascade. Bump [`TABLES_VERSION`] whenever an entry changes.
//! The domestic deny-list must keep every gazetteer name from reading as
//! foreign; `geo::resolver` tests enforce that.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use super::fold_diacritics;

pub const TABLES_VERSION: u32 = 5;

/// Canonical foreign country and the keywords that point to it.
///
/// `names` spell the country itself and are never vetoed by the domestic
/// deny-list; `cities` are place names that a domestic name may share
/// ("Porto", "Roma", "Santiago") and are.
#[derive(Debug)]
pub struct ForeignAlias {
    pub country: &'static str,
    pub names: &'static [&'static str],
    pub cities: &'static [&'static str],
}

impl ForeignAlias {
    pub fn aliases(&self) -> impl Iterator<Item = &'static str> {
        self.names.iter().chain(self.cities).copied()
    }
}

pub const FOREIGN_ALIASES: &[ForeignAlias] = &[
    ForeignAlias {
        country: "Argentina",
        names: &["Argentina"],
        cities: &["Buenos Aires", "Cordoba", "Córdoba", "Rosario", "Mendoza"],
    },
    ForeignAlias {
        country: "Bolivia",
        names: &["Bolivia", "Bolívia"],
        cities: &["Santa Cruz de la Sierra", "Cochabamba", "La Paz"],
    },
    ForeignAlias {
        country: "Paraguay",
        names: &["Paraguay", "Paraguai"],
        cities: &["Asuncion", "Asunción", "Assunção", "Assuncao", "Ciudad del Este"],
    },
    ForeignAlias {
        country: "Uruguay",
        names: &["Uruguay", "Uruguai"],
        cities: &["Montevideo", "Montevidéu"],
    },
    ForeignAlias {
        country: "Chile",
        names: &["Chile"],
        cities: &["Santiago", "Valparaiso", "Valparaíso"],
    },
    ForeignAlias {
        country: "Peru",
        names: &["Peru", "Perú"],
        cities: &["Lima", "Cusco", "Cuzco"],
    },
    ForeignAlias {
        country: "Colombia",
        names: &["Colombia", "Colômbia"],
        cities: &["Bogota", "Bogotá", "Medellin", "Medellín"],
    },
    ForeignAlias {
        country: "Venezuela",
        names: &["Venezuela"],
        cities: &["Caracas"],
    },
    ForeignAlias {
        country: "Ecuador",
        names: &["Ecuador", "Equador"],
        cities: &["Quito", "Guayaquil"],
    },
    ForeignAlias {
        country: "United States",
        names: &["USA", "EUA", "Estados Unidos", "United States"],
        cities: &["Miami", "New York", "Nova York", "Nova Iorque", "Orlando"],
    },
    ForeignAlias {
        country: "Portugal",
        names: &["Portugal"],
        cities: &["Lisboa", "Lisbon", "Porto"],
    },
    ForeignAlias {
        country: "Spain",
        names: &["Spain", "Espanha", "España"],
        cities: &["Madrid", "Barcelona"],
    },
    ForeignAlias {
        country: "France",
        names: &["France", "França"],
        cities: &["Paris"],
    },
    ForeignAlias {
        country: "Italy",
        names: &["Italy", "Itália", "Italia"],
        cities: &["Roma", "Rome", "Milano", "Milão", "Milan"],
    },
    ForeignAlias {
        country: "Germany",
        names: &["Germany", "Alemanha", "Deutschland"],
        cities: &["Berlin", "Berlim"],
    },
    ForeignAlias {
        country: "United Kingdom",
        names: &["UK", "Reino Unido", "United Kingdom", "England", "Inglaterra"],
        cities: &["London", "Londres"],
    },
    ForeignAlias {
        country: "China",
        names: &["China"],
        cities: &[],
    },
    ForeignAlias {
        country: "Japan",
        names: &["Japan", "Japão", "Japao"],
        cities: &["Tokyo", "Tóquio"],
    },
];

/// Domestic words that veto a foreign alias match in the same text
/// ("Porto Alegre", "Alto Paraguai", "Roma - SP").
pub const DOMESTIC_DENY_TERMS: &[&str] = &[
    "Alto", "Baixo", "Médio", "Medio", "Novo", "Nova", "Velho", "Velha",
    "Alegre", "Triste", "Feliz", "Seguro", "Nacional", "União", "Uniao",
    "Estrela", "Gauchos", "Gaúchos", "Esperidião", "Esperidiao", "Santa", "Santo",
    "Norte", "Sul", "Leste", "Oeste", "Centro",
    "Rondonia", "Rondônia", "Ro", "Acre", "Ac", "Amazonas", "Am", "Roraima", "Rr",
    "Para", "Pará", "Pa", "Amapa", "Amapá", "Ap", "Tocantins", "To",
    "Maranhao", "Maranhão", "Ma", "Piaui", "Piauí", "Pi", "Ceara", "Ceará", "Ce",
    "Rio Grande", "Rn", "Rs", "Paraiba", "Paraíba", "Pb", "Pernambuco", "Pe",
    "Alagoas", "Al", "Sergipe", "Se", "Bahia", "Ba", "Minas", "Gerais", "Mg",
    "Espirito Santo", "Espírito Santo", "Es", "Rio de Janeiro", "Rj",
    "Sao Paulo", "São Paulo", "Sp", "Parana", "Paraná", "Pr", "Santa Catarina", "Sc",
    "Mato Grosso", "Mt", "Ms", "Goias", "Goiás", "Go", "Df", "Brasilia", "Brasília",
    "Brasil", "Brazil", "Br",
];

/// Two-letter state abbreviations, stripped before matching.
pub const STATE_CODES: &[&str] = &[
    "AC", "AL", "AP", "AM", "BA", "CE", "DF", "ES", "GO", "MA", "MT", "MS", "MG", "PA",
    "PB", "PR", "PE", "PI", "RJ", "RN", "RS", "RO", "RR", "SC", "SP", "SE", "TO",
];

/// Generic words carrying no place identity.
pub const NOISE_TOKENS: &[&str] = &[
    "Mato Grosso do Sul",
    "Mato Grosso",
    "Brasil",
    "Brazil",
    "BR",
    "País",
    "Pais",
    "Country",
    "Estado",
    "State",
    "Cidade",
    "City",
    "Município",
    "Municipio",
];

/// Values that mean "no answer" rather than a place.
pub const PLACEHOLDERS: &[&str] = &[
    "nan", "null", "none", "n/a", "na", "-", "?", "nao informado", "não informado",
    "sem informacao", "sem informação",
];

/// Folded lowercase short forms and the canonical domestic city they expand to.
pub const CITY_SHORT_FORMS: &[(&str, &str)] = &[
    ("cba", "Cuiabá"),
    ("cgb", "Cuiabá"),
    ("cuiaba", "Cuiabá"),
    ("vg", "Várzea Grande"),
    ("varzea", "Várzea Grande"),
    ("roo", "Rondonópolis"),
    ("tga", "Tangará da Serra"),
    ("tangara", "Tangará da Serra"),
    ("lrv", "Lucas do Rio Verde"),
    ("lucas", "Lucas do Rio Verde"),
    ("chapada", "Chapada dos Guimarães"),
    ("bsb", "Brasília"),
    ("sampa", "São Paulo"),
    ("bh", "Belo Horizonte"),
    ("poa", "Porto Alegre"),
    ("floripa", "Florianópolis"),
    ("cg", "Campo Grande"),
];

/// Case-insensitive, word-bounded alternation over `terms`, longest first.
fn word_set(terms: &[&str]) -> Regex {
    let mut sorted: Vec<&str> = terms.to_vec();
    sorted.sort_by_key(|t| std::cmp::Reverse(t.chars().count()));
    let alternation = sorted
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).unwrap()
}

pub static FOREIGN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let all: Vec<&str> = FOREIGN_ALIASES.iter().flat_map(ForeignAlias::aliases).collect();
    word_set(&all)
});

static COUNTRY_NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let names: Vec<&str> = FOREIGN_ALIASES
        .iter()
        .flat_map(|f| f.names.iter().copied())
        .collect();
    word_set(&names)
});

/// Lowercased alias → country.
static FOREIGN_LOOKUP: Lazy<HashMap<String, &'static str>> = Lazy::new(|| {
    FOREIGN_ALIASES
        .iter()
        .flat_map(|f| f.aliases().map(move |a| (a.to_lowercase(), f.country)))
        .collect()
});

pub static DENY_PATTERN: Lazy<Regex> = Lazy::new(|| word_set(DOMESTIC_DENY_TERMS));

pub static NOISE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let all: Vec<&str> = NOISE_TOKENS.iter().chain(STATE_CODES).copied().collect();
    word_set(&all)
});

pub static PUNCTUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]|_").unwrap());

pub static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignMatch {
    pub country: &'static str,
    /// Matched on the country's own name rather than one of its cities.
    pub by_country_name: bool,
}

/// Foreign alias found in `text`. A country name anywhere wins over a city;
/// otherwise the leftmost city alias is used.
pub fn foreign_match(text: &str) -> Option<ForeignMatch> {
    let (m, by_country_name) = match COUNTRY_NAME_PATTERN.find(text) {
        Some(m) => (m, true),
        None => (FOREIGN_PATTERN.find(text)?, false),
    };
    let country = FOREIGN_LOOKUP.get(&m.as_str().to_lowercase()).copied()?;
    Some(ForeignMatch {
        country,
        by_country_name,
    })
}

pub fn foreign_country(text: &str) -> Option<&'static str> {
    foreign_match(text).map(|m| m.country)
}

/// True when `text`, with every foreign alias removed, still names a domestic term.
pub fn deny_listed_outside_aliases(text: &str) -> bool {
    let remainder = FOREIGN_PATTERN.replace_all(text, " ");
    DENY_PATTERN.is_match(&remainder)
}

pub fn is_placeholder(text: &str) -> bool {
    let lowered = text.trim().to_lowercase();
    PLACEHOLDERS.contains(&lowered.as_str())
}

/// Expanded city for a short form such as `CBA`.
pub fn expand_short_form(cleaned: &str) -> Option<&'static str> {
    let key = fold_diacritics(&cleaned.to_lowercase());
    CITY_SHORT_FORMS
        .iter()
        .find(|(short, _)| *short == key)
        .map(|(_, city)| *city)
}

/// The domestic deny-list, exposed for reporting and review.
pub fn domestic_deny_terms() -> &'static [&'static str] {
    DOMESTIC_DENY_TERMS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_lookup_covers_every_alias() {
        for entry in FOREIGN_ALIASES {
            for alias in entry.aliases() {
                assert_eq!(foreign_country(alias), Some(entry.country), "{alias}");
            }
        }
    }

    #[test]
    fn test_foreign_country_is_case_insensitive() {
        assert_eq!(foreign_country("BUENOS AIRES"), Some("Argentina"));
        assert_eq!(foreign_country("assunção"), Some("Paraguay"));
    }

    #[test]
    fn test_aliases_are_word_bounded() {
        assert_eq!(foreign_country("Limeira"), None);
        assert_eq!(foreign_country("Paranatinga"), None);
        assert_eq!(foreign_country("Portugália"), None);
    }

    #[test]
    fn test_longest_alias_wins() {
        assert_eq!(foreign_country("Santa Cruz de la Sierra"), Some("Bolivia"));
    }

    #[test]
    fn test_country_name_wins_over_city() {
        let m = foreign_match("Santa Fe, Argentina").unwrap();
        assert_eq!(m.country, "Argentina");
        assert!(m.by_country_name);

        let m = foreign_match("Roma, Itália").unwrap();
        assert_eq!(m.country, "Italy");
        assert!(m.by_country_name);

        let m = foreign_match("Porto Alegre").unwrap();
        assert_eq!(m.country, "Portugal");
        assert!(!m.by_country_name);
    }

    #[test]
    fn test_deny_list_ignores_the_alias_itself() {
        assert!(!deny_listed_outside_aliases("Santa Cruz de la Sierra"));
        assert!(deny_listed_outside_aliases("Porto Alegre"));
        assert!(deny_listed_outside_aliases("Alto Paraguai"));
        assert!(deny_listed_outside_aliases("Roma - SP"));
    }

    #[test]
    fn test_no_deny_term_is_also_a_foreign_alias() {
        for term in DOMESTIC_DENY_TERMS {
            assert_eq!(foreign_country(term), None, "{term}");
        }
    }

    #[test]
    fn test_short_forms_are_folded_lowercase() {
        for (short, _) in CITY_SHORT_FORMS {
            assert_eq!(*short, fold_diacritics(&short.to_lowercase()));
        }
        assert_eq!(expand_short_form("CBA"), Some("Cuiabá"));
        assert_eq!(expand_short_form("Cuiabá"), Some("Cuiabá"));
        assert_eq!(expand_short_form("Sinop"), None);
    }

    #[test]
    fn test_placeholders() {
        assert!(is_placeholder("NaN"));
        assert!(is_placeholder(" Não informado "));
        assert!(!is_placeholder("Sinop"));
    }

    #[test]
    fn test_noise_pattern_strips_codes_and_state_name() {
        let stripped = NOISE_PATTERN.replace_all("Sinop MT Brasil", "");
        assert_eq!(stripped.trim(), "Sinop");
        let stripped = NOISE_PATTERN.replace_all("Campo Grande Mato Grosso do Sul", "");
        assert_eq!(stripped.trim(), "Campo Grande");
    }
}
