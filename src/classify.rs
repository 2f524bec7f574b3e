//! Foreign/domestic classification from the location and phone signals.

use crate::config::{PipelineConfig, SignalCombination};

/// Phone-number heuristic parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneRule {
    pub min_digits: usize,
    pub calling_code: String,
    pub national_as_domestic: bool,
}

impl PhoneRule {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            min_digits: config.phone_min_digits,
            calling_code: config.domestic_calling_code.clone(),
            national_as_domestic: config.national_phone_as_domestic,
        }
    }

    /// True when the number is long enough to judge and carries a foreign prefix.
    /// Missing or short numbers are never evidence of foreign origin.
    pub fn is_foreign(&self, raw: &str) -> bool {
        let digits = phone_digits(raw);
        if digits.len() < self.min_digits || digits.starts_with(&self.calling_code) {
            return false;
        }
        !(self.national_as_domestic && looks_national(&digits))
    }
}

impl Default for PhoneRule {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

pub fn phone_digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Two-digit area code plus an 8-digit landline or 9-digit mobile (leading 9).
fn looks_national(digits: &str) -> bool {
    let bytes = digits.as_bytes();
    let valid_area = bytes.len() >= 3 && bytes[0] != b'0' && bytes[1] != b'0';
    match bytes.len() {
        10 => valid_area && (b'2'..=b'5').contains(&bytes[2]),
        11 => valid_area && bytes[2] == b'9',
        _ => false,
    }
}

/// Merges the two signals.
pub fn combine(by_location: bool, by_phone: bool, strategy: SignalCombination) -> bool {
    match strategy {
        SignalCombination::Any => by_location || by_phone,
        SignalCombination::All => by_location && by_phone,
        SignalCombination::Weighted {
            location_weight,
            phone_weight,
            threshold,
        } => {
            let mut score = 0.0;
            if by_location {
                score += location_weight;
            }
            if by_phone {
                score += phone_weight;
            }
            score >= threshold
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nationality {
    pub foreign_by_location: bool,
    pub foreign_by_phone: bool,
    pub is_foreign: bool,
}

#[derive(Debug, Clone)]
pub struct NationalityClassifier {
    phone: PhoneRule,
    combination: SignalCombination,
}

impl NationalityClassifier {
    pub fn new(phone: PhoneRule, combination: SignalCombination) -> Self {
        Self { phone, combination }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(PhoneRule::from_config(config), config.signal_combination)
    }

    pub fn classify(&self, foreign_by_location: bool, phone: &str) -> Nationality {
        let foreign_by_phone = self.phone.is_foreign(phone);
        Nationality {
            foreign_by_location,
            foreign_by_phone,
            is_foreign: combine(foreign_by_location, foreign_by_phone, self.combination),
        }
    }
}

impl Default for NationalityClassifier {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_digits() {
        assert_eq!(phone_digits("+1 (305) 555-0100"), "13055550100");
        assert_eq!(phone_digits("sem telefone"), "");
    }

    #[test]
    fn test_us_number_is_foreign() {
        assert!(PhoneRule::default().is_foreign("+1 305 555 0100"));
    }

    #[test]
    fn test_domestic_calling_code_is_domestic() {
        assert!(!PhoneRule::default().is_foreign("+55 65 99999-0000"));
    }

    #[test]
    fn test_empty_or_short_phone_is_never_foreign() {
        let rule = PhoneRule::default();
        assert!(!rule.is_foreign(""));
        assert!(!rule.is_foreign("não tenho"));
        assert!(!rule.is_foreign("9999-0000"));
    }

    #[test]
    fn test_min_digits_boundary() {
        let rule = PhoneRule::default();
        assert!(rule.is_foreign("1234567890"));
        assert!(!rule.is_foreign("123456789"));
    }

    #[test]
    fn test_national_format_only_when_enabled() {
        let mut rule = PhoneRule::default();
        assert!(rule.is_foreign("(65) 99999-0000"));

        rule.national_as_domestic = true;
        assert!(!rule.is_foreign("(65) 99999-0000"));
        assert!(!rule.is_foreign("(65) 3322-1100"));
        // 11 digits without a leading mobile 9 after the area code
        assert!(rule.is_foreign("+1 305 555 0100"));
    }

    #[test]
    fn test_combine_any() {
        assert!(combine(true, false, SignalCombination::Any));
        assert!(combine(false, true, SignalCombination::Any));
        assert!(!combine(false, false, SignalCombination::Any));
    }

    #[test]
    fn test_combine_all() {
        assert!(!combine(true, false, SignalCombination::All));
        assert!(combine(true, true, SignalCombination::All));
    }

    #[test]
    fn test_combine_weighted() {
        let strategy = SignalCombination::Weighted {
            location_weight: 0.7,
            phone_weight: 0.3,
            threshold: 0.5,
        };
        assert!(combine(true, false, strategy));
        assert!(!combine(false, true, strategy));
        assert!(combine(true, true, strategy));
    }

    #[test]
    fn test_phone_overrides_domestic_location() {
        let classifier = NationalityClassifier::default();
        let n = classifier.classify(false, "+1 305 555 0100");
        assert!(!n.foreign_by_location);
        assert!(n.foreign_by_phone);
        assert!(n.is_foreign);
    }

    #[test]
    fn test_no_signals_is_domestic() {
        let n = NationalityClassifier::default().classify(false, "");
        assert!(!n.is_foreign);
    }
}
