use std::collections::{BTreeMap, BTreeSet};

/// Two-letter words accepted without consulting the dictionary oracle.
pub const TWO_LETTER_WORDS: &[&str] = &[
    "AA", "AB", "AD", "AE", "AG", "AH", "AI", "AL", "AM", "AN", "AR", "AS", "AT", "AW", "AX",
    "AY", "BA", "BE", "BI", "BO", "BY", "CH", "DA", "DE", "DI", "DO", "EA", "ED", "EE", "EF",
    "EH", "EL", "EM", "EN", "ER", "ES", "ET", "EW", "EX", "FA", "FE", "FY", "GI", "GO", "GU",
    "HA", "HE", "HI", "HM", "HO", "ID", "IF", "IN", "IO", "IS", "IT", "JA", "JO", "KA", "KI",
    "KO", "KY", "LA", "LI", "LO", "MA", "ME", "MI", "MM", "MO", "MU", "MY", "NA", "NE", "NO",
    "NU", "OB", "OD", "OE", "OF", "OH", "OI", "OK", "OM", "ON", "OP", "OR", "OS", "OW", "OX",
    "OY", "PA", "PE", "PI", "PO", "QI", "RE", "SH", "SI", "SO", "ST", "TA", "TE", "TI", "TO",
    "UG", "UH", "UM", "UN", "UP", "UR", "US", "UT", "WE", "WO", "XI", "XU", "YA", "YE", "YO",
    "ZA", "ZO",
];

/// What the local rules alone can say about a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalVerdict {
    Valid,
    Invalid,
    /// Three letters or more: only the dictionary oracle can decide.
    NeedsLookup,
}

pub struct WordValidator;

impl WordValidator {
    /// Uppercase and trim a word so cache keys and comparisons agree.
    pub fn normalize(word: &str) -> String {
        word.trim().to_uppercase()
    }

    pub fn is_alphabetic(word: &str) -> bool {
        !word.is_empty() && word.chars().all(|c| c.is_ascii_alphabetic())
    }

    pub fn is_accepted_two_letter(word: &str) -> bool {
        TWO_LETTER_WORDS.contains(&Self::normalize(word).as_str())
    }

    pub fn precheck(word: &str) -> LocalVerdict {
        let word = Self::normalize(word);
        if word.chars().count() < 2 || !Self::is_alphabetic(&word) {
            return LocalVerdict::Invalid;
        }
        if word.len() == 2 {
            return if Self::is_accepted_two_letter(&word) {
                LocalVerdict::Valid
            } else {
                LocalVerdict::Invalid
            };
        }
        LocalVerdict::NeedsLookup
    }

    /// Split `words` into locally decided verdicts and the words that still need a lookup.
    pub fn partition<'a>(
        words: impl IntoIterator<Item = &'a str>,
    ) -> (BTreeMap<String, bool>, BTreeSet<String>) {
        let mut decided = BTreeMap::new();
        let mut pending = BTreeSet::new();
        for word in words {
            let normalized = Self::normalize(word);
            match Self::precheck(&normalized) {
                LocalVerdict::Valid => {
                    decided.insert(normalized, true);
                }
                LocalVerdict::Invalid => {
                    decided.insert(normalized, false);
                }
                LocalVerdict::NeedsLookup => {
                    pending.insert(normalized);
                }
            }
        }
        (decided, pending)
    }

    /// Words from `words` without a positive verdict, in iteration order.
    /// A word missing from `verdicts` counts as invalid.
    pub fn invalid_words<'a>(
        words: impl IntoIterator<Item = &'a String>,
        verdicts: &BTreeMap<String, bool>,
    ) -> Vec<String> {
        words
            .into_iter()
            .filter(|w| !verdicts.get(*w).copied().unwrap_or(false))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_letter_words_are_curated() {
        assert_eq!(WordValidator::precheck("QI"), LocalVerdict::Valid);
        assert_eq!(WordValidator::precheck("qi"), LocalVerdict::Valid);
        assert_eq!(WordValidator::precheck("ZZ"), LocalVerdict::Invalid);
        assert_eq!(WordValidator::precheck("XX"), LocalVerdict::Invalid);
    }

    #[test]
    fn test_short_and_non_alphabetic_words_are_invalid() {
        assert_eq!(WordValidator::precheck(""), LocalVerdict::Invalid);
        assert_eq!(WordValidator::precheck("A"), LocalVerdict::Invalid);
        assert_eq!(WordValidator::precheck("C4T"), LocalVerdict::Invalid);
        assert_eq!(WordValidator::precheck("CAT-S"), LocalVerdict::Invalid);
    }

    #[test]
    fn test_longer_words_need_lookup() {
        assert_eq!(WordValidator::precheck("CAT"), LocalVerdict::NeedsLookup);
        assert_eq!(WordValidator::precheck(" mess "), LocalVerdict::NeedsLookup);
    }

    #[test]
    fn test_partition() {
        let (decided, pending) = WordValidator::partition(["at", "ZZ", "cat", "CAT", "dog"]);
        assert_eq!(decided.get("AT"), Some(&true));
        assert_eq!(decided.get("ZZ"), Some(&false));
        assert_eq!(pending.len(), 2);
        assert!(pending.contains("CAT"));
        assert!(pending.contains("DOG"));
    }

    #[test]
    fn test_invalid_words() {
        let mut verdicts = BTreeMap::new();
        verdicts.insert("CAT".to_string(), true);
        verdicts.insert("XQZ".to_string(), false);
        verdicts.insert("ABQ".to_string(), false);
        let board: BTreeSet<String> = ["ABQ", "CAT", "DOG", "XQZ"]
            .iter()
            .map(|w| w.to_string())
            .collect();
        assert_eq!(
            WordValidator::invalid_words(&board, &verdicts),
            vec!["ABQ", "DOG", "XQZ"]
        );
    }

    #[test]
    fn test_curated_list_is_well_formed() {
        assert!(TWO_LETTER_WORDS
            .iter()
            .all(|w| w.len() == 2 && w.chars().all(|c| c.is_ascii_uppercase())));
    }
}
