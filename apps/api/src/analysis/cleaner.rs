//! Spells out arithmetic symbols so the model is less tempted to compute.

const SYMBOL_WORDS: &[(&str, &str)] = &[
    ("=", " equals "),
    ("+", " plus "),
    ("-", " minus "),
    ("*", " times "),
    ("/", " divided by "),
];

/// Plain substring replacement, not tokenized: `well-known` becomes
/// `well minus known`. Trims the ends only.
pub fn clean(text: &str) -> String {
    let mut out = text.to_string();
    for (symbol, word) in SYMBOL_WORDS {
        out = out.replace(symbol, word);
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_replaces_all_symbols() {
        assert_eq!(
            clean("a=b+c-d*e/f"),
            "a equals b plus c minus d times e divided by f"
        );
    }

    #[test]
    fn test_clean_hyphen_inside_word_is_replaced() {
        assert_eq!(clean("well-known"), "well minus known");
    }

    #[test]
    fn test_clean_trims_ends_but_keeps_inner_spacing() {
        assert_eq!(clean("  x = 4  "), "x  equals  4");
    }

    #[test]
    fn test_clean_empty_input() {
        assert_eq!(clean(""), "");
        assert_eq!(clean("   \n"), "");
    }

    #[test]
    fn test_clean_leading_symbol_is_trimmed_word() {
        assert_eq!(clean("-5"), "minus 5");
    }

    #[test]
    fn test_clean_is_idempotent_after_first_pass() {
        let samples = [
            "2x + 3 = 11, so x = 4",
            "speed = 120/2 = 60 km/h",
            "no symbols here",
            "  -*/+=  ",
            "",
        ];
        for sample in samples {
            let once = clean(sample);
            assert_eq!(clean(&once), once, "sample: {sample:?}");
            assert!(!once.contains(['=', '+', '-', '*', '/']));
        }
    }

    #[test]
    fn test_clean_symbol_free_text_only_trims() {
        assert_eq!(clean(" The train is faster "), "The train is faster");
    }
}
