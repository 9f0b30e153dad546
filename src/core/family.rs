//! Family-name inference from a genus name.
//!
//! Latin family names are mostly built from the type genus plus `-aceae`,
//! with the stem depending on the genus ending. The table below encodes the
//! endings seen in mock-community members; the result is only ever offered to
//! an operator for confirmation.

/// One ordered suffix rule
#[derive(Debug, Clone, Copy)]
pub struct SuffixRule {
    /// Endings that trigger the rule
    pub suffixes: &'static [&'static str],
    /// Characters removed from the end of the genus before appending
    pub strip: usize,
    /// Text appended to the stem
    pub append: &'static str,
}

impl SuffixRule {
    pub fn matches(&self, genus: &str) -> bool {
        self.suffixes.iter().any(|s| genus.ends_with(s))
    }

    pub fn apply(&self, genus: &str) -> String {
        let mut stem_end = genus.len();
        for _ in 0..self.strip {
            stem_end = genus[..stem_end]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
        format!("{}{}", &genus[..stem_end], self.append)
    }
}

/// Suffix rules in evaluation order; longer endings precede the shorter
/// endings they overlap.
pub const FAMILY_RULES: &[SuffixRule] = &[
    SuffixRule { suffixes: &["er"], strip: 0, append: "iaceae" },
    SuffixRule { suffixes: &["ma"], strip: 0, append: "taceae" },
    SuffixRule { suffixes: &["a"], strip: 0, append: "ceae" },
    SuffixRule { suffixes: &["myces"], strip: 1, append: "taceae" },
    SuffixRule { suffixes: &["es"], strip: 2, append: "aceae" },
    SuffixRule { suffixes: &["thece"], strip: 1, append: "aceae" },
    SuffixRule { suffixes: &["stis"], strip: 2, append: "aceae" },
    SuffixRule { suffixes: &["as", "is"], strip: 1, append: "daceae" },
    SuffixRule { suffixes: &["us", "um"], strip: 2, append: "aceae" },
    SuffixRule { suffixes: &["io"], strip: 0, append: "naceae" },
    // Cyanothrix, Tolypothrix
    SuffixRule { suffixes: &["Cyanothrix", "pothrix"], strip: 1, append: "chaceae" },
    // Homoeothrix, Crenothrix, Erysipelothrix, Thiothrix
    SuffixRule { suffixes: &["thrix"], strip: 4, append: "richaceae" },
    SuffixRule { suffixes: &["ex"], strip: 2, append: "icaceae" },
];

static DEFAULT_RULE: SuffixRule = SuffixRule { suffixes: &[], strip: 0, append: "aceae" };

/// The rule that fires for `genus`
pub fn rule_for(genus: &str) -> &'static SuffixRule {
    FAMILY_RULES
        .iter()
        .find(|rule| rule.matches(genus))
        .unwrap_or(&DEFAULT_RULE)
}

/// Best-guess family name for a genus, e.g. `Bacillus` -> `Bacillaceae`
pub fn infer_family_name(genus: &str) -> String {
    rule_for(genus).apply(genus)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Bacillus", "Bacillaceae" ; "us ending")]
    #[test_case("Clostridium", "Clostridiaceae" ; "um ending")]
    #[test_case("Enterobacter", "Enterobacteriaceae" ; "er ending")]
    #[test_case("Prochloronema", "Prochloronemataceae" ; "ma ending")]
    #[test_case("Moraxella", "Moraxellaceae" ; "a ending")]
    #[test_case("Streptomyces", "Streptomycetaceae" ; "myces ending")]
    #[test_case("Actinomycetes", "Actinomycetaceae" ; "es ending")]
    #[test_case("Cyanothece", "Cyanothecaceae" ; "thece ending")]
    #[test_case("Microcystis", "Microcystaceae" ; "stis ending")]
    #[test_case("Pseudomonas", "Pseudomonadaceae" ; "as ending")]
    #[test_case("Arthrospiris", "Arthrospiridaceae" ; "is ending")]
    #[test_case("Vibrio", "Vibrionaceae" ; "io ending")]
    #[test_case("Thiothrix", "Thiotrichaceae" ; "thrix ending")]
    #[test_case("Tolypothrix", "Tolypothrichaceae" ; "pothrix ending")]
    #[test_case("Cyanothrix", "Cyanothrichaceae" ; "cyanothrix special case")]
    #[test_case("Halothrix", "Halotrichaceae" ; "other thrix ending")]
    #[test_case("Sphaerotilex", "Sphaerotilicaceae" ; "ex ending")]
    #[test_case("Nostoc", "Nostocaceae" ; "default rule")]
    fn test_infer_family_name(genus: &str, expected: &str) {
        assert_eq!(infer_family_name(genus), expected);
    }

    #[test]
    fn test_specific_suffixes_shadow_general_ones() {
        let test_cases = vec![
            ("Streptomyces", &["myces"][..]),
            ("Microcystis", &["stis"][..]),
            ("Tolypothrix", &["Cyanothrix", "pothrix"][..]),
        ];

        for (genus, suffixes) in test_cases {
            assert_eq!(rule_for(genus).suffixes, suffixes, "rule for {}", genus);
        }
    }

    #[test]
    fn test_empty_genus_falls_to_default() {
        assert_eq!(infer_family_name(""), "aceae");
    }

    #[test]
    fn test_strip_never_panics_on_short_input() {
        assert_eq!(SuffixRule { suffixes: &[], strip: 4, append: "x" }.apply("ab"), "x");
    }
}
