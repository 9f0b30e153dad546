/// Operator decisions the matcher cannot make on its own
use crate::TaxAnnotateError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Answer to a disambiguation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Zero-based index into the offered candidates
    Candidate(usize),
    /// None of the candidates is right; fall back to manual entry
    NoneOfThese,
}

impl Selection {
    /// Parse an operator answer: a candidate number or `n`
    pub fn parse(answer: &str) -> Option<Self> {
        let answer = answer.trim();
        if answer.eq_ignore_ascii_case("n") {
            return Some(Self::NoneOfThese);
        }
        answer.parse::<usize>().ok().map(Self::Candidate)
    }

    /// Render back to the form accepted by `parse`
    pub fn to_answer(&self) -> String {
        match self {
            Self::Candidate(idx) => idx.to_string(),
            Self::NoneOfThese => "n".to_string(),
        }
    }
}

/// Blocking port for the three interactive decisions of an annotation run
#[cfg_attr(test, mockall::automock)]
pub trait TaxonomyResolver {
    /// Pick one of several equally ranked candidate lineages for `source_name`
    fn choose(
        &mut self,
        source_name: &str,
        candidates: &[String],
        reference: &str,
    ) -> Result<Selection, TaxAnnotateError>;

    /// Accept or decline an inferred family-level lineage
    fn confirm_family(&mut self, source_name: &str, candidate: &str) -> Result<bool, TaxAnnotateError>;

    /// Supply a lineage by hand after searching the reference
    fn manual_entry(&mut self, source_name: &str, reference: &str) -> Result<String, TaxAnnotateError>;
}

impl<R: TaxonomyResolver + ?Sized> TaxonomyResolver for &mut R {
    fn choose(
        &mut self,
        source_name: &str,
        candidates: &[String],
        reference: &str,
    ) -> Result<Selection, TaxAnnotateError> {
        (**self).choose(source_name, candidates, reference)
    }

    fn confirm_family(&mut self, source_name: &str, candidate: &str) -> Result<bool, TaxAnnotateError> {
        (**self).confirm_family(source_name, candidate)
    }

    fn manual_entry(&mut self, source_name: &str, reference: &str) -> Result<String, TaxAnnotateError> {
        (**self).manual_entry(source_name, reference)
    }
}

/// Answers for every prompt of a run, keyed by source name.
///
/// ```toml
/// [choices]
/// "Lactobacillus brevis" = "1"
///
/// [families]
/// "Nostoc punctiforme" = "k;p;c;o;Nostocaceae;g__;s__"
///
/// [manual]
/// "Unknown bug" = "k__Bacteria;p__;c__;o__;f__;g__;s__"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerSheet {
    /// Disambiguation answers (`"n"` or a candidate number)
    pub choices: IndexMap<String, String>,
    /// The approved family-level lineage; every other candidate is declined
    pub families: IndexMap<String, String>,
    /// Hand-entered lineages
    pub manual: IndexMap<String, String>,
}

impl AnswerSheet {
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty() && self.families.is_empty() && self.manual.is_empty()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TaxAnnotateError> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| TaxAnnotateError::Config(format!("Failed to parse answer sheet: {}", e)))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), TaxAnnotateError> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| TaxAnnotateError::Config(format!("Failed to serialize answer sheet: {}", e)))?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

/// Replays a prepared answer sheet without touching the terminal
#[derive(Debug, Clone, Default)]
pub struct ScriptedResolver {
    sheet: AnswerSheet,
}

impl ScriptedResolver {
    pub fn new(sheet: AnswerSheet) -> Self {
        Self { sheet }
    }

    pub fn with_choice(mut self, source_name: &str, selection: Selection) -> Self {
        self.sheet
            .choices
            .insert(source_name.to_string(), selection.to_answer());
        self
    }

    pub fn with_family(mut self, source_name: &str, lineage: &str) -> Self {
        self.sheet
            .families
            .insert(source_name.to_string(), lineage.to_string());
        self
    }

    pub fn with_manual(mut self, source_name: &str, lineage: &str) -> Self {
        self.sheet
            .manual
            .insert(source_name.to_string(), lineage.to_string());
        self
    }

    pub fn sheet(&self) -> &AnswerSheet {
        &self.sheet
    }
}

impl TaxonomyResolver for ScriptedResolver {
    fn choose(
        &mut self,
        source_name: &str,
        _candidates: &[String],
        _reference: &str,
    ) -> Result<Selection, TaxAnnotateError> {
        let answer = self.sheet.choices.get(source_name).ok_or_else(|| {
            TaxAnnotateError::Prompt(format!("No scripted choice for '{}'", source_name))
        })?;
        // Unparseable answers escalate to manual entry, same as at the console
        Ok(Selection::parse(answer).unwrap_or(Selection::NoneOfThese))
    }

    fn confirm_family(&mut self, source_name: &str, candidate: &str) -> Result<bool, TaxAnnotateError> {
        Ok(self
            .sheet
            .families
            .get(source_name)
            .is_some_and(|approved| approved == candidate))
    }

    fn manual_entry(&mut self, source_name: &str, _reference: &str) -> Result<String, TaxAnnotateError> {
        self.sheet.manual.get(source_name).cloned().ok_or_else(|| {
            TaxAnnotateError::Prompt(format!("No scripted lineage for '{}'", source_name))
        })
    }
}

/// Wraps another resolver and writes every answer into an [`AnswerSheet`]
pub struct RecordingResolver<R> {
    inner: R,
    sheet: AnswerSheet,
}

impl<R: TaxonomyResolver> RecordingResolver<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            sheet: AnswerSheet::default(),
        }
    }

    pub fn sheet(&self) -> &AnswerSheet {
        &self.sheet
    }

    pub fn into_sheet(self) -> AnswerSheet {
        self.sheet
    }
}

impl<R: TaxonomyResolver> TaxonomyResolver for RecordingResolver<R> {
    fn choose(
        &mut self,
        source_name: &str,
        candidates: &[String],
        reference: &str,
    ) -> Result<Selection, TaxAnnotateError> {
        let selection = self.inner.choose(source_name, candidates, reference)?;
        self.sheet
            .choices
            .insert(source_name.to_string(), selection.to_answer());
        Ok(selection)
    }

    fn confirm_family(&mut self, source_name: &str, candidate: &str) -> Result<bool, TaxAnnotateError> {
        let approved = self.inner.confirm_family(source_name, candidate)?;
        if approved {
            self.sheet
                .families
                .insert(source_name.to_string(), candidate.to_string());
        }
        Ok(approved)
    }

    fn manual_entry(&mut self, source_name: &str, reference: &str) -> Result<String, TaxAnnotateError> {
        let lineage = self.inner.manual_entry(source_name, reference)?;
        self.sheet
            .manual
            .insert(source_name.to_string(), lineage.clone());
        Ok(lineage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_selection_parse() {
        let test_cases = vec![
            ("0", Some(Selection::Candidate(0))),
            (" 12 ", Some(Selection::Candidate(12))),
            ("n", Some(Selection::NoneOfThese)),
            ("N", Some(Selection::NoneOfThese)),
            ("-1", None),
            ("first", None),
            ("", None),
        ];

        for (input, expected) in test_cases {
            assert_eq!(Selection::parse(input), expected, "input {:?}", input);
        }
    }

    #[test]
    fn test_scripted_resolver_answers() {
        let mut resolver = ScriptedResolver::default()
            .with_choice("Lactobacillus brevis", Selection::Candidate(1))
            .with_family("Nostoc sp", "k;p;c;o;Nostocaceae;g__;s__")
            .with_manual("Mystery bug", "k;p;c;o;f;g;s");

        let candidates = vec!["a".to_string(), "b".to_string()];
        assert_eq!(
            resolver.choose("Lactobacillus brevis", &candidates, "ref.tsv").unwrap(),
            Selection::Candidate(1)
        );
        assert!(resolver.confirm_family("Nostoc sp", "k;p;c;o;Nostocaceae;g__;s__").unwrap());
        assert!(!resolver.confirm_family("Nostoc sp", "k;p;c;o;Other;g__;s__").unwrap());
        assert!(!resolver.confirm_family("Anything", "k;p;c;o;Other;g__;s__").unwrap());
        assert_eq!(resolver.manual_entry("Mystery bug", "ref.tsv").unwrap(), "k;p;c;o;f;g;s");
    }

    #[test]
    fn test_scripted_resolver_missing_answer_is_prompt_error() {
        let mut resolver = ScriptedResolver::default();
        assert!(matches!(
            resolver.manual_entry("Mystery bug", "ref.tsv"),
            Err(TaxAnnotateError::Prompt(_))
        ));
        assert!(matches!(
            resolver.choose("Mystery bug", &[], "ref.tsv"),
            Err(TaxAnnotateError::Prompt(_))
        ));
    }

    #[test]
    fn test_recording_resolver_captures_answers() {
        let inner = ScriptedResolver::default()
            .with_choice("A a", Selection::NoneOfThese)
            .with_manual("A a", "k;p;c;o;f;A;s__")
            .with_family("B b", "k;p;c;o;Bacillaceae;g__;s__");
        let mut recorder = RecordingResolver::new(inner);

        recorder.choose("A a", &["x".to_string(), "y".to_string()], "ref").unwrap();
        recorder.manual_entry("A a", "ref").unwrap();
        recorder.confirm_family("B b", "k;p;c;o;Other;g__;s__").unwrap();
        recorder.confirm_family("B b", "k;p;c;o;Bacillaceae;g__;s__").unwrap();

        let sheet = recorder.into_sheet();
        assert_eq!(sheet.choices["A a"], "n");
        assert_eq!(sheet.manual["A a"], "k;p;c;o;f;A;s__");
        assert_eq!(sheet.families["B b"], "k;p;c;o;Bacillaceae;g__;s__");
    }

    #[test]
    fn test_answer_sheet_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("answers.toml");

        let mut sheet = AnswerSheet::default();
        sheet.choices.insert("Lactobacillus brevis".to_string(), "0".to_string());
        sheet.manual.insert("Mystery bug".to_string(), "k;p;c;o;f;g;s".to_string());
        sheet.save(&path).unwrap();

        let loaded = AnswerSheet::load(&path).unwrap();
        assert_eq!(loaded, sheet);
        assert!(!loaded.is_empty());
    }
}
