pub mod aggregator;
pub mod annotator;
pub mod config;
pub mod family;
pub mod matcher;
pub mod resolver;

pub use aggregator::{Aggregator, CanonicalTaxon, DuplicateRecord, MatchStats};
pub use annotator::{Annotation, Annotator};
pub use config::AnnotateConfig;
pub use matcher::{MatchResult, MatchTier, ScanResult, SequenceIds, TaxonomyMatcher};
pub use resolver::{AnswerSheet, RecordingResolver, ScriptedResolver, Selection, TaxonomyResolver};
