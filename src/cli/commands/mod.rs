pub mod annotate;
pub mod identifiers;
