pub mod abundance;
pub mod reference;
pub mod taxonomy;

pub use abundance::{SourceTable, SourceTaxon};
pub use reference::{ReferenceEntry, ReferenceTable};
