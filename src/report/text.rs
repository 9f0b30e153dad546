use crate::core::matcher::MatchTier;
use crate::report::MatchSummary;
use anyhow::Result;
use std::fmt::Write;

pub fn generate_text_report(summary: &MatchSummary) -> Result<String> {
    let mut output = String::new();

    // Species and genus lines are always shown; the rarer tiers only when hit
    writeln!(
        &mut output,
        "{} species-level matches ({:.1}%)",
        summary.stats.species,
        summary.percent(MatchTier::Species)
    )?;
    writeln!(
        &mut output,
        "{} genus-level matches ({:.1}%)",
        summary.stats.genus,
        summary.percent(MatchTier::Genus)
    )?;
    if summary.stats.family > 0 {
        writeln!(
            &mut output,
            "{} family-level matches ({:.1}%)",
            summary.stats.family,
            summary.percent(MatchTier::Family)
        )?;
    }
    if summary.stats.unresolved > 0 {
        writeln!(
            &mut output,
            "{} FAILURES ({:.1}%)",
            summary.stats.unresolved,
            summary.percent(MatchTier::Unresolved)
        )?;
    }

    if !summary.duplicates.is_empty() {
        writeln!(&mut output)?;
        writeln!(&mut output, "{} duplicates:", summary.duplicates.len())?;
        for dup in &summary.duplicates {
            writeln!(&mut output, "{}\t{}", dup.source_name, dup.taxonomy)?;
        }
    }

    if !summary.sample_totals.is_empty() {
        writeln!(&mut output)?;
        writeln!(&mut output, "Sample totals")?;
        writeln!(&mut output, "-------------")?;
        for (sample, total) in &summary.sample_totals {
            writeln!(&mut output, "{}\t{:.10}", sample, total)?;
        }
    }

    Ok(output)
}
