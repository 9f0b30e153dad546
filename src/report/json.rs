use crate::core::matcher::MatchTier;
use crate::report::MatchSummary;
use anyhow::Result;
use serde_json::json;

pub fn generate_json_report(summary: &MatchSummary) -> Result<String> {
    let tiers: Vec<_> = [
        MatchTier::Species,
        MatchTier::Genus,
        MatchTier::Family,
        MatchTier::Unresolved,
    ]
    .iter()
    .map(|tier| {
        json!({
            "tier": tier,
            "count": summary.stats.count(*tier),
            "percent": summary.percent(*tier),
        })
    })
    .collect();

    let report = json!({
        "source_taxa": summary.source_taxa,
        "output_rows": summary.output_rows,
        "identified_lineages": summary.identified_lineages,
        "tiers": tiers,
        "duplicates": summary.duplicates,
        "sample_totals": summary.sample_totals,
    });

    Ok(serde_json::to_string_pretty(&report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregator::MatchStats;
    use indexmap::IndexMap;

    #[test]
    fn test_json_report_shape() {
        let mut sample_totals = IndexMap::new();
        sample_totals.insert("Sample1".to_string(), 1.0);

        let summary = MatchSummary {
            source_taxa: 2,
            output_rows: 2,
            stats: MatchStats {
                species: 1,
                genus: 0,
                family: 0,
                unresolved: 1,
            },
            duplicates: vec![],
            sample_totals,
            identified_lineages: 1,
        };

        let report: serde_json::Value =
            serde_json::from_str(&generate_json_report(&summary).unwrap()).unwrap();
        assert_eq!(report["source_taxa"], 2);
        assert_eq!(report["tiers"][0]["tier"], "species");
        assert_eq!(report["tiers"][0]["percent"], 50.0);
        assert_eq!(report["tiers"][3]["tier"], "unresolved");
        assert_eq!(report["sample_totals"]["Sample1"], 1.0);
    }
}
