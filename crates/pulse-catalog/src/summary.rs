//! Catalog summary.

use serde::{Deserialize, Serialize};

use crate::catalog::InstrumentCatalog;
use crate::selector::InstrumentSelector;

/// Size of one catalog group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupCount {
    pub name: String,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Counts describing a catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSummary {
    /// Distinct symbols declared under any sector
    pub total_instruments: usize,
    pub sectors: Vec<GroupCount>,
    pub market_caps: Vec<GroupCount>,
    /// Resolved (deduplicated) set sizes
    pub sets: Vec<GroupCount>,
}

impl CatalogSummary {
    pub fn from_catalog(catalog: &InstrumentCatalog) -> Self {
        let selector = InstrumentSelector::new(catalog);

        Self {
            total_instruments: catalog.universe().len(),
            sectors: catalog
                .sectors()
                .iter()
                .map(|s| GroupCount {
                    name: s.name.clone(),
                    count: s.symbols.len(),
                    description: Some(s.description.clone()),
                })
                .collect(),
            market_caps: catalog
                .market_caps()
                .iter()
                .map(|g| GroupCount {
                    name: g.name.clone(),
                    count: g.symbols.len(),
                    description: None,
                })
                .collect(),
            sets: catalog
                .set_names()
                .into_iter()
                .map(|name| GroupCount {
                    name: name.to_string(),
                    count: selector.resolve(name).map(|s| s.len()).unwrap_or(0),
                    description: None,
                })
                .collect(),
        }
    }

    /// Generate a text summary.
    pub fn render(&self) -> String {
        let mut s = String::new();

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str("                 INSTRUMENT UNIVERSE SUMMARY                \n");
        s.push_str("═══════════════════════════════════════════════════════════\n\n");

        s.push_str(&format!("  Total Instruments:   {}\n", self.total_instruments));
        s.push_str(&format!("  Total Sectors:       {}\n", self.sectors.len()));
        s.push('\n');

        s.push_str("SECTORS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        for sector in &self.sectors {
            s.push_str(&format!(
                "  {:<18} {:>3}  {}\n",
                title_case(&sector.name),
                sector.count,
                sector.description.as_deref().unwrap_or("")
            ));
        }
        s.push('\n');

        s.push_str("MARKET CAP\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        for group in &self.market_caps {
            s.push_str(&format!("  {:<18} {:>3}\n", title_case(&group.name), group.count));
        }
        s.push('\n');

        s.push_str("INSTRUMENT SETS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        for set in &self.sets {
            s.push_str(&format!("  {:<24} {:>3}\n", set.name, set.count));
        }
        s.push('\n');

        s.push_str("═══════════════════════════════════════════════════════════\n");

        s
    }
}

fn title_case(name: &str) -> String {
    name.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let summary = CatalogSummary::from_catalog(&InstrumentCatalog::builtin());

        assert_eq!(summary.total_instruments, 70);
        assert_eq!(summary.sectors.len(), 10);
        assert_eq!(summary.sectors[8].name, "telecom");
        assert_eq!(summary.sectors[8].count, 2);

        let comprehensive = summary.sets.iter().find(|s| s.name == "comprehensive").unwrap();
        assert_eq!(comprehensive.count, 70);
    }

    #[test]
    fn test_render() {
        let text = CatalogSummary::from_catalog(&InstrumentCatalog::builtin()).render();

        assert!(text.contains("Total Instruments:   70"));
        assert!(text.contains("Large Cap"));
        assert!(text.contains("Pharmaceuticals"));
        assert!(text.contains("diversified_portfolio"));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("small_cap"), "Small Cap");
        assert_eq!(title_case("fmcg"), "Fmcg");
    }
}
