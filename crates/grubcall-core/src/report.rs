//! Order aggregation.
//!
//! A pure transform from the window's entries to a consolidated report:
//! total counts per item and a who-ordered-what breakdown. Regenerated on
//! demand; never persisted.

use std::collections::BTreeMap;
use std::fmt;

use crate::parser::parse_order;
use crate::window::Entry;

/// Consolidated view of all current orders.
///
/// `total_counts` is sorted by descending count, ties broken by label
/// ascending. `customer_breakdown` maps label -> display name -> count and
/// iterates lexically on both levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub total_counts: Vec<(String, u32)>,
    pub customer_breakdown: BTreeMap<String, BTreeMap<String, u32>>,
}

impl Report {
    /// Aggregate the window's entries. Each raw order text is run through
    /// the parser; every resulting label counts once.
    pub fn from_entries(entries: &BTreeMap<String, Entry>) -> Self {
        let mut totals: BTreeMap<String, u32> = BTreeMap::new();
        let mut breakdown: BTreeMap<String, BTreeMap<String, u32>> = BTreeMap::new();

        for entry in entries.values() {
            for label in parse_order(&entry.raw_text) {
                *totals.entry(label.clone()).or_default() += 1;
                *breakdown
                    .entry(label)
                    .or_default()
                    .entry(entry.display_name.clone())
                    .or_default() += 1;
            }
        }

        let mut total_counts: Vec<(String, u32)> = totals.into_iter().collect();
        total_counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Self {
            total_counts,
            customer_breakdown: breakdown,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_counts.is_empty()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "🧾 ORDER RECEIPT")?;
        writeln!(f)?;
        writeln!(f, "📋 TOTAL ITEMS:")?;
        for (label, count) in &self.total_counts {
            writeln!(f, "• {count}x {label}")?;
        }
        writeln!(f)?;
        writeln!(f, "📝 WHO ORDERED WHAT:")?;
        for (label, customers) in &self.customer_breakdown {
            let customer_list = customers
                .iter()
                .map(|(name, count)| {
                    if *count > 1 {
                        format!("{name} ({count}x)")
                    } else {
                        name.clone()
                    }
                })
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(f, "• {label}: {customer_list}")?;
        }
        Ok(())
    }
}
