// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Language distribution arithmetic.
//!
//! Byte counts reported per repository are summed per language name, and the
//! shares of the top languages are expressed as percentages of *all* bytes.
//! Percentages are truncated to hundredths in integer arithmetic so that the
//! retained entries never sum above `100.00`.

use std::collections::BTreeMap;

use crate::model::{LanguageBreakdown, LanguageShare};

/// Number of languages retained in the breakdown.
pub const TOP_LANGUAGE_LIMIT: usize = 8;

/// Sums byte counts per language across repositories.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
///
/// use profile_dynamo::merge_language_bytes;
///
/// let first = BTreeMap::from([("Rust".to_owned(), 10_u64)]);
/// let second = BTreeMap::from([("Rust".to_owned(), 5_u64), ("Go".to_owned(), 1_u64)]);
/// let merged = merge_language_bytes([first, second]);
/// assert_eq!(merged["Rust"], 15);
/// assert_eq!(merged["Go"], 1);
/// ```
pub fn merge_language_bytes<I>(per_repository: I) -> BTreeMap<String, u64>
where
    I: IntoIterator<Item = BTreeMap<String, u64>>
{
    let mut totals = BTreeMap::new();
    for languages in per_repository {
        for (name, bytes) in languages {
            *totals.entry(name).or_insert(0_u64) += bytes;
        }
    }
    totals
}

/// Computes the top `limit` languages by byte count with their share of the
/// overall total.
///
/// Entries are ordered by bytes descending; equal counts are ordered by name.
/// An empty or all-zero input produces an empty breakdown.
pub fn compute_language_shares(totals: &BTreeMap<String, u64>, limit: usize) -> LanguageBreakdown {
    let total: u128 = totals.values().map(|bytes| u128::from(*bytes)).sum();
    if total == 0 {
        return LanguageBreakdown::default();
    }

    let mut ranked: Vec<(&String, u64)> = totals.iter().map(|(name, bytes)| (name, *bytes)).collect();
    ranked.sort_by(|left, right| right.1.cmp(&left.1));

    let entries = ranked
        .into_iter()
        .take(limit)
        .map(|(name, bytes)| LanguageShare {
            name: name.clone(),
            bytes,
            percentage: format_basis_points(u128::from(bytes) * 10_000 / total)
        })
        .collect();

    LanguageBreakdown::new(entries)
}

fn format_basis_points(basis_points: u128) -> String {
    format!("{}.{:02}", basis_points / 100, basis_points % 100)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn totals(entries: &[(&str, u64)]) -> BTreeMap<String, u64> {
        entries
            .iter()
            .map(|(name, bytes)| ((*name).to_owned(), *bytes))
            .collect()
    }

    fn percentage_hundredths(value: &str) -> u64 {
        let (whole, fraction) = value.split_once('.').expect("two decimals");
        assert_eq!(fraction.len(), 2, "percentage {value} must carry two decimals");
        whole.parse::<u64>().expect("whole part") * 100 + fraction.parse::<u64>().expect("fraction")
    }

    proptest! {
        #[test]
        fn retained_percentages_never_exceed_one_hundred(
            entries in proptest::collection::btree_map("[A-Za-z+#]{1,10}", 0_u64..5_000_000, 0..20)
        ) {
            let breakdown = compute_language_shares(&entries, TOP_LANGUAGE_LIMIT);
            prop_assert!(breakdown.len() <= TOP_LANGUAGE_LIMIT);
            let sum: u64 = breakdown
                .entries()
                .iter()
                .map(|share| percentage_hundredths(&share.percentage))
                .sum();
            prop_assert!(sum <= 10_000);
        }

        #[test]
        fn retained_languages_are_ordered_by_bytes(
            entries in proptest::collection::btree_map("[a-z]{1,6}", 1_u64..1_000_000, 1..20)
        ) {
            let breakdown = compute_language_shares(&entries, TOP_LANGUAGE_LIMIT);
            let bytes: Vec<u64> = breakdown.entries().iter().map(|share| share.bytes).collect();
            prop_assert!(bytes.windows(2).all(|pair| pair[0] >= pair[1]));
        }
    }

    #[test]
    fn merges_bytes_across_repositories() {
        let merged = merge_language_bytes([
            totals(&[("Rust", 100), ("Shell", 5)]),
            totals(&[("Rust", 50), ("TypeScript", 20)]),
        ]);

        assert_eq!(merged, totals(&[("Rust", 150), ("Shell", 5), ("TypeScript", 20)]));
    }

    #[test]
    fn shares_are_computed_over_all_bytes_not_only_retained() {
        let entries: Vec<(String, u64)> = (0..10).map(|index| (format!("L{index}"), 10)).collect();
        let map: BTreeMap<String, u64> = entries.into_iter().collect();

        let breakdown = compute_language_shares(&map, TOP_LANGUAGE_LIMIT);

        assert_eq!(breakdown.len(), 8);
        assert!(breakdown.entries().iter().all(|share| share.percentage == "10.00"));
    }

    #[test]
    fn percentages_carry_exactly_two_decimals() {
        let breakdown = compute_language_shares(&totals(&[("Rust", 2), ("Go", 1)]), TOP_LANGUAGE_LIMIT);

        assert_eq!(breakdown.percentage("Rust"), Some("66.66"));
        assert_eq!(breakdown.percentage("Go"), Some("33.33"));
    }

    #[test]
    fn ties_are_ordered_by_name() {
        let breakdown =
            compute_language_shares(&totals(&[("Zig", 5), ("Ada", 5), ("C", 10)]), TOP_LANGUAGE_LIMIT);

        assert_eq!(breakdown.names().collect::<Vec<_>>(), vec!["C", "Ada", "Zig"]);
    }

    #[test]
    fn empty_or_zero_totals_produce_empty_breakdown() {
        assert!(compute_language_shares(&BTreeMap::new(), TOP_LANGUAGE_LIMIT).is_empty());
        assert!(compute_language_shares(&totals(&[("Rust", 0)]), TOP_LANGUAGE_LIMIT).is_empty());
    }

    #[test]
    fn single_language_is_one_hundred_percent() {
        let breakdown = compute_language_shares(&totals(&[("Rust", 42)]), TOP_LANGUAGE_LIMIT);
        assert_eq!(breakdown.percentage("Rust"), Some("100.00"));
    }
}
