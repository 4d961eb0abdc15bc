//! Feature catalog.
//!
//! Groups the full feature list by track type for the annotation panel and
//! the genome summary, and keeps the panel's cursor. Selecting an entry is
//! handled by the session, which recenters the viewport through
//! `goto_feature`.

use std::collections::BTreeMap;

use crate::model::{Feature, FeatureType};

/// Groups features by catalog bucket, preserving input order inside each
/// bucket. All four track types are always present; unknown types land in
/// `regulatory`.
pub fn group_by_type(features: &[Feature]) -> BTreeMap<FeatureType, Vec<Feature>> {
    let mut groups: BTreeMap<FeatureType, Vec<Feature>> = FeatureType::TRACKS
        .iter()
        .map(|&t| (t, Vec::new()))
        .collect();
    for feature in features {
        groups
            .entry(feature.feature_type.catalog_bucket())
            .or_default()
            .push(feature.clone());
    }
    groups
}

/// Sizes of the [`group_by_type`] buckets.
pub fn counts_by_type(features: &[Feature]) -> BTreeMap<FeatureType, usize> {
    let mut counts: BTreeMap<FeatureType, usize> =
        FeatureType::TRACKS.iter().map(|&t| (t, 0)).collect();
    for feature in features {
        *counts.entry(feature.feature_type.catalog_bucket()).or_default() += 1;
    }
    counts
}

/// Catalog entry text: `name (start-end)`.
pub fn entry_label(feature: &Feature) -> String {
    format!("{} ({}-{})", feature.name, feature.start, feature.end)
}

/// The annotation panel: one column per track type and a cursor.
#[derive(Debug, Clone, Default)]
pub struct CatalogView {
    groups: BTreeMap<FeatureType, Vec<Feature>>,
    column: usize,
    row: usize,
}

impl CatalogView {
    pub fn new(features: &[Feature]) -> Self {
        Self {
            groups: group_by_type(features),
            column: 0,
            row: 0,
        }
    }

    /// Replaces the listed features, resetting the cursor.
    pub fn set_features(&mut self, features: &[Feature]) {
        *self = Self::new(features);
    }

    pub fn is_empty(&self) -> bool {
        self.groups.values().all(Vec::is_empty)
    }

    pub fn groups(&self) -> &BTreeMap<FeatureType, Vec<Feature>> {
        &self.groups
    }

    pub fn counts(&self) -> BTreeMap<FeatureType, usize> {
        self.groups.iter().map(|(&t, v)| (t, v.len())).collect()
    }

    /// Type of the column under the cursor.
    pub fn current_type(&self) -> FeatureType {
        FeatureType::TRACKS[self.column]
    }

    /// Entries in the current column.
    pub fn current_entries(&self) -> &[Feature] {
        self.groups
            .get(&self.current_type())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn cursor_row(&self) -> usize {
        self.row
    }

    /// The feature under the cursor, if the column is not empty.
    pub fn selected(&self) -> Option<&Feature> {
        self.current_entries().get(self.row)
    }

    pub fn move_up(&mut self) {
        self.row = self.row.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.row + 1 < self.current_entries().len() {
            self.row += 1;
        }
    }

    pub fn next_column(&mut self) {
        self.column = (self.column + 1) % FeatureType::TRACKS.len();
        self.row = 0;
    }

    pub fn previous_column(&mut self) {
        let n = FeatureType::TRACKS.len();
        self.column = (self.column + n - 1) % n;
        self.row = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Strand;

    fn f(t: FeatureType, name: &str) -> Feature {
        Feature::new(t, name, 10, 20, Strand::Forward)
    }

    fn sample() -> Vec<Feature> {
        vec![
            f(FeatureType::Gene, "g1"),
            f(FeatureType::Mrna, "m1"),
            f(FeatureType::Cds, "c1"),
            f(FeatureType::Other, "x1"),
            f(FeatureType::Gene, "g2"),
        ]
    }

    #[test]
    fn test_unknown_type_grouped_under_regulatory() {
        let groups = group_by_type(&sample());
        let regulatory: Vec<&str> = groups[&FeatureType::Regulatory]
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(regulatory, vec!["x1"]);
        assert!(!groups.contains_key(&FeatureType::Other));
    }

    #[test]
    fn test_group_preserves_order() {
        let groups = group_by_type(&sample());
        let genes: Vec<&str> = groups[&FeatureType::Gene].iter().map(|f| f.name.as_str()).collect();
        assert_eq!(genes, vec!["g1", "g2"]);
    }

    #[test]
    fn test_counts() {
        let counts = counts_by_type(&sample());
        assert_eq!(counts[&FeatureType::Gene], 2);
        assert_eq!(counts[&FeatureType::Mrna], 1);
        assert_eq!(counts[&FeatureType::Cds], 1);
        assert_eq!(counts[&FeatureType::Regulatory], 1);
        assert_eq!(counts.values().sum::<usize>(), 5);
    }

    #[test]
    fn test_empty_list_has_all_buckets() {
        let groups = group_by_type(&[]);
        assert_eq!(groups.len(), 4);
        assert!(groups.values().all(Vec::is_empty));
        assert!(CatalogView::new(&[]).is_empty());
    }

    #[test]
    fn test_entry_label() {
        assert_eq!(entry_label(&f(FeatureType::Gene, "abc")), "abc (10-20)");
    }

    #[test]
    fn test_cursor_navigation() {
        let mut view = CatalogView::new(&sample());
        assert_eq!(view.current_type(), FeatureType::Gene);
        assert_eq!(view.selected().unwrap().name, "g1");

        view.move_down();
        assert_eq!(view.selected().unwrap().name, "g2");
        view.move_down();
        assert_eq!(view.selected().unwrap().name, "g2");

        view.next_column();
        assert_eq!(view.current_type(), FeatureType::Mrna);
        assert_eq!(view.cursor_row(), 0);

        view.previous_column();
        view.previous_column();
        assert_eq!(view.current_type(), FeatureType::Regulatory);
        assert_eq!(view.selected().unwrap().name, "x1");

        view.move_up();
        assert_eq!(view.cursor_row(), 0);
    }
}
