//! Filter engine
//!
//! Pure, order-preserving predicate pipeline over the full collection. All
//! active criteria must hold (conjunction).

use halunder_common::SentencePair;

/// Transient filter settings; `Default` is the reset state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    min_confidence: u8,
    source_query: String,
    incomplete_only: bool,
}

impl FilterCriteria {
    /// `min_confidence` is a percentage (clamped to 100); `source` matches
    /// case-insensitively
    pub fn new(min_confidence: u8, source: &str, incomplete_only: bool) -> Self {
        Self {
            min_confidence: min_confidence.min(100),
            source_query: source.to_lowercase(),
            incomplete_only,
        }
    }

    pub fn min_confidence(&self) -> u8 {
        self.min_confidence
    }

    pub fn source_query(&self) -> &str {
        &self.source_query
    }

    pub fn incomplete_only(&self) -> bool {
        self.incomplete_only
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, pair: &SentencePair) -> bool {
        if pair.confidence() * 100.0 < f64::from(self.min_confidence) {
            return false;
        }

        if !self.source_query.is_empty() {
            let title = pair.source_title.as_deref().unwrap_or("").to_lowercase();
            if !title.contains(&self.source_query) {
                return false;
            }
        }

        if self.incomplete_only && !pair.is_incomplete() {
            return false;
        }

        true
    }
}

/// Positions (into `pairs`) of every pair passing `criteria`, ascending
pub fn matching_indices(pairs: &[SentencePair], criteria: &FilterCriteria) -> Vec<usize> {
    pairs
        .iter()
        .enumerate()
        .filter(|(_, p)| criteria.matches(p))
        .map(|(i, _)| i)
        .collect()
}

/// The filtered view itself
pub fn apply<'a>(pairs: &'a [SentencePair], criteria: &FilterCriteria) -> Vec<&'a SentencePair> {
    pairs.iter().filter(|p| criteria.matches(p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(id: &str, h: &str, g: &str, c: Option<f64>, source: Option<&str>) -> SentencePair {
        let mut p = SentencePair::new(id, h, g, c);
        p.source_title = source.map(str::to_string);
        p
    }

    fn corpus() -> Vec<SentencePair> {
        vec![
            pair("1", "Moin", "Hallo", Some(0.95), Some("Helgoländer Sagen")),
            pair("2", "Jä", "", Some(0.5), Some("Lünkalender 1950")),
            pair("3", "", "Nein", None, None),
            pair("4", "Tjüs", "Tschüss", Some(0.8), Some("helgoländer sagen II")),
            pair("5", "", "", Some(0.2), Some("Lünkalender 1951")),
        ]
    }

    fn ids(view: &[&SentencePair]) -> Vec<String> {
        view.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn test_default_criteria_pass_everything() {
        let data = corpus();
        let view = apply(&data, &FilterCriteria::default());
        assert_eq!(ids(&view), vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_confidence_threshold_inclusive() {
        let data = corpus();
        let view = apply(&data, &FilterCriteria::new(80, "", false));
        assert_eq!(ids(&view), vec!["1", "4"]);
    }

    #[test]
    fn test_missing_confidence_counts_as_zero() {
        let data = corpus();
        let view = apply(&data, &FilterCriteria::new(1, "", false));
        assert!(!ids(&view).contains(&"3".to_string()));
    }

    #[test]
    fn test_source_substring_case_insensitive() {
        let data = corpus();
        let view = apply(&data, &FilterCriteria::new(0, "HELGOLÄNDER", false));
        assert_eq!(ids(&view), vec!["1", "4"]);
    }

    #[test]
    fn test_incomplete_only_keeps_pairs_missing_a_side() {
        let data = corpus();
        let view = apply(&data, &FilterCriteria::new(0, "", true));
        assert_eq!(ids(&view), vec!["2", "3", "5"]);
    }

    #[test]
    fn test_criteria_combine_conjunctively() {
        let data = corpus();
        let view = apply(&data, &FilterCriteria::new(40, "lünkalender", true));
        assert_eq!(ids(&view), vec!["2"]);
    }

    #[test]
    fn test_view_is_ordered_subset_and_idempotent() {
        let data = corpus();
        let criteria = FilterCriteria::new(50, "", false);

        let first = matching_indices(&data, &criteria);
        let second = matching_indices(&data, &criteria);
        assert_eq!(first, second);
        assert!(first.windows(2).all(|w| w[0] < w[1]));
        assert!(first.iter().all(|&i| i < data.len()));
    }

    #[test]
    fn test_empty_collection() {
        let view = apply(&[], &FilterCriteria::new(90, "x", true));
        assert!(view.is_empty());
    }

    #[test]
    fn test_threshold_clamped() {
        assert_eq!(FilterCriteria::new(250, "", false).min_confidence(), 100);
    }
}
