//! Pay records as published in the source dataset.
//!
//! The dataset is a JSON array whose first entry covers all employees and
//! whose remaining entries are individual occupations.

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};

/// Median annual pay for one group of employees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayRecord {
    #[serde(rename = "median_4")]
    pub median: f64,
    /// Occupation group name.
    #[serde(rename = "description_2", default)]
    pub title: String,
    /// Occupation description.
    #[serde(rename = "description_4", default)]
    pub label: String,
}

impl PayRecord {
    pub fn new(median: f64, title: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            median,
            title: title.into(),
            label: label.into(),
        }
    }
}

/// A dataset split into its reference row and the occupations.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// The "all employees" row.
    pub reference: PayRecord,
    pub occupations: Vec<PayRecord>,
}

impl Dataset {
    /// Split off the leading reference record, rejecting unusable medians.
    pub fn split(records: Vec<PayRecord>) -> Result<Self> {
        for (index, record) in records.iter().enumerate() {
            if !record.median.is_finite() {
                return Err(LayoutError::non_finite(index, "median", record.median));
            }
        }

        let mut records = records.into_iter();
        let reference = records.next().ok_or(LayoutError::EmptyDataset)?;
        Ok(Self {
            reference,
            occupations: records.collect(),
        })
    }

    /// Sort occupations from highest to lowest median. Equal medians keep
    /// their dataset order.
    pub fn sort_descending(&mut self) {
        self.occupations.sort_by(|a, b| b.median.total_cmp(&a.median));
    }

    /// Smallest and largest occupation medians.
    pub fn median_extent(&self) -> Option<(f64, f64)> {
        let first = self.occupations.first()?.median;
        Some(
            self.occupations
                .iter()
                .fold((first, first), |(lo, hi), r| (lo.min(r.median), hi.max(r.median))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {"median_4": 28213, "description_2": "All employees", "description_4": ""},
        {"median_4": 16000, "description_2": "Elementary occupations", "description_4": "Waiters and waitresses"},
        {"median_4": 84500, "description_2": "Managers", "description_4": "Chief executives"},
        {"median_4": 31000, "description_2": "Skilled trades"}
    ]"#;

    #[test]
    fn test_decode_dataset() {
        let records: Vec<PayRecord> = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[1].median, 16000.0);
        assert_eq!(records[1].label, "Waiters and waitresses");
        assert_eq!(records[3].label, "");
    }

    #[test]
    fn test_split_and_sort() {
        let records: Vec<PayRecord> = serde_json::from_str(SAMPLE).unwrap();
        let mut dataset = Dataset::split(records).unwrap();
        assert_eq!(dataset.reference.title, "All employees");
        assert_eq!(dataset.occupations.len(), 3);

        dataset.sort_descending();
        let medians: Vec<f64> = dataset.occupations.iter().map(|r| r.median).collect();
        assert_eq!(medians, vec![84500.0, 31000.0, 16000.0]);
        assert_eq!(dataset.median_extent(), Some((16000.0, 84500.0)));
    }

    #[test]
    fn test_sort_is_stable() {
        let mut dataset = Dataset::split(vec![
            PayRecord::new(1.0, "all", ""),
            PayRecord::new(5.0, "a", ""),
            PayRecord::new(7.0, "b", ""),
            PayRecord::new(5.0, "c", ""),
        ])
        .unwrap();
        dataset.sort_descending();
        let titles: Vec<&str> = dataset.occupations.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_empty_dataset() {
        assert_eq!(Dataset::split(Vec::new()), Err(LayoutError::EmptyDataset));
    }

    #[test]
    fn test_reference_only() {
        let dataset = Dataset::split(vec![PayRecord::new(1.0, "all", "")]).unwrap();
        assert!(dataset.occupations.is_empty());
        assert_eq!(dataset.median_extent(), None);
    }

    #[test]
    fn test_non_finite_median() {
        let err = Dataset::split(vec![
            PayRecord::new(1.0, "all", ""),
            PayRecord::new(f64::NAN, "bad", ""),
        ])
        .unwrap_err();
        assert!(matches!(err, LayoutError::InvalidInput { index: 1, .. }));
    }
}
