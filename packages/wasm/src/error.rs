//! Error types shared by the layout engine and the chart model.

/// Failures raised before a layout run mutates anything.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// A point or record carries unusable data.
    #[error("invalid input at index {index}: {reason}")]
    InvalidInput { index: usize, reason: String },

    /// A layout or chart parameter is out of its accepted range.
    #[error("invalid parameter `{name}`: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    /// A chart needs at least the reference record.
    #[error("dataset is empty")]
    EmptyDataset,

    /// A JS value could not be decoded into the expected shape.
    #[error("failed to decode input: {0}")]
    Decode(String),
}

impl LayoutError {
    pub(crate) fn non_finite(index: usize, field: &str, value: f64) -> Self {
        Self::InvalidInput {
            index,
            reason: format!("{field} is not a finite number ({value})"),
        }
    }
}

pub type Result<T> = std::result::Result<T, LayoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = LayoutError::non_finite(3, "target_y", f64::NAN);
        assert_eq!(
            err.to_string(),
            "invalid input at index 3: target_y is not a finite number (NaN)"
        );

        let err = LayoutError::InvalidParameter {
            name: "strength_x",
            value: 1.5,
        };
        assert_eq!(err.to_string(), "invalid parameter `strength_x`: 1.5");
        assert_eq!(LayoutError::EmptyDataset.to_string(), "dataset is empty");
    }
}
