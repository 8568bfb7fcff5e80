//! Pay beeswarm chart model.
//!
//! Everything between the parsed dataset and the renderer that does not
//! touch the DOM: value scaling, record ordering, layout, callout placement
//! and hover resolution.

pub mod annotation;
pub mod beeswarm;
pub mod config;
pub mod record;
pub mod scale;

pub use annotation::Callout;
pub use beeswarm::{BeeswarmChart, ChartView};
pub use config::{ChartConfig, Margin, Offset};
pub use record::{Dataset, PayRecord};
pub use scale::LinearScale;
