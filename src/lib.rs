pub mod aggregate;
pub mod category;
pub mod dataflow;
pub mod error;
pub mod gen;
pub mod models;

pub use aggregate::aggregate;
pub use category::{GroupKey, Product, Region, GROUP_COUNT};
pub use dataflow::aggregate_dataflow;
pub use error::{Error, Field};
pub use gen::{generate, sample_record, SampleConfig};
pub use models::{AggResult, Aggregation, GroupTotals, SalesRecord};
