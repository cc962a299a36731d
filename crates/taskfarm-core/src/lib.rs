mod error;
mod order;
mod priority;
mod registry;
mod spec;

pub use error::{Result, TaskError};
pub use order::order_by_priority;
pub use priority::Priority;
pub use registry::{BuildFn, KindRegistry, WorkUnit};
pub use spec::{FieldMap, FieldValue, TaskSpec};
