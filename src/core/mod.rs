mod bound;
mod filter;
mod order_by;
mod query;
pub mod query_evaluator;
mod target;

pub use bound::Bound;
pub use filter::{FieldFilter, FilterOperator};
pub use order_by::{OrderBy, OrderDirection};
pub use query::Query;
pub use target::Target;
