pub mod compile;
pub mod filter;
pub mod order;
pub mod predicate;
pub mod sort;
pub mod spec;

pub use compile::{CompiledQuery, compile};
pub use filter::{Conjunction, FilterCondition, FilterOperator, FilterSet};
pub use order::{OrderKey, OrderPlan, SortValue};
pub use predicate::{NumberCompareOp, Predicate};
pub use sort::{SortDirection, SortKey, SortSpec};
pub use spec::{QueryOverrides, QuerySpec};
