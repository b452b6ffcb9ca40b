/// Integer arithmetic and the `+`/`-` forms over strings and lists.
pub mod arithmetic;
/// Union and difference over lists and mappings.
pub mod collection;
/// Ordering, equality and membership.
pub mod comparison;
/// Operator dispatch.
pub mod core;
