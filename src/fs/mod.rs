pub mod drop;
pub mod naming;
pub mod operations;
pub mod tree;
