pub mod daemon;
pub mod evaluate;
pub mod output;
pub mod query;
pub mod rules;
