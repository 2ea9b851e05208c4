pub mod apriori;
pub mod encoder;
pub mod engine;
pub mod popularity;
pub mod rules;
pub mod types;
