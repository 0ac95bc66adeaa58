pub mod accumulator;
pub mod fetch;
pub mod lookups;
pub mod parse;
pub mod transforms;

pub use accumulator::Accumulator;
