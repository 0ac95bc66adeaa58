pub mod covid;
pub mod demand;
pub mod eia_demand;
pub mod load_pattern;
pub mod peak;
