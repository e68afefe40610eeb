pub mod histogram;
pub mod statistics;
