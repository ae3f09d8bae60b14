pub mod chart;
pub mod elevation;
pub mod geodesy;
pub mod parse;
pub mod route;
pub mod simulate;
pub mod stages;
pub mod summary;
