pub mod elevation;
pub mod progress;
pub mod route;
pub mod stage;
