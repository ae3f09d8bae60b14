pub mod elevation;
pub mod health;
pub mod progress;
pub mod route;
pub mod snapshot;
