pub mod classify;
pub mod facilities;
pub mod location;
