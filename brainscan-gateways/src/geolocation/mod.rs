mod fixed;
mod ip_api;

pub use self::{fixed::*, ip_api::*};
