#[macro_use]
extern crate log;

mod advisory;
mod analysis;
mod discovery;
mod presenter;

pub mod error;

pub mod prelude {
    pub use super::{advisory::*, analysis::*, discovery::*, presenter::*};
}

pub(crate) use brainscan_core::{entities::*, gateways, usecases};
