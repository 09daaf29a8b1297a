#![deny(missing_debug_implementations)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # brainscan-entities
//!
//! Reusable, agnostic domain entities for brainscan.
//!
//! The entities only contain generic functionality that does not reveal
//! any application-specific business logic.

pub mod diagnosis;
pub mod facility;
pub mod geo;
pub mod upload;

#[cfg(any(test, feature = "builders"))]
pub mod builders;
