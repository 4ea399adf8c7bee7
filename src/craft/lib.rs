//! `craft`: a declarative build tool for C and C++ projects. A craftfile
//! populates a [`core::DefinitionContext`] with targets; `craft` plans and
//! runs whichever of them are requested, skipping whatever is already
//! fresh.

pub mod core;
pub mod ops;
pub mod packages;
