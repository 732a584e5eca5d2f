// src/aerolattice/forcing/mod.rs

pub mod context;
pub mod propeller;

pub use context::OnsetFlowContext;
pub use propeller::{NoWake, PropellerWakeModel};
