//! Radio Control Logic
//!
//! Band table, receiver state machine and the SSB patch sequence.

pub mod band;
pub mod ssb;
pub mod state;
