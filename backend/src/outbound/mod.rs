//! Outbound adapters: persistence behind the driven ports.

pub mod persistence;
