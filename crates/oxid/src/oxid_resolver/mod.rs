//! IObjectExporter client (MS-DCOM 3.1.2.5)
//!
//! The Object Exporter interface runs on port 135. Only `ServerAlive2` is
//! used: it takes no input and returns the exporter's COM version and its
//! string and security bindings.

mod client;
mod protocol;

pub use client::*;
pub use protocol::*;
