//! DCOM types used by OXID resolution (MS-DCOM 2.2)
//!
//! - COM version: COMVERSION
//! - String bindings: DUALSTRINGARRAY
//! - Resolution errors

mod error;
mod orpc;
mod stringbinding;

pub use error::*;
pub use orpc::*;
pub use stringbinding::*;
