//! Email OTP and password authentication service.
//!
//! The `cli` module parses arguments and boots tracing; the `sezamo` module
//! holds the HTTP service: router, auth flows, OTP ledger, and token issuance.

pub mod cli;
pub mod sezamo;
