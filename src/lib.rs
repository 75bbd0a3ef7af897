//! Peer-assessment scoring.
//!
//! Turns a group grade and a matrix of peer ratings into per-member
//! scores. Two models are available: QASS, which rescales the group score
//! by each member's relative contribution, and Webavalia, which scales it
//! by each member's weighted rating relative to the best-rated member.
//!
//! The [`scoring`] module is the engine and is free of I/O. The remaining
//! modules make up the `peer-score` command line tool.

pub mod assessment;
pub mod config;
pub mod logging;
pub mod output;
pub mod report;
pub mod scoring;
