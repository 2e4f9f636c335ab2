//! # Workflows Module
//!
//! Complete procedures built on top of the [`crate::engine`] layer.
//!
//! - **Script Replay** ([`replay`]) - Feeds a textual script of user events through a
//!   [`crate::engine::session::Session`], one line at a time, exactly as an interactive
//!   front end would.

pub mod replay;
