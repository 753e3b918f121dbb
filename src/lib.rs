//! enclosure-quote - pricing wizard for balcony and loggia enclosures
//!
//! The library holds the wizard state machine, the pricing rules, session
//! persistence and lead submission; `main.rs` wires them into the TUI and
//! the headless subcommands.

pub mod app;
pub mod config;
pub mod logging;
pub mod quote;
pub mod session;
pub mod submission;
pub mod ui;
pub mod wizard;
