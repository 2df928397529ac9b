//! cstview - keeps a source editor and its concrete syntax tree in lockstep
//!
//! This crate provides the synchronization layer between a text editing
//! widget and a rendered CST view, implementing the Elm Architecture
//! pattern: collaborators post [`Msg`]s, [`update`] transforms the
//! [`Session`], and the [`App`] runtime executes the returned [`Cmd`]s.

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod decoration;
pub mod messages;
pub mod model;
pub mod render;
pub mod runtime;
pub mod session_store;
pub mod tracing;
pub mod translator;
pub mod update;
pub mod widget;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::SyncConfig;
pub use messages::Msg;
pub use model::{Position, Session, TextRange};
pub use runtime::App;
pub use translator::{NodeId, NodeLookup};
pub use update::update;
