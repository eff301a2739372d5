//! cmdfloat - a floating, completing command line for modal editors
//!
//! Intercepts the `:`, `/` and `?` triggers (and Ctrl-R `=` in insert mode),
//! opens an overlay with fuzzy completion, history and live search preview,
//! and replays the committed line into the host's modal engine.

pub mod completion;
pub mod config;
pub mod error;
pub mod event_loop;
pub mod fuzzy;
pub mod history;
pub mod host;
pub mod interceptor;
pub mod key;
pub mod manager;
pub mod mode;
pub mod preview;
pub mod replay;
pub mod search;
pub mod service;
pub mod session;
pub mod suppression;
pub mod term;
