//! Protoclass Driver Library
//!
//! Runs the rewrite pipeline (lex → parse → transform → print) over one
//! source text or a batch of files.

pub mod batch;
pub mod discover;
pub mod logging;
pub mod pipeline;

pub use batch::{run_batch, BatchOptions, BatchSummary, OutputMode, UnitOutcome};
pub use discover::{discover, DiscoverError, DiscoverOptions};
pub use logging::{init_logging, LogFormat};
pub use pipeline::{rewrite_source, LexError, Rewrite, RewriteOptions, UnitError};
