//! Well-known constants of the instruction set.

use crate::types::StreamId;

/// The null stream: always writable, never observable.
pub const NULL: StreamId = -1;

/// Stream drained to the embedder's standard output endpoint.
pub const STDOUT: StreamId = 0;

/// Stream drained to the embedder's standard error endpoint.
pub const STDERR: StreamId = 1;

/// Number of positional-argument registers available during compilation.
pub const REGISTER_COUNT: usize = 0x10;
