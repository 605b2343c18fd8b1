//! Constants of the surface language.

/// Character that switches the parser into a caret mode.
pub const PRGM_MODE_CHAR: char = '^';

/// Character that invokes a compile-time macro.
pub const MACRO_MODE_CHAR: char = '?';

/// Fallback name used for sources that have no path, such as REPL input.
pub const STDIN_NAME: &str = "<stdin>";
