//! Command implementations, one module per subcommand.

pub mod check;
pub mod completions;
pub mod export;
pub mod list;
pub mod schema;
pub mod session;
