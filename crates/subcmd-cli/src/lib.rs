mod builder;
mod outcome;
mod program;

pub use builder::*;
pub use outcome::*;
pub use program::*;
pub use subcmd_core::{ActionError, BoxedError, Command, Flag, FlagError, FlagKind, FlagSet, clap};
