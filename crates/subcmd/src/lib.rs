//! Building blocks for programs driven by subcommands, in the style of `go <command>`.
//!
//! A [`cli::Program`] owns an ordered list of [`core::Command`]s. Runnable commands are dispatched
//! by name, commands without an action are help topics, and `help [topic]` is always available.

pub mod core {
    pub use subcmd_core::*;
}

#[cfg(feature = "cli")]
pub mod cli {
    pub use subcmd_cli::*;
}

#[cfg(feature = "logging")]
pub mod logging {
    pub use subcmd_logging::*;
}
