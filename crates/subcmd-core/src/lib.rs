mod command;
pub use command::*;

mod error;
pub use error::*;

mod flag;
pub use flag::*;

mod flag_set;
pub use flag_set::*;

mod printer;
pub use printer::*;

pub use clap;

use std::error::Error;

pub type BoxedError = Box<dyn Error + Send + Sync + 'static>;
