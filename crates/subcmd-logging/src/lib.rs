mod logger_builder;

pub use logger_builder::*;
pub use {time, tracing_subscriber};
