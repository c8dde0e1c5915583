use integration_tests::{NAME, program};
use subcmd::logging::{LoggerBuilder, tracing_subscriber::util::SubscriberInitExt};

fn main() {
    match LoggerBuilder::new(NAME).with_env_var("GREETER_LOG").build() {
        Ok(logger) => logger.init(),
        Err(e) => eprintln!("{NAME}: {e}"),
    }

    match program() {
        Ok(program) => program.exec(),
        Err(e) => {
            eprintln!("{NAME}: {e}");
            std::process::exit(1);
        }
    }
}
