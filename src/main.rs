use colored::Colorize;
use object_inliner::cli::CommandLineInterface;
use tracing_subscriber::EnvFilter;

fn main() {
    // RUST_LOG overrides; stdout is reserved for generated code
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let command_line_interface = CommandLineInterface::load();
    if let Err(error) = command_line_interface.run() {
        eprintln!("{} {error:#}", "error:".red().bold());
        std::process::exit(1);
    }
}
