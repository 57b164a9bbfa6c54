use clap::Parser;
use stratbench::cli::{run, Cli};
use stratbench::logging::init_tracing;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_tracing(&cli.log_level) {
        eprintln!("error: {err}");
        return std::process::ExitCode::from(2);
    }
    run(cli)
}
