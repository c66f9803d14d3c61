use clap::Parser;
use gbce::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    gbce::logging::init(cli.log_format);
    run(cli)
}
