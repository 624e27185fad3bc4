use std::process::ExitCode;

fn main() -> ExitCode {
    mirror_cli::run_cli()
}
