use hurdle_wordle::cli::{parse_cli, run};
use hurdle_wordle::logging::init_logging;
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = parse_cli();
    init_logging(cli.verbose);

    let stdin = io::stdin();
    match run(&cli, stdin.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
