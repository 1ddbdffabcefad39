use std::process::ExitCode;

fn main() -> ExitCode {
    match armoryd::run_daemon() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            // Telemetry may not be installed when bootstrap fails early.
            eprintln!("armoryd: {error}");
            ExitCode::FAILURE
        }
    }
}
