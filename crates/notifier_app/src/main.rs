mod cli;
mod config;
mod platform;

fn main() -> std::process::ExitCode {
    platform::run_app()
}
