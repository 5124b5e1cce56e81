use std::process::ExitCode;

mod app;
mod movement;

fn main() -> ExitCode {
    let wiring = app::build_app();
    app::run(wiring)
}
