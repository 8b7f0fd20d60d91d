mod app;

use std::process::ExitCode;

use app::UpsetApp;

fn main() -> ExitCode {
    env_logger::init();

    let result = UpsetApp::from_args(std::env::args().skip(1)).and_then(|app| app.run());
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
