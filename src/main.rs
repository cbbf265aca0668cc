use std::path::PathBuf;

// One thread: signal handling, timers and delivery callbacks interleave on a
// single scheduler.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let settings_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(casewatch_lib::DEFAULT_SETTINGS_FILE));

    if let Err(err) = casewatch_lib::run(&settings_path).await {
        log::error!("casewatch exited: {err:#}");
        std::process::exit(1);
    }
}
