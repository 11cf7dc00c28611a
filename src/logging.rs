use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Routes engine diagnostics to standard error so standard output keeps the dump.
pub fn init(level: Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("logging disabled: {err}");
    }
}
