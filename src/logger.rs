use tracing::Level;
use tracing_subscriber::FmtSubscriber;

// Initializer for logger. Called once, by the binary only; the library
// never installs a global subscriber.
pub fn init() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set up the global logger");
}
