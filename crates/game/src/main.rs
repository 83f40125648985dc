mod app;

use tracing::error;

fn main() {
    let wiring = match app::bootstrap::build_app() {
        Ok(wiring) => wiring,
        Err(err) => {
            error!(error = %err, "startup_failed");
            std::process::exit(1);
        }
    };

    if let Err(err) = engine::run_app(wiring.config, wiring.world, wiring.host) {
        error!(error = %err, "app_failed");
        std::process::exit(1);
    }
}
