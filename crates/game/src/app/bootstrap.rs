use engine::{LoopConfig, WorldConfig, WorldHost};
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::host::GameHost;
use super::worlds;

const WORLD_ENV_VAR: &str = "ISOWORLD_WORLD";

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) world: WorldConfig,
    pub(crate) host: Box<dyn WorldHost>,
}

pub(crate) fn build_app() -> Result<AppWiring, String> {
    init_tracing();
    info!("=== Isoworld Startup ===");

    let selection = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(WORLD_ENV_VAR).ok());
    info!(
        world = selection.as_deref().unwrap_or("frontier"),
        "world_selected"
    );
    let world = worlds::select_world(selection.as_deref())?;

    let config = LoopConfig {
        window_title: "Isoworld".to_string(),
        ..LoopConfig::default()
    };

    Ok(AppWiring {
        config,
        world,
        host: Box::new(GameHost::default()),
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
