use std::path::{Path, PathBuf};

use candy_engine::{resolve_app_paths, LoopConfig, Scene, StartupError};
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::gameplay;
use super::level_loader::{load_level_file, LevelLoadError};

const LEVEL_ENV_VAR: &str = "CANDY_LEVEL";
const DEFAULT_LEVEL_FILE: &str = "mall.json";

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scene: Box<dyn Scene>,
}

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Level(#[from] LevelLoadError),
}

pub(crate) fn build_app() -> Result<AppWiring, BootstrapError> {
    init_tracing();
    info!("=== Grand Theft Candy Startup ===");

    let paths = resolve_app_paths()?;
    let level_path = level_path_from_env(&paths.levels_dir);
    let level_file = load_level_file(&level_path)?;
    info!(
        level = %level_file.level.name,
        path = %level_path.display(),
        "level_file_loaded"
    );

    Ok(AppWiring {
        config: LoopConfig::default(),
        scene: gameplay::build_scene(level_file),
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

fn level_path_from_env(levels_dir: &Path) -> PathBuf {
    resolve_level_path(levels_dir, std::env::var(LEVEL_ENV_VAR).ok().as_deref())
}

/// Bare file names resolve under the levels directory; anything with a
/// directory component is used as given.
fn resolve_level_path(levels_dir: &Path, raw: Option<&str>) -> PathBuf {
    let Some(value) = raw.map(str::trim) else {
        return levels_dir.join(DEFAULT_LEVEL_FILE);
    };
    if value.is_empty() {
        warn!(
            var = LEVEL_ENV_VAR,
            fallback = DEFAULT_LEVEL_FILE,
            "level_env_empty_using_default"
        );
        return levels_dir.join(DEFAULT_LEVEL_FILE);
    }

    let candidate = Path::new(value);
    if candidate.components().count() > 1 || candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        levels_dir.join(candidate)
    }
}
