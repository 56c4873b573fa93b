use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::config::Config;
use crate::simulation::{RandSource, SimulationSource};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
    pub source: Arc<dyn SimulationSource>,
}

impl AppState {
    /// State with a generator built from the configuration.
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        let source: Arc<dyn SimulationSource> = match config.simulation_seed {
            Some(seed) => {
                tracing::info!(seed, "Simulation generator seeded");
                Arc::new(RandSource::seeded(seed))
            }
            None => Arc::new(RandSource::from_os()),
        };

        Self::with_source(db, config, source)
    }

    /// State with an explicit generator.
    pub fn with_source(
        db: DatabaseConnection,
        config: Config,
        source: Arc<dyn SimulationSource>,
    ) -> Self {
        Self {
            db,
            config: Arc::new(config),
            source,
        }
    }
}
