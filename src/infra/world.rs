//! Population generator: places entities on distinct random cells of a grid.

use rand::seq::index;
use rand::Rng;

use crate::config::WorldConfig;
use crate::core::{Entity, Position, SchedulerError};

/// Generates the initial entity population for a world.
#[derive(Debug, Clone)]
pub struct WorldGenerator {
    config: WorldConfig,
}

impl WorldGenerator {
    /// Create a generator.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::InvalidConfig`] if the population does not fit the map.
    pub fn new(config: WorldConfig) -> Result<Self, SchedulerError> {
        config.validate().map_err(SchedulerError::InvalidConfig)?;
        Ok(Self { config })
    }

    /// Produce `population` entities at unique positions.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Entity> {
        let height = self.config.height as usize;
        let cells = self.config.width as usize * height;

        index::sample(rng, cells, self.config.population)
            .into_iter()
            .map(|cell| {
                let x = i64::try_from(cell / height).unwrap_or(i64::MAX);
                let y = i64::try_from(cell % height).unwrap_or(i64::MAX);
                Entity::new(Position::new(x, y))
            })
            .collect()
    }
}
