use std::sync::Arc;

use bevy_app::{App, Plugin};
use bevy_ecs::resource::Resource;
use bevy_ecs::world::World;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::generator::{GenerationRequest, UnitGenerator};
use crate::model::UnitRecord;

/// The generator shared with simulation systems.
#[derive(Resource, Clone)]
pub struct SharedUnitGenerator(pub Arc<dyn UnitGenerator>);

/// Deterministic RNG reserved for unit draws.
#[derive(Resource)]
pub struct GeneratorRng {
    pub rng: SmallRng,
    pub seed: u64,
}

impl GeneratorRng {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Installs a unit generator and its RNG as app resources.
pub struct UnitGenPlugin {
    pub generator: Arc<dyn UnitGenerator>,
    pub seed: u64,
}

impl Plugin for UnitGenPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SharedUnitGenerator(self.generator.clone()));
        app.insert_resource(GeneratorRng::seeded(self.seed));
    }
}

/// Draw up to `count` units for `request` with the world's generator.
///
/// Returns an empty roster when the plugin is not installed.
pub fn draw_roster(
    world: &mut World,
    count: usize,
    request: &GenerationRequest,
) -> Vec<UnitRecord> {
    let Some(shared) = world.get_resource::<SharedUnitGenerator>() else {
        tracing::warn!("draw_roster called without UnitGenPlugin installed");
        return Vec::new();
    };
    let generator = shared.0.clone();
    let Some(mut rng) = world.get_resource_mut::<GeneratorRng>() else {
        tracing::warn!("draw_roster called without a GeneratorRng resource");
        return Vec::new();
    };
    generator.generate_many(count, request, &mut rng.rng)
}
