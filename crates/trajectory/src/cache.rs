//! Memoization of computed runs keyed by exact inputs.

use std::collections::HashMap;

use projectile_core::{ModelKind, SimulationParameters};

use crate::engine::{EngineOptions, TrajectoryEngine, TrajectoryRun};
use crate::error::TrajectoryError;

/// Exact bit patterns of everything that influences a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    model: ModelKind,
    parameters: [u64; 7],
    options: [u64; 6],
}

impl CacheKey {
    fn new(model: ModelKind, p: &SimulationParameters, o: &EngineOptions) -> Self {
        Self {
            model,
            parameters: [
                p.v0_m_s.to_bits(),
                p.angle_deg.to_bits(),
                p.drag_coefficient.to_bits(),
                p.mass_kg.to_bits(),
                p.gravity_m_s2.to_bits(),
                p.dt_s.to_bits(),
                p.speed_factor.to_bits(),
            ],
            options: [
                o.t_max.to_bits(),
                o.samples as u64,
                o.max_steps as u64,
                o.rtol.to_bits(),
                o.atol.to_bits(),
                o.launch_height.to_bits(),
            ],
        }
    }
}

/// Engine wrapper that returns stored runs for repeated inputs.
///
/// Failed computations are not stored.
#[derive(Debug, Clone, Default)]
pub struct TrajectoryCache {
    engine: TrajectoryEngine,
    entries: HashMap<CacheKey, TrajectoryRun>,
    hits: u64,
    misses: u64,
}

impl TrajectoryCache {
    pub fn new(engine: TrajectoryEngine) -> Self {
        Self {
            engine,
            ..Self::default()
        }
    }

    pub fn engine(&self) -> &TrajectoryEngine {
        &self.engine
    }

    pub fn get_or_compute(
        &mut self,
        params: &SimulationParameters,
        model: ModelKind,
    ) -> Result<TrajectoryRun, TrajectoryError> {
        let key = CacheKey::new(model, params, self.engine.options());
        if let Some(run) = self.entries.get(&key) {
            self.hits += 1;
            return Ok(run.clone());
        }
        let run = self.engine.compute(params, model)?;
        self.misses += 1;
        self.entries.insert(key, run.clone());
        Ok(run)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }
}
