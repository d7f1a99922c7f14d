use std::time::Duration;

use bevy_ecs::prelude::Resource;

/// Simulation clock, in seconds.
#[derive(Resource, Clone, Copy, Debug)]
pub struct WorldTime {
    pub elapsed: f32,
    pub delta: f32,
    pub time_scale: f32,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
        }
    }
}

impl WorldTime {
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }

    /// Last scaled delta as a [`Duration`]. Negative deltas count as zero.
    pub fn delta_duration(&self) -> Duration {
        Duration::try_from_secs_f32(self.delta).unwrap_or(Duration::ZERO)
    }
}
