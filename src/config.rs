use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Runtime settings, read from `serpentris.json` next to the executable.
/// Missing or unreadable files fall back to the defaults.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct Config {
    /// Board width in tiles; must be even for cycle construction.
    pub grid_width: i32,
    /// Board height in tiles; must be even for cycle construction.
    pub grid_height: i32,
    /// Wall-clock milliseconds per tick.
    pub tick_ms: u64,
    /// The snake moves only every `speed`-th tick.
    pub speed: u64,
    pub lives: u32,
    pub autopilot: bool,
    /// Draw the Hamiltonian cycle on top of the board.
    pub cycle_overlay: bool,
    /// Fixed RNG seed; None seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            tick_ms: 10,
            speed: 5,
            lives: 1,
            autopilot: true,
            cycle_overlay: false,
            seed: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Self {
        let mut config = match fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str::<Config>(&text) {
                Ok(config) => {
                    info!(?path, "loaded config");
                    config
                }
                Err(err) => {
                    warn!(%err, ?path, "invalid config, using defaults");
                    Config::default()
                }
            },
            Err(_) => Config::default(),
        };
        config.sanitize();
        config
    }

    /// Clamps settings the simulation cannot work with.
    fn sanitize(&mut self) {
        if self.grid_width < 4 || self.grid_width % 2 != 0 {
            warn!(width = self.grid_width, "grid width must be even and >= 4");
            self.grid_width = (self.grid_width.max(4) + 1) & !1;
        }
        if self.grid_height < 4 || self.grid_height % 2 != 0 {
            warn!(height = self.grid_height, "grid height must be even and >= 4");
            self.grid_height = (self.grid_height.max(4) + 1) & !1;
        }
        self.tick_ms = self.tick_ms.max(1);
        self.speed = self.speed.max(1);
        self.lives = self.lives.max(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let mut config = Config::default();
        let before = format!("{:?}", config);
        config.sanitize();
        assert_eq!(before, format!("{:?}", config));
    }

    #[test]
    fn odd_dimensions_are_rounded_up() {
        let mut config = Config {
            grid_width: 9,
            grid_height: 3,
            ..Config::default()
        };
        config.sanitize();
        assert_eq!(config.grid_width, 10);
        assert_eq!(config.grid_height, 4);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let config = Config::load(Path::new("definitely-not-here.json"));
        assert_eq!(config.grid_width, Config::default().grid_width);
    }

    #[test]
    fn round_trips_through_json() {
        let config = Config::default();
        let text = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&text).unwrap();
        assert_eq!(config.speed, back.speed);
        assert_eq!(config.seed, back.seed);
    }
}
