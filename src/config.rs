/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use std::fs;
use std::path::Path;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::ConfigError;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Config {
    pub building: BuildingConfig,
    pub elevator: ElevatorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct BuildingConfig {
    pub min_floor: i32,
    pub max_floor: i32,
    pub car_count: usize,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct ElevatorConfig {
    // Milliseconds the simulated car spends between two adjacent floors
    pub travel_time: u64,
    pub start_floor: i32,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
    pub json_events: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            json_events: false,
        }
    }
}

impl BuildingConfig {
    pub fn contains(&self, floor: i32) -> bool {
        (self.min_floor..=self.max_floor).contains(&floor)
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let building = &self.building;
        if building.min_floor > building.max_floor {
            return Err(ConfigError::Invalid(format!(
                "min_floor {} is above max_floor {}",
                building.min_floor, building.max_floor
            )));
        }
        if building.car_count == 0 {
            return Err(ConfigError::Invalid("car_count must be at least 1".into()));
        }
        if !building.contains(self.elevator.start_floor) {
            return Err(ConfigError::Invalid(format!(
                "start_floor {} is outside [{}, {}]",
                self.elevator.start_floor, building.min_floor, building.max_floor
            )));
        }
        Ok(())
    }
}

/***************************************/
/*             Public API              */
/***************************************/
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let config_str = fs::read_to_string(path)?;
    parse_config(&config_str)
}

pub fn parse_config(config_str: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(config_str)?;
    config.validate()?;
    Ok(config)
}

/***************************************/
/*             Unit tests              */
/***************************************/
