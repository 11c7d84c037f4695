//! Configuration for the catalog API

use core_config::{AppInfo, FromEnv, app_info, env_parse_or, server::ServerConfig};
use database::postgres::PostgresConfig;

pub use core_config::Environment;

const DEFAULT_DB_CONNECT_RETRIES: u32 = 5;

#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: PostgresConfig,
    /// Apply pending migrations before serving (`RUN_MIGRATIONS`, default true)
    pub run_migrations: bool,
    /// Retries after the first failed connection attempt (`DB_CONNECT_RETRIES`)
    pub db_connect_retries: u32,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Ok(Self {
            app: app_info!(),
            environment: Environment::from_env(),
            server: ServerConfig::from_env()?,
            database: PostgresConfig::from_env()?,
            run_migrations: env_parse_or("RUN_MIGRATIONS", true)?,
            db_connect_retries: env_parse_or("DB_CONNECT_RETRIES", DEFAULT_DB_CONNECT_RETRIES)?,
        })
    }
}
