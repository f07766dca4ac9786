//! Backend connection settings.
//!
//! Grounded on `in-mem-db-core::config::DbConfig`'s plain-struct-with-
//! `Default` shape; unlike the teacher's tick-rate tuning knobs, every
//! field here names a connection endpoint for one of the three (out-of-
//! scope) backend drivers, read from the environment the way
//! `apps/db-server` reads its own startup configuration.

use std::env;

/// Connection settings for the graph backend (stands in for a Bolt URI).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neo4jSettings {
    pub uri: String,
    pub user: String,
    pub password: String,
}

impl Default for Neo4jSettings {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: String::new(),
        }
    }
}

/// Connection settings for the document backend (stands in for a Mongo URI).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MongoSettings {
    pub uri: String,
    pub db_name: String,
    pub collection: String,
}

impl Default for MongoSettings {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            db_name: "entities".to_string(),
            collection: "entities".to_string(),
        }
    }
}

/// Connection settings for the relational backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgresSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub ssl_mode: String,
}

impl Default for PostgresSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            database: "entities".to_string(),
            ssl_mode: "prefer".to_string(),
        }
    }
}

/// Host/port the CRUD service listens on (transport itself is out of
/// scope; this only sizes the bind address the ambient stack logs).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 50051,
        }
    }
}

/// Aggregate backend configuration, assembled from environment variables
/// with teacher-style defaults for anything unset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BackendSettings {
    pub neo4j: Neo4jSettings,
    pub mongo: MongoSettings,
    pub postgres: PostgresSettings,
    pub service: ServiceSettings,
}

impl BackendSettings {
    /// Reads `NEO4J_*`, `MONGO_*`, `POSTGRES_*`, and `CRUD_SERVICE_*`
    /// variables, falling back to defaults for anything absent or
    /// unparsable.
    pub fn from_env() -> Self {
        let mut settings = Self::default();

        if let Ok(v) = env::var("NEO4J_URI") {
            settings.neo4j.uri = v;
        }
        if let Ok(v) = env::var("NEO4J_USER") {
            settings.neo4j.user = v;
        }
        if let Ok(v) = env::var("NEO4J_PASSWORD") {
            settings.neo4j.password = v;
        }

        if let Ok(v) = env::var("MONGO_URI") {
            settings.mongo.uri = v;
        }
        if let Ok(v) = env::var("MONGO_DB_NAME") {
            settings.mongo.db_name = v;
        }
        if let Ok(v) = env::var("MONGO_COLLECTION") {
            settings.mongo.collection = v;
        }

        if let Ok(v) = env::var("POSTGRES_HOST") {
            settings.postgres.host = v;
        }
        if let Ok(v) = env::var("POSTGRES_PORT") {
            if let Ok(port) = v.parse() {
                settings.postgres.port = port;
            }
        }
        if let Ok(v) = env::var("POSTGRES_USER") {
            settings.postgres.user = v;
        }
        if let Ok(v) = env::var("POSTGRES_PASSWORD") {
            settings.postgres.password = v;
        }
        if let Ok(v) = env::var("POSTGRES_DB") {
            settings.postgres.database = v;
        }
        if let Ok(v) = env::var("POSTGRES_SSL_MODE") {
            settings.postgres.ssl_mode = v;
        }

        if let Ok(v) = env::var("CRUD_SERVICE_HOST") {
            settings.service.host = v;
        }
        if let Ok(v) = env::var("CRUD_SERVICE_PORT") {
            if let Ok(port) = v.parse() {
                settings.service.port = port;
            }
        }

        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_populated_without_any_env_vars() {
        let settings = BackendSettings::default();
        assert_eq!(settings.neo4j.uri, "bolt://localhost:7687");
        assert_eq!(settings.postgres.port, 5432);
        assert_eq!(settings.service.port, 50051);
    }
}
