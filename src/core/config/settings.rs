use super::parsing::{
    default_cors_origins, env_optional, env_or_default, parse_bool, parse_cors_origins,
    parse_environment, parse_u16, parse_u64,
};
use super::secret::load_or_create_secret_key;
use super::types::{
    ApiSettings, ConfigError, CorsSettings, DatabaseSettings, Environment, RuntimeSettings,
    SecuritySettings, ServerHost, ServerPort, ServerSettings, Settings, TelemetrySettings,
};

impl Settings {
    pub(crate) fn load() -> Result<Self, ConfigError> {
        let host = ServerHost::parse(&env_or_default("UNIQUIZ_HOST", "0.0.0.0"))?;
        let port = ServerPort::parse(&env_or_default("UNIQUIZ_PORT", "8000"))?;

        let environment = parse_environment(&env_or_default("UNIQUIZ_ENV", "development"));
        let strict_config = env_optional("UNIQUIZ_STRICT_CONFIG")
            .map(|value| parse_bool(&value))
            .unwrap_or_else(|| environment.is_production());

        let secret_key = match env_optional("SECRET_KEY") {
            Some(value) => value,
            None if strict_config => return Err(ConfigError::MissingSecret("SECRET_KEY")),
            None => load_or_create_secret_key(),
        };

        let access_token_expire_minutes = parse_u64(
            "ACCESS_TOKEN_EXPIRE_MINUTES",
            &env_or_default("ACCESS_TOKEN_EXPIRE_MINUTES", "10080"),
        )?;

        let origins = match env_optional("BACKEND_CORS_ORIGINS") {
            Some(raw) => parse_cors_origins(&raw)?,
            None => default_cors_origins(),
        };

        let settings = Settings {
            server: ServerSettings { host, port },
            runtime: RuntimeSettings { environment, strict_config },
            api: ApiSettings {
                project_name: env_or_default("PROJECT_NAME", "Uniquiz API"),
                version: env_or_default("VERSION", env!("CARGO_PKG_VERSION")),
                api_v1_str: env_or_default("API_V1_STR", "/api/v1"),
            },
            security: SecuritySettings {
                secret_key,
                access_token_expire_minutes,
                algorithm: env_or_default("ALGORITHM", "HS256"),
            },
            cors: CorsSettings { origins },
            database: DatabaseSettings {
                postgres_server: env_or_default("POSTGRES_SERVER", "localhost"),
                postgres_port: parse_u16(
                    "POSTGRES_PORT",
                    &env_or_default("POSTGRES_PORT", "5432"),
                )?,
                postgres_user: env_or_default("POSTGRES_USER", "uniquiz"),
                postgres_password: env_or_default("POSTGRES_PASSWORD", ""),
                postgres_db: env_or_default("POSTGRES_DB", "uniquiz_db"),
                database_url_override: env_optional("DATABASE_URL"),
            },
            telemetry: TelemetrySettings {
                log_level: env_or_default("UNIQUIZ_LOG_LEVEL", "info"),
                log_json: env_optional("UNIQUIZ_LOG_JSON")
                    .map(|value| parse_bool(&value))
                    .unwrap_or(false),
                prometheus_enabled: env_optional("PROMETHEUS_ENABLED")
                    .map(|value| parse_bool(&value))
                    .unwrap_or(false),
            },
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Rejects placeholder credentials when running strictly (production by
    /// default). Development keeps the permissive defaults.
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.runtime.strict_config {
            return Ok(());
        }
        if self.database.database_url_override.is_none()
            && self.database.postgres_password.is_empty()
        {
            return Err(ConfigError::MissingSecret("POSTGRES_PASSWORD"));
        }
        Ok(())
    }

    pub(crate) fn server(&self) -> &ServerSettings {
        &self.server
    }

    pub(crate) fn runtime(&self) -> &RuntimeSettings {
        &self.runtime
    }

    pub(crate) fn api(&self) -> &ApiSettings {
        &self.api
    }

    pub(crate) fn security(&self) -> &SecuritySettings {
        &self.security
    }

    pub(crate) fn cors(&self) -> &CorsSettings {
        &self.cors
    }

    pub(crate) fn database(&self) -> &DatabaseSettings {
        &self.database
    }

    pub(crate) fn telemetry(&self) -> &TelemetrySettings {
        &self.telemetry
    }

    pub(crate) fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host.as_str(), self.server.port.get())
    }

    pub(crate) fn environment(&self) -> Environment {
        self.runtime.environment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    #[test]
    fn loads_defaults_without_env() {
        let _guard = test_support::env_lock_blocking();
        std::env::remove_var("UNIQUIZ_STRICT_CONFIG");
        std::env::remove_var("UNIQUIZ_ENV");
        std::env::set_var("SECRET_KEY", "test-secret");

        let settings = Settings::load().unwrap();
        assert_eq!(settings.server().port.get(), 8000);
        assert_eq!(settings.api().api_v1_str, "/api/v1");
        assert_eq!(settings.environment(), Environment::Development);
        assert!(!settings.runtime().strict_config);
    }

    fn strict_settings(password: &str) -> Settings {
        Settings {
            server: ServerSettings {
                host: ServerHost("127.0.0.1".to_string()),
                port: ServerPort(8000),
            },
            runtime: RuntimeSettings {
                environment: Environment::Production,
                strict_config: true,
            },
            api: ApiSettings {
                project_name: "Uniquiz API".to_string(),
                version: "0.0.0".to_string(),
                api_v1_str: "/api/v1".to_string(),
            },
            security: SecuritySettings {
                secret_key: "test-secret".to_string(),
                access_token_expire_minutes: 60,
                algorithm: "HS256".to_string(),
            },
            cors: CorsSettings { origins: Vec::new() },
            database: DatabaseSettings {
                postgres_server: "localhost".to_string(),
                postgres_port: 5432,
                postgres_user: "uniquiz".to_string(),
                postgres_password: password.to_string(),
                postgres_db: "uniquiz_db".to_string(),
                database_url_override: None,
            },
            telemetry: TelemetrySettings {
                log_level: "info".to_string(),
                log_json: false,
                prometheus_enabled: false,
            },
        }
    }

    #[test]
    fn strict_mode_requires_database_password() {
        let err = strict_settings("").validate().unwrap_err();
        assert!(matches!(err, ConfigError::MissingSecret("POSTGRES_PASSWORD")));
        assert!(strict_settings("pw").validate().is_ok());
    }

    #[test]
    fn composes_database_url_from_parts() {
        let database = DatabaseSettings {
            postgres_server: "db.internal".to_string(),
            postgres_port: 5433,
            postgres_user: "quiz".to_string(),
            postgres_password: "pw".to_string(),
            postgres_db: "quizdb".to_string(),
            database_url_override: None,
        };
        assert_eq!(database.database_url(), "postgresql://quiz:pw@db.internal:5433/quizdb");
    }
}
