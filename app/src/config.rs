use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://api.hacienda.go.cr";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Settings of the registry client. There is no config file: the defaults
/// are the production values. The timeout is fixed; only the endpoint can be
/// overridden from the command line.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Scheme and host of the registry, without a trailing slash.
    pub endpoint: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("ConsultaHacienda/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    #[cfg(test)]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `{endpoint}/fe/ae?identificacion={id}`
    pub fn lookup_url(&self, identificacion: &str) -> String {
        format!("{}/fe/ae?identificacion={}", self.endpoint, identificacion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_url_template() {
        let config = ClientConfig::default();
        assert_eq!(
            config.lookup_url("3101123456"),
            "https://api.hacienda.go.cr/fe/ae?identificacion=3101123456"
        );
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert!(config.user_agent.starts_with("ConsultaHacienda/"));
    }

    #[test]
    fn endpoint_override_drops_trailing_slash() {
        let config = ClientConfig::default().with_endpoint("http://127.0.0.1:8080/");
        assert_eq!(config.lookup_url("123456789"), "http://127.0.0.1:8080/fe/ae?identificacion=123456789");
    }
}
