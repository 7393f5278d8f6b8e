use std::env;

/// Store configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Name of the shared table (default: "fairway")
    pub table_name: String,
    /// Custom endpoint URL, for local DynamoDB (default: none)
    pub endpoint_url: Option<String>,
    /// AWS region (default: "us-east-1")
    pub region: String,
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `FAIRWAY_TABLE_NAME` - Table name (default: "fairway")
    /// - `AWS_ENDPOINT_URL` - Endpoint override (default: unset)
    /// - `AWS_REGION` - AWS region (default: "us-east-1")
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            table_name: var("FAIRWAY_TABLE_NAME").unwrap_or_else(|| "fairway".to_string()),
            endpoint_url: var("AWS_ENDPOINT_URL").filter(|url| !url.is_empty()),
            region: var("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
        }
    }

    /// Sets the table name.
    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = table_name.into();
        self
    }

    /// Sets the endpoint URL.
    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    /// Returns a display string for the target environment.
    pub fn target_display(&self) -> String {
        match &self.endpoint_url {
            Some(url) => format!("Local DynamoDB ({}), table {}", url, self.table_name),
            None => format!(
                "AWS DynamoDB (region: {}), table {}",
                self.region, self.table_name
            ),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> StoreConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        StoreConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_values() {
        let config = config_from(&[]);

        assert_eq!(config.table_name, "fairway");
        assert_eq!(config.endpoint_url, None);
        assert_eq!(config.region, "us-east-1");
    }

    #[test]
    fn test_values_from_vars() {
        let config = config_from(&[
            ("FAIRWAY_TABLE_NAME", "fairway-test"),
            ("AWS_ENDPOINT_URL", "http://localhost:8000"),
            ("AWS_REGION", "eu-west-1"),
        ]);

        assert_eq!(config.table_name, "fairway-test");
        assert_eq!(
            config.endpoint_url.as_deref(),
            Some("http://localhost:8000")
        );
        assert_eq!(config.region, "eu-west-1");
    }

    #[test]
    fn test_empty_endpoint_is_unset() {
        let config = config_from(&[("AWS_ENDPOINT_URL", "")]);
        assert_eq!(config.endpoint_url, None);
    }

    #[test]
    fn test_builders() {
        let config = config_from(&[])
            .with_table_name("orders")
            .with_endpoint_url("http://localhost:4566");

        assert_eq!(config.table_name, "orders");
        assert_eq!(
            config.target_display(),
            "Local DynamoDB (http://localhost:4566), table orders"
        );
    }

    #[test]
    fn test_target_display_remote() {
        let config = config_from(&[]);
        assert_eq!(
            config.target_display(),
            "AWS DynamoDB (region: us-east-1), table fairway"
        );
    }
}
