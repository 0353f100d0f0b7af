use crate::error::CoreError;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// Well-known deployment addresses the client binds to at connect time.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    #[serde(default = "default_marketplace_address")]
    pub marketplace_address: String,
    #[serde(default = "default_token_address")]
    pub token_address: String,
}

fn default_marketplace_address() -> String {
    "0x1dD9772541d364b6A09EF89816255e64d9075930".to_string()
}

fn default_token_address() -> String {
    "0x874069Fa1Eb16D44d622F2e0Ca25eeA172369bC1".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            marketplace_address: default_marketplace_address(),
            token_address: default_token_address(),
        }
    }
}

impl Settings {
    pub fn from_file(path: &str) -> Result<Self, CoreError> {
        let builder = config::Config::builder().add_source(config::File::with_name(path));
        let cfg = builder.build()?;
        Ok(cfg.try_deserialize()?)
    }

    pub fn save_to_file(&self, path: &str) -> Result<(), CoreError> {
        let toml_string = toml::to_string(self)?;
        std::fs::write(path, toml_string)?;
        Ok(())
    }

    /// Parse both configured addresses, failing with `Config` if either is
    /// not valid hex. Returns (marketplace, token).
    pub fn contract_addresses(&self) -> Result<(Address, Address), CoreError> {
        let marketplace = self
            .marketplace_address
            .parse::<Address>()
            .map_err(|e| CoreError::Config(format!("bad marketplace address: {}", e)))?;
        let token = self
            .token_address
            .parse::<Address>()
            .map_err(|e| CoreError::Config(format!("bad token address: {}", e)))?;
        Ok((marketplace, token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_example_config() {
        // Validates that `Settings::from_file` can load the example config
        // and that its addresses parse.
        let s = Settings::from_file("config.example.toml").unwrap();
        assert!(s.contract_addresses().is_ok());
        assert_eq!(s.marketplace_address, default_marketplace_address());
    }

    #[test]
    fn test_defaults_parse() {
        let s = Settings::default();
        let (marketplace, token) = s.contract_addresses().unwrap();
        assert_ne!(marketplace, token);
    }

    #[test]
    fn test_bad_address_is_config_error() {
        let s = Settings {
            marketplace_address: "not-an-address".to_string(),
            ..Settings::default()
        };
        assert!(matches!(
            s.contract_addresses(),
            Err(CoreError::Config(_))
        ));
    }
}
