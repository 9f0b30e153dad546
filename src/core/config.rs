use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotateConfig {
    /// String separating ranks in reference taxonomy strings
    pub separator: String,
    /// Filler for a genus rank with no confirmed name
    pub genus_placeholder: String,
    /// Filler for a species rank with no confirmed name
    pub species_placeholder: String,
}

impl Default for AnnotateConfig {
    fn default() -> Self {
        Self {
            separator: ";".to_string(),
            genus_placeholder: "g__".to_string(),
            species_placeholder: "s__".to_string(),
        }
    }
}

impl AnnotateConfig {
    pub fn validate(&self) -> Result<(), crate::TaxAnnotateError> {
        if self.separator.is_empty() {
            return Err(crate::TaxAnnotateError::Config(
                "Taxonomy separator cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AnnotateConfig, crate::TaxAnnotateError> {
    let contents = std::fs::read_to_string(path)?;
    let config: AnnotateConfig = toml::from_str(&contents)
        .map_err(|e| crate::TaxAnnotateError::Config(format!("Failed to parse config: {}", e)))?;
    config.validate()?;
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &AnnotateConfig) -> Result<(), crate::TaxAnnotateError> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| crate::TaxAnnotateError::Config(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, contents)?;
    Ok(())
}
