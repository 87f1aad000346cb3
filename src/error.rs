use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Host capability missing: {0}")]
    CapabilityMissing(&'static str),

    #[error("Host error: {0}")]
    Host(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
