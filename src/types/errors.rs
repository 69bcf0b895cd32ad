//! Tipos de erro do cache.
//!
//! As operações do cache em si são totais e nunca falham; erros só aparecem
//! nas bordas (construção com parâmetros inválidos, configuração, CLI).

use thiserror::Error;

/// Tipo de resultado padrão do crate.
pub type CacheResult<T> = Result<T, CacheError>;

/// Erros possíveis fora das operações do cache.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Configuração inválida: {0}")]
    InvalidConfiguration(String),

    #[error("Erro de IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("Erro ao parsear TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Erro ao serializar TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Erro de JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "cli")]
    #[error("Erro no prompt interativo: {0}")]
    Interactive(#[from] dialoguer::Error),

    #[error("{0}")]
    Other(String),
}

impl CacheError {
    /// Cria um erro genérico.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Self::Other(msg.into())
    }

    /// Cria um erro de configuração inválida.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_message() {
        let err = CacheError::invalid_config("capacity must be > 0");
        assert_eq!(err.to_string(), "Configuração inválida: capacity must be > 0");
    }

    #[test]
    fn test_io_conversion() {
        fn read_missing() -> CacheResult<String> {
            Ok(std::fs::read_to_string("/definitely/not/here.toml")?)
        }

        assert!(matches!(read_missing(), Err(CacheError::Io(_))));
    }
}
