//! Interface de linha de comando do AgriServe Cache.

pub mod commands;
pub mod interactive;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::filter::Directive;

use crate::types::config::DEFAULT_CONFIG_FILE;
use crate::{CacheError, CacheResult};

/// Diretiva usada quando o nível configurado não é válido.
pub const DEFAULT_LOG_DIRECTIVE: &str = "agriserve_cache=info";

/// Monta a diretiva de log restrita a este crate.
///
/// Um nível inválido cai para `agriserve_cache=info`, sem afetar outros crates.
pub fn log_directive(level: &str) -> CacheResult<Directive> {
    format!("agriserve_cache={}", level)
        .parse::<Directive>()
        .or_else(|_| DEFAULT_LOG_DIRECTIVE.parse::<Directive>())
        .map_err(|e| CacheError::other(format!("diretiva de log inválida: {e}")))
}

/// AgriServe Cache - ferramentas para os caches do assistente de IA.
#[derive(Parser, Debug)]
#[command(name = "agriserve-cache")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Arquivo de configuração.
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Modo verbose.
    #[arg(short, long)]
    pub verbose: bool,

    /// Modo silencioso.
    #[arg(short, long)]
    pub quiet: bool,

    /// Comando a executar.
    #[command(subcommand)]
    pub command: Commands,
}

/// Comandos disponíveis.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inicializa configuração no diretório atual.
    Init {
        /// Diretório de destino (padrão: diretório atual).
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Configura os namespaces interativamente.
    Config,

    /// Valida a configuração.
    Doctor,

    /// Reproduz consultas contra os caches e mostra as estatísticas.
    Simulate {
        /// Arquivo com uma consulta por linha (padrão: amostra embutida).
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Tipo de intenção usado na chave.
        #[arg(long, default_value = "search")]
        intent: String,

        /// ID do usuário (padrão: guest).
        #[arg(short, long)]
        user: Option<String>,

        /// Imprime as estatísticas em JSON.
        #[arg(long)]
        json: bool,
    },

    /// Mostra versão.
    Version,
}
