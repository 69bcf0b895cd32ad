//! Configuração interativa dos caches.
//!
//! Este módulo implementa a configuração interativa usando dialoguer.

use std::path::Path;

use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

use crate::types::config::{Config, NamespaceConfig};
use crate::CacheResult;

/// Executa a configuração interativa.
pub fn run_interactive_config(config_path: &Path) -> CacheResult<()> {
    let theme = ColorfulTheme::default();

    println!("\n🔧 Configuração Interativa do AgriServe Cache\n");

    let mut config = if config_path.exists() {
        Config::load(config_path)?
    } else {
        println!("Criando nova configuração...\n");
        Config::default_config()
    };

    loop {
        let options = vec![
            "Configurações Gerais",
            "Cache de embeddings",
            "Cache de consultas",
            "Cache de perfis de usuário",
            "Salvar e Sair",
            "Sair sem Salvar",
        ];

        let selection = Select::with_theme(&theme)
            .with_prompt("O que deseja configurar?")
            .items(&options)
            .default(0)
            .interact()?;

        match selection {
            0 => configure_general(&theme, &mut config)?,
            1 => configure_namespace(&theme, "embeddings", &mut config.caches.embedding)?,
            2 => configure_namespace(&theme, "consultas", &mut config.caches.query)?,
            3 => configure_namespace(&theme, "perfis", &mut config.caches.user_profile)?,
            4 => {
                if save_if_valid(&config, config_path)? {
                    println!("\n✓ Configuração salva em: {}\n", config_path.display());
                    break;
                }
            }
            5 => {
                if Confirm::with_theme(&theme)
                    .with_prompt("Deseja realmente sair sem salvar?")
                    .default(false)
                    .interact()?
                {
                    println!("\nSaindo sem salvar.\n");
                    break;
                }
            }
            _ => {}
        }
    }

    Ok(())
}

/// Salva a configuração apenas se ela for válida.
///
/// Com problemas, lista cada um e retorna `false` sem tocar no arquivo, para
/// que a sessão continue com as edições feitas.
fn save_if_valid(config: &Config, config_path: &Path) -> CacheResult<bool> {
    let issues = config.issues();
    if !issues.is_empty() {
        println!("\nNão é possível salvar:");
        for issue in &issues {
            println!("  ✗ {}", issue);
        }
        println!();
        return Ok(false);
    }

    config.save(config_path)?;
    Ok(true)
}

/// Configura opções gerais.
fn configure_general(theme: &ColorfulTheme, config: &mut Config) -> CacheResult<()> {
    println!("\n📋 Configurações Gerais\n");

    let log_levels = vec!["error", "warn", "info", "debug", "trace"];
    let current_idx = log_levels
        .iter()
        .position(|&l| l == config.general.log_level)
        .unwrap_or(2);

    let log_level_idx = Select::with_theme(theme)
        .with_prompt("Nível de log")
        .items(&log_levels)
        .default(current_idx)
        .interact()?;

    config.general.log_level = log_levels[log_level_idx].to_string();

    let log_formats = vec!["text", "json"];
    let current_format_idx = log_formats
        .iter()
        .position(|&f| f == config.general.log_format)
        .unwrap_or(0);

    let log_format_idx = Select::with_theme(theme)
        .with_prompt("Formato de log")
        .items(&log_formats)
        .default(current_format_idx)
        .interact()?;

    config.general.log_format = log_formats[log_format_idx].to_string();

    println!("\n✓ Configurações gerais atualizadas.\n");
    Ok(())
}

/// Configura um namespace de cache.
fn configure_namespace(
    theme: &ColorfulTheme,
    name: &str,
    ns: &mut NamespaceConfig,
) -> CacheResult<()> {
    println!("\n💾 Cache de {}\n", name);

    ns.capacity = Input::with_theme(theme)
        .with_prompt("Capacidade máxima (número de entradas)")
        .default(ns.capacity)
        .validate_with(|v: &usize| -> Result<(), &'static str> {
            if *v == 0 {
                Err("a capacidade deve ser maior que zero")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    ns.ttl_ms = Input::with_theme(theme)
        .with_prompt("Tempo de vida (milissegundos)")
        .default(ns.ttl_ms)
        .interact_text()?;

    println!("\n✓ Cache de {} configurado.\n", name);
    Ok(())
}

/// Mostra resumo da configuração.
pub fn show_config_summary(config: &Config) {
    println!("\n📊 Resumo da Configuração\n");
    println!("┌─────────────────────────────────────────┐");
    println!("│ Geral                                   │");
    println!("├─────────────────────────────────────────┤");
    println!("│ Log level: {:<28} │", config.general.log_level);
    println!("│ Log format: {:<27} │", config.general.log_format);
    println!("├─────────────────────────────────────────┤");
    println!("│ Caches                                  │");
    println!("├─────────────────────────────────────────┤");
    for (name, ns) in config.caches.namespaces() {
        println!(
            "│ {:<13} {:>6} entradas {:>7}ms │",
            name, ns.capacity, ns.ttl_ms
        );
    }
    println!("└─────────────────────────────────────────┘");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_if_valid_keeps_session_on_invalid_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("agriserve-cache.toml");

        let mut config = Config::default();
        config.caches.query.capacity = 0;

        assert!(!save_if_valid(&config, &path).unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn test_save_if_valid_writes_valid_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("agriserve-cache.toml");

        let mut config = Config::default();
        config.caches.query.capacity = 7;

        assert!(save_if_valid(&config, &path).unwrap());
        assert_eq!(Config::load(&path).unwrap().caches.query.capacity, 7);
    }
}
