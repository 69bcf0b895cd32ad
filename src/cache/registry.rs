//! Registro dos namespaces de cache do assistente.
//!
//! Construído uma única vez na inicialização e passado explicitamente para
//! quem precisa dos caches; não há instâncias globais.

use serde::Serialize;
use serde_json::Value;

use crate::types::config::{CachesConfig, NamespaceConfig};
use crate::CacheResult;

use super::lru::{BoundedQueryCache, CacheStats};
use super::shared::SharedQueryCache;

/// Estatísticas de um namespace.
#[derive(Debug, Clone, Serialize)]
pub struct NamespaceStats {
    /// Nome do namespace.
    pub namespace: &'static str,

    /// Estatísticas do cache.
    #[serde(flatten)]
    pub stats: CacheStats,
}

/// Os três caches usados pelo pipeline de consultas.
#[derive(Clone)]
pub struct CacheRegistry {
    /// Embeddings de consultas.
    pub embedding: SharedQueryCache<Vec<f32>>,

    /// Resultados genéricos de consultas.
    pub query: SharedQueryCache<Value>,

    /// Perfis de usuário.
    pub user_profile: SharedQueryCache<Value>,
}

impl CacheRegistry {
    /// Cria os caches a partir da configuração.
    pub fn from_config(config: &CachesConfig) -> CacheResult<Self> {
        let registry = Self {
            embedding: build(&config.embedding)?,
            query: build(&config.query)?,
            user_profile: build(&config.user_profile)?,
        };

        for (name, ns) in config.namespaces() {
            tracing::info!(
                namespace = name,
                capacity = ns.capacity,
                ttl_ms = ns.ttl_ms,
                "cache namespace ready"
            );
        }

        Ok(registry)
    }

    /// Estatísticas de todos os namespaces.
    pub fn stats(&self) -> Vec<NamespaceStats> {
        vec![
            NamespaceStats {
                namespace: "embedding",
                stats: self.embedding.stats(),
            },
            NamespaceStats {
                namespace: "query",
                stats: self.query.stats(),
            },
            NamespaceStats {
                namespace: "user_profile",
                stats: self.user_profile.stats(),
            },
        ]
    }

    /// Limpa todos os namespaces.
    pub fn clear_all(&self) {
        self.embedding.clear();
        self.query.clear();
        self.user_profile.clear();
        tracing::debug!("all cache namespaces cleared");
    }

    /// Remove entradas expiradas de todos os namespaces.
    pub fn purge_expired(&self) -> usize {
        let removed = self.embedding.purge_expired()
            + self.query.purge_expired()
            + self.user_profile.purge_expired();

        tracing::debug!(removed, "expired entries purged from all namespaces");
        removed
    }
}

fn build<T>(ns: &NamespaceConfig) -> CacheResult<SharedQueryCache<T>> {
    let cache = BoundedQueryCache::try_new(ns.capacity, ns.ttl())?;
    Ok(SharedQueryCache::new(cache))
}
