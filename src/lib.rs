//! # AgriServe Cache
//!
//! Cache em memória para o assistente de IA do marketplace AgriServe.
//!
//! Memoiza embeddings e resultados de consultas repetidas com limite de
//! capacidade (despejo LRU) e de idade (TTL com expiração preguiçosa).
//!
//! ## Módulos
//!
//! - [`cache`] - Cache LRU + TTL, chaves de consulta e registro de namespaces
//! - [`cli`] - Interface de linha de comando
//! - [`types`] - Configuração e erros
//!
//! ## Exemplo
//!
//! ```
//! use std::time::Duration;
//! use agriserve_cache::cache::{make_query_cache_key, BoundedQueryCache};
//!
//! let mut cache = BoundedQueryCache::try_new(3, Duration::from_secs(60)).unwrap();
//! let key = make_query_cache_key("search", None, "  Tractor   Rental ");
//! assert_eq!(key, "search:guest:tractor rental");
//!
//! cache.set(key.clone(), "cached results");
//! assert_eq!(cache.get(&key), Some(&"cached results"));
//! ```

pub mod cache;
#[cfg(feature = "cli")]
pub mod cli;
pub mod types;

pub use cache::{make_query_cache_key, BoundedQueryCache, CacheRegistry, SharedQueryCache};
pub use types::config::Config;
pub use types::errors::{CacheError, CacheResult};
