//! Cache LRU com TTL para consultas do assistente de IA.
//!
//! Este módulo implementa um cache Least Recently Used (LRU) com expiração
//! preguiçosa por TTL, usado para memoizar embeddings e resultados de
//! consultas repetidas, além dos utilitários de chave e do registro que
//! monta os namespaces usados pelo pipeline.

mod key;
mod lru;
mod registry;
mod shared;

pub use key::{hash_query_key, make_query_cache_key, normalize_query, GUEST_PARTITION};
pub use lru::{BoundedQueryCache, CacheEntry, CacheStats};
pub use registry::{CacheRegistry, NamespaceStats};
pub use shared::SharedQueryCache;
