//! Cache LRU com TTL para resultados de consultas do assistente.

use std::num::NonZeroUsize;
use std::time::Duration;

use chrono::{DateTime, Utc};
use lru::LruCache;
use serde::Serialize;

use crate::{CacheError, CacheResult};

/// Entrada armazenada no cache.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// Valor armazenado.
    pub value: T,

    /// Momento em que foi inserida (ou reinserida).
    pub inserted_at: DateTime<Utc>,

    /// Número de leituras bem-sucedidas. Apenas informativo.
    pub hit_count: u64,
}

impl<T> CacheEntry<T> {
    /// Cria uma nova entrada com timestamp atual.
    pub fn new(value: T) -> Self {
        Self {
            value,
            inserted_at: Utc::now(),
            hit_count: 0,
        }
    }

    /// Idade da entrada. Relógio voltando no tempo conta como idade zero.
    pub fn age(&self) -> Duration {
        Utc::now()
            .signed_duration_since(self.inserted_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    /// Verifica se a entrada expirou.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.age() > ttl
    }
}

/// Estatísticas do cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Número atual de entradas (inclui entradas expiradas ainda não removidas).
    pub size: usize,

    /// Capacidade máxima.
    pub capacity: usize,

    /// Número de acertos (cache hits).
    pub hits: u64,

    /// Número de erros (cache misses).
    pub misses: u64,

    /// Taxa de acerto formatada, ex.: `"66.67%"`.
    pub hit_rate: String,
}

impl CacheStats {
    /// Monta as estatísticas a partir dos contadores.
    pub fn new(size: usize, capacity: usize, hits: u64, misses: u64) -> Self {
        Self {
            size,
            capacity,
            hits,
            misses,
            hit_rate: format_hit_rate(hits, misses),
        }
    }

    /// Taxa de acerto entre 0.0 e 1.0.
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

fn format_hit_rate(hits: u64, misses: u64) -> String {
    let total = hits + misses;
    if total == 0 {
        return "0.00%".to_string();
    }
    format!("{:.2}%", hits as f64 * 100.0 / total as f64)
}

/// Cache limitado por capacidade, com expiração por TTL e despejo LRU.
///
/// A expiração é preguiçosa: só [`get`](Self::get) remove entradas vencidas
/// (ou uma chamada explícita a [`purge_expired`](Self::purge_expired)).
/// Por isso [`size`](Self::size) pode contar entradas já vencidas.
pub struct BoundedQueryCache<T> {
    entries: LruCache<String, CacheEntry<T>>,
    ttl: Duration,
    hits: u64,
    misses: u64,
}

impl<T> BoundedQueryCache<T> {
    /// Cria um novo cache.
    ///
    /// # Argumentos
    /// - `capacity`: Número máximo de entradas
    /// - `ttl`: Tempo de vida das entradas
    pub fn new(capacity: NonZeroUsize, ttl: Duration) -> Self {
        Self {
            entries: LruCache::new(capacity),
            ttl,
            hits: 0,
            misses: 0,
        }
    }

    /// Cria um cache validando a capacidade.
    pub fn try_new(capacity: usize, ttl: Duration) -> CacheResult<Self> {
        let capacity = NonZeroUsize::new(capacity).ok_or_else(|| {
            CacheError::invalid_config("cache capacity must be greater than zero")
        })?;
        Ok(Self::new(capacity, ttl))
    }

    /// Cria um cache a partir de capacidade e TTL em milissegundos.
    pub fn from_ttl_ms(capacity: usize, ttl_ms: i64) -> CacheResult<Self> {
        let ttl_ms = u64::try_from(ttl_ms).map_err(|_| {
            CacheError::invalid_config(format!("cache ttl must not be negative (got {ttl_ms}ms)"))
        })?;
        Self::try_new(capacity, Duration::from_millis(ttl_ms))
    }

    /// Busca no cache.
    ///
    /// Retorna `None` se não encontrado ou se expirado. Um acerto promove a
    /// entrada para a posição mais recente.
    pub fn get(&mut self, key: &str) -> Option<&T> {
        // peek não altera a ordem LRU
        let is_expired = self.entries.peek(key).map(|e| e.is_expired(self.ttl));

        match is_expired {
            Some(true) => {
                self.entries.pop(key);
                self.misses += 1;
                tracing::trace!(key, "cache entry expired");
                None
            }
            Some(false) => {
                self.hits += 1;
                let entry = self.entries.get_mut(key)?;
                entry.hit_count += 1;
                Some(&entry.value)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Insere no cache.
    ///
    /// Uma chave já existente é substituída por uma entrada nova
    /// (timestamp renovado, `hit_count` zerado) na posição mais recente.
    /// Com o cache cheio, a entrada menos usada recentemente é despejada.
    pub fn set(&mut self, key: impl Into<String>, value: T) {
        let key = key.into();

        if self.entries.pop(&key).is_some() {
            tracing::trace!(key = %key, "cache entry replaced");
        }

        if let Some((evicted, _)) = self.entries.push(key, CacheEntry::new(value)) {
            tracing::trace!(key = %evicted, "cache entry evicted");
        }
    }

    /// Remove uma entrada. Retorna `true` se ela existia.
    pub fn delete(&mut self, key: &str) -> bool {
        self.entries.pop(key).is_some()
    }

    /// Limpa todo o cache e zera os contadores.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    /// Número de entradas presentes, vencidas ou não.
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Retorna `true` se não houver entradas.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Capacidade máxima.
    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    /// Tempo de vida das entradas.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Retorna estatísticas do cache.
    pub fn stats(&self) -> CacheStats {
        CacheStats::new(self.size(), self.capacity(), self.hits, self.misses)
    }

    /// Inspeciona uma entrada sem promovê-la, sem contar acerto/erro e sem
    /// aplicar TTL.
    pub fn peek(&self, key: &str) -> Option<&CacheEntry<T>> {
        self.entries.peek(key)
    }

    /// Verifica se existe uma entrada válida, sem efeitos colaterais.
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .peek(key)
            .is_some_and(|e| !e.is_expired(self.ttl))
    }

    /// Chaves em ordem de despejo (a primeira é a próxima a sair).
    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().rev().map(|(k, _)| k.clone()).collect()
    }

    /// Remove todas as entradas expiradas. Retorna quantas foram removidas.
    pub fn purge_expired(&mut self) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, e)| e.is_expired(self.ttl))
            .map(|(k, _)| k.clone())
            .collect();

        for key in &expired_keys {
            self.entries.pop(key);
        }

        if !expired_keys.is_empty() {
            tracing::debug!(removed = expired_keys.len(), "expired cache entries purged");
        }
        expired_keys.len()
    }
}
