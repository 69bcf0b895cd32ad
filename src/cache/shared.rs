//! Handle compartilhável e thread-safe sobre [`BoundedQueryCache`].

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::lru::{BoundedQueryCache, CacheStats};

/// Cache protegido por um único mutex.
///
/// Cada operação segura o lock do início ao fim, então nenhuma chamada
/// observa outra pela metade. Clonar o handle compartilha o mesmo cache.
pub struct SharedQueryCache<T> {
    inner: Arc<Mutex<BoundedQueryCache<T>>>,
}

impl<T> Clone for SharedQueryCache<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> From<BoundedQueryCache<T>> for SharedQueryCache<T> {
    fn from(cache: BoundedQueryCache<T>) -> Self {
        Self::new(cache)
    }
}

impl<T> SharedQueryCache<T> {
    /// Envolve um cache existente.
    pub fn new(cache: BoundedQueryCache<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    // Nenhuma operação deixa o cache inconsistente entre chamadas, então um
    // lock envenenado pode ser reaproveitado.
    fn lock(&self) -> MutexGuard<'_, BoundedQueryCache<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insere no cache.
    pub fn set(&self, key: impl Into<String>, value: T) {
        self.lock().set(key, value);
    }

    /// Remove uma entrada. Retorna `true` se ela existia.
    pub fn delete(&self, key: &str) -> bool {
        self.lock().delete(key)
    }

    /// Limpa o cache e zera os contadores.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Número de entradas presentes.
    pub fn size(&self) -> usize {
        self.lock().size()
    }

    /// Verifica se existe uma entrada válida, sem efeitos colaterais.
    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains(key)
    }

    /// Capacidade máxima.
    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    /// Tempo de vida das entradas.
    pub fn ttl(&self) -> Duration {
        self.lock().ttl()
    }

    /// Retorna estatísticas do cache.
    pub fn stats(&self) -> CacheStats {
        self.lock().stats()
    }

    /// Remove todas as entradas expiradas.
    pub fn purge_expired(&self) -> usize {
        self.lock().purge_expired()
    }
}

impl<T: Clone> SharedQueryCache<T> {
    /// Busca no cache, retornando uma cópia do valor.
    pub fn get(&self, key: &str) -> Option<T> {
        self.lock().get(key).cloned()
    }

    /// Retorna o valor em cache ou o produz, armazena e retorna.
    ///
    /// O lock não é mantido enquanto `produce` roda, então duas chamadas
    /// concorrentes para a mesma chave podem produzir o valor duas vezes; a
    /// última escrita vence. Erros do produtor são propagados e nada é
    /// armazenado.
    pub async fn get_or_insert_with<F, Fut, E>(&self, key: &str, produce: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }

        let value = produce().await?;
        self.set(key, value.clone());
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    fn shared(capacity: usize) -> SharedQueryCache<String> {
        let cache: BoundedQueryCache<String> =
            BoundedQueryCache::try_new(capacity, Duration::from_secs(60)).unwrap();
        cache.into()
    }

    #[test]
    fn test_clones_share_state() {
        let cache = shared(4);
        let other = cache.clone();

        cache.set("a", "alpha".to_string());
        assert_eq!(other.get("a").as_deref(), Some("alpha"));
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn test_concurrent_writers_respect_capacity() {
        let cache = shared(16);

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for i in 0..200 {
                        cache.set(format!("t{t}-{i}"), format!("v{i}"));
                        assert!(cache.size() <= 16);
                        cache.get(&format!("t{t}-{}", i / 2));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let stats = cache.stats();
        assert_eq!(stats.size, 16);
        assert_eq!(stats.hits + stats.misses, 8 * 200);
    }

    #[tokio::test]
    async fn test_get_or_insert_with_memoizes() {
        let cache = shared(4);
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value = cache
                .get_or_insert_with("tractor", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>("embedding".to_string())
                })
                .await
                .unwrap();
            assert_eq!(value, "embedding");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.stats().hits, 2);
    }

    #[tokio::test]
    async fn test_get_or_insert_with_does_not_cache_errors() {
        let cache = shared(4);

        let result = cache
            .get_or_insert_with("broken", || async { Err::<String, _>("provider down") })
            .await;

        assert_eq!(result, Err("provider down"));
        assert!(!cache.contains("broken"));
        assert_eq!(cache.size(), 0);
    }
}
