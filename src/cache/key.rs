//! Geração de chaves de cache.
//!
//! Consultas que diferem apenas em caixa ou espaçamento devem colidir na
//! mesma chave. Sessões anônimas compartilham a partição `guest`.

use sha2::{Digest, Sha256};

/// Partição usada quando não há usuário autenticado.
pub const GUEST_PARTITION: &str = "guest";

/// Tamanho (em caracteres hex) das chaves geradas por [`hash_query_key`].
pub const HASHED_KEY_LEN: usize = 32;

/// Normaliza uma consulta: minúsculas, sem espaços nas pontas e com qualquer
/// sequência de whitespace reduzida a um único espaço.
pub fn normalize_query(query: &str) -> String {
    query
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Gera a chave composta `intent:usuario:consulta_normalizada`.
///
/// `user_id` ausente vira `guest`, de modo que todas as sessões anônimas
/// compartilham uma partição por par intenção/consulta.
pub fn make_query_cache_key(intent_type: &str, user_id: Option<&str>, query: &str) -> String {
    format!(
        "{}:{}:{}",
        intent_type,
        user_id.unwrap_or(GUEST_PARTITION),
        normalize_query(query)
    )
}

/// Gera uma chave curta (hash SHA256 truncado) para consultas longas.
///
/// Só minúsculas e trim são aplicados antes do hash; espaços internos
/// continuam significativos.
pub fn hash_query_key(query: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(query.trim().to_lowercase().as_bytes());

    let mut key = hex::encode(hasher.finalize());
    key.truncate(HASHED_KEY_LEN);
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  Hello   World  "), "hello world");
        assert_eq!(normalize_query("tractor\t\nrental"), "tractor rental");
        assert_eq!(normalize_query(""), "");
        assert_eq!(normalize_query("   "), "");
    }

    #[test]
    fn test_key_normalization_collides() {
        let a = make_query_cache_key("search", Some("u1"), "Hello   World");
        let b = make_query_cache_key("search", Some("u1"), "hello world");
        assert_eq!(a, b);
        assert_eq!(a, "search:u1:hello world");
    }

    #[test]
    fn test_guest_partition() {
        let guest = make_query_cache_key("list", None, "q");
        let user = make_query_cache_key("list", Some("user-1"), "q");

        assert!(guest.contains("guest"));
        assert_eq!(guest, "list:guest:q");
        assert_ne!(guest, user);
    }

    #[test]
    fn test_intent_partitions_keys() {
        let a = make_query_cache_key("search", Some("u1"), "harvester");
        let b = make_query_cache_key("booking", Some("u1"), "harvester");
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_query_key() {
        let a = hash_query_key("Tractor price in Punjab");
        let b = hash_query_key("  tractor price in punjab ");
        let c = hash_query_key("harvester price in Punjab");

        assert_eq!(a.len(), HASHED_KEY_LEN);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
