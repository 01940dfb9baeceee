//! Cache key generation
//!
//! Keys are plain strings shaped as `{version}:{entity}:{kind}:{detail}`.
//! The version segment is a generation marker: changing it makes every
//! key produced earlier unreachable, which invalidates the whole cache
//! without deleting anything.

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt::Display;

/// Number of hex characters kept from the SHA-256 digest of a hash key
const HASH_KEY_LENGTH: usize = 16;

/// Builds deterministic cache keys for a single key generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyGenerator {
    version: String,
}

impl KeyGenerator {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Key for a single record: `{version}:{entity}:item:{id}`
    pub fn item_key(&self, entity: &str, id: impl Display) -> String {
        format!("{}:{}:item:{}", self.version, entity, id)
    }

    /// Key for one page of a collection.
    ///
    /// `sort_field` and `sort_direction` are optional; absent values are left
    /// out of the key rather than rendered as empty fragments.
    pub fn list_key(
        &self,
        entity: &str,
        page: u32,
        limit: u32,
        sort_field: Option<&str>,
        sort_direction: Option<&str>,
    ) -> String {
        let page = page.to_string();
        let limit = limit.to_string();
        let params = [
            ("page", Some(page.as_str())),
            ("limit", Some(limit.as_str())),
            ("sort", sort_field),
            ("order", sort_direction),
        ];

        self.list_key_from_params(
            entity,
            params
                .into_iter()
                .filter_map(|(name, value)| value.map(|value| (name, value))),
        )
    }

    /// Key for a collection query described by arbitrary parameters.
    ///
    /// Parameters are sorted by name, so insertion order never changes the key.
    pub fn list_key_from_params<I, K, V>(&self, entity: &str, params: I) -> String
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        format!(
            "{}:{}:list:{}",
            self.version,
            entity,
            canonical_params(params)
        )
    }

    /// Fixed-length key for parameter sets too large to embed literally.
    ///
    /// Lives under the list namespace so collection invalidation covers it.
    pub fn hash_key<I, K, V>(&self, entity: &str, params: I) -> String
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let digest = Sha256::digest(canonical_params(params).as_bytes());
        let mut hash = hex::encode(digest);
        hash.truncate(HASH_KEY_LENGTH);
        format!("{}:{}:list:h:{}", self.version, entity, hash)
    }

    /// Pattern matching every list and hash key of an entity
    pub fn list_pattern(&self, entity: &str) -> String {
        format!("{}:{}:list:*", self.version, entity)
    }

    /// Pattern matching every key of an entity in this generation
    pub fn entity_pattern(&self, entity: &str) -> String {
        format!("{}:{}:*", self.version, entity)
    }
}

impl Default for KeyGenerator {
    fn default() -> Self {
        Self::new("v1")
    }
}

/// Percent-encodes the characters that delimit a canonical parameter string.
///
/// `%` is encoded first so an encoded separator can never be confused with a
/// literal one.
fn escape_component(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '%' => escaped.push_str("%25"),
            '&' => escaped.push_str("%26"),
            '=' => escaped.push_str("%3D"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Sorted `name=value` pairs joined by `&`, skipping blank names and values.
/// Names and values are escaped, so distinct parameter sets never render alike.
/// An empty parameter set renders as `all`.
fn canonical_params<I, K, V>(params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let sorted: BTreeMap<String, String> = params
        .into_iter()
        .filter_map(|(name, value)| {
            let name = name.as_ref().trim();
            let value = value.as_ref().trim();
            if name.is_empty() || value.is_empty() {
                None
            } else {
                Some((escape_component(name), escape_component(value)))
            }
        })
        .collect();

    if sorted.is_empty() {
        return "all".to_string();
    }

    sorted
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("&")
}
