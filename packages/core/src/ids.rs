//! Note Identifier Allocation
//!
//! Identifiers double as store keys and URL path segments, so they are kept
//! short and typeable: 1–64 characters from `[a-z0-9-]`.
//!
//! - [`normalize_id`] / [`is_valid_id`] turn a user-chosen id into its
//!   canonical form and check it
//! - [`generate_random_id`] draws an id from the OS CSPRNG
//! - [`allocate_unique_id`] checks the store until it finds an unclaimed one
//!
//! # Concurrency
//!
//! Allocation is check-then-act: the store is queried with `get` and the
//! caller writes later. Two requests that draw the same id in the same window
//! both see it as free, and the later write replaces the earlier note. At
//! 36^8 possible ids this is accepted rather than locked against.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::db::{KvStore, StoreError};

/// Longest accepted identifier, in characters
pub const MAX_ID_LEN: usize = 64;

/// Symbols used for generated identifiers
pub const ALPHABET: &[u8; 36] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Length of generated identifiers on the first round of attempts
pub const SHORT_ID_LEN: usize = 8;

/// Length used once every short attempt has collided
pub const LONG_ID_LEN: usize = 12;

/// Store lookups per length before giving up on it
pub const ATTEMPTS_PER_LENGTH: usize = 5;

/// Canonicalize a user-supplied identifier
///
/// Trims surrounding whitespace, lowercases, replaces every character outside
/// `[a-z0-9-]` with `-`, collapses runs of `-` and strips leading/trailing
/// `-`. Total and idempotent; the result may be empty.
///
/// ```rust
/// use zanile_core::ids::normalize_id;
///
/// assert_eq!(normalize_id("  My Note!! "), "my-note");
/// assert_eq!(normalize_id("--a__b--"), "a-b");
/// ```
pub fn normalize_id(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.trim().to_lowercase().chars() {
        let c = if c.is_ascii_lowercase() || c.is_ascii_digit() {
            c
        } else {
            '-'
        };
        if c == '-' && out.ends_with('-') {
            continue;
        }
        out.push(c);
    }
    out.trim_matches('-').to_string()
}

/// Whether `id` is 1–64 characters drawn from `[a-z0-9-]`
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

/// Draw a random identifier of `length` characters from [`ALPHABET`]
///
/// Each character is one random byte reduced modulo 36.
pub fn generate_random_id(length: usize) -> String {
    generate_random_id_with(&mut OsRng, length)
}

/// [`generate_random_id`] with an explicit random source
pub fn generate_random_id_with<R: RngCore + ?Sized>(rng: &mut R, length: usize) -> String {
    let mut bytes = vec![0u8; length];
    rng.fill_bytes(&mut bytes);
    bytes
        .iter()
        .map(|b| ALPHABET[*b as usize % ALPHABET.len()] as char)
        .collect()
}

/// Outcome of a failed allocation
#[derive(Debug, thiserror::Error)]
pub enum AllocationError {
    /// Every generated candidate was already present in the store
    #[error("Could not generate unique id after {attempts} attempts")]
    Exhausted { attempts: usize },

    /// The existence check itself failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Find an identifier the store does not currently hold
///
/// Tries [`ATTEMPTS_PER_LENGTH`] ids of [`SHORT_ID_LEN`] characters, then as
/// many of [`LONG_ID_LEN`], returning the first one whose lookup came back
/// absent.
pub async fn allocate_unique_id(store: &dyn KvStore) -> Result<String, AllocationError> {
    allocate_unique_id_with(store, &mut OsRng).await
}

/// [`allocate_unique_id`] with an explicit random source
pub async fn allocate_unique_id_with<R>(
    store: &dyn KvStore,
    rng: &mut R,
) -> Result<String, AllocationError>
where
    R: RngCore + Send + ?Sized,
{
    for length in [SHORT_ID_LEN, LONG_ID_LEN] {
        for attempt in 1..=ATTEMPTS_PER_LENGTH {
            let candidate = generate_random_id_with(rng, length);
            if !store.exists(&candidate).await? {
                return Ok(candidate);
            }
            tracing::debug!(
                "🎲 Generated id '{}' already taken (length {}, attempt {})",
                candidate,
                length,
                attempt
            );
        }
    }

    let attempts = ATTEMPTS_PER_LENGTH * 2;
    tracing::warn!("⚠️  Id allocation exhausted after {} attempts", attempts);
    Err(AllocationError::Exhausted { attempts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use rand::rngs::mock::StepRng;

    #[test]
    fn test_normalize_examples() {
        assert_eq!(normalize_id("My Note!!"), "my-note");
        assert_eq!(normalize_id("  hello  "), "hello");
        assert_eq!(normalize_id("ABC-123"), "abc-123");
        assert_eq!(normalize_id("a  b\tc"), "a-b-c");
        assert_eq!(normalize_id("---x---"), "x");
        assert_eq!(normalize_id("café au lait"), "caf-au-lait");
        assert_eq!(normalize_id("!!!"), "");
        assert_eq!(normalize_id(""), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "My Note!!",
            "  --Weird__Input--  ",
            "日本語 text",
            "a-b-c",
            "UPPER lower 123",
            "-",
            "🦀 rust 🦀",
            "trailing-",
        ];
        for raw in samples {
            let once = normalize_id(raw);
            assert_eq!(normalize_id(&once), once, "input: {:?}", raw);
        }
    }

    #[test]
    fn test_normalized_nonempty_ids_are_valid() {
        for raw in ["My Note!!", "x", "Hello World 2024", "a.b.c"] {
            let id = normalize_id(raw);
            assert!(is_valid_id(&id), "normalized {:?} -> {:?}", raw, id);
        }
    }

    #[test]
    fn test_is_valid_id_bounds() {
        assert!(!is_valid_id(""));
        assert!(is_valid_id("a"));
        assert!(is_valid_id(&"a".repeat(MAX_ID_LEN)));
        assert!(!is_valid_id(&"a".repeat(MAX_ID_LEN + 1)));
        assert!(!is_valid_id("Upper"));
        assert!(!is_valid_id("with space"));
        assert!(!is_valid_id("under_score"));
    }

    #[test]
    fn test_generated_ids_use_alphabet() {
        for _ in 0..200 {
            let id = generate_random_id(SHORT_ID_LEN);
            assert_eq!(id.len(), SHORT_ID_LEN);
            assert!(id.bytes().all(|b| ALPHABET.contains(&b)), "bad id {}", id);
        }
        assert_eq!(generate_random_id(LONG_ID_LEN).len(), LONG_ID_LEN);
    }

    #[test]
    fn test_generated_char_is_byte_modulo_alphabet() {
        // StepRng(0, 0) yields only zero bytes
        let mut rng = StepRng::new(0, 0);
        assert_eq!(generate_random_id_with(&mut rng, 4), "aaaa");
    }

    #[tokio::test]
    async fn test_allocate_returns_unclaimed_id() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        let id = allocate_unique_id(&store).await?;

        assert_eq!(id.len(), SHORT_ID_LEN);
        assert!(!store.exists(&id).await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_allocate_falls_back_to_long_ids() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        store.put("aaaaaaaa", "taken".to_string(), None).await?;

        let id = allocate_unique_id_with(&store, &mut StepRng::new(0, 0)).await?;

        assert_eq!(id, "aaaaaaaaaaaa");
        Ok(())
    }

    #[tokio::test]
    async fn test_allocate_exhausted_after_ten_collisions() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        store.put("aaaaaaaa", "taken".to_string(), None).await?;
        store.put("aaaaaaaaaaaa", "taken".to_string(), None).await?;

        let result = allocate_unique_id_with(&store, &mut StepRng::new(0, 0)).await;

        assert!(matches!(
            result,
            Err(AllocationError::Exhausted { attempts: 10 })
        ));
        Ok(())
    }
}
