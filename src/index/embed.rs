//! Deterministic text embedding for the style index.
//!
//! Each token hashes to a seed that deterministically generates a dense
//! vector; a text embeds as the L2-normalized sum of its token vectors.
//! The same text always produces the same embedding, so the index needs no
//! external model and rebuilds are reproducible.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::{Rng, SeedableRng};

/// Dimension of chunk and query embeddings.
pub const EMBED_DIM: usize = 256;

fn token_seed(token: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    token.hash(&mut hasher);
    hasher.finish()
}

/// Lowercased alphanumeric tokens of a text.
fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
}

/// Embed a text as a normalized bag-of-tokens vector.
///
/// A text with no alphanumeric tokens embeds as the zero vector; callers
/// must not search with it (cosine distance is undefined at zero).
pub fn embed_text(text: &str) -> Vec<f32> {
    let mut acc = vec![0f32; EMBED_DIM];
    let mut any = false;

    for token in tokens(text) {
        let mut rng = rand::rngs::StdRng::seed_from_u64(token_seed(&token));
        for slot in acc.iter_mut() {
            *slot += rng.gen_range(-1.0f32..1.0f32);
        }
        any = true;
    }

    if !any {
        return acc;
    }

    let norm = acc.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for slot in acc.iter_mut() {
            *slot /= norm;
        }
    }
    acc
}

/// Whether an embedding is the zero vector (no usable tokens).
pub fn is_zero(embedding: &[f32]) -> bool {
    embedding.iter().all(|v| *v == 0.0)
}
