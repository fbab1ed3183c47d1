//! Embedding abstraction and the default hashing embedder.

/// Provider interface for embedding generation.
///
/// Implement this trait to plug in another backend (a local model, a remote API).
pub trait EmbeddingsProvider: Send + Sync {
    /// Dimensionality of every vector returned by [`EmbeddingsProvider::embed`].
    fn dimension(&self) -> usize;

    /// Produces an embedding vector for the given text.
    fn embed(&self, text: &str) -> Vec<f32>;
}

/// Feature-hashing bag of words.
///
/// Lowercases, splits on non-alphanumeric characters, and hashes every token
/// and every adjacent-token bigram into one of `dim` buckets. The result is
/// L2-normalized, so a dot product is a cosine similarity.
#[derive(Clone, Debug)]
pub struct HashingEmbedder {
    dim: usize,
}

impl HashingEmbedder {
    /// `dim` must be non-zero; callers validate it in config.
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1) }
    }

    fn bucket(&self, feature: &str) -> usize {
        (fnv1a(feature.as_bytes()) % self.dim as u64) as usize
    }
}

impl EmbeddingsProvider for HashingEmbedder {
    fn dimension(&self) -> usize {
        self.dim
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .collect();

        let mut v = vec![0.0f32; self.dim];
        for t in &tokens {
            v[self.bucket(t)] += 1.0;
        }
        // bigrams weigh half a token
        for pair in tokens.windows(2) {
            v[self.bucket(&format!("{} {}", pair[0], pair[1]))] += 0.5;
        }

        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            v.iter_mut().for_each(|x| *x /= norm);
        }
        v
    }
}

/// 64-bit FNV-1a; stable across runs and platforms.
fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes
        .iter()
        .fold(OFFSET, |h, b| (h ^ u64::from(*b)).wrapping_mul(PRIME))
}

pub(crate) fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let (mut dot, mut na, mut nb) = (0.0f32, 0.0f32, 0.0f32);
    let len = a.len().min(b.len());
    for i in 0..len {
        dot += a[i] * b[i];
        na += a[i] * a[i];
        nb += b[i] * b[i];
    }
    if na == 0.0 || nb == 0.0 {
        0.0
    } else {
        dot / (na.sqrt() * nb.sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vectors_are_unit_length() {
        let e = HashingEmbedder::new(64);
        let v = e.embed("What is an investment unit?");
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
        assert_eq!(v.len(), 64);
    }

    #[test]
    fn case_and_punctuation_do_not_matter() {
        let e = HashingEmbedder::new(128);
        assert_eq!(e.embed("Closed-end FUND"), e.embed("closed end, fund!"));
    }

    #[test]
    fn empty_text_is_zero_vector() {
        let e = HashingEmbedder::new(16);
        assert!(e.embed("  ?! ").iter().all(|x| *x == 0.0));
        assert_eq!(cosine(&e.embed(""), &e.embed("fund")), 0.0);
    }

    #[test]
    fn related_text_scores_higher() {
        let e = HashingEmbedder::new(384);
        let q = e.embed("risks of investing in a closed-end fund");
        let near = e.embed("Investing in a closed-end fund carries market and liquidity risks.");
        let far = e.embed("Qualification testing is required before buying some units.");
        assert!(cosine(&q, &near) > cosine(&q, &far));
    }

    #[test]
    fn fnv_is_stable() {
        assert_eq!(fnv1a(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a(b"a"), 0xaf63_dc4c_8601_ec8c);
    }
}
