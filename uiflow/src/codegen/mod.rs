//! Collision-free short-code generation for form fields.
//!
//! Codes are two uppercase letters followed by six digits. Uniqueness is
//! scoped to a [`CodeRegistry`]: the registry owns the issued set, a code
//! is claimed in a single critical section, and claimed codes are never
//! removed. Sharing one registry across generators (or sessions) extends
//! the uniqueness guarantee across them.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Size of the code space: 26 letters squared times 10^6 digits.
const CODE_SPACE: u64 = 26 * 26 * 1_000_000;

/// A generated short code matching `[A-Z]{2}[0-9]{6}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeneratedCode(String);

impl GeneratedCode {
    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GeneratedCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The issued-code set, shared explicitly rather than held as ambient
/// global state.
#[derive(Debug, Default)]
pub struct CodeRegistry {
    issued: Mutex<HashSet<String>>,
}

impl CodeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims a candidate code if it has not been issued before.
    ///
    /// Check-then-insert runs under one lock acquisition, so the
    /// uniqueness invariant holds even when the registry is shared
    /// across concurrent sessions.
    pub fn try_claim(&self, candidate: &str) -> bool {
        let mut issued = self.issued.lock();
        if issued.contains(candidate) {
            false
        } else {
            issued.insert(candidate.to_string());
            true
        }
    }

    /// Returns whether a code has been issued.
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.issued.lock().contains(code)
    }

    /// Returns the number of codes issued so far.
    #[must_use]
    pub fn issued_count(&self) -> usize {
        self.issued.lock().len()
    }
}

/// Produces collision-free [`GeneratedCode`] values against a registry.
#[derive(Debug)]
pub struct IdentifierGenerator {
    registry: Arc<CodeRegistry>,
    rng: Mutex<StdRng>,
}

impl Default for IdentifierGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentifierGenerator {
    /// Creates a generator with a private registry and an entropy-seeded
    /// random source.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(Arc::new(CodeRegistry::new()))
    }

    /// Creates a generator against an explicit (possibly shared) registry.
    #[must_use]
    pub fn with_registry(registry: Arc<CodeRegistry>) -> Self {
        Self {
            registry,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Creates a deterministic generator for tests.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            registry: Arc::new(CodeRegistry::new()),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Returns the registry this generator claims codes against.
    #[must_use]
    pub fn registry(&self) -> Arc<CodeRegistry> {
        Arc::clone(&self.registry)
    }

    /// Generates the next unique code.
    ///
    /// Retries on collision; the retry loop has no upper bound because
    /// the code space dwarfs any realistic issuance volume. The debug
    /// assertion trips long before retry time could degrade.
    #[must_use]
    pub fn next_code(&self) -> GeneratedCode {
        debug_assert!(
            (self.registry.issued_count() as u64) < CODE_SPACE / 2,
            "issued-code volume is approaching the code space"
        );
        loop {
            let candidate = self.draw_candidate();
            if self.registry.try_claim(&candidate) {
                return GeneratedCode(candidate);
            }
        }
    }

    fn draw_candidate(&self) -> String {
        let mut rng = self.rng.lock();
        let mut code = String::with_capacity(8);
        for _ in 0..2 {
            code.push(char::from(b'A' + rng.gen_range(0..26)));
        }
        for _ in 0..6 {
            code.push(char::from(b'0' + rng.gen_range(0..10)));
        }
        code
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn codes_match_pattern() {
        let generator = IdentifierGenerator::from_seed(7);
        let pattern = regex::Regex::new(r"^[A-Z]{2}[0-9]{6}$").unwrap();
        for _ in 0..100 {
            let code = generator.next_code();
            assert!(pattern.is_match(code.as_str()), "bad code: {code}");
        }
    }

    #[test]
    fn codes_are_pairwise_distinct() {
        let generator = IdentifierGenerator::from_seed(42);
        let mut seen = HashSet::new();
        for _ in 0..1_000 {
            assert!(seen.insert(generator.next_code().as_str().to_string()));
        }
        assert_eq!(generator.registry().issued_count(), 1_000);
    }

    #[test]
    fn seeded_generators_are_deterministic() {
        let a = IdentifierGenerator::from_seed(9);
        let b = IdentifierGenerator::from_seed(9);
        for _ in 0..20 {
            assert_eq!(a.next_code(), b.next_code());
        }
    }

    #[test]
    fn shared_registry_extends_uniqueness() {
        let registry = Arc::new(CodeRegistry::new());
        // Same seed: both generators draw identical candidate streams, so
        // the second must skip every code the first already claimed.
        let a = IdentifierGenerator {
            registry: Arc::clone(&registry),
            rng: Mutex::new(StdRng::seed_from_u64(3)),
        };
        let b = IdentifierGenerator {
            registry: Arc::clone(&registry),
            rng: Mutex::new(StdRng::seed_from_u64(3)),
        };

        let first: Vec<_> = (0..50).map(|_| a.next_code()).collect();
        for _ in 0..50 {
            let code = b.next_code();
            assert!(!first.contains(&code));
        }
        assert_eq!(registry.issued_count(), 100);
    }

    #[test]
    fn claimed_codes_stay_claimed() {
        let registry = CodeRegistry::new();
        assert!(registry.try_claim("AB123456"));
        assert!(!registry.try_claim("AB123456"));
        assert!(registry.contains("AB123456"));
        assert_eq!(registry.issued_count(), 1);
    }
}
