use anyhow::{Context, Result};

/// bcrypt with a configurable work factor.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, password: &str) -> Result<String> {
        bcrypt::hash(password, self.cost).context("Failed to hash password")
    }

    pub fn verify(&self, password: &str, hash: &str) -> bool {
        bcrypt::verify(password, hash).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_its_own_hashes() {
        let hasher = PasswordHasher::new(4);
        let hash = hasher.hash("User123!").unwrap();
        assert!(hasher.verify("User123!", &hash));
        assert!(!hasher.verify("user123!", &hash));
    }

    #[test]
    fn malformed_hashes_never_verify() {
        assert!(!PasswordHasher::new(4).verify("User123!", "not-a-hash"));
    }
}
