//! bcrypt password hashing.

/// Cost used when none is configured.
pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

#[derive(Debug, thiserror::Error)]
#[error("password hashing failed: {0}")]
pub struct PasswordHashError(#[from] bcrypt::BcryptError);

/// Hashes and verifies passwords with a fixed bcrypt cost.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    pub cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        Ok(bcrypt::hash(password, self.cost)?)
    }

    /// `Ok(false)` on mismatch; `Err` only when `hash` is not a bcrypt hash.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        Ok(bcrypt::verify(password, hash)?)
    }
}
