//! bcrypt password hashing on the blocking thread pool.

use crate::error::ApiError;

/// Lowest work factor bcrypt accepts.
pub const MIN_COST: u32 = 4;
/// Highest work factor bcrypt accepts.
pub const MAX_COST: u32 = 31;
/// Production work factor.
pub const DEFAULT_COST: u32 = 12;

/// Salted bcrypt hasher with a fixed work factor.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Creates a hasher with the given work factor.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidInput`] if `cost` is outside
    /// [`MIN_COST`]..=[`MAX_COST`].
    pub fn new(cost: u32) -> Result<Self, ApiError> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(ApiError::InvalidInput(format!(
                "bcrypt cost must be between {MIN_COST} and {MAX_COST}, got {cost}"
            )));
        }
        Ok(Self { cost })
    }

    /// Hashes `password` with a fresh salt.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Internal`] if hashing fails or the blocking task
    /// is cancelled.
    pub async fn hash(&self, password: String) -> Result<String, ApiError> {
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| ApiError::Internal(format!("hashing task failed: {e}")))?
            .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_cost() {
        assert!(PasswordHasher::new(3).is_err());
        assert!(PasswordHasher::new(32).is_err());
        assert!(PasswordHasher::new(MIN_COST).is_ok());
    }

    #[tokio::test]
    async fn hash_is_salted_and_verifies() {
        let Ok(hasher) = PasswordHasher::new(MIN_COST) else {
            panic!("valid cost");
        };
        let Ok(first) = hasher.hash("secret".to_string()).await else {
            panic!("hash failed");
        };
        let Ok(second) = hasher.hash("secret".to_string()).await else {
            panic!("hash failed");
        };
        assert_ne!(first, second);
        assert_ne!(first, "secret");

        assert_eq!(bcrypt::verify("secret", &first).ok(), Some(true));
        assert_eq!(bcrypt::verify("wrong", &first).ok(), Some(false));
    }
}
