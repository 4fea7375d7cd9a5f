use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    #[error("too many seeds: {count} (max {max})")]
    TooManySeeds { count: usize, max: usize },

    #[error("seed {index} is {len} bytes (max {max})")]
    SeedTooLong { index: usize, len: usize, max: usize },
}
