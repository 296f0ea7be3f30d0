use burr_wire::WireError;
use thiserror::Error;

/// Client-side operation errors.
///
/// All variants are ordinary values returned to the caller; nothing in
/// this crate raises an unrecoverable fault for malformed external input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error(transparent)]
    Wire(#[from] WireError),

    #[error("seed component of {len} bytes exceeds the {max}-byte limit")]
    SeedTooLong { len: usize, max: usize },

    #[error("{count} seed components exceed the limit of {max}")]
    TooManySeeds { count: usize, max: usize },

    #[error("no valid derived address for these seeds: bump space exhausted")]
    BumpSeedExhausted,

    #[error("seeds and bump produce an address on the Ed25519 curve")]
    OnCurve,

    #[error("owner address ends with the derived-address marker")]
    IllegalOwner,

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("candidate {candidate} is not authorized by {authority}")]
    NotAuthorized {
        authority: String,
        candidate: String,
    },
}
