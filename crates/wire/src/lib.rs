//! Fixed-layout wire codec for the Burr market program.
//!
//! Every account the Burr program owns, and every instruction payload it
//! accepts, is a fixed-layout binary record: named fields at fixed byte
//! offsets, little-endian integers, whole-byte widths. This crate holds
//! the descriptor machinery ([`layout`]), the descriptor-driven encoder
//! and decoder ([`codec`]), and the registry of concrete Burr layouts
//! ([`registry`]).
//!
//! Everything here is a pure transform over caller-supplied buffers: no
//! I/O, no shared mutable state, no panics on malformed input. Adversarial
//! bytes degrade to a typed [`WireError`], never to undefined behavior.

pub mod codec;
pub mod error;
pub mod layout;
pub mod registry;

// Re-export key public types for ergonomic imports.
pub use codec::{Reader, Writer};
pub use error::{LayoutError, WireError};
pub use layout::{Field, FieldKind, Layout, Magic, Version};
pub use registry::{
    MAX_COMMITTEE_MEMBERS, MAX_FEE_BPS, MAX_ORDER_SPLITS, PRICE_SCALE, RECORD_MAGIC,
    RECORD_VERSION, SUPPORTED_VERSIONS,
};
