//! Rider seal verification.
//!
//! A sealed rider PDF carries, on its first page, the marker
//! "Kinosonik Riders", a rider identifier (`RID`) and the SHA-256 digest
//! registered for that rider. The seal is a plaintext claim checked against
//! the riders table; it is not a signature.
//!
//! ```text
//! no_file → no_marker → no_id → no_hash → db_error | no_match | ok
//! ```

pub mod types;
pub mod marker;
pub mod parser;
pub mod verifier;
pub mod orchestrator;

pub use types::*;
pub use marker::contains_marker;
pub use parser::{parse_fields, parse_rider_id, parse_seal_hash};
pub use verifier::{check_seal, RiderSealStore, SqliteRiderStore};
pub use orchestrator::{SealVerifier, SqliteSealVerifier};
