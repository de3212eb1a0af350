//! BR Code (EMV-MPM) encoding for static PIX.
//!
//! Data flows leaf to root: [`sanitize`] and [`amount`] normalize raw
//! input, [`tlv`] encodes each field against the [`catalog`], [`builder`]
//! assembles the ordered payload and appends the [`crc`]. [`parser`] goes
//! the other way and is used to verify finished payloads.

pub mod amount;
pub mod builder;
pub mod catalog;
pub mod crc;
pub mod parser;
pub mod sanitize;
pub mod tlv;

pub use builder::{PixPayload, PixPayloadBuilder, PointOfInitiation};
pub use crc::crc16_ccitt_false;
pub use parser::{parse_fields, verify_payload, ParsedField};
pub use sanitize::sanitize;
