//! DNSSEC lets a zone prove not only that records exist, but also that they do not.
//!
//! Zones signed with NSEC3 (RFC 5155) do this with a chain of records whose owner names are
//! hashes of the names in the zone. Each record asserts that its own hashed name exists (along
//! with the set of record types present there) and that no hashed name falls strictly between
//! its owner hash and the next hashed owner in the chain.
//!
//! This crate implements the validator side of RFC 5155 section 8: given a question and the
//! (already signature-validated) NSEC3 records returned alongside a response, it decides whether
//! those records actually prove the denial the response claims. That is, whether a name error,
//! a no-data answer, an unsigned delegation or a wildcard expansion is genuinely authorized.
//!
//! It is no-std (but requires `alloc`) and keeps its dependencies to a minimum:
//!  * The verifiers in [`validation`] are generic over [`rr::Nsec3Record`], so callers which
//!    already hash names (or which keep records in their own types) can use them directly.
//!  * By default, the `validation` feature is set, providing [`rr::NSEC3`], a concrete record
//!    which hashes names itself using `bitcoin_hashes`' SHA-1, as well as a parser for NSEC3
//!    records in DNS wire format in [`ser`].
//!  * The `std` feature implements `std::error::Error` for [`validation::DenialError`].
//!
//! Failed proofs are reported through the `log` facade at debug level.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

#![cfg_attr(not(feature = "std"), no_std)]
extern crate alloc;

pub mod rr;
pub mod validation;

#[cfg(feature = "validation")]
pub mod ser;
#[cfg(feature = "validation")]
mod base32;
#[cfg(feature = "validation")]
mod crypto;
