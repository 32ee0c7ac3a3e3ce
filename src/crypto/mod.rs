//! Hashing needed to check NSEC3 records.
//!
//! NSEC3 only defines SHA-1, and signatures over the records are checked before they ever reach
//! this crate, so there is little cryptography to do here. Rather than carry our own hash
//! implementation, rust-bitcoin's `bitcoin_hashes` crate does what we need without any
//! unnecessary dependencies and with a very conservative MSRV policy.

pub(crate) mod hash;
