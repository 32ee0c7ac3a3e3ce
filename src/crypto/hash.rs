//! The RFC 5155 section 5 iterated hash over domain names.

use bitcoin_hashes::Hash;
use bitcoin_hashes::HashEngine as _;
use bitcoin_hashes::sha1::Hash as Sha1;

use crate::rr::Name;
use crate::ser::write_name;

/// The only NSEC3 hash algorithm defined, SHA-1.
pub(crate) const NSEC3_HASH_SHA1: u8 = 1;

/// Computes `IH(salt, name, iterations)`, or `None` if `alg` is not supported.
///
/// The zeroth iteration hashes the canonical wire form of `name` followed by the salt, each
/// further iteration hashes the previous digest followed by the salt.
pub(crate) fn nsec3_hash(alg: u8, salt: &[u8], iterations: u16, name: &Name) -> Option<[u8; 20]> {
	if alg != NSEC3_HASH_SHA1 { return None; }

	let mut engine = Sha1::engine();
	write_name(&mut engine, name);
	engine.input(salt);
	let mut hash = Sha1::from_engine(engine);
	for _ in 0..iterations {
		let mut engine = Sha1::engine();
		engine.input(&hash.to_byte_array());
		engine.input(salt);
		hash = Sha1::from_engine(engine);
	}
	Some(hash.to_byte_array())
}
