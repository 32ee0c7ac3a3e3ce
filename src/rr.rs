//! Resource Records are the fundamental type in the DNS - individual records mapping a name to
//! some data.
//!
//! This module holds the names and questions the verifiers operate on, the [`Nsec3Record`] trait
//! the verifiers consume records through, and (with the `validation` feature) [`NSEC3`], a
//! concrete record which hashes names itself.

use alloc::string::String;
use alloc::borrow::ToOwned;
use alloc::format;
#[cfg(feature = "validation")]
use alloc::vec::Vec;

#[cfg(feature = "validation")]
use crate::ser::*;

/// A valid domain name.
///
/// It must end with a ".", be no longer than 255 bytes, consist of only printable ASCII
/// characters and each label must be between 1 and 63 bytes long.
///
/// Comparisons via `==` are exact; use [`Name::eq_ignore_case`] where DNS semantics are wanted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name(String);
impl Name {
	/// Gets the root name, `.`.
	pub fn root() -> Name { Name(".".to_owned()) }

	/// Gets the underlying human-readable domain name
	pub fn as_str(&self) -> &str { &self.0 }

	/// Whether this is the root name.
	pub fn is_root(&self) -> bool { self.0 == "." }

	/// The number of labels in this name, not counting the root.
	pub fn labels(&self) -> usize {
		if self.is_root() { 0 } else { self.0.bytes().filter(|b| *b == b'.').count() }
	}

	/// Compares two names the way the DNS does, ignoring ASCII case.
	pub fn eq_ignore_case(&self, other: &str) -> bool { self.0.eq_ignore_ascii_case(other) }

	/// Whether this name is `zone` itself or lies somewhere below it, ignoring ASCII case.
	pub fn is_in_zone(&self, zone: &str) -> bool {
		if zone == "." { return true; }
		if self.0.len() < zone.len() { return false; }
		let split = self.0.len() - zone.len();
		if !self.0[split..].eq_ignore_ascii_case(zone) { return false; }
		split == 0 || self.0.as_bytes()[split - 1] == b'.'
	}

	/// Whether the first label of this name is the wildcard label `*`.
	pub fn is_wildcard(&self) -> bool { self.0.starts_with("*.") }

	/// Gets the name one label up, or `None` for the root.
	pub fn parent(&self) -> Option<Name> { self.suffixes().nth(1) }

	/// Builds the wildcard name directly below this one, `*.<self>`.
	///
	/// Fails if the resulting name would be too long.
	pub fn wildcard_child(&self) -> Result<Name, ()> {
		if self.is_root() { "*.".try_into() } else { format!("*.{}", self.0).try_into() }
	}

	/// Iterates over this name and each of its ancestors, longest first, ending with the root.
	///
	/// `a.b.example.` yields `a.b.example.`, `b.example.`, `example.` and `.`.
	pub fn suffixes(&self) -> Suffixes<'_> { Suffixes { next: Some(&self.0) } }
}
impl core::ops::Deref for Name {
	type Target = str;
	fn deref(&self) -> &str { &self.0 }
}
impl TryFrom<String> for Name {
	type Error = ();
	fn try_from(s: String) -> Result<Name, ()> {
		if s.is_empty() { return Err(()); }
		if *s.as_bytes().last().unwrap_or(&0) != b"."[0] { return Err(()); }
		if s.len() > 255 { return Err(()); }
		if s.chars().any(|c| !c.is_ascii_graphic()) { return Err(()); }
		if s != "." {
			for label in s[..s.len() - 1].split('.') {
				if label.is_empty() || label.len() > 63 { return Err(()); }
			}
		}

		Ok(Name(s))
	}
}
impl TryFrom<&str> for Name {
	type Error = ();
	fn try_from(s: &str) -> Result<Name, ()> {
		Self::try_from(s.to_owned())
	}
}

/// An iterator over a [`Name`] and its ancestors, created by [`Name::suffixes`].
pub struct Suffixes<'a> {
	next: Option<&'a str>,
}
impl<'a> Iterator for Suffixes<'a> {
	type Item = Name;
	fn next(&mut self) -> Option<Name> {
		let cur = self.next?;
		self.next = if cur == "." {
			None
		} else {
			let rest = cur.find('.').map(|dot| &cur[dot + 1..]).unwrap_or("");
			Some(if rest.is_empty() { "." } else { rest })
		};
		Some(Name(cur.to_owned()))
	}
}

/// Resource record type codes, as maintained by IANA, which the verifiers need to look for in
/// type bitmaps.
///
/// Current assignments can be found at
/// <http://www.iana.org/assignments/dns-parameters/dns-parameters.xhtml#dns-parameters-4>
pub mod types {
	/// An IPv4 address.
	pub const A: u16 = 1;
	/// A name server for a zone.
	pub const NS: u16 = 2;
	/// A canonical name (alias).
	pub const CNAME: u16 = 5;
	/// The start of a zone of authority.
	pub const SOA: u16 = 6;
	/// A mail exchange.
	pub const MX: u16 = 15;
	/// Arbitrary text.
	pub const TXT: u16 = 16;
	/// An IPv6 address.
	pub const AAAA: u16 = 28;
	/// A delegation signer, present when a delegated child zone is signed.
	pub const DS: u16 = 43;
	/// A signature over a record set.
	pub const RRSIG: u16 = 46;
	/// A DNSSEC public key.
	pub const DNSKEY: u16 = 48;
	/// A hashed authenticated denial of existence record.
	pub const NSEC3: u16 = 50;
	/// The NSEC3 parameters of a zone, at its apex.
	pub const NSEC3PARAM: u16 = 51;
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// The question a response answered, and thus the question a denial of existence must address.
pub struct Question {
	/// The name which was queried.
	pub name: Name,
	/// The resource record type which was queried, see [`types`].
	pub ty: u16,
}

/// A denial of existence record which the verifiers in [`crate::validation`] can consult.
///
/// Implementations are responsible for hashing candidate names with their own hash parameters.
/// Note that equality is used to detect conflicting records: two records which both match (or
/// both cover) the same name but compare unequal make a proof ambiguous.
pub trait Nsec3Record : PartialEq {
	/// Whether the hash of `name` is exactly this record's hashed owner name.
	fn matches(&self, name: &Name) -> bool;
	/// Whether the hash of `name` falls strictly between this record's hashed owner name and its
	/// next hashed owner name, wrapping around at the end of the chain.
	fn covers(&self, name: &Name) -> bool;
	/// The record types which exist at this record's (original) owner name.
	fn types(&self) -> &[u16];
	/// Whether the range this record covers may contain unsigned delegations.
	fn opt_out(&self) -> bool;
	/// The zone this record was issued for, ie its owner name without the hashed label.
	fn zone(&self) -> &str;
}

#[cfg(feature = "validation")]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
/// A hashed authenticated denial of existence resource record, as defined in RFC 5155.
///
/// See <https://www.rfc-editor.org/rfc/rfc5155#section-3> for more info.
pub struct NSEC3 {
	/// The name this record is at.
	///
	/// Its first label is the base32hex-encoded hash of the original owner name, the remainder is
	/// the zone.
	pub name: Name,
	/// The hash algorithm used. Only SHA-1 (`1`) is defined.
	pub hash_algo: u8,
	/// Flags. Only the least significant bit, Opt-Out, is defined.
	pub flags: u8,
	/// The number of additional times the hash is applied.
	pub hash_iterations: u16,
	/// A salt appended to the name (and to each intermediate hash) before hashing.
	pub salt: Vec<u8>,
	/// The raw (not base32hex-encoded) hash of the next owner name in the zone's hash order.
	pub next_name_hash: Vec<u8>,
	/// The record types which exist at the original owner name, sorted and de-duplicated.
	pub types: Vec<u16>,
}
#[cfg(feature = "validation")]
impl NSEC3 {
	/// The resource record type, as maintained by IANA.
	pub const TYPE: u16 = types::NSEC3;
	/// The Opt-Out bit in [`Self::flags`].
	pub const FLAG_OPT_OUT: u8 = 1;

	/// Decodes the hash of the original owner name from the first label of [`Self::name`].
	pub fn owner_hash(&self) -> Option<Vec<u8>> {
		let label = self.name.split('.').next()?;
		crate::base32::decode(label).ok()
	}

	/// Hashes `name` with this record's hash parameters.
	///
	/// Returns `None` if the hash algorithm is not supported.
	pub fn hash_name(&self, name: &Name) -> Option<Vec<u8>> {
		crate::crypto::hash::nsec3_hash(self.hash_algo, &self.salt, self.hash_iterations, name)
			.map(|hash| hash.to_vec())
	}

	pub(crate) fn read_from_data(name: Name, mut data: &[u8]) -> Result<Self, ()> {
		let hash_algo = read_u8(&mut data)?;
		let flags = read_u8(&mut data)?;
		let hash_iterations = read_u16(&mut data)?;
		let salt_len = read_u8(&mut data)? as usize;
		let salt = read_bytes(&mut data, salt_len)?.to_vec();
		let hash_len = read_u8(&mut data)? as usize;
		if hash_len == 0 { return Err(()); }
		let next_name_hash = read_bytes(&mut data, hash_len)?.to_vec();
		Ok(NSEC3 {
			name, hash_algo, flags, hash_iterations, salt, next_name_hash,
			types: read_type_bitmap(data)?,
		})
	}
	/// The salt and next hash lengths must each fit in a byte, which [`write_rr`] checks.
	pub(crate) fn write_u16_len_prefixed_data(&self, out: &mut Vec<u8>) {
		let mut data = Vec::with_capacity(2 + 2 + 1 + self.salt.len() + 1 + self.next_name_hash.len() + 34);
		data.extend_from_slice(&[self.hash_algo, self.flags]);
		data.extend_from_slice(&self.hash_iterations.to_be_bytes());
		data.push(self.salt.len() as u8);
		data.extend_from_slice(&self.salt);
		data.push(self.next_name_hash.len() as u8);
		data.extend_from_slice(&self.next_name_hash);
		write_type_bitmap(&self.types, &mut data);
		out.extend_from_slice(&(data.len() as u16).to_be_bytes());
		out.extend_from_slice(&data);
	}

	fn owner_and_name_hash(&self, name: &Name) -> Option<(Vec<u8>, Vec<u8>)> {
		if !name.is_in_zone(self.zone()) { return None; }
		Some((self.owner_hash()?, self.hash_name(name)?))
	}
}
#[cfg(feature = "validation")]
impl Nsec3Record for NSEC3 {
	fn matches(&self, name: &Name) -> bool {
		self.owner_and_name_hash(name).map_or(false, |(owner, hash)| owner == hash)
	}
	fn covers(&self, name: &Name) -> bool {
		let (owner, hash) = match self.owner_and_name_hash(name) {
			Some(hashes) => hashes,
			None => return false,
		};
		let next = &self.next_name_hash[..];
		if &owner[..] < next {
			&owner[..] < &hash[..] && &hash[..] < next
		} else {
			// The last record in the chain wraps around to the first. A chain of one record has
			// owner == next and covers every hash but its own.
			&hash[..] > &owner[..] || &hash[..] < next
		}
	}
	fn types(&self) -> &[u16] { &self.types }
	fn opt_out(&self) -> bool { self.flags & Self::FLAG_OPT_OUT != 0 }
	fn zone(&self) -> &str {
		match self.name.find('.') {
			Some(dot) if dot + 1 < self.name.len() => &self.name[dot + 1..],
			_ => ".",
		}
	}
}
