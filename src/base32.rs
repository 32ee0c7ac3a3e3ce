//! RFC 4648 "extended hex" base32, without padding, as used for NSEC3 hashed owner names.
//!
//! Base32hex preserves the sort order of the encoded bytes, which is what makes it usable for
//! NSEC3 owner labels. Owner names are case-insensitive, so decoding accepts either case.

use alloc::vec::Vec;

#[cfg(test)]
const ALPHABET: &[u8; 32] = b"0123456789abcdefghijklmnopqrstuv";

fn decode_char(c: u8) -> Option<u8> {
	match c {
		b'0'..=b'9' => Some(c - b'0'),
		b'a'..=b'v' => Some(c - b'a' + 10),
		b'A'..=b'V' => Some(c - b'A' + 10),
		_ => None,
	}
}

/// Decode a base32hex string into a byte vector.
///
/// Trailing bits which do not make up a full byte must be zero, and a length which could not
/// have been produced by the encoder is rejected.
pub fn decode(data: &str) -> Result<Vec<u8>, ()> {
	let data = data.as_bytes();
	match data.len() % 8 { 1|3|6 => return Err(()), _ => {} }

	let mut res = Vec::with_capacity(data.len() * 5 / 8);
	let mut acc: u16 = 0;
	let mut bits = 0;
	for c in data {
		acc = (acc << 5) | decode_char(*c).ok_or(())? as u16;
		bits += 5;
		if bits >= 8 {
			bits -= 8;
			res.push((acc >> bits) as u8);
			acc &= (1 << bits) - 1;
		}
	}
	if acc != 0 { return Err(()); }
	Ok(res)
}

/// Encode bytes into a lowercase base32hex string.
#[cfg(test)]
pub fn encode(data: &[u8]) -> alloc::string::String {
	let mut res = alloc::string::String::with_capacity((data.len() * 8 + 4) / 5);
	let mut acc: u16 = 0;
	let mut bits = 0;
	for b in data {
		acc = (acc << 8) | *b as u16;
		bits += 8;
		while bits >= 5 {
			bits -= 5;
			res.push(ALPHABET[((acc >> bits) & 0x1f) as usize] as char);
		}
		acc &= (1 << bits) - 1;
	}
	if bits > 0 {
		res.push(ALPHABET[((acc << (5 - bits)) & 0x1f) as usize] as char);
	}
	res
}
