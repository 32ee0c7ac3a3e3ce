//! Serialization/Deserialization logic lives here

use alloc::vec::Vec;
use alloc::string::String;

use crate::rr::*;

pub(crate) fn read_u8(inp: &mut &[u8]) -> Result<u8, ()> {
	let res = *inp.get(0).ok_or(())?;
	*inp = &inp[1..];
	Ok(res)
}
pub(crate) fn read_u16(inp: &mut &[u8]) -> Result<u16, ()> {
	if inp.len() < 2 { return Err(()); }
	let mut bytes = [0; 2];
	bytes.copy_from_slice(&inp[..2]);
	*inp = &inp[2..];
	Ok(u16::from_be_bytes(bytes))
}
pub(crate) fn read_u32(inp: &mut &[u8]) -> Result<u32, ()> {
	if inp.len() < 4 { return Err(()); }
	let mut bytes = [0; 4];
	bytes.copy_from_slice(&inp[..4]);
	*inp = &inp[4..];
	Ok(u32::from_be_bytes(bytes))
}
pub(crate) fn read_bytes<'a>(inp: &mut &'a [u8], len: usize) -> Result<&'a [u8], ()> {
	if inp.len() < len { return Err(()); }
	let res = &inp[..len];
	*inp = &inp[len..];
	Ok(res)
}

/// Reads an uncompressed name, as found in a proof or in canonical-form records.
pub(crate) fn read_name(inp: &mut &[u8]) -> Result<Name, ()> {
	let mut name = String::with_capacity(256);
	loop {
		let len = read_u8(inp)? as usize;
		if len == 0 {
			if name.is_empty() { name += "."; }
			break;
		}
		// Compression pointers (and the reserved label types) have the top bits set.
		if len > 63 { return Err(()); }
		let label = read_bytes(inp, len)?;
		if label.contains(&b'.') { return Err(()); }
		name += core::str::from_utf8(label).map_err(|_| ())?;
		name += ".";
		if name.len() > 255 { return Err(()); }
	}
	name.try_into()
}

pub(crate) trait Writer { fn write(&mut self, buf: &[u8]); }
impl Writer for Vec<u8> { fn write(&mut self, buf: &[u8]) { self.extend_from_slice(buf); } }
impl Writer for bitcoin_hashes::sha1::HashEngine {
	fn write(&mut self, buf: &[u8]) { bitcoin_hashes::HashEngine::input(self, buf); }
}
/// Writes `name` in canonical (lowercased, uncompressed) wire form.
pub(crate) fn write_name<W: Writer>(out: &mut W, name: &str) {
	let canonical_name = name.to_ascii_lowercase();
	if canonical_name == "." {
		out.write(&[0]);
	} else {
		for label in canonical_name.split(".") {
			out.write(&(label.len() as u8).to_be_bytes());
			out.write(label.as_bytes());
		}
	}
}
pub(crate) fn name_len(name: &Name) -> u16 {
	if name.as_str() == "." {
		1
	} else {
		let mut res = 0;
		for label in name.split(".") {
			res += 1 + label.len();
		}
		res as u16
	}
}

/// Reads an RFC 4034 section 4.1.2 type bitmap, which must make up the rest of `inp`.
///
/// Windows must appear in increasing order and each be between 1 and 32 bytes long. The resulting
/// types are sorted.
pub(crate) fn read_type_bitmap(mut inp: &[u8]) -> Result<Vec<u16>, ()> {
	let mut types = Vec::new();
	let mut last_window = None;
	while !inp.is_empty() {
		let window = read_u8(&mut inp)?;
		if last_window.map_or(false, |last| window <= last) { return Err(()); }
		last_window = Some(window);
		let len = read_u8(&mut inp)? as usize;
		if len == 0 || len > 32 { return Err(()); }
		for (idx, byte) in read_bytes(&mut inp, len)?.iter().enumerate() {
			for bit in 0..8 {
				if byte & (0x80 >> bit) != 0 {
					types.push(((window as u16) << 8) | (idx as u16 * 8 + bit));
				}
			}
		}
	}
	Ok(types)
}

/// Writes the RFC 4034 section 4.1.2 type bitmap for the given (sorted) types.
pub(crate) fn write_type_bitmap(types: &[u16], out: &mut Vec<u8>) {
	let mut pos = 0;
	while pos < types.len() {
		let window = (types[pos] >> 8) as u8;
		let mut bitmap = [0u8; 32];
		let mut len = 0;
		while pos < types.len() && (types[pos] >> 8) as u8 == window {
			let offset = (types[pos] & 0xff) as usize;
			bitmap[offset / 8] |= 0x80 >> (offset % 8);
			len = offset / 8 + 1;
			pos += 1;
		}
		out.extend_from_slice(&[window, len as u8]);
		out.extend_from_slice(&bitmap[..len]);
	}
}

/// Parses a single uncompressed NSEC3 resource record from the front of `inp`.
///
/// Records of other types or classes are rejected.
pub fn parse_rr(inp: &mut &[u8]) -> Result<NSEC3, ()> {
	let name = read_name(inp)?;
	let ty = read_u16(inp)?;
	let class = read_u16(inp)?;
	if class != 1 { return Err(()); } // We only support the INternet
	let _ttl = read_u32(inp)?;
	let data_len = read_u16(inp)? as usize;
	let data = read_bytes(inp, data_len)?;

	match ty {
		NSEC3::TYPE => NSEC3::read_from_data(name, data),
		_ => Err(()),
	}
}

/// Parse a stream of [`NSEC3`] records in uncompressed wire format, as they appear in the
/// authority section of a response (once any name compression has been undone).
pub fn parse_nsec3_stream(mut inp: &[u8]) -> Result<Vec<NSEC3>, ()> {
	let mut res = Vec::with_capacity(8);
	while !inp.is_empty() {
		res.push(parse_rr(&mut inp)?);
	}
	Ok(res)
}

/// Writes the given [`NSEC3`] record in uncompressed wire format to the given `Vec`.
///
/// Fails, leaving `out` untouched, if the record cannot be represented on the wire, ie its salt is
/// longer than 255 bytes or its next hashed owner name is empty or longer than 255 bytes.
pub fn write_rr(rr: &NSEC3, ttl: u32, out: &mut Vec<u8>) -> Result<(), ()> {
	if rr.salt.len() > 255 { return Err(()); }
	if rr.next_name_hash.is_empty() || rr.next_name_hash.len() > 255 { return Err(()); }
	out.reserve(name_len(&rr.name) as usize + 2 + 2 + 4 + 2);
	write_name(out, &rr.name);
	out.extend_from_slice(&NSEC3::TYPE.to_be_bytes());
	out.extend_from_slice(&1u16.to_be_bytes()); // The INternet class
	out.extend_from_slice(&ttl.to_be_bytes());
	rr.write_u16_len_prefixed_data(out);
	Ok(())
}
