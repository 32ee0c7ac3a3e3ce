//! Utilities to validate RFC 5155 NSEC3 proofs of non-existence
//!
//! A few terms are used throughout:
//!
//! "closest encloser" - the longest ancestor of a queried name (the name itself included) which
//!     provably exists, ie which has a *matching* NSEC3 record.
//!
//! "next closer" - the name one label longer than the closest encloser on the way to the queried
//!     name. For `x.y.c.example.` with closest encloser `example.` it is `c.example.`.
//!
//! "matching" record - a record whose hashed owner name is exactly the hash of a name. Only names
//!     which exist have one.
//!
//! "covering" record - a record whose hashed owner name and next hashed owner name straddle the
//!     hash of a name, proving that name does not exist.
//!
//! The verifiers assume the records they are given have already had their signatures validated.
//! Each returns the first problem found; any `Err` means the response must not be accepted.

use core::fmt;

use crate::rr::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// An error when validating an NSEC3 proof of non-existence
pub enum DenialError {
	/// The records do not pertain to the question.
	///
	/// Either they were issued for more than one zone, or they contradict the claimed shape of
	/// the answer (eg a name error for a name which has a matching record, or a wildcard which
	/// cannot have synthesized the answer).
	Mismatch,
	/// A matching record shows the queried type (or a CNAME) exists at the queried name.
	TypeExists,
	/// More than one distinct record matches or covers the same name, making the proof
	/// ambiguous.
	MultipleCoverage,
	/// No record matches or covers a name which the proof requires.
	MissingCoverage,
	/// The record for an unsigned delegation has the DS or SOA bit set.
	BadDelegation,
	/// The record for an unsigned delegation does not have the NS bit set.
	NSMissing,
	/// The record covering the next closer name does not have the Opt-Out flag set, so it cannot
	/// vouch for an unsigned delegation.
	OptOut,
}
impl fmt::Display for DenialError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(match self {
			DenialError::Mismatch => "NSEC3 records don't match the question",
			DenialError::TypeExists => "NSEC3 record shows the question type exists",
			DenialError::MultipleCoverage =>
				"Multiple NSEC3 records match or cover the same name",
			DenialError::MissingCoverage => "NSEC3 record missing for a required name",
			DenialError::BadDelegation => "DS or SOA bit set in delegation NSEC3 type map",
			DenialError::NSMissing => "NS bit not set in delegation NSEC3 type map",
			DenialError::OptOut => "Opt-Out bit not set for NSEC3 record covering next closer",
		})
	}
}
#[cfg(feature = "std")]
impl std::error::Error for DenialError {}

fn types_set(set: &[u16], types: &[u16]) -> bool {
	set.iter().any(|ty| types.contains(ty))
}

fn log_result(res: Result<(), DenialError>, proof: &str, name: &Name) -> Result<(), DenialError> {
	match &res {
		Ok(()) => log::trace!("NSEC3 {} proof for {} is valid", proof, name.as_str()),
		Err(e) => log::debug!("NSEC3 {} proof for {} rejected: {}", proof, name.as_str(), e),
	}
	res
}

/// Checks that all records were issued for a single zone, returning the zone.
///
/// A queried name outside the zone is not rejected here: no record can match any of its
/// ancestors, so proofs about it fail [`DenialError::MissingCoverage`].
fn check_zone<R: Nsec3Record>(nsec3s: &[R]) -> Result<&str, DenialError> {
	let zone = nsec3s.first().ok_or(DenialError::MissingCoverage)?.zone();
	if nsec3s.iter().any(|rr| !rr.zone().eq_ignore_ascii_case(zone)) {
		return Err(DenialError::Mismatch);
	}
	Ok(zone)
}

/// Finds the record which matches `name` and returns its type bitmap.
///
/// The first matching record in `nsec3s` wins. Any later matching record must be identical to
/// it, otherwise the proof is ambiguous and [`DenialError::MultipleCoverage`] is returned. If no
/// record matches, [`DenialError::MissingCoverage`] is returned, which callers may or may not
/// treat as fatal.
pub fn find_matching<'r, R: Nsec3Record>(name: &Name, nsec3s: &'r [R])
-> Result<&'r [u16], DenialError> {
	let mut matching = nsec3s.iter().filter(|rr| rr.matches(name));
	let first = matching.next().ok_or(DenialError::MissingCoverage)?;
	if matching.any(|rr| rr != first) { return Err(DenialError::MultipleCoverage); }
	Ok(first.types())
}

/// Finds the record which covers `name` and returns its type bitmap and Opt-Out flag.
///
/// As with [`find_matching`], the first covering record wins and any other covering record must
/// be identical to it.
pub fn find_coverer<'r, R: Nsec3Record>(name: &Name, nsec3s: &'r [R])
-> Result<(&'r [u16], bool), DenialError> {
	let mut covering = nsec3s.iter().filter(|rr| rr.covers(name));
	let first = covering.next().ok_or(DenialError::MissingCoverage)?;
	if covering.any(|rr| rr != first) { return Err(DenialError::MultipleCoverage); }
	Ok((first.types(), first.opt_out()))
}

/// Finds the closest encloser of `name` and the corresponding next closer name (RFC 5155
/// section 8.3).
///
/// Ancestors are tried longest first, so the deepest provably-existing ancestor is found. If
/// `name` itself has a matching record it is returned as both the closest encloser and the next
/// closer. `Ok(None)` is returned if no ancestor (up to and including the root) has a matching
/// record, which verifiers treat as [`DenialError::MissingCoverage`].
pub fn find_closest_encloser<R: Nsec3Record>(name: &Name, nsec3s: &[R])
-> Result<Option<(Name, Name)>, DenialError> {
	let mut next_closer = name.clone();
	for suffix in name.suffixes() {
		match find_matching(&suffix, nsec3s) {
			Ok(_) => return Ok(Some((suffix, next_closer))),
			Err(DenialError::MissingCoverage) => next_closer = suffix,
			Err(e) => return Err(e),
		}
	}
	Ok(None)
}

/// Checks that the next closer name of `name` is covered by an Opt-Out record (RFC 5155 section
/// 8.6 and 8.9).
fn verify_opt_out_coverage<R: Nsec3Record>(name: &Name, nsec3s: &[R]) -> Result<(), DenialError> {
	let (_, next_closer) = find_closest_encloser(name, nsec3s)?
		.ok_or(DenialError::MissingCoverage)?;
	let (_, opt_out) = find_coverer(&next_closer, nsec3s)?;
	if !opt_out { return Err(DenialError::OptOut); }
	Ok(())
}

/// Verifies the NSEC3 records accompanying a name error (NXDOMAIN) response (RFC 5155 section
/// 8.4).
///
/// Requires a closest encloser for the queried name and a record covering the wildcard directly
/// below it, showing no wildcard could have answered the query instead. If the queried name
/// itself has a matching record it exists, and [`DenialError::Mismatch`] is returned.
pub fn verify_name_error<R: Nsec3Record>(question: &Question, nsec3s: &[R])
-> Result<(), DenialError> {
	log_result(check_name_error(question, nsec3s), "name error", &question.name)
}
fn check_name_error<R: Nsec3Record>(question: &Question, nsec3s: &[R]) -> Result<(), DenialError> {
	check_zone(nsec3s)?;
	let (closest_encloser, _) = find_closest_encloser(&question.name, nsec3s)?
		.ok_or(DenialError::MissingCoverage)?;
	// The records show the queried name exists
	if closest_encloser == question.name { return Err(DenialError::Mismatch); }
	let wildcard = closest_encloser.wildcard_child().map_err(|()| DenialError::MissingCoverage)?;
	find_coverer(&wildcard, nsec3s)?;
	Ok(())
}

/// Verifies the NSEC3 records accompanying a NOERROR response with an empty answer section (RFC
/// 5155 sections 8.5 and 8.6).
///
/// The queried name must have a matching record without the queried type or CNAME in its type
/// bitmap. For DS queries the name may instead lie in an Opt-Out span, ie its next closer name is
/// covered by a record with the Opt-Out flag set.
///
/// Wildcard no-data responses are checked by [`verify_wildcard_nodata`] instead.
pub fn verify_nodata<R: Nsec3Record>(question: &Question, nsec3s: &[R]) -> Result<(), DenialError> {
	log_result(check_nodata(question, nsec3s), "no data", &question.name)
}
fn check_nodata<R: Nsec3Record>(question: &Question, nsec3s: &[R]) -> Result<(), DenialError> {
	check_zone(nsec3s)?;
	match find_matching(&question.name, nsec3s) {
		Ok(types) => {
			if types_set(types, &[question.ty, types::CNAME]) {
				return Err(DenialError::TypeExists);
			}
			Ok(())
		},
		Err(DenialError::MissingCoverage) if question.ty == types::DS => {
			verify_opt_out_coverage(&question.name, nsec3s)
		},
		Err(e) => Err(e),
	}
}

/// Verifies that a referral to `delegation` is a legitimately unsigned delegation (RFC 5155
/// section 8.9).
///
/// If the delegation point has a matching record it must show NS and neither DS nor SOA.
/// Otherwise its next closer name must be covered by an Opt-Out record.
pub fn verify_delegation<R: Nsec3Record>(delegation: &Name, nsec3s: &[R])
-> Result<(), DenialError> {
	log_result(check_delegation(delegation, nsec3s), "delegation", delegation)
}
fn check_delegation<R: Nsec3Record>(delegation: &Name, nsec3s: &[R]) -> Result<(), DenialError> {
	check_zone(nsec3s)?;
	match find_matching(delegation, nsec3s) {
		Ok(types) => {
			if types_set(types, &[types::DS, types::SOA]) {
				return Err(DenialError::BadDelegation);
			}
			if !types_set(types, &[types::NS]) {
				return Err(DenialError::NSMissing);
			}
			Ok(())
		},
		Err(DenialError::MissingCoverage) => verify_opt_out_coverage(delegation, nsec3s),
		Err(e) => Err(e),
	}
}

/// Verifies the NSEC3 records accompanying a positive answer synthesized from `wildcard` (RFC
/// 5155 section 8.8).
///
/// `wildcard` is the source of synthesis, `*.<closest encloser>`, as indicated by the labels
/// field of the answer's RRSIG. The records must show that no name between the queried name and
/// the closest encloser exists, by covering the next closer name and not matching anything
/// closer.
pub fn verify_wildcard_answer<R: Nsec3Record>(question: &Question, wildcard: &Name, nsec3s: &[R])
-> Result<(), DenialError> {
	log_result(check_wildcard_answer(question, wildcard, nsec3s), "wildcard answer", &question.name)
}
fn check_wildcard_answer<R: Nsec3Record>(question: &Question, wildcard: &Name, nsec3s: &[R])
-> Result<(), DenialError> {
	let zone = check_zone(nsec3s)?;
	if !wildcard.is_wildcard() { return Err(DenialError::Mismatch); }
	let closest_encloser = wildcard.parent().ok_or(DenialError::Mismatch)?;
	if !closest_encloser.is_in_zone(zone) || !question.name.is_in_zone(&closest_encloser)
		|| question.name.labels() <= closest_encloser.labels()
	{
		return Err(DenialError::Mismatch);
	}

	let mut next_closer = None;
	for suffix in question.name.suffixes().take(question.name.labels() - closest_encloser.labels()) {
		match find_matching(&suffix, nsec3s) {
			// A name below the closest encloser exists, so the wildcard could not have applied
			Ok(_) => return Err(DenialError::Mismatch),
			Err(DenialError::MissingCoverage) => {},
			Err(e) => return Err(e),
		}
		next_closer = Some(suffix);
	}
	let next_closer = next_closer.ok_or(DenialError::Mismatch)?;
	find_coverer(&next_closer, nsec3s)?;
	Ok(())
}

/// Verifies the NSEC3 records accompanying a no-data response for a name which would have been
/// synthesized from a wildcard (RFC 5155 section 8.7).
///
/// Requires a closest encloser proof for the queried name (a matching record for the closest
/// encloser and a covering record for the next closer) and a matching record for the wildcard
/// at the closest encloser whose type bitmap has neither the queried type nor CNAME.
pub fn verify_wildcard_nodata<R: Nsec3Record>(question: &Question, nsec3s: &[R])
-> Result<(), DenialError> {
	log_result(check_wildcard_nodata(question, nsec3s), "wildcard no data", &question.name)
}
fn check_wildcard_nodata<R: Nsec3Record>(question: &Question, nsec3s: &[R])
-> Result<(), DenialError> {
	check_zone(nsec3s)?;
	let (closest_encloser, next_closer) = find_closest_encloser(&question.name, nsec3s)?
		.ok_or(DenialError::MissingCoverage)?;
	// The queried name itself exists, this is a regular no-data response
	if closest_encloser == question.name { return Err(DenialError::Mismatch); }
	find_coverer(&next_closer, nsec3s)?;

	let wildcard = closest_encloser.wildcard_child().map_err(|()| DenialError::MissingCoverage)?;
	let types = find_matching(&wildcard, nsec3s)?;
	if types_set(types, &[question.ty, types::CNAME]) {
		return Err(DenialError::TypeExists);
	}
	Ok(())
}

#[cfg(all(fuzzing, feature = "validation"))]
/// Read a question and a stream of NSEC3 records from the given data and run every verifier, for
/// fuzzing.
pub fn fuzz_proofs(mut data: &[u8]) {
	let name = match crate::ser::read_name(&mut data) { Ok(name) => name, Err(()) => return };
	let ty = match crate::ser::read_u16(&mut data) { Ok(ty) => ty, Err(()) => return };
	let nsec3s = match crate::ser::parse_nsec3_stream(data) { Ok(rrs) => rrs, Err(()) => return };
	let question = Question { name, ty };

	let _ = verify_name_error(&question, &nsec3s);
	let _ = verify_nodata(&question, &nsec3s);
	let _ = verify_delegation(&question.name, &nsec3s);
	let _ = verify_wildcard_nodata(&question, &nsec3s);
	for ancestor in question.name.suffixes().skip(1) {
		if let Ok(wildcard) = ancestor.wildcard_child() {
			let _ = verify_wildcard_answer(&question, &wildcard, &nsec3s);
		}
	}
}
