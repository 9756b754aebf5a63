use crate::error::Result;
use crate::macros::err;

/// Creates a zeroed `Vec<u8>` of `expected_size` bytes, refusing sizes above `allocation_limit`
///
/// Chunk sizes come straight from the file, so the allocation is checked before it is attempted.
pub(crate) fn fallible_zeroed_vec(expected_size: usize, allocation_limit: usize) -> Result<Vec<u8>> {
	if expected_size == 0 {
		return Ok(Vec::new());
	}

	if expected_size > allocation_limit {
		log::warn!(
			"Refusing to allocate {expected_size} bytes (limit: {allocation_limit} bytes)"
		);
		err!(TooMuchData);
	}

	let mut content = Vec::new();
	content.try_reserve_exact(expected_size)?;
	content.resize(expected_size, 0);

	Ok(content)
}
