use std::alloc::{
	Layout,
	handle_alloc_error
};
use thiserror::Error;

/// Error returned by the fallible (`try_*`) allocation operations.
///
/// Whenever one of these is returned, the container it came from is left
/// exactly as it was before the call.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
	/// The requested capacity does not fit in a valid memory layout
	/// (more than `isize::MAX` bytes, or an arithmetic overflow).
	#[error("capacity overflow")]
	CapacityOverflow,

	/// The global allocator could not satisfy the request.
	#[error("memory allocation of {} bytes failed", .layout.size())]
	AllocFailed {
		layout: Layout
	}
}

/// Error returned when reading an empty [`Slot`](crate::Slot) through its checked accessors.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("bad slot access: the slot holds no value")]
pub struct EmptySlotError;

// Central function for reserve error handling.
#[inline]
pub(crate) fn handle_reserve<T>(result: Result<T, AllocError>) -> T {
	match result {
		Err(AllocError::CapacityOverflow) => capacity_overflow(),
		Err(AllocError::AllocFailed { layout }) => handle_alloc_error(layout),
		Ok(t) => t
	}
}

// We need to guarantee the following:
// * We don't ever allocate `> isize::MAX` byte-size objects.
// * We don't overflow `usize::MAX` and actually allocate too little.
//
// On 64-bit we just need to check for overflow since trying to allocate
// `> isize::MAX` bytes will surely fail. On 32-bit and 16-bit we need to add
// an extra guard for this in case we're running on a platform which can use
// all 4GB in user-space, e.g., PAE or x32.
#[inline]
pub(crate) fn alloc_guard(alloc_size: usize) -> Result<(), AllocError> {
	if usize::BITS < 64 && alloc_size > isize::MAX as usize {
		Err(AllocError::CapacityOverflow)
	} else {
		Ok(())
	}
}

// One central function responsible for reporting capacity overflows. This'll
// ensure that the code generation related to these panics is minimal as there's
// only one location which panics rather than a bunch throughout the module.
#[cold]
pub(crate) fn capacity_overflow() -> ! {
	panic!("capacity overflow");
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn messages() {
		assert_eq!(AllocError::CapacityOverflow.to_string(), "capacity overflow");

		let layout = Layout::array::<u64>(4).unwrap();
		assert_eq!(AllocError::AllocFailed { layout }.to_string(), "memory allocation of 32 bytes failed");
		assert_eq!(EmptySlotError.to_string(), "bad slot access: the slot holds no value");
	}

	#[test]
	#[should_panic(expected = "capacity overflow")]
	fn overflow_panics() {
		handle_reserve::<()>(Err(AllocError::CapacityOverflow))
	}

	#[test]
	fn guard_accepts_small_sizes() {
		assert_eq!(alloc_guard(1024), Ok(()));
	}
}
