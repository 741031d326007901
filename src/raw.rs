use core::{
	alloc::Layout,
	marker::PhantomData,
	mem,
	ptr::NonNull
};
use std::alloc;
use crate::error::{
	AllocError,
	alloc_guard,
	handle_reserve
};

/// A low-level utility owning a block of memory sized for exactly `capacity` values of `T`.
///
/// This type does not in anyway inspect the memory that it manages. When dropped it *will*
/// free its memory, but it *won't* try to drop its contents. It is up to the user of `RawStorage`
/// to handle the actual things *stored* inside of a `RawStorage`,
/// and to destroy every live value before the storage itself is dropped
/// (otherwise their destructors are simply never run).
///
/// A `RawStorage` cannot be cloned: without knowing which slots are live, there is nothing
/// meaningful to duplicate.
pub struct RawStorage<T> {
	/// Pointer to the first slot, dangling if nothing is allocated.
	ptr: NonNull<T>,

	/// Number of slots (not bytes).
	capacity: usize,

	/// The storage logically owns slots of `T`.
	marker: PhantomData<T>
}

unsafe impl<T: Send> Send for RawStorage<T> {}
unsafe impl<T: Sync> Sync for RawStorage<T> {}

impl<T> Drop for RawStorage<T> {
	fn drop(&mut self) {
		if let Some((ptr, layout)) = self.current_memory() {
			unsafe {
				alloc::dealloc(ptr.as_ptr(), layout)
			}
		}
	}
}

impl<T> Default for RawStorage<T> {
	#[inline]
	fn default() -> Self {
		Self::new()
	}
}

impl<T> RawStorage<T> {
	/// Creates an empty storage with no slot.
	///
	/// This does not allocate.
	#[inline]
	pub const fn new() -> Self {
		RawStorage {
			ptr: NonNull::dangling(),
			capacity: 0,
			marker: PhantomData
		}
	}

	/// Allocates a storage for exactly `capacity` values of `T`.
	///
	/// # Panics
	///
	/// Panics if the size of the block overflows `isize::MAX` bytes,
	/// and aborts through [`std::alloc::handle_alloc_error`] if the allocator fails.
	#[inline]
	pub fn with_capacity(capacity: usize) -> Self {
		handle_reserve(Self::try_with_capacity(capacity))
	}

	/// The same as `with_capacity`, but returns on errors instead of panicking or aborting.
	///
	/// Zero-sized types and a capacity of zero never allocate.
	pub fn try_with_capacity(capacity: usize) -> Result<Self, AllocError> {
		let layout = Self::layout_for(capacity)?;

		if layout.size() == 0 {
			return Ok(RawStorage {
				ptr: NonNull::dangling(),
				capacity,
				marker: PhantomData
			})
		}

		// SAFETY: the layout has a non-zero size.
		let ptr = unsafe { alloc::alloc(layout) };
		match NonNull::new(ptr as *mut T) {
			Some(ptr) => {
				trace!(capacity, bytes = layout.size(), "allocated raw storage");
				Ok(RawStorage {
					ptr,
					capacity,
					marker: PhantomData
				})
			},
			None => {
				debug!(capacity, bytes = layout.size(), "raw storage allocation failed");
				Err(AllocError::AllocFailed { layout })
			}
		}
	}

	fn layout_for(capacity: usize) -> Result<Layout, AllocError> {
		let layout = Layout::array::<T>(capacity).map_err(|_| AllocError::CapacityOverflow)?;
		alloc_guard(layout.size())?;
		Ok(layout)
	}

	/// Returns the current allocated memory and layout.
	///
	/// Returns `None` if nothing is allocated,
	/// or is the size of `T` is 0.
	fn current_memory(&self) -> Option<(NonNull<u8>, Layout)> {
		if mem::size_of::<T>() == 0 || self.capacity == 0 {
			None
		} else {
			// We have an allocated chunk of memory, so we can bypass runtime
			// checks to get our current layout.
			unsafe {
				let align = mem::align_of::<T>();
				let size = mem::size_of::<T>() * self.capacity;
				let layout = Layout::from_size_align_unchecked(size, align);
				Some((self.ptr.cast(), layout))
			}
		}
	}

	/// Number of slots in the storage.
	#[inline]
	pub fn capacity(&self) -> usize {
		self.capacity
	}

	/// Returns `true` if this storage holds an actual memory block.
	#[inline]
	pub fn is_allocated(&self) -> bool {
		self.current_memory().is_some()
	}

	/// Returns a raw pointer to the first slot.
	///
	/// The pointer is dangling (but well aligned) if nothing is allocated.
	#[inline]
	pub fn as_ptr(&self) -> *const T {
		self.ptr.as_ptr()
	}

	/// Returns a raw mutable pointer to the first slot.
	#[inline]
	pub fn as_mut_ptr(&mut self) -> *mut T {
		self.ptr.as_ptr()
	}

	/// Returns a pointer to the slot at `index`.
	///
	/// This is offset arithmetic only: the slot is neither checked nor initialized.
	///
	/// ## Safety
	///
	/// `index` must be lower or equal to the capacity.
	/// Reading through the pointer requires the slot to hold a live value.
	#[inline]
	pub unsafe fn slot(&self, index: usize) -> *const T {
		debug_assert!(index <= self.capacity);
		self.ptr.as_ptr().add(index)
	}

	/// Mutable version of [`slot`](RawStorage::slot).
	///
	/// ## Safety
	///
	/// `index` must be lower or equal to the capacity.
	#[inline]
	pub unsafe fn slot_mut(&mut self, index: usize) -> *mut T {
		debug_assert!(index <= self.capacity);
		self.ptr.as_ptr().add(index)
	}

	/// Exchanges the memory blocks of two storages.
	#[inline]
	pub fn swap(&mut self, other: &mut Self) {
		mem::swap(self, other)
	}

	/// Moves the memory block out of this storage, leaving it empty with a capacity of 0.
	#[inline]
	pub fn take(&mut self) -> Self {
		mem::replace(self, Self::new())
	}
}
