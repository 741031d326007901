use core::{
	mem::{
		self,
		MaybeUninit
	},
	ptr,
	fmt
};
use crate::error::EmptySlotError;

/// Inline storage for at most one value of `T`.
///
/// The value lives directly inside the slot (no allocation), in memory that is
/// left uninitialized while the slot is empty.
/// Just like [`DynArray`](crate::DynArray), the fast accessors are unchecked
/// and the checked ones are provided alongside.
///
/// ```
/// # use dyn_array::Slot;
/// let mut slot = Slot::new();
/// assert!(slot.value().is_err());
///
/// slot.set(String::from("crab"));
/// slot.value_mut().unwrap().push('s');
/// assert_eq!(slot.value().unwrap(), "crabs");
///
/// slot.reset();
/// assert!(!slot.has_value());
/// ```
pub struct Slot<T> {
	/// Value storage, initialized iff `defined` is `true`.
	data: MaybeUninit<T>,

	defined: bool
}

impl<T> Drop for Slot<T> {
	fn drop(&mut self) {
		self.reset()
	}
}

impl<T> Default for Slot<T> {
	#[inline]
	fn default() -> Self {
		Self::new()
	}
}

impl<T> Slot<T> {
	/// Creates an empty slot.
	#[inline]
	pub const fn new() -> Self {
		Slot {
			data: MaybeUninit::uninit(),
			defined: false
		}
	}

	/// Returns `true` if the slot holds a value.
	#[inline]
	pub fn has_value(&self) -> bool {
		self.defined
	}

	/// Stores `value` in the slot.
	///
	/// If the slot already holds a value, `value` is assigned to it
	/// (the previous value is dropped), otherwise it is constructed in place.
	#[inline]
	pub fn set(&mut self, value: T) {
		if self.defined {
			unsafe {
				*self.get_unchecked_mut() = value
			}
		} else {
			self.data.write(value);
			self.defined = true;
		}
	}

	/// Drops the value held by the slot, if any.
	#[inline]
	pub fn reset(&mut self) {
		if self.defined {
			// mark as empty first, in case the destructor panics.
			self.defined = false;
			unsafe {
				ptr::drop_in_place(self.data.as_mut_ptr())
			}
		}
	}

	/// Moves the value out of the slot, leaving it empty.
	#[inline]
	pub fn take(&mut self) -> Option<T> {
		if self.defined {
			self.defined = false;
			unsafe {
				Some(ptr::read(self.data.as_ptr()))
			}
		} else {
			None
		}
	}

	/// Returns a reference to the value, without checking that there is one.
	///
	/// ## Safety
	///
	/// The slot must hold a value.
	#[inline]
	pub unsafe fn get_unchecked(&self) -> &T {
		debug_assert!(self.defined);
		&*self.data.as_ptr()
	}

	/// Returns a mutable reference to the value, without checking that there is one.
	///
	/// ## Safety
	///
	/// The slot must hold a value.
	#[inline]
	pub unsafe fn get_unchecked_mut(&mut self) -> &mut T {
		debug_assert!(self.defined);
		&mut *self.data.as_mut_ptr()
	}

	/// Returns a reference to the value, or an error if the slot is empty.
	#[inline]
	pub fn value(&self) -> Result<&T, EmptySlotError> {
		if self.defined {
			unsafe { Ok(self.get_unchecked()) }
		} else {
			Err(EmptySlotError)
		}
	}

	/// Returns a mutable reference to the value, or an error if the slot is empty.
	#[inline]
	pub fn value_mut(&mut self) -> Result<&mut T, EmptySlotError> {
		if self.defined {
			unsafe { Ok(self.get_unchecked_mut()) }
		} else {
			Err(EmptySlotError)
		}
	}

	/// Converts the slot into an `Option`.
	#[inline]
	pub fn into_option(mut self) -> Option<T> {
		let value = self.take();
		mem::forget(self); // the slot is empty now, there is nothing left to drop.
		value
	}
}

impl<T> From<T> for Slot<T> {
	#[inline]
	fn from(value: T) -> Self {
		let mut slot = Slot::new();
		slot.set(value);
		slot
	}
}

impl<T> From<Option<T>> for Slot<T> {
	#[inline]
	fn from(value: Option<T>) -> Self {
		match value {
			Some(value) => value.into(),
			None => Slot::new()
		}
	}
}

impl<T: Clone> Clone for Slot<T> {
	fn clone(&self) -> Self {
		match self.value() {
			Ok(value) => Slot::from(value.clone()),
			Err(_) => Slot::new()
		}
	}

	/// Reuses the value held by `self` when both slots are defined.
	fn clone_from(&mut self, source: &Self) {
		match source.value() {
			Ok(source) => {
				if self.defined {
					unsafe { self.get_unchecked_mut().clone_from(source) }
				} else {
					self.set(source.clone())
				}
			},
			Err(_) => self.reset()
		}
	}
}

impl<T: PartialEq> PartialEq for Slot<T> {
	fn eq(&self, other: &Self) -> bool {
		self.value().ok() == other.value().ok()
	}
}

impl<T: Eq> Eq for Slot<T> {}

impl<T: fmt::Debug> fmt::Debug for Slot<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.value() {
			Ok(value) => f.debug_tuple("Slot").field(value).finish(),
			Err(_) => f.write_str("Slot(<empty>)")
		}
	}
}
