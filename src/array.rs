use core::{
	mem::{
		self,
		MaybeUninit
	},
	ptr,
	ops::{
		Deref,
		DerefMut
	},
	hash::{
		Hash,
		Hasher
	},
	iter::FromIterator,
	fmt,
	cmp
};
use crate::{
	error::{
		AllocError,
		handle_reserve
	},
	raw::RawStorage
};

/// Contiguous growable array type built directly on a [`RawStorage`].
///
/// The first `len` slots of the storage hold live values,
/// the remaining `capacity - len` slots are uninitialized.
/// Every construction and destruction of an element goes through this type,
/// the underlying storage never touches its content.
///
/// Growth follows a doubling policy: when an element is appended to a full array,
/// the capacity becomes `max(1, 2 * capacity)`.
///
/// # Examples
///
/// ```
/// # use dyn_array::DynArray;
/// let mut array = DynArray::new();
/// array.push(1);
/// array.push(2);
/// array.push(3);
/// assert_eq!(array, [1, 2, 3]);
///
/// array.pop();
/// array.resize(5);
/// assert_eq!(array, [1, 2, 0, 0, 0]);
/// ```
pub struct DynArray<T> {
	/// Slots of the array.
	storage: RawStorage<T>,

	/// Number of live values at the beginning of `storage`.
	len: usize
}

impl<T> Drop for DynArray<T> {
	fn drop(&mut self) {
		unsafe {
			// drop every element, the storage frees the memory afterward.
			ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.storage.as_mut_ptr(), self.len))
		}
	}
}

impl<T> Default for DynArray<T> {
	#[inline]
	fn default() -> Self {
		Self::new()
	}
}

impl<T> DynArray<T> {
	/// Creates a new empty `DynArray`.
	///
	/// The array will not allocate until elements are pushed onto it.
	#[inline]
	pub const fn new() -> Self {
		DynArray {
			storage: RawStorage::new(),
			len: 0
		}
	}

	/// Creates a new empty `DynArray` with exactly the given capacity.
	#[inline]
	pub fn with_capacity(capacity: usize) -> Self {
		handle_reserve(Self::try_with_capacity(capacity))
	}

	/// The same as `with_capacity`, but returns on errors instead of panicking or aborting.
	#[inline]
	pub fn try_with_capacity(capacity: usize) -> Result<Self, AllocError> {
		Ok(DynArray {
			storage: RawStorage::try_with_capacity(capacity)?,
			len: 0
		})
	}

	/// Creates an array of `len` elements, each produced by calling `f`.
	///
	/// The storage is sized to exactly `len`.
	/// If `f` panics, the elements already produced by this call are dropped
	/// in reverse order and the storage is released before the panic propagates.
	pub fn with_len_with<F>(len: usize, f: F) -> Self where F: FnMut() -> T {
		handle_reserve(Self::try_with_len_with(len, f))
	}

	/// The same as `with_len_with`, but returns on allocation errors instead of panicking or aborting.
	pub fn try_with_len_with<F>(len: usize, mut f: F) -> Result<Self, AllocError> where F: FnMut() -> T {
		let mut storage = RawStorage::try_with_capacity(len)?;

		let mut guard = Rollback::new(&mut storage);
		for _ in 0..len {
			guard.write(f());
		}
		guard.commit();

		Ok(DynArray {
			storage,
			len
		})
	}

	/// Moves the content of this array out, leaving it empty with no capacity.
	///
	/// This is equivalent to `std::mem::take(self)`.
	#[inline]
	pub fn take(&mut self) -> Self {
		mem::take(self)
	}

	/// Exchanges the contents (storage and length) of two arrays.
	///
	/// This is the move-assignment primitive:
	/// after the call `other` holds what `self` previously held,
	/// and will drop it when it goes out of scope.
	#[inline]
	pub fn swap_with(&mut self, other: &mut Self) {
		mem::swap(self, other)
	}

	/// Returns a raw pointer to the array's buffer.
	///
	/// The caller must ensure that the array outlives the pointer this
	/// function returns, or else it will end up pointing to garbage.
	/// Modifying the array may cause its buffer to be reallocated,
	/// which would also make any pointers to it invalid.
	#[inline]
	pub fn as_ptr(&self) -> *const T {
		self.storage.as_ptr()
	}

	/// Returns an unsafe mutable pointer to the array's buffer.
	#[inline]
	pub fn as_mut_ptr(&mut self) -> *mut T {
		self.storage.as_mut_ptr()
	}

	/// Extracts a slice containing the entire array.
	///
	/// Equivalent to `&s[..]`.
	#[inline]
	pub fn as_slice(&self) -> &[T] {
		unsafe {
			std::slice::from_raw_parts(self.as_ptr(), self.len)
		}
	}

	/// Extracts a mutable slice of the entire array.
	///
	/// Equivalent to `&mut s[..]`.
	#[inline]
	pub fn as_mut_slice(&mut self) -> &mut [T] {
		unsafe {
			std::slice::from_raw_parts_mut(self.as_mut_ptr(), self.len)
		}
	}

	/// Returns the number of live elements in the array.
	#[inline]
	pub fn len(&self) -> usize {
		self.len
	}

	/// Returns `true` if the array contains no elements.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Forces the length of the array to `len`.
	///
	/// ## Safety
	///
	/// `len` must be lower or equal to the capacity,
	/// and the elements at `old_len..len` must be initialized.
	#[inline]
	pub unsafe fn set_len(&mut self, len: usize) {
		debug_assert!(len <= self.capacity());
		self.len = len
	}

	/// Returns the number of allocated slots, live or not.
	#[inline]
	pub fn capacity(&self) -> usize {
		self.storage.capacity()
	}

	/// Returns the remaining spare capacity of the array as a slice of
	/// `MaybeUninit<T>`.
	///
	/// The returned slice can be used to fill the array with data before
	/// marking the data as initialized using the [`set_len`] method.
	///
	/// [`set_len`]: DynArray::set_len
	#[inline]
	pub fn spare_capacity_mut(&mut self) -> &mut [MaybeUninit<T>] {
		let len = self.len;
		let spare = self.capacity() - len;
		unsafe {
			std::slice::from_raw_parts_mut(self.storage.slot_mut(len) as *mut MaybeUninit<T>, spare)
		}
	}

	/// Returns a reference to the element at `index`, without any bounds check.
	///
	/// This is the fast path for indexed reads.
	/// For a checked access use [`get`](slice::get) or the `[]` operator.
	///
	/// ## Safety
	///
	/// `index` must be lower than `self.len()`.
	#[inline]
	pub unsafe fn at_unchecked(&self, index: usize) -> &T {
		debug_assert!(index < self.len);
		&*self.storage.slot(index)
	}

	/// Returns a mutable reference to the element at `index`, without any bounds check.
	///
	/// ## Safety
	///
	/// `index` must be lower than `self.len()`.
	#[inline]
	pub unsafe fn at_unchecked_mut(&mut self, index: usize) -> &mut T {
		debug_assert!(index < self.len);
		&mut *self.storage.slot_mut(index)
	}

	/// Makes sure the array can hold at least `capacity` elements.
	///
	/// Unlike `Vec::reserve`, the argument is the total capacity and not an additional one.
	/// If `capacity` exceeds the current capacity, a storage of exactly `capacity` slots
	/// is allocated, the live elements are moved into it (in order)
	/// and the old storage is released. Otherwise this is a no-op.
	///
	/// # Panics
	///
	/// Panics if the new capacity overflows `isize::MAX` bytes.
	#[inline]
	pub fn reserve(&mut self, capacity: usize) {
		handle_reserve(self.try_reserve(capacity))
	}

	/// The same as `reserve`, but returns on errors instead of panicking or aborting.
	///
	/// On error, the array is left untouched.
	pub fn try_reserve(&mut self, capacity: usize) -> Result<(), AllocError> {
		if capacity <= self.capacity() {
			return Ok(())
		}

		let storage = RawStorage::try_with_capacity(capacity)?;
		self.relocate(storage);
		Ok(())
	}

	/// Shrinks the capacity of the array to its length.
	pub fn shrink_to_fit(&mut self) {
		if self.capacity() > self.len {
			let storage = RawStorage::with_capacity(self.len);
			self.relocate(storage);
		}
	}

	/// Moves the live elements into `storage`, and make it the array's storage.
	///
	/// The old storage (whose slots are all raw again) is released.
	fn relocate(&mut self, mut storage: RawStorage<T>) {
		debug_assert!(storage.capacity() >= self.len);

		trace!(from = self.capacity(), to = storage.capacity(), len = self.len, "relocating array storage");
		unsafe {
			// moving values is a bitwise copy and cannot fail.
			ptr::copy_nonoverlapping(self.storage.as_ptr(), storage.as_mut_ptr(), self.len);
		}

		self.storage.swap(&mut storage);
	}

	/// Grows the storage, if needed, so that `additional` more elements fit,
	/// never less than doubling the current capacity.
	fn try_reserve_amortized(&mut self, additional: usize) -> Result<(), AllocError> {
		let required = self.len.checked_add(additional).ok_or(AllocError::CapacityOverflow)?;

		if required <= self.capacity() {
			return Ok(())
		}

		// This guarantees exponential growth.
		let doubled = self.capacity().checked_mul(2).ok_or(AllocError::CapacityOverflow)?;
		self.try_reserve(cmp::max(1, cmp::max(doubled, required)))
	}

	/// Shortens the array, keeping the first `len` elements and dropping
	/// the rest.
	///
	/// If `len` is greater than the array's current length, this has no
	/// effect.
	///
	/// Note that this method has no effect on the allocated capacity
	/// of the array.
	#[inline]
	pub fn truncate(&mut self, len: usize) {
		unsafe {
			if len > self.len {
				return;
			}

			let remaining_len = self.len - len;
			let s = ptr::slice_from_raw_parts_mut(self.storage.slot_mut(len), remaining_len);
			self.len = len;
			ptr::drop_in_place(s);
		}
	}

	/// Clears the array, removing all values.
	///
	/// Note that this method has no effect on the allocated capacity
	/// of the array.
	#[inline]
	pub fn clear(&mut self) {
		self.truncate(0)
	}

	/// Resizes the array in-place so that `len` is equal to `new_len`.
	///
	/// If `new_len` is greater than `len`, the array is extended by the
	/// difference, with each additional slot filled with the result of
	/// calling the closure `f`.
	/// If `new_len` is less than `len`, the array is simply truncated.
	///
	/// If `f` panics, the array keeps every element constructed so far.
	pub fn resize_with<F>(&mut self, new_len: usize, f: F) where F: FnMut() -> T {
		self.reserve(new_len);

		let len = self.len;
		if new_len > len {
			self.extend_with(new_len - len, ExtendFunc(f))
		} else {
			self.truncate(new_len);
		}
	}

	/// Appends an element to the back of the array.
	///
	/// If the array is full, its capacity is doubled first (or set to 1 if it was 0).
	///
	/// # Panics
	///
	/// Panics if the new capacity overflows `isize::MAX` bytes.
	#[inline]
	pub fn push(&mut self, value: T) {
		handle_reserve(self.try_push(value))
	}

	/// The same as `push`, but returns on errors instead of panicking or aborting.
	///
	/// On error, `value` is dropped and the array is left untouched.
	#[inline]
	pub fn try_push(&mut self, value: T) -> Result<(), AllocError> {
		if self.len == self.capacity() {
			self.try_reserve_amortized(1)?;
		}

		unsafe {
			self.storage.slot_mut(self.len).write(value);
		}
		self.len += 1;
		Ok(())
	}

	/// Constructs a new element at the back of the array, directly in its slot,
	/// and returns a reference to it.
	///
	/// Same growth policy as [`push`](DynArray::push).
	/// If `f` panics, the array is left with its previous elements
	/// (but possibly a grown capacity).
	///
	/// ```
	/// # use dyn_array::DynArray;
	/// let mut names: DynArray<String> = DynArray::new();
	/// let name = names.emplace(|| "Ferris".to_string());
	/// name.push_str(" the crab");
	/// assert_eq!(names[0], "Ferris the crab");
	/// ```
	pub fn emplace<F>(&mut self, f: F) -> &mut T where F: FnOnce() -> T {
		if self.len == self.capacity() {
			handle_reserve(self.try_reserve_amortized(1));
		}

		unsafe {
			let slot = self.storage.slot_mut(self.len);
			slot.write(f());
			self.len += 1;
			&mut *slot
		}
	}

	/// Removes the last element from the array and returns it, or [`None`] if it
	/// is empty.
	#[inline]
	pub fn pop(&mut self) -> Option<T> {
		if self.len == 0 {
			None
		} else {
			unsafe {
				Some(self.pop_unchecked())
			}
		}
	}

	/// Removes the last element from the array and returns it, without checking
	/// that there is one.
	///
	/// ## Safety
	///
	/// The array must not be empty.
	#[inline]
	pub unsafe fn pop_unchecked(&mut self) -> T {
		debug_assert!(self.len > 0);
		self.len -= 1;
		ptr::read(self.storage.slot(self.len))
	}

	/// Extend the array by `n` values, using the given generator.
	///
	/// The caller is expected to have reserved enough room beforehand
	/// if a particular growth policy is wanted.
	fn extend_with<E: ExtendWith<T>>(&mut self, n: usize, mut value: E) {
		let required = match self.len.checked_add(n) {
			Some(required) => required,
			None => crate::error::capacity_overflow()
		};
		self.reserve(required);

		unsafe {
			let mut ptr = self.storage.slot_mut(self.len);
			// Use SetLenOnDrop to work around bug where compiler
			// may not realize the store through `ptr` through self.set_len()
			// don't alias.
			let mut local_len = SetLenOnDrop::new(&mut self.len);

			for _ in 0..n {
				ptr::write(ptr, value.next());
				ptr = ptr.add(1);
				// Increment the length in every step in case next() panics
				local_len.increment_len(1);
			}

			// len set by scope guard
		}
	}
}

impl<T: Default> DynArray<T> {
	/// Creates an array of `len` default values.
	///
	/// The storage is sized to exactly `len`.
	/// If `T::default` panics, the elements already constructed are dropped
	/// in reverse order before the panic propagates.
	///
	/// ```
	/// # use dyn_array::DynArray;
	/// let array: DynArray<u32> = DynArray::with_len(3);
	/// assert_eq!(array, [0, 0, 0]);
	/// assert_eq!(array.capacity(), 3);
	/// ```
	#[inline]
	pub fn with_len(len: usize) -> Self {
		Self::with_len_with(len, T::default)
	}

	/// The same as `with_len`, but returns on allocation errors instead of panicking or aborting.
	#[inline]
	pub fn try_with_len(len: usize) -> Result<Self, AllocError> {
		Self::try_with_len_with(len, T::default)
	}

	/// Resizes the array in-place so that `len` is equal to `new_len`,
	/// filling new slots with `T::default()`.
	///
	/// The capacity is first raised to `new_len` (exactly) if needed.
	#[inline]
	pub fn resize(&mut self, new_len: usize) {
		self.resize_with(new_len, T::default)
	}
}

impl<T: Clone> DynArray<T> {
	/// Clones and appends all elements in a slice to the array.
	///
	/// The capacity is raised following the doubling policy if needed.
	pub fn extend_from_slice(&mut self, other: &[T]) {
		handle_reserve(self.try_reserve_amortized(other.len()));
		self.extend_with(other.len(), ExtendClone(other.iter()))
	}

	/// Clones the slice into a new array whose capacity is exactly `s.len()`.
	///
	/// If a clone panics, the clones already made are dropped in reverse order.
	fn from_slice(s: &[T]) -> Self {
		let mut storage = RawStorage::with_capacity(s.len());

		let mut guard = Rollback::new(&mut storage);
		for item in s {
			guard.write(item.clone());
		}
		guard.commit();

		DynArray {
			storage,
			len: s.len()
		}
	}
}

/// Destroys, in reverse order, the values written into a storage
/// unless the construction is committed.
///
/// Used by bulk constructions so that a panicking constructor
/// leaves no partially built array behind.
struct Rollback<'a, T> {
	storage: &'a mut RawStorage<T>,
	written: usize
}

impl<'a, T> Rollback<'a, T> {
	#[inline]
	fn new(storage: &'a mut RawStorage<T>) -> Self {
		Rollback {
			storage,
			written: 0
		}
	}

	#[inline]
	fn write(&mut self, value: T) {
		assert!(self.written < self.storage.capacity());
		unsafe {
			self.storage.slot_mut(self.written).write(value);
		}
		self.written += 1;
	}

	#[inline]
	fn commit(self) {
		mem::forget(self)
	}
}

impl<'a, T> Drop for Rollback<'a, T> {
	fn drop(&mut self) {
		debug!(written = self.written, "rolling back partial construction");
		for i in (0..self.written).rev() {
			unsafe {
				ptr::drop_in_place(self.storage.slot_mut(i))
			}
		}
	}
}

// Set the length of the array when the `SetLenOnDrop` value goes out of scope.
//
// The idea is: The length field in SetLenOnDrop is a local variable
// that the optimizer will see does not alias with any stores through the array's data
// pointer. This is a workaround for alias analysis issue #32155
struct SetLenOnDrop<'a> {
	len: &'a mut usize,
	local_len: usize,
}

impl<'a> SetLenOnDrop<'a> {
	#[inline]
	fn new(len: &'a mut usize) -> Self {
		SetLenOnDrop { local_len: *len, len }
	}

	#[inline]
	fn increment_len(&mut self, increment: usize) {
		self.local_len += increment;
	}
}

impl Drop for SetLenOnDrop<'_> {
	#[inline]
	fn drop(&mut self) {
		*self.len = self.local_len;
	}
}

// This code generalizes `extend_with_{clone,func}`.
trait ExtendWith<T> {
	fn next(&mut self) -> T;
}

struct ExtendClone<'s, T>(std::slice::Iter<'s, T>);
impl<'s, T: Clone> ExtendWith<T> for ExtendClone<'s, T> {
	fn next(&mut self) -> T {
		match self.0.next() {
			Some(item) => item.clone(),
			None => unreachable!("slice shorter than announced")
		}
	}
}

struct ExtendFunc<F>(F);
impl<T, F: FnMut() -> T> ExtendWith<T> for ExtendFunc<F> {
	fn next(&mut self) -> T {
		(self.0)()
	}
}

impl<T: Clone> Clone for DynArray<T> {
	/// Clones the array into a new storage of capacity `self.len()`.
	fn clone(&self) -> DynArray<T> {
		DynArray::from_slice(self)
	}

	/// Copy-assignment.
	///
	/// If `self` does not have the capacity to hold every element of `source`,
	/// a full copy of `source` is built first and then swapped in:
	/// if a clone panics, `self` is left untouched.
	///
	/// Otherwise the elements already live in `self` are reused:
	/// the common prefix is assigned with [`Clone::clone_from`],
	/// surplus elements are dropped and missing ones are cloned into the raw slots.
	/// The capacity is unchanged in this case.
	fn clone_from(&mut self, source: &Self) {
		if self.capacity() < source.len {
			let mut copy = source.clone();
			self.swap_with(&mut copy);
			return
		}

		let common = cmp::min(self.len, source.len);
		self.as_mut_slice()[..common].clone_from_slice(&source[..common]);

		if source.len < self.len {
			self.truncate(source.len)
		} else {
			self.extend_with(source.len - common, ExtendClone(source[common..].iter()))
		}
	}
}

impl<T> Deref for DynArray<T> {
	type Target = [T];

	#[inline]
	fn deref(&self) -> &[T] {
		self.as_slice()
	}
}

impl<T> DerefMut for DynArray<T> {
	#[inline]
	fn deref_mut(&mut self) -> &mut [T] {
		self.as_mut_slice()
	}
}

impl<'v, T> IntoIterator for &'v DynArray<T> {
	type Item = &'v T;
	type IntoIter = std::slice::Iter<'v, T>;

	fn into_iter(self) -> Self::IntoIter {
		self.as_slice().iter()
	}
}

impl<'v, T> IntoIterator for &'v mut DynArray<T> {
	type Item = &'v mut T;
	type IntoIter = std::slice::IterMut<'v, T>;

	fn into_iter(self) -> Self::IntoIter {
		self.as_mut_slice().iter_mut()
	}
}

/// An iterator that moves out of a [`DynArray`].
///
/// The elements not yet yielded are dropped with the iterator.
pub struct IntoIter<T> {
	storage: RawStorage<T>,
	offset: usize,
	end: usize
}

impl<T> IntoIter<T> {
	/// Returns the remaining elements as a slice.
	#[inline]
	pub fn as_slice(&self) -> &[T] {
		unsafe {
			std::slice::from_raw_parts(self.storage.slot(self.offset), self.end - self.offset)
		}
	}
}

impl<T> Iterator for IntoIter<T> {
	type Item = T;

	#[inline]
	fn next(&mut self) -> Option<T> {
		if self.offset < self.end {
			let i = self.offset;
			self.offset += 1;
			unsafe {
				Some(ptr::read(self.storage.slot(i)))
			}
		} else {
			None
		}
	}

	#[inline]
	fn size_hint(&self) -> (usize, Option<usize>) {
		let len = self.end - self.offset;
		(len, Some(len))
	}
}

impl<T> DoubleEndedIterator for IntoIter<T> {
	#[inline]
	fn next_back(&mut self) -> Option<T> {
		if self.offset < self.end {
			self.end -= 1;
			unsafe {
				Some(ptr::read(self.storage.slot(self.end)))
			}
		} else {
			None
		}
	}
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
	fn drop(&mut self) {
		unsafe {
			// only drop remaining elements, the storage frees the memory.
			let remaining = self.end - self.offset;
			ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.storage.slot_mut(self.offset), remaining))
		}
	}
}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
	}
}

impl<T> IntoIterator for DynArray<T> {
	type Item = T;
	type IntoIter = IntoIter<T>;

	fn into_iter(mut self) -> Self::IntoIter {
		let storage = self.storage.take();
		let end = self.len;
		self.len = 0; // there is nothing left to drop in `self`.

		IntoIter {
			storage,
			offset: 0,
			end
		}
	}
}

impl<T> Extend<T> for DynArray<T> {
	fn extend<I: IntoIterator<Item = T>>(&mut self, iterator: I) {
		let iterator = iterator.into_iter();
		let (lower, _) = iterator.size_hint();
		handle_reserve(self.try_reserve_amortized(lower));

		for item in iterator {
			self.push(item)
		}
	}
}

impl<'a, T: Copy + 'a> Extend<&'a T> for DynArray<T> {
	fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iterator: I) {
		self.extend(iterator.into_iter().copied())
	}
}

impl<T> FromIterator<T> for DynArray<T> {
	fn from_iter<I: IntoIterator<Item = T>>(iterator: I) -> Self {
		let mut array = DynArray::new();
		array.extend(iterator);
		array
	}
}

impl<T: fmt::Debug> fmt::Debug for DynArray<T> {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(&**self, f)
	}
}

impl<T: Hash> Hash for DynArray<T> {
	#[inline]
	fn hash<H: Hasher>(&self, state: &mut H) {
		Hash::hash(&**self, state)
	}
}

impl<T> AsRef<[T]> for DynArray<T> {
	#[inline]
	fn as_ref(&self) -> &[T] {
		self
	}
}

impl<T> AsMut<[T]> for DynArray<T> {
	#[inline]
	fn as_mut(&mut self) -> &mut [T] {
		self
	}
}

impl<'a, T: Clone> From<&'a [T]> for DynArray<T> {
	#[inline]
	fn from(s: &'a [T]) -> DynArray<T> {
		DynArray::from_slice(s)
	}
}

impl<T, const N: usize> From<[T; N]> for DynArray<T> {
	fn from(array: [T; N]) -> DynArray<T> {
		let mut result = DynArray::with_capacity(N);
		result.extend(IntoIterator::into_iter(array));
		result
	}
}

impl<T> From<Vec<T>> for DynArray<T> {
	fn from(vec: Vec<T>) -> DynArray<T> {
		let mut result = DynArray::with_capacity(vec.len());
		result.extend(vec);
		result
	}
}

macro_rules! impl_slice_eq1 {
	([$($vars:tt)*] $lhs:ty, $rhs:ty) => {
		impl<$($vars)*> PartialEq<$rhs> for $lhs where T: PartialEq<U> {
			#[inline]
			fn eq(&self, other: &$rhs) -> bool { self[..] == other[..] }
		}
	}
}

impl_slice_eq1! { [T, U] DynArray<T>, DynArray<U> }
impl_slice_eq1! { [T, U] DynArray<T>, Vec<U> }
impl_slice_eq1! { [T, U] Vec<T>, DynArray<U> }
impl_slice_eq1! { [T, U] DynArray<T>, &[U] }
impl_slice_eq1! { [T, U] DynArray<T>, &mut [U] }
impl_slice_eq1! { [T, U] &[T], DynArray<U> }
impl_slice_eq1! { [T, U, const O: usize] DynArray<T>, [U; O] }
impl_slice_eq1! { [T, U, const O: usize] DynArray<T>, &[U; O] }
impl_slice_eq1! { [T, U, const O: usize] [T; O], DynArray<U> }

impl<T: Eq> Eq for DynArray<T> {}

#[cfg(test)]
mod tests {
	use super::*;
	use std::{
		cell::Cell,
		panic::{
			self,
			AssertUnwindSafe
		},
		rc::Rc
	};

	/// Counts live instances through a shared counter.
	#[derive(Debug)]
	struct Counted {
		value: u32,
		live: Rc<Cell<isize>>
	}

	impl Counted {
		fn new(value: u32, live: &Rc<Cell<isize>>) -> Self {
			live.set(live.get() + 1);
			Counted { value, live: live.clone() }
		}
	}

	impl Clone for Counted {
		fn clone(&self) -> Self {
			Counted::new(self.value, &self.live)
		}
	}

	impl Drop for Counted {
		fn drop(&mut self) {
			self.live.set(self.live.get() - 1);
		}
	}

	#[test]
	fn new_does_not_allocate() {
		let array: DynArray<String> = DynArray::new();
		assert_eq!(array.len(), 0);
		assert_eq!(array.capacity(), 0);
		assert!(array.is_empty());
	}

	#[test]
	fn push_pop_resize_assign() {
		let mut array: DynArray<i32> = DynArray::new();
		array.push(1);
		array.push(2);
		array.push(3);
		assert_eq!(array.len(), 3);
		assert!(array.capacity() >= 3);
		assert_eq!(array, [1, 2, 3]);

		array.pop();
		assert_eq!(array.len(), 2);
		assert_eq!(array[1], 2);

		array.resize(5);
		assert_eq!(array.len(), 5);
		assert_eq!(array, [1, 2, 0, 0, 0]);

		let capacity = array.capacity();
		let nines: DynArray<i32> = DynArray::from([9, 9]);
		array.clone_from(&nines);
		assert_eq!(array, [9, 9]);
		assert_eq!(array.capacity(), capacity);
	}

	#[test]
	fn doubling_growth() {
		let mut array = DynArray::new();
		let mut capacities = Vec::new();
		for i in 0..100u32 {
			array.push(i);
			if capacities.last() != Some(&array.capacity()) {
				capacities.push(array.capacity())
			}
		}

		assert_eq!(capacities, [1, 2, 4, 8, 16, 32, 64, 128]);
	}

	#[test]
	fn reserve_is_exact() {
		let mut array: DynArray<u8> = DynArray::new();
		array.reserve(10);
		assert_eq!(array.capacity(), 10);

		array.reserve(4);
		assert_eq!(array.capacity(), 10);

		array.extend_from_slice(b"abc");
		array.reserve(11);
		assert_eq!(array.capacity(), 11);
		assert_eq!(array, *b"abc");
	}

	#[test]
	fn try_reserve_overflow_leaves_array_untouched() {
		let mut array: DynArray<u64> = DynArray::from([1, 2, 3]);
		let ptr = array.as_ptr();

		assert_eq!(array.try_reserve(usize::MAX), Err(AllocError::CapacityOverflow));
		assert_eq!(array, [1, 2, 3]);
		assert_eq!(array.capacity(), 3);
		assert_eq!(array.as_ptr(), ptr);
	}

	#[test]
	fn try_push_grows() {
		let mut array = DynArray::new();
		assert_eq!(array.try_push('a'), Ok(()));
		assert_eq!(array.try_push('b'), Ok(()));
		assert_eq!(array.try_push('c'), Ok(()));
		assert_eq!(array, ['a', 'b', 'c']);
		assert_eq!(array.capacity(), 4);
	}

	#[test]
	fn emplace_returns_new_element() {
		let mut array: DynArray<(u8, char)> = DynArray::new();
		let (n, c) = array.emplace(|| (1, 'a'));
		*n += 1;
		*c = 'b';
		assert_eq!(array, [(2, 'b')]);
		assert_eq!(array.capacity(), 1);
	}

	#[test]
	fn unchecked_access() {
		let mut array = DynArray::from([10, 20, 30]);
		unsafe {
			assert_eq!(*array.at_unchecked(2), 30);
			*array.at_unchecked_mut(0) = 5;
			assert_eq!(array.pop_unchecked(), 30);
		}
		assert_eq!(array, [5, 20]);
		assert_eq!(array.get(2), None);
		assert_eq!(array.pop(), Some(20));
		assert_eq!(array.pop(), Some(5));
		assert_eq!(array.pop(), None);
	}

	#[test]
	fn clone_is_independent() {
		let a = DynArray::from(vec!["x".to_string(), "y".to_string()]);
		let mut b = a.clone();
		assert_eq!(a, b);
		assert_eq!(b.capacity(), 2);

		b[0].push('!');
		b.push("z".to_string());
		assert_eq!(a, ["x", "y"]);
		assert_eq!(b, ["x!", "y", "z"]);
	}

	#[test]
	fn take_leaves_source_empty() {
		let mut a = DynArray::from([1, 2, 3]);
		let b = a.take();
		assert_eq!(b, [1, 2, 3]);
		assert_eq!(a.len(), 0);
		assert_eq!(a.capacity(), 0);

		a.push(4);
		assert_eq!(a, [4]);
	}

	#[test]
	fn swap_with_moves_previous_content_out() {
		let live = Rc::new(Cell::new(0));
		let mut a: DynArray<Counted> = (0..3).map(|i| Counted::new(i, &live)).collect();
		let mut b: DynArray<Counted> = (10..12).map(|i| Counted::new(i, &live)).collect();

		a.swap_with(&mut b);
		assert_eq!(a.iter().map(|c| c.value).collect::<Vec<_>>(), [10, 11]);
		assert_eq!(b.len(), 3);

		drop(b);
		assert_eq!(live.get(), 2);
		drop(a);
		assert_eq!(live.get(), 0);
	}

	#[test]
	fn clone_from_with_insufficient_capacity() {
		let mut a = DynArray::from([1]);
		let b = DynArray::from([4, 5, 6, 7]);
		a.clone_from(&b);
		assert_eq!(a, [4, 5, 6, 7]);
		assert_eq!(a.capacity(), 4);
	}

	#[test]
	fn clone_from_reuses_live_elements() {
		let mut a: DynArray<String> = DynArray::with_capacity(8);
		a.push(String::with_capacity(64));
		let reused = a[0].as_ptr();

		let b = DynArray::from(["hello".to_string(), "world".to_string()]);
		a.clone_from(&b);
		assert_eq!(a, ["hello", "world"]);
		assert_eq!(a.capacity(), 8);
		// `String::clone_from` reuses the existing buffer.
		assert_eq!(a[0].as_ptr(), reused);
	}

	#[test]
	fn clone_from_drops_surplus() {
		let live = Rc::new(Cell::new(0));
		let mut a: DynArray<Counted> = (0..5).map(|i| Counted::new(i, &live)).collect();
		let b: DynArray<Counted> = (7..9).map(|i| Counted::new(i, &live)).collect();
		assert_eq!(live.get(), 7);

		a.clone_from(&b);
		assert_eq!(a.iter().map(|c| c.value).collect::<Vec<_>>(), [7, 8]);
		assert_eq!(live.get(), 4);
	}

	#[test]
	fn resize_truncates_and_fills() {
		let live = Rc::new(Cell::new(0));
		let mut array = DynArray::new();
		array.resize_with(6, || Counted::new(1, &live));
		assert_eq!(live.get(), 6);
		assert_eq!(array.capacity(), 6);

		array.resize_with(2, || Counted::new(2, &live));
		assert_eq!(array.len(), 2);
		assert_eq!(live.get(), 2);

		array.resize_with(4, || Counted::new(3, &live));
		assert_eq!(array.iter().map(|c| c.value).collect::<Vec<_>>(), [1, 1, 3, 3]);
		assert_eq!(array.capacity(), 6);
	}

	#[test]
	fn with_len_rolls_back_on_panic() {
		let live = Rc::new(Cell::new(0));
		let mut calls = 0;

		let result = panic::catch_unwind(AssertUnwindSafe(|| {
			DynArray::with_len_with(10, || {
				calls += 1;
				if calls == 4 {
					panic!("fourth construction fails")
				}
				Counted::new(calls, &live)
			})
		}));

		assert!(result.is_err());
		assert_eq!(calls, 4);
		assert_eq!(live.get(), 0);
	}

	#[test]
	fn resize_keeps_constructed_prefix_on_panic() {
		let mut array = DynArray::from([1u32, 2]);
		let mut next = 2;

		let result = panic::catch_unwind(AssertUnwindSafe(|| {
			array.resize_with(6, || {
				next += 1;
				if next == 5 {
					panic!("boom")
				}
				next
			})
		}));

		assert!(result.is_err());
		assert_eq!(array, [1, 2, 3, 4]);
	}

	#[test]
	fn into_iter_drops_remaining() {
		let live = Rc::new(Cell::new(0));
		let array: DynArray<Counted> = (0..5).map(|i| Counted::new(i, &live)).collect();

		let mut iter = array.into_iter();
		assert_eq!(iter.len(), 5);
		assert_eq!(iter.next().map(|c| c.value), Some(0));
		assert_eq!(iter.next_back().map(|c| c.value), Some(4));
		assert_eq!(iter.as_slice().len(), 3);
		assert_eq!(live.get(), 3);

		drop(iter);
		assert_eq!(live.get(), 0);
	}

	#[test]
	fn shrink_to_fit() {
		let values: [u16; 3] = [1, 2, 3];
		let mut array: DynArray<u16> = DynArray::with_capacity(32);
		array.extend(values.iter());
		array.shrink_to_fit();
		assert_eq!(array.capacity(), 3);
		assert_eq!(array, [1, 2, 3]);
	}

	#[test]
	fn spare_capacity() {
		let mut array: DynArray<u8> = DynArray::with_capacity(4);
		array.push(1);

		let spare = array.spare_capacity_mut();
		assert_eq!(spare.len(), 3);
		spare[0] = MaybeUninit::new(2);
		unsafe {
			array.set_len(2);
		}
		assert_eq!(array, [1, 2]);
	}

	#[test]
	fn zero_sized_elements() {
		let mut array = DynArray::new();
		for _ in 0..10 {
			array.push(());
		}
		assert_eq!(array.len(), 10);
		assert_eq!(array.capacity(), 16);
		assert_eq!(array.pop(), Some(()));
		assert_eq!(array.into_iter().count(), 9);
	}

	#[test]
	fn debug_and_hash() {
		use std::collections::hash_map::DefaultHasher;

		let array = DynArray::from([1, 2]);
		assert_eq!(format!("{:?}", array), "[1, 2]");

		let mut a = DefaultHasher::new();
		let mut b = DefaultHasher::new();
		array.hash(&mut a);
		[1, 2][..].hash(&mut b);
		assert_eq!(a.finish(), b.finish());
	}
}
