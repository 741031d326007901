//! This crate provides the
//! [`DynArray`](https://docs.rs/dyn-array/latest/dyn_array/array/struct.DynArray.html)
//! data structure: a contiguous growable array written from scratch on top of raw,
//! untyped memory.
//!
//! It is made of two layers:
//!  - [`RawStorage`] owns a block of uninitialized memory sized for a fixed number of
//!    values. It never constructs nor destroys any of them.
//!  - [`DynArray`] owns one `RawStorage` and tracks how many of its slots hold live values.
//!    It is responsible for every construction, destruction, clone and move of the elements,
//!    and for growing the storage.
//!
//! Additionally this crate provides a
//! [`Slot`](https://docs.rs/dyn-array/latest/dyn_array/slot/struct.Slot.html)
//! holding at most one value inline.
//!
//! ## Basic usage
//!
//! ```rust
//! use dyn_array::DynArray;
//!
//! let mut array = DynArray::new(); // does not allocate.
//! array.push(1);
//! array.push(2);
//! array.push(3);
//! assert_eq!(array.len(), 3);
//! assert!(array.capacity() >= 3);
//! assert_eq!(array, [1, 2, 3]);
//! ```
//!
//! The capacity doubles each time a full array is pushed onto,
//! but it can also be raised explicitly:
//! ```rust
//! # use dyn_array::DynArray;
//! let mut array: DynArray<u64> = DynArray::new();
//! array.reserve(100); // exactly 100 slots.
//! assert_eq!(array.capacity(), 100);
//! assert_eq!(array.len(), 0);
//! ```
//!
//! ## Unchecked accesses
//!
//! The primitive accessors [`DynArray::at_unchecked`] and [`DynArray::pop_unchecked`]
//! perform no check at all and are `unsafe`.
//! Their checked counterparts (`[]`, `get`, `pop`) are available as well.
//!
//! ## Features
//!
//! - `tracing` (default): emits `tracing` events when storage is allocated,
//!   relocated, or when an allocation fails.
#[macro_use]
mod trace;

pub mod error;
pub mod raw;
pub mod array;
pub mod slot;

pub use error::{
	AllocError,
	EmptySlotError
};
pub use raw::RawStorage;
pub use array::{
	DynArray,
	IntoIter
};
pub use slot::Slot;
