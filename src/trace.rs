//! Internal logging shims.
//!
//! When the `tracing` feature is enabled these forward to the `tracing` crate,
//! otherwise they expand to nothing.

#[cfg(feature = "tracing")]
macro_rules! trace {
	($($arg:tt)*) => {
		tracing::trace!($($arg)*)
	}
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace {
	($($arg:tt)*) => {
		()
	}
}

#[cfg(feature = "tracing")]
macro_rules! debug {
	($($arg:tt)*) => {
		tracing::debug!($($arg)*)
	}
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug {
	($($arg:tt)*) => {
		()
	}
}
