#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! A uniquely owning, type-erased handle to a heap-allocated value of any type.
//!
//! This crate provides [`ErasedBox`], a handle that can hold a boxed value of any `'static` type
//! without exposing that type in its own signature. It lets containers and APIs hold
//! heterogeneous owned values behind one handle type while still allowing checked recovery of
//! the original type.
//!
//! # Key Features
//!
//! - **Correct destruction**: The value is dropped as its original type, exactly once, when
//!   the handle is dropped, reset or assigned over.
//! - **Checked typed access**: Asking for the value as the wrong type returns
//!   [`Error::TypeMismatch`] instead of reinterpreting memory.
//! - **Unique ownership**: Handles cannot be copied or cloned, and every transfer of ownership
//!   leaves the source empty.
//! - **Release without destruction**: The value can be handed back to the caller as a pointer
//!   or a box.
//! - **Erased access**: [`Erased`] grants access to the address while skipping the type check.
//!
//! # Example
//!
//! ```rust
//! use erased_box::{Erased, ErasedBox, Error};
//!
//! struct Widget {
//!     id: u32,
//! }
//!
//! let mut handle = ErasedBox::from_value(Widget { id: 7 });
//!
//! // Typed access is checked against the type the handle was created with.
//! assert!(matches!(handle.get::<i32>(), Err(Error::TypeMismatch { .. })));
//! assert_eq!(handle.get::<Widget>().unwrap().map(|w| w.id), Some(7));
//!
//! // The erased address is always available.
//! let address = handle.ptr::<Erased>().unwrap();
//! assert_eq!(handle.ptr::<Widget>().unwrap().map(|p| p.cast::<Erased>()), address);
//!
//! // Replacing the value destroys the widget.
//! handle.reset_with(Box::new("something else"));
//! assert!(handle.is::<&str>());
//! ```
//!
//! # Raw pointers
//!
//! Handles can also be created from and released into raw pointers obtained from
//! [`Box::into_raw()`]. Creating a handle from a raw pointer is `unsafe` because the caller must
//! guarantee that nobody else owns the value. Two handles created from the same pointer, or a
//! handle created from a pointer into an array, are undefined behavior.
//!
//! ```rust
//! use erased_box::ErasedBox;
//!
//! let raw = Box::into_raw(Box::new(String::from("raw")));
//!
//! // SAFETY: The pointer comes straight from Box::into_raw and is not used elsewhere.
//! let mut handle = unsafe { ErasedBox::from_raw(raw) };
//!
//! let released = handle.release::<String>().unwrap().unwrap();
//! assert_eq!(released.as_ptr(), raw);
//! assert!(handle.is_empty());
//!
//! // SAFETY: We took ownership back from the handle and it came from a Box<String>.
//! let value = unsafe { Box::from_raw(released.as_ptr()) };
//! assert_eq!(*value, "raw");
//! ```

mod binding;
mod erased;
mod error;
mod handle;

pub(crate) use binding::*;
pub use erased::*;
pub use error::Error;
pub use handle::ErasedBox;
