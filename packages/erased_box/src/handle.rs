use std::any::{self, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;
use std::ptr::NonNull;

use crate::error::Result;
use crate::{Binding, Erased, Error};

/// Uniquely owning handle to a heap-allocated value of any type.
///
/// The handle forgets the static type of its value but remembers how to destroy it as that
/// type, so the value is dropped correctly (and exactly once) when the handle is dropped,
/// reset or assigned over. The original type is also remembered, so that typed access can be
/// checked: asking for the value as any other type returns [`Error::TypeMismatch`].
///
/// A handle is either empty or holds exactly one value. There is no way to copy or clone a
/// handle, so no two live handles ever own the same value.
///
/// # Examples
///
/// ```
/// use erased_box::ErasedBox;
///
/// let mut handles = vec![
///     ErasedBox::from_value(42_u32),
///     ErasedBox::from_value("hello".to_string()),
///     ErasedBox::new(),
/// ];
///
/// assert_eq!(handles[0].get::<u32>().unwrap(), Some(&42));
/// assert!(handles[0].get::<String>().is_err());
/// assert_eq!(handles[1].get::<String>().unwrap().map(String::as_str), Some("hello"));
/// assert!(handles[2].is_empty());
///
/// // Take a value back out, leaving the handle empty.
/// let text = handles[1].release_box::<String>().unwrap().unwrap();
/// assert_eq!(*text, "hello");
/// assert!(handles[1].is_empty());
/// ```
///
/// # Thread safety
///
/// The handle is neither [`Send`] nor [`Sync`] because the value it holds may be of a type
/// that is neither.
pub struct ErasedBox {
    binding: Option<Binding>,
}

impl ErasedBox {
    /// Creates an empty handle.
    #[must_use]
    pub const fn new() -> Self {
        Self { binding: None }
    }

    /// Creates a handle that takes ownership of a boxed value.
    #[must_use]
    pub fn from_box<T: 'static>(value: Box<T>) -> Self {
        Self {
            binding: Some(Binding::from_box(value)),
        }
    }

    /// Moves a value to the heap and creates a handle that owns it.
    #[must_use]
    pub fn from_value<T: 'static>(value: T) -> Self {
        Self::from_box(Box::new(value))
    }

    /// Creates a handle that takes ownership of the value behind a raw pointer.
    ///
    /// A null pointer results in an empty handle.
    ///
    /// # Safety
    ///
    /// The caller must ensure that the pointer is either null or was obtained from
    /// `Box::<T>::into_raw()` or [`Box::leak()`] and is owned by nobody else. After this call,
    /// the caller must not free the value or create another owner for it.
    ///
    /// In particular, creating two handles from the same pointer is undefined behavior, as
    /// is passing a pointer to an element of an array or slice allocation. The handle always
    /// destroys a single `T`.
    #[must_use]
    pub unsafe fn from_raw<T: 'static>(ptr: *mut T) -> Self {
        let binding = NonNull::new(ptr).map(|target| {
            // SAFETY: Forwarding safety requirements to the caller.
            unsafe { Binding::new(target) }
        });

        Self { binding }
    }

    /// Whether the handle holds no value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.binding.is_none()
    }

    /// Whether the handle holds a value of type `T`.
    #[must_use]
    pub fn is<T: 'static>(&self) -> bool {
        self.binding.as_ref().is_some_and(Binding::is::<T>)
    }

    /// The [`TypeId`] of the value held by the handle, if any.
    #[must_use]
    pub fn type_id(&self) -> Option<TypeId> {
        self.binding.as_ref().map(Binding::type_id)
    }

    /// The name of the type of the value held by the handle, if any.
    ///
    /// The name is intended for diagnostics only, see [`std::any::type_name()`].
    #[must_use]
    pub fn type_name(&self) -> Option<&'static str> {
        self.binding.as_ref().map(Binding::type_name)
    }

    /// The address of the value held by the handle, if any, without any type check.
    ///
    /// Equivalent to `ptr::<Erased>()`, which never fails.
    #[must_use]
    pub fn as_erased_ptr(&self) -> Option<NonNull<Erased>> {
        self.binding.as_ref().map(|binding| binding.ptr().cast())
    }

    /// The address of the value held by the handle, if any, typed as `T`.
    ///
    /// If `T` is [`Erased`], the address is returned without any type check. Ownership of the
    /// value stays with the handle, so the pointer is only valid until the handle is dropped,
    /// reset or assigned over.
    ///
    /// An empty handle returns `Ok(None)` for any `T`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if the handle holds a value of a type other than `T`.
    pub fn ptr<T: 'static>(&self) -> Result<Option<NonNull<T>>> {
        self.checked_ptr::<T>(Gate::AllowErased)
    }

    /// A reference to the value held by the handle, if any.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if the handle holds a value of a type other than `T`.
    pub fn get<T: 'static>(&self) -> Result<Option<&T>> {
        let ptr = self.checked_ptr::<T>(Gate::AllowErased)?;

        // SAFETY: The handle owns a live value of type `T` (or `T` is the zero-sized `Erased`)
        // and the returned reference borrows the handle, so the value outlives it.
        Ok(ptr.map(|ptr| unsafe { ptr.as_ref() }))
    }

    /// An exclusive reference to the value held by the handle, if any.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if the handle holds a value of a type other than `T`.
    pub fn get_mut<T: 'static>(&mut self) -> Result<Option<&mut T>> {
        let ptr = self.checked_ptr::<T>(Gate::AllowErased)?;

        // SAFETY: The handle uniquely owns a live value of type `T` (or `T` is the zero-sized
        // `Erased`) and the returned reference exclusively borrows the handle.
        Ok(ptr.map(|mut ptr| unsafe { ptr.as_mut() }))
    }

    /// Gives up ownership of the value held by the handle without destroying it, leaving the
    /// handle empty.
    ///
    /// The caller becomes responsible for destroying the value, typically by reconstructing
    /// its box via [`Box::from_raw()`]. If `T` is [`Erased`], the type check is skipped and
    /// the caller must know the real type by other means to avoid a leak.
    ///
    /// An empty handle returns `Ok(None)` for any `T`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if the handle holds a value of a type other than `T`.
    /// The handle keeps its value in this case.
    pub fn release<T: 'static>(&mut self) -> Result<Option<NonNull<T>>> {
        let ptr = self.checked_ptr::<T>(Gate::AllowErased)?;

        self.disarm();

        Ok(ptr)
    }

    /// Takes the value held by the handle back out as a box, leaving the handle empty.
    ///
    /// Unlike [`release()`][Self::release], this does not accept [`Erased`] because an erased
    /// box cannot destroy the value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if the handle holds a value of a type other than `T`.
    /// The handle keeps its value in this case.
    pub fn release_box<T: 'static>(&mut self) -> Result<Option<Box<T>>> {
        let ptr = self.checked_ptr::<T>(Gate::Strict)?;

        self.disarm();

        // SAFETY: The binding was created from a box of `T`, as confirmed by the type
        // check, and we just took ownership back from it.
        Ok(ptr.map(|ptr| unsafe { Box::from_raw(ptr.as_ptr()) }))
    }

    /// Destroys the value held by the handle, if any, leaving the handle empty.
    pub fn reset(&mut self) {
        // Dropping the binding destroys the value.
        self.binding = None;
    }

    /// Destroys the value held by the handle, if any, and takes ownership of a new one.
    pub fn reset_with<T: 'static>(&mut self, value: Box<T>) {
        self.rebind(Some(Binding::from_box(value)));
    }

    /// Destroys the value held by the handle, if any, and takes ownership of the value behind
    /// a raw pointer.
    ///
    /// A null pointer leaves the handle empty.
    ///
    /// # Safety
    ///
    /// The same requirements as for [`from_raw()`][Self::from_raw] apply. In addition, the
    /// pointer must not point to the value currently held by this handle.
    pub unsafe fn reset_raw<T: 'static>(&mut self, ptr: *mut T) {
        let binding = NonNull::new(ptr).map(|target| {
            // SAFETY: Forwarding safety requirements to the caller.
            unsafe { Binding::new(target) }
        });

        self.rebind(binding);
    }

    /// Moves the value out into a new handle, leaving this one empty.
    #[must_use]
    pub fn take(&mut self) -> Self {
        Self {
            binding: self.binding.take(),
        }
    }

    /// Destroys the value held by this handle, if any, then takes over the state of `source`,
    /// leaving `source` empty.
    pub fn assign_from(&mut self, source: &mut Self) {
        self.rebind(source.binding.take());
    }

    /// Exchanges the state of two handles.
    ///
    /// No value is destroyed in the process.
    pub fn swap(&mut self, other: &mut Self) {
        let temp = other.take();
        *other = self.take();
        *self = temp;
    }

    /// Installs the new binding first, then destroys the old value.
    fn rebind(&mut self, binding: Option<Binding>) {
        let old = mem::replace(&mut self.binding, binding);
        drop(old);
    }

    /// Empties the handle without destroying the value.
    fn disarm(&mut self) {
        if let Some(binding) = self.binding.take() {
            binding.disarm();
        }
    }

    fn checked_ptr<T: 'static>(&self, gate: Gate) -> Result<Option<NonNull<T>>> {
        let Some(binding) = &self.binding else {
            return Ok(None);
        };

        let erased_allowed = matches!(gate, Gate::AllowErased) && is_erased::<T>();

        if erased_allowed || binding.is::<T>() {
            Ok(Some(binding.ptr().cast()))
        } else {
            Err(Error::TypeMismatch {
                requested: any::type_name::<T>(),
                bound: binding.type_name(),
            })
        }
    }
}

/// Whether typed access may skip the type check for [`Erased`].
#[derive(Clone, Copy, Debug)]
enum Gate {
    AllowErased,
    Strict,
}

fn is_erased<T: 'static>() -> bool {
    TypeId::of::<T>() == TypeId::of::<Erased>()
}

impl Default for ErasedBox {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> From<Box<T>> for ErasedBox {
    fn from(value: Box<T>) -> Self {
        Self::from_box(value)
    }
}

/// Handles are equal if they refer to the same address, regardless of type.
///
/// Two empty handles are equal. Boxed zero-sized values do not occupy any memory and may
/// share an address, so handles holding them may also compare equal.
impl PartialEq for ErasedBox {
    fn eq(&self, other: &Self) -> bool {
        self.as_erased_ptr() == other.as_erased_ptr()
    }
}

impl Eq for ErasedBox {}

impl Hash for ErasedBox {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_erased_ptr().hash(state);
    }
}

impl fmt::Debug for ErasedBox {
    #[cfg_attr(test, mutants::skip)] // Debug output is not part of the API contract.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErasedBox")
            .field("ptr", &self.as_erased_ptr())
            .field("type_name", &self.type_name())
            .finish_non_exhaustive()
    }
}
