use std::any::{self, TypeId};
use std::mem;
use std::ptr::NonNull;

/// Remembers the type of a boxed object and how to destroy it while only holding an
/// erased pointer to it.
///
/// Destroys its target when it is itself dropped.
#[derive(Debug)]
pub(crate) struct Binding {
    ptr: NonNull<()>,
    drop_fn: unsafe fn(NonNull<()>),
    type_id: TypeId,
    type_name: &'static str,
}

impl Binding {
    /// Creates a new `Binding` that will destroy the boxed `T` referenced when the binding
    /// itself is dropped.
    ///
    /// # Safety
    ///
    /// The caller must ensure that:
    ///
    /// 1. The target pointer was obtained from `Box::<T>::into_raw()` or an equivalent.
    /// 2. The target is not freed or dropped by anyone else while the `Binding` exists.
    /// 3. Only one `Binding` instance exists for any given target at a time.
    pub(crate) unsafe fn new<T: 'static>(target: NonNull<T>) -> Self {
        Self {
            ptr: target.cast(),
            drop_fn: drop_fn::<T>,
            type_id: TypeId::of::<T>(),
            type_name: any::type_name::<T>(),
        }
    }

    pub(crate) fn from_box<T: 'static>(value: Box<T>) -> Self {
        let target = NonNull::from(Box::leak(value));

        // SAFETY: The pointer was just leaked from a box, so we are its only owner.
        unsafe { Self::new(target) }
    }

    #[must_use]
    pub(crate) fn ptr(&self) -> NonNull<()> {
        self.ptr
    }

    #[must_use]
    pub(crate) fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[must_use]
    pub(crate) fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether the target was bound as a `T`.
    #[must_use]
    pub(crate) fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Gives up ownership of the target without destroying it.
    pub(crate) fn disarm(self) {
        mem::forget(self);
    }
}

impl Drop for Binding {
    fn drop(&mut self) {
        // SAFETY: Binding::new() ensures the target is a live box of the bound type that
        // nobody else owns, and disarm() forgets the binding, so we get here at most once.
        unsafe {
            (self.drop_fn)(self.ptr);
        }
    }
}

unsafe fn drop_fn<T>(ptr: NonNull<()>) {
    // SAFETY: Binding::new() ensures safety requirements are met.
    drop(unsafe { Box::from_raw(ptr.cast::<T>().as_ptr()) });
}
