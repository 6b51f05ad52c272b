/// Stands in for "any type" when reading the address held by an [`ErasedBox`][crate::ErasedBox].
///
/// Requesting `Erased` from [`ErasedBox::ptr()`][crate::ErasedBox::ptr] or
/// [`ErasedBox::release()`][crate::ErasedBox::release] skips the type check and returns the
/// address of whatever value the handle holds. This is meant for code that deals with the
/// address only, such as bookkeeping keyed by object identity.
///
/// This type cannot be constructed, so no handle can ever hold a value of type `Erased`.
///
/// # Examples
///
/// ```
/// use erased_box::{Erased, ErasedBox};
///
/// let handle = ErasedBox::from_value("hello".to_string());
///
/// let typed = handle.ptr::<String>().unwrap().unwrap();
/// let erased = handle.ptr::<Erased>().unwrap().unwrap();
///
/// assert_eq!(typed.cast::<Erased>(), erased);
/// ```
#[derive(Debug)]
pub struct Erased {
    _private: [u8; 0],
}
