//! Integration tests for the `erased_box` package.
//!
//! These tests verify the ownership contract of `ErasedBox`: values are destroyed exactly once,
//! moves and swaps never destroy anything and typed access rejects the wrong type.

use std::cell::Cell;
use std::mem::{self, ManuallyDrop};
use std::ptr::NonNull;
use std::rc::Rc;

use erased_box::{Erased, ErasedBox, Error};

/// A value that counts how many times it was destroyed.
struct Widget {
    id: u32,
    drops: Rc<Cell<usize>>,
}

impl Widget {
    fn boxed(id: u32, drops: &Rc<Cell<usize>>) -> Box<Self> {
        Box::new(Self {
            id,
            drops: Rc::clone(drops),
        })
    }
}

impl Drop for Widget {
    fn drop(&mut self) {
        self.drops.set(self.drops.get().wrapping_add(1));
    }
}

struct Gadget;

fn counter() -> Rc<Cell<usize>> {
    Rc::new(Cell::new(0))
}

#[test]
fn move_leaves_source_empty() {
    let drops = counter();
    let raw = Box::into_raw(Widget::boxed(1, &drops));

    // SAFETY: The pointer comes from Box::into_raw and is not used anywhere else.
    let mut a = unsafe { ErasedBox::from_raw(raw) };
    let b = a.take();

    assert!(a.is_empty());
    assert_eq!(b.ptr::<Widget>().unwrap().map(NonNull::as_ptr), Some(raw));

    // A native move is just as good.
    let c = b;
    assert_eq!(c.ptr::<Widget>().unwrap().map(NonNull::as_ptr), Some(raw));
    assert_eq!(drops.get(), 0);
}

#[test]
fn destroyed_once_on_scope_exit() {
    let drops = counter();

    {
        let _handle = ErasedBox::from_box(Widget::boxed(1, &drops));
    }

    assert_eq!(drops.get(), 1);
}

#[test]
fn moved_from_source_destroys_nothing() {
    let drops = counter();

    let target = {
        let mut source = ErasedBox::from_box(Widget::boxed(1, &drops));
        source.take()
    };

    assert_eq!(drops.get(), 0);

    drop(target);
    assert_eq!(drops.get(), 1);
}

#[test]
fn type_gate() {
    let handle = ErasedBox::from_value(Gadget);
    let address = handle.as_erased_ptr().unwrap();

    assert!(matches!(
        handle.ptr::<Widget>(),
        Err(Error::TypeMismatch { .. })
    ));
    assert!(matches!(handle.ptr::<u8>(), Err(Error::TypeMismatch { .. })));

    assert_eq!(
        handle.ptr::<Gadget>().unwrap().map(NonNull::cast::<Erased>),
        Some(address)
    );
    assert_eq!(handle.ptr::<Erased>().unwrap(), Some(address));
}

#[test]
fn type_mismatch_message_names_types() {
    let handle = ErasedBox::from_value(1.5_f32);

    let error = handle.get::<String>().unwrap_err();

    assert_eq!(
        error.to_string(),
        format!(
            "type mismatch: requested '{}' but the handle holds 'f32'",
            std::any::type_name::<String>()
        )
    );
}

#[test]
fn release_transfers_without_destroying() {
    let drops = counter();
    let widget = Widget::boxed(3, &drops);
    let expected = NonNull::from(&*widget);
    let mut handle = ErasedBox::from_box(widget);

    let released = handle.release::<Widget>().unwrap().unwrap();

    assert_eq!(released, expected);
    assert!(handle.is_empty());
    assert_eq!(drops.get(), 0);

    drop(handle);
    assert_eq!(drops.get(), 0);

    // SAFETY: We own the released value, which came from Box<Widget>.
    let widget = unsafe { Box::from_raw(released.as_ptr()) };
    assert_eq!(widget.id, 3);

    drop(widget);
    assert_eq!(drops.get(), 1);
}

#[test]
fn swap_is_destructor_free() {
    let a_drops = counter();
    let b_drops = counter();
    let mut a = ErasedBox::from_box(Widget::boxed(1, &a_drops));
    let mut b = ErasedBox::from_box(Widget::boxed(2, &b_drops));
    let a_address = a.as_erased_ptr();
    let b_address = b.as_erased_ptr();

    a.swap(&mut b);

    assert_eq!(a.as_erased_ptr(), b_address);
    assert_eq!(b.as_erased_ptr(), a_address);
    assert_eq!(a.get::<Widget>().unwrap().map(|w| w.id), Some(2));
    assert_eq!(b.get::<Widget>().unwrap().map(|w| w.id), Some(1));
    assert_eq!(a_drops.get(), 0);
    assert_eq!(b_drops.get(), 0);

    mem::swap(&mut a, &mut b);

    assert_eq!(a.as_erased_ptr(), a_address);
    assert_eq!(a_drops.get(), 0);
    assert_eq!(b_drops.get(), 0);
}

#[test]
fn reset_replaces_cleanly() {
    let p_drops = counter();
    let q_drops = counter();
    let mut handle = ErasedBox::from_box(Widget::boxed(1, &p_drops));
    let q = Widget::boxed(2, &q_drops);
    let q_address = NonNull::from(&*q);

    handle.reset_with(q);

    assert_eq!(p_drops.get(), 1);
    assert_eq!(q_drops.get(), 0);
    assert_eq!(handle.ptr::<Widget>().unwrap(), Some(q_address));

    handle.reset();
    assert_eq!(p_drops.get(), 1);
    assert_eq!(q_drops.get(), 1);
}

#[test]
fn assignment_destroys_previous_value() {
    let old_drops = counter();
    let new_drops = counter();
    let mut handle = ErasedBox::from_box(Widget::boxed(1, &old_drops));
    assert_eq!(handle.get::<Widget>().unwrap().map(|w| w.id), Some(1));

    handle = ErasedBox::from_box(Widget::boxed(2, &new_drops));

    assert_eq!(old_drops.get(), 1);
    assert_eq!(handle.get::<Widget>().unwrap().map(|w| w.id), Some(2));
    assert_eq!(new_drops.get(), 0);
}

#[test]
fn equality_is_address_identity() {
    let raw = Box::into_raw(Box::new(5_u64));

    // SAFETY: Test-only aliasing. Neither handle is ever dropped, so the value is only
    // destroyed by the final Box::from_raw() below.
    let a = ManuallyDrop::new(unsafe { ErasedBox::from_raw(raw) });
    // SAFETY: See above.
    let b = ManuallyDrop::new(unsafe { ErasedBox::from_raw(raw) });

    assert_eq!(*a, *b);

    let other = ErasedBox::from_value(5_u64);
    assert_ne!(*a, other);
    assert_ne!(*a, ErasedBox::new());
    assert_eq!(ErasedBox::new(), ErasedBox::new());

    // SAFETY: The handles are never dropped, so this is the only owner that destroys the value.
    drop(unsafe { Box::from_raw(raw) });
}

#[test]
fn widget_scenario() {
    let drops = counter();
    let widget = Widget::boxed(42, &drops);
    let expected = NonNull::from(&*widget);

    let handle = ErasedBox::from_box(widget);

    assert!(matches!(handle.get::<i32>(), Err(Error::TypeMismatch { .. })));
    assert_eq!(handle.ptr::<Widget>().unwrap(), Some(expected));

    drop(handle);
    assert_eq!(drops.get(), 1);
}

#[test]
fn heterogeneous_collection() {
    let drops = counter();

    let handles = vec![
        ErasedBox::from_value(1_i32),
        ErasedBox::from_value("two".to_string()),
        ErasedBox::from_box(Widget::boxed(3, &drops)),
        ErasedBox::new(),
    ];

    let ints = handles
        .iter()
        .filter_map(|handle| handle.get::<i32>().ok().flatten())
        .count();
    assert_eq!(ints, 1);

    let widgets = handles.iter().filter(|handle| handle.is::<Widget>()).count();
    assert_eq!(widgets, 1);

    drop(handles);
    assert_eq!(drops.get(), 1);
}
