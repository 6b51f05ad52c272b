//! Example that hands values across an API boundary as raw pointers.
//!
//! Ownership moves into an `ErasedBox` from a raw pointer and is later released again, at which
//! point the caller becomes responsible for destroying the value.

use erased_box::ErasedBox;

fn main() {
    let raw = Box::into_raw(Box::new(vec![1, 2, 3]));

    // SAFETY: The pointer comes straight from Box::into_raw and is not used elsewhere.
    let mut handle = unsafe { ErasedBox::from_raw(raw) };

    println!("Handle: {handle:?}");

    if let Ok(Some(values)) = handle.get_mut::<Vec<i32>>() {
        values.push(4);
    }

    // Take the value back out so the handle no longer destroys it.
    let values = handle
        .release_box::<Vec<i32>>()
        .expect("the handle holds a Vec<i32>")
        .expect("the handle is not empty");

    println!("Released values: {values:?}");
    assert_eq!(*values, vec![1, 2, 3, 4]);
    assert!(handle.is_empty());

    println!("Release example completed successfully!");
}
