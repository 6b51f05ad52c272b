//! Basic usage example for `ErasedBox`.
//!
//! This example stores values of different types behind the same handle type, reads them back
//! with checked typed access and shows that each value is destroyed exactly once.

use std::cell::Cell;
use std::rc::Rc;

use erased_box::{Erased, ErasedBox};

struct Widget {
    name: &'static str,
    drops: Rc<Cell<usize>>,
}

impl Drop for Widget {
    fn drop(&mut self) {
        println!("Dropping widget '{}'", self.name);
        self.drops.set(self.drops.get().wrapping_add(1));
    }
}

fn main() {
    let drops = Rc::new(Cell::new(0));

    let mut handles = vec![
        ErasedBox::from_value(42_u64),
        ErasedBox::from_value("hello".to_string()),
        ErasedBox::from_value(Widget {
            name: "first",
            drops: Rc::clone(&drops),
        }),
    ];

    println!("Created {} handles", handles.len());

    for handle in &handles {
        println!(
            "Handle at {:?} holds a {}",
            handle.ptr::<Erased>().unwrap(),
            handle.type_name().unwrap_or("nothing")
        );
    }

    // Asking for the wrong type is an error, not a reinterpretation.
    match handles[0].get::<String>() {
        Ok(_) => unreachable!("the first handle holds a u64"),
        Err(error) => println!("Expected error: {error}"),
    }

    if let Ok(Some(value)) = handles[0].get::<u64>() {
        println!("The first handle holds {value}");
    }

    // Replacing the widget destroys the old one.
    handles[2].reset_with(Box::new(Widget {
        name: "second",
        drops: Rc::clone(&drops),
    }));
    assert_eq!(drops.get(), 1);

    // Swapping never destroys anything.
    let (left, right) = handles.split_at_mut(1);
    left[0].swap(&mut right[0]);
    assert_eq!(drops.get(), 1);

    drop(handles);
    assert_eq!(drops.get(), 2);

    println!("Basic example completed successfully!");
}
