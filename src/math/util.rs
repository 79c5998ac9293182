use rug::{Complete, Integer as Int};

#[inline]
pub fn int(x: impl Into<Int>) -> Int {
    x.into()
}

pub fn factorial(n: usize) -> Int {
    // counts past u32::MAX elements are far outside anything enumerable
    Int::factorial(n as u32).complete()
}

/// Narrows a coordinate to a buffer position. Coordinates past `usize::MAX` can never
/// be buffered, so callers treat `None` like any other unresolvable position.
#[inline]
pub fn to_index(x: &Int) -> Option<usize> {
    x.to_usize()
}
