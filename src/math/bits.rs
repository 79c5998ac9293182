use rug::Integer as Int;

/// Positions of the set bits of a non-negative integer, ascending.
pub fn ones(n: &Int) -> Vec<usize> {
    let mut out = Vec::with_capacity(n.count_ones().unwrap_or(0) as usize);
    let mut start = 0u32;
    while let Some(i) = n.find_one(start) {
        out.push(i as usize);
        start = i + 1;
    }
    out
}

/// Inverse of [`ones`].
pub fn from_ones(positions: &[usize]) -> Int {
    let mut n = Int::new();
    for &p in positions {
        n.set_bit(p as u32, true);
    }
    n
}
