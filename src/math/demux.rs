use rug::Integer as Int;

use crate::error::{EnumError, EnumResult};

/// A bijection ℕ → ℕᵏ used to impose an order on a k-dimensional index space.
///
/// Implementations must be exact bijections: a tuple reached twice duplicates output,
/// a tuple never reached loses it. They must also be monotone in every coordinate
/// (raising one coordinate with the rest fixed raises the counter). Finite products
/// rely on this to stop right after the tuple of all-last indices.
pub trait Demux {
    fn arity(&self) -> usize;
    fn demux(&self, n: &Int) -> Vec<Int>;
    /// Inverse of [`Demux::demux`].
    fn mux(&self, xs: &[Int]) -> Int;
}

/// Symmetric k-ary demux: bit `i` of the counter becomes bit `i / k` of coordinate
/// `i % k`, so all coordinates grow at the same rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Uniform {
    pub(crate) arity: usize,
}

impl Uniform {
    pub fn new(arity: usize) -> EnumResult<Self> {
        if arity == 0 {
            return Err(EnumError::ZeroArity);
        }
        Ok(Self { arity })
    }

    pub(crate) fn new_unchecked(arity: usize) -> Self {
        debug_assert!(arity > 0);
        Self { arity }
    }
}

impl Demux for Uniform {
    fn arity(&self) -> usize {
        self.arity
    }

    fn demux(&self, n: &Int) -> Vec<Int> {
        split_bits(n, self.arity)
    }

    fn mux(&self, xs: &[Int]) -> Int {
        debug_assert_eq!(xs.len(), self.arity);
        let k = self.arity as u32;
        let mut n = Int::new();
        for (c, x) in xs.iter().enumerate() {
            let mut start = 0u32;
            while let Some(j) = x.find_one(start) {
                n.set_bit(j * k + c as u32, true);
                start = j + 1;
            }
        }
        n
    }
}

/// Round-robin bit split shared by [`Uniform`] and the list enumerators, which need a
/// fresh arity per list length.
pub(crate) fn split_bits(n: &Int, k: usize) -> Vec<Int> {
    let mut out = vec![Int::new(); k];
    let k = k as u32;
    let mut start = 0u32;
    while let Some(i) = n.find_one(start) {
        out[(i % k) as usize].set_bit(i / k, true);
        start = i + 1;
    }
    out
}

/// 2-ary demux with n + 1 = 2ʸ(2x + 1). The second coordinate grows logarithmically
/// in the counter while the first grows linearly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Logarithmic;

impl Logarithmic {
    pub fn pair(&self, n: &Int) -> (Int, Int) {
        let m = Int::from(n + 1u32);
        // m >= 1, so there is always a set bit
        let y = m.find_one(0).unwrap_or(0);
        let x = m >> (y + 1);
        (x, Int::from(y))
    }
}

impl Demux for Logarithmic {
    fn arity(&self) -> usize {
        2
    }

    fn demux(&self, n: &Int) -> Vec<Int> {
        let (x, y) = self.pair(n);
        vec![x, y]
    }

    fn mux(&self, xs: &[Int]) -> Int {
        debug_assert_eq!(xs.len(), 2);
        let y = xs[1].to_u32().unwrap_or(u32::MAX);
        let odd = Int::from(&xs[0] << 1u32) + 1u32;
        (odd << y) - 1u32
    }
}

/// 2-ary demux where bits at positions divisible by 3 feed the second coordinate and
/// the remaining two thirds feed the first, so the second coordinate tracks roughly
/// the square root of the first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SquareRoot;

impl Demux for SquareRoot {
    fn arity(&self) -> usize {
        2
    }

    fn demux(&self, n: &Int) -> Vec<Int> {
        let (mut x, mut y) = (Int::new(), Int::new());
        let mut start = 0u32;
        while let Some(i) = n.find_one(start) {
            let (q, r) = (i / 3, i % 3);
            if r == 0 {
                y.set_bit(q, true);
            } else {
                x.set_bit(2 * q + r - 1, true);
            }
            start = i + 1;
        }
        vec![x, y]
    }

    fn mux(&self, xs: &[Int]) -> Int {
        debug_assert_eq!(xs.len(), 2);
        let mut n = Int::new();
        let mut start = 0u32;
        while let Some(j) = xs[0].find_one(start) {
            n.set_bit(3 * (j / 2) + 1 + j % 2, true);
            start = j + 1;
        }
        start = 0;
        while let Some(j) = xs[1].find_one(start) {
            n.set_bit(3 * j, true);
            start = j + 1;
        }
        n
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;
    use crate::util::int;

    fn small(d: &impl Demux, n: u32) -> Vec<u32> {
        d.demux(&int(n))
            .iter()
            .map(|x| x.to_u32().unwrap())
            .collect()
    }

    #[test]
    fn test_uniform_order() {
        let d = Uniform::new(2).unwrap();
        let firsts = (0..8).map(|n| small(&d, n)).collect_vec();
        assert_eq!(
            firsts,
            vec![
                vec![0, 0],
                vec![1, 0],
                vec![0, 1],
                vec![1, 1],
                vec![2, 0],
                vec![3, 0],
                vec![2, 1],
                vec![3, 1],
            ]
        );
    }

    #[test]
    fn test_uniform_zero_arity() {
        assert_eq!(Uniform::new(0), Err(EnumError::ZeroArity));
        assert_eq!(small(&Uniform::new(1).unwrap(), 37), vec![37]);
    }

    #[test]
    fn test_logarithmic() {
        let d = Logarithmic;
        assert_eq!(small(&d, 0), vec![0, 0]);
        assert_eq!(small(&d, 1), vec![0, 1]);
        assert_eq!(small(&d, 2), vec![1, 0]);
        assert_eq!(small(&d, 3), vec![0, 2]);
        // 2^5 * (2*3 + 1) - 1
        assert_eq!(small(&d, 223), vec![3, 5]);
    }

    #[test]
    fn test_square_root() {
        let d = SquareRoot;
        assert_eq!(small(&d, 1), vec![0, 1]);
        assert_eq!(small(&d, 2), vec![1, 0]);
        assert_eq!(small(&d, 4), vec![2, 0]);
        assert_eq!(small(&d, 8), vec![0, 2]);
    }

    #[test]
    fn test_round_trip() {
        let demuxes: Vec<Box<dyn Demux>> = vec![
            Box::new(Uniform::new(1).unwrap()),
            Box::new(Uniform::new(2).unwrap()),
            Box::new(Uniform::new(3).unwrap()),
            Box::new(Uniform::new(5).unwrap()),
            Box::new(Logarithmic),
            Box::new(SquareRoot),
        ];
        for d in &demuxes {
            for n in (0..2000u32).chain([1 << 20, 123_456_789]) {
                let xs = d.demux(&int(n));
                assert_eq!(xs.len(), d.arity());
                assert_eq!(d.mux(&xs), n);
            }
            let big = int(1) << 300u32;
            assert_eq!(d.mux(&d.demux(&big)), big);
        }
    }

    #[test]
    fn test_injective_prefix() {
        // the first 4096 counters of a 2-ary demux must hit 4096 distinct tuples
        let uniform = Uniform::new(2).unwrap();
        for d in [&uniform as &dyn Demux, &Logarithmic, &SquareRoot] {
            let seen = (0..4096u32).map(|n| d.demux(&int(n))).unique().count();
            assert_eq!(seen, 4096);
        }
    }

    #[test]
    fn test_monotone() {
        let uniform = Uniform::new(2).unwrap();
        for d in [&uniform as &dyn Demux, &Logarithmic, &SquareRoot] {
            for x in 0..20u32 {
                for y in 0..20u32 {
                    let here = d.mux(&[int(x), int(y)]);
                    assert!(d.mux(&[int(x + 1), int(y)]) > here);
                    assert!(d.mux(&[int(x), int(y + 1)]) > here);
                }
            }
        }
    }
}
