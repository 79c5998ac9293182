//! Pairs whose second component is drawn from a source chosen by the first.

use std::{collections::HashMap, hash::Hash};

use rug::Integer as Int;
use tracing::{debug, trace};

use crate::{
    cache::{Cache, SequenceCache},
    demux::{Demux, Logarithmic, Uniform},
    util::to_index,
};

/// Demux-ordered dependent pairs `(x, y)` with `y` drawn from `f(x)`.
///
/// Each distinct `x` gets one inner cache, built the first time a pair needs it and
/// kept under `x` from then on, so equal outer values share their inner sequence.
/// Every `f(x)` must be infinite: there is no termination check, and a finite inner
/// source only means its out-of-range pairs are skipped forever.
pub struct DependentPairs<I, F, J, D>
where
    I: Iterator,
    J: IntoIterator,
{
    xs: SequenceCache<I>,
    f: F,
    inner: HashMap<I::Item, SequenceCache<J::IntoIter>>,
    demux: D,
    counter: Int,
}

impl<I, F, J, D> DependentPairs<I, F, J, D>
where
    I: Iterator,
    I::Item: Clone + Eq + Hash,
    F: FnMut(&I::Item) -> J,
    J: IntoIterator,
    J::Item: Clone,
    D: Demux,
{
    pub fn new(xs: impl IntoIterator<IntoIter = I>, f: F, demux: D) -> Self {
        Self {
            xs: SequenceCache::new(xs),
            f,
            inner: HashMap::new(),
            demux,
            counter: Int::new(),
        }
    }

    fn resolve(&mut self, i: usize, j: usize) -> Option<(I::Item, J::Item)> {
        let x = self.xs.get(i)?;
        if !self.inner.contains_key(&x) {
            debug!(outer = i, "building inner source");
            let ys = SequenceCache::new((self.f)(&x));
            self.inner.insert(x.clone(), ys);
        }
        let y = self.inner.get_mut(&x)?.get(j)?;
        Some((x, y))
    }
}

impl<I, F, J, D> Iterator for DependentPairs<I, F, J, D>
where
    I: Iterator,
    I::Item: Clone + Eq + Hash,
    F: FnMut(&I::Item) -> J,
    J: IntoIterator,
    J::Item: Clone,
    D: Demux,
{
    type Item = (I::Item, J::Item);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.xs.known_size() == Some(0) {
                return None;
            }
            let coords = self.demux.demux(&self.counter);
            self.counter += 1;
            let (Some(i), Some(j)) = (to_index(&coords[0]), to_index(&coords[1])) else {
                continue;
            };
            if let Some(pair) = self.resolve(i, j) {
                return Some(pair);
            }
            trace!(outer = i, inner = j, "dependent pair out of range");
        }
    }
}

/// Dependent pairs with both indices growing at the same rate.
pub fn dependent_pairs_infinite<A, F, J>(
    xs: A,
    f: F,
) -> DependentPairs<A::IntoIter, F, J, Uniform>
where
    A: IntoIterator,
    A::Item: Clone + Eq + Hash,
    F: FnMut(&A::Item) -> J,
    J: IntoIterator,
    J::Item: Clone,
{
    DependentPairs::new(xs, f, Uniform::new_unchecked(2))
}

/// Dependent pairs with the inner index growing logarithmically in the outer one.
pub fn dependent_pairs_infinite_logarithmic<A, F, J>(
    xs: A,
    f: F,
) -> DependentPairs<A::IntoIter, F, J, Logarithmic>
where
    A: IntoIterator,
    A::Item: Clone + Eq + Hash,
    F: FnMut(&A::Item) -> J,
    J: IntoIterator,
    J::Item: Clone,
{
    DependentPairs::new(xs, f, Logarithmic)
}

/// Dependent pairs in lex order: all of `f(x₀)`, then all of `f(x₁)`, and so on.
///
/// Each inner source is exhausted before the next outer value is read, so every
/// inner source but the last must be finite. Nothing is memoized.
pub fn dependent_pairs<A, F, J>(xs: A, mut f: F) -> impl Iterator<Item = (A::Item, J::Item)>
where
    A: IntoIterator,
    A::Item: Clone,
    F: FnMut(&A::Item) -> J,
    J: IntoIterator,
{
    xs.into_iter().flat_map(move |x| {
        let ys = f(&x);
        ys.into_iter().map(move |y| (x.clone(), y))
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use itertools::Itertools;

    use super::*;

    #[test]
    fn test_dependent_pairs_infinite() {
        // (n, multiples of n)
        let out = dependent_pairs_infinite(1u64.., |&n| (0u64..).map(move |k| k * n))
            .take(1 << 10)
            .collect_vec();
        assert!(out.iter().all_unique());
        assert!(out.iter().all(|(n, m)| m % n == 0));
        let seen: HashSet<_> = out.into_iter().collect();
        for n in 1..=32u64 {
            for k in 0..32u64 {
                assert!(seen.contains(&(n, n * k)), "missing ({n}, {})", n * k);
            }
        }
    }

    #[test]
    fn test_dependent_inner_built_once_per_value() {
        let mut builds = 0;
        let out = dependent_pairs_infinite_logarithmic([3u8, 3, 5], |&x| {
            builds += 1;
            std::iter::repeat(x).enumerate().map(|(i, x)| i * x as usize)
        })
        .take(20)
        .collect_vec();
        assert_eq!(out.len(), 20);
        assert_eq!(builds, 2);
        assert_eq!(out[0], (3, 0));
    }

    #[test]
    fn test_dependent_pairs_empty_outer() {
        let out = dependent_pairs_infinite(Vec::<u8>::new(), |_| 0u8..).collect_vec();
        assert!(out.is_empty());
    }

    #[test]
    fn test_dependent_pairs_lex() {
        let out = dependent_pairs(1..=3, |&n| 0..n).collect_vec();
        assert_eq!(out, vec![(1, 0), (2, 0), (2, 1), (3, 0), (3, 1), (3, 2)]);
        // only the last inner source may be infinite
        let tail = dependent_pairs([0u8, 1], |&n| {
            (0u32..).take(if n == 0 { 2 } else { usize::MAX })
        })
        .take(5)
        .collect_vec();
        assert_eq!(tail, vec![(0, 0), (0, 1), (1, 0), (1, 1), (1, 2)]);
    }
}
