use rug::Integer as Int;
use tracing::debug;

use crate::{
    bits::ones,
    cache::{Cache, SequenceCache},
    product::Cached,
};

/// Finite subsets of a source, read off the binary expansions of 0, 1, 2, ...
///
/// Bit `i` of the counter selects position `i`, so each subset lists its elements in
/// source order. The enumeration ends the first time a counter selects a position past
/// the end of the source. For a finite source of size n that is counter 2ⁿ, after every
/// subset (the full set last) has been produced; this follows from counting in binary
/// rather than from anything checked here.
pub struct Subsets<C> {
    cache: C,
    counter: Int,
    done: bool,
}

impl<C: Cache> Subsets<C> {
    pub fn new(cache: C) -> Self {
        Self {
            cache,
            counter: Int::new(),
            done: false,
        }
    }
}

impl<C: Cache> Iterator for Subsets<C> {
    type Item = Vec<C::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let picked = self.cache.select(&ones(&self.counter));
        if picked.is_none() {
            debug!(subsets = %self.counter, "subsets exhausted");
            self.done = true;
        }
        self.counter += 1;
        picked
    }
}

pub fn subsets<I>(xs: I) -> Subsets<Cached<I>>
where
    I: IntoIterator,
    I::Item: Clone,
{
    Subsets::new(SequenceCache::new(xs))
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;

    #[test]
    fn test_subsets_finite() {
        let out = subsets(['a', 'b', 'c']).collect_vec();
        assert_eq!(out.len(), 8);
        assert_eq!(out[0], Vec::<char>::new());
        assert_eq!(out[1], vec!['a']);
        assert_eq!(out[2], vec!['b']);
        assert_eq!(out[3], vec!['a', 'b']);
        assert_eq!(out[7], vec!['a', 'b', 'c']);
        assert!(out.iter().all_unique());
    }

    #[test]
    fn test_subsets_counts() {
        for n in 0..10usize {
            let out = subsets(0..n).collect_vec();
            assert_eq!(out.len(), 1 << n);
            assert!(out.iter().all(|s| s.windows(2).all(|w| w[0] < w[1])));
            assert_eq!(out.last(), Some(&(0..n).collect_vec()));
        }
    }

    #[test]
    fn test_subsets_infinite() {
        let out = subsets(0u64..).take(1024).collect_vec();
        assert_eq!(out.len(), 1024);
        assert!(out.iter().all_unique());
        assert!(out.contains(&vec![0, 3, 9]));
        assert!(out.iter().flatten().all(|&x| x < 10));
    }
}
