use std::{collections::HashMap, hash::Hash, rc::Rc};

use itertools::Itertools;
use rug::Integer as Int;
use tracing::debug;

use crate::{
    cache::{Cache, SequenceCache, Shared},
    util::factorial,
};

/// Steps `xs` to the next arrangement in lexicographic order. Returns false, leaving
/// `xs` untouched, if it is already the last (weakly decreasing) arrangement.
pub fn next_permutation<T: Ord>(xs: &mut [T]) -> bool {
    let Some(k) = (1..xs.len()).rev().find(|&i| xs[i - 1] < xs[i]).map(|i| i - 1) else {
        return false;
    };
    // the suffix after k is weakly decreasing, so the rightmost larger element is the
    // smallest one
    let m = (k + 1..xs.len()).rev().find(|&i| xs[k] < xs[i]).unwrap_or(k + 1);
    xs.swap(k, m);
    xs[k + 1..].reverse();
    true
}

/// Number of distinct arrangements of a multiset with the given multiplicities:
/// n! / (m₁! m₂! ...).
pub fn count_multiset_permutations(multiplicities: &[usize]) -> Int {
    let n = multiplicities.iter().sum();
    let mut out = factorial(n);
    for &m in multiplicities {
        out /= factorial(m);
    }
    out
}

/// Distinct permutations of a finite multiset, lexicographic by first occurrence.
///
/// Equal values are collapsed to the position of their first occurrence, so the
/// first output lists the values grouped in first-occurrence order and the last
/// lists them in reverse. Exactly the multinomial count is produced.
pub struct Permutations<T> {
    values: Vec<T>,
    ix: Vec<usize>,
    remaining: Int,
}

impl<T: Clone + Eq + Hash> Permutations<T> {
    pub fn new(xs: impl IntoIterator<Item = T>) -> Self {
        let mut values = Vec::new();
        let mut first_seen: HashMap<T, usize> = HashMap::new();
        let mut ix = xs
            .into_iter()
            .map(|x| {
                *first_seen.entry(x.clone()).or_insert_with(|| {
                    values.push(x);
                    values.len() - 1
                })
            })
            .collect_vec();
        ix.sort_unstable();
        let multiplicities = ix.iter().dedup_with_count().map(|(m, _)| m).collect_vec();
        Self {
            values,
            ix,
            remaining: count_multiset_permutations(&multiplicities),
        }
    }
}

impl<T: Clone> Permutations<T> {
    /// How many permutations are still to come.
    pub fn remaining(&self) -> &Int {
        &self.remaining
    }
}

impl<T: Clone> Iterator for Permutations<T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Vec<T>> {
        if self.remaining == 0 {
            return None;
        }
        let out = self.ix.iter().map(|&i| self.values[i].clone()).collect();
        self.remaining -= 1;
        if self.remaining != 0 {
            next_permutation(&mut self.ix);
        }
        Some(out)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.remaining.to_usize() {
            Some(n) => (n, Some(n)),
            None => (usize::MAX, None),
        }
    }
}

pub fn permutations_finite<T>(xs: impl IntoIterator<Item = T>) -> Permutations<T>
where
    T: Clone + Eq + Hash,
{
    Permutations::new(xs)
}

/// A source read through a permutation of its first few positions.
pub struct Permuted<I: Iterator> {
    cache: Shared<I>,
    prefix: Rc<[usize]>,
    pos: usize,
}

impl<I: Iterator> Permuted<I> {
    /// Where each of the leading positions reads from. Every later position reads
    /// from itself.
    pub fn prefix(&self) -> &[usize] {
        &self.prefix
    }
}

impl<I: Iterator> Clone for Permuted<I> {
    fn clone(&self) -> Self {
        Self {
            cache: Rc::clone(&self.cache),
            prefix: Rc::clone(&self.prefix),
            pos: self.pos,
        }
    }
}

impl<I> Iterator for Permuted<I>
where
    I: Iterator,
    I::Item: Clone,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        let src = self.prefix.get(self.pos).copied().unwrap_or(self.pos);
        let out = self.cache.get(src)?;
        self.pos += 1;
        Some(out)
    }
}

/// Every permutation of a (possibly infinite) source that moves only finitely many
/// positions.
///
/// Prefix lengths run 0, 2, 3, 4, ... For each length L only permutations that move
/// position L − 1 are produced, since the rest already appeared at a shorter length.
/// The first item is the source itself; a finite source of size n yields n! items.
pub struct PrefixPermutations<I: Iterator> {
    cache: Shared<I>,
    len: usize,
    current: Permutations<usize>,
}

impl<I> PrefixPermutations<I>
where
    I: Iterator,
    I::Item: Clone,
{
    pub fn new(xs: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            cache: SequenceCache::shared(xs),
            len: 0,
            current: Permutations::new(0..0),
        }
    }
}

impl<I> Iterator for PrefixPermutations<I>
where
    I: Iterator,
    I::Item: Clone,
{
    type Item = Permuted<I>;

    fn next(&mut self) -> Option<Permuted<I>> {
        loop {
            if let Some(p) = self.current.next() {
                // a fixed last slot means a shorter prefix already produced this one
                if self.len >= 2 && p[self.len - 1] == self.len - 1 {
                    continue;
                }
                return Some(Permuted {
                    cache: Rc::clone(&self.cache),
                    prefix: p.into(),
                    pos: 0,
                });
            }
            let next_len = if self.len == 0 { 2 } else { self.len + 1 };
            if !self.cache.contains(next_len - 1) {
                debug!(len = self.len, "source exhausted, no longer prefixes");
                return None;
            }
            self.len = next_len;
            debug!(len = self.len, "permuting longer prefix");
            self.current = Permutations::new(0..self.len);
        }
    }
}

pub fn prefix_permutations<I>(xs: I) -> PrefixPermutations<I::IntoIter>
where
    I: IntoIterator,
    I::Item: Clone,
{
    PrefixPermutations::new(xs)
}
