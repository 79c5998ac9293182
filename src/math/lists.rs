//! Finite sequences over an alphabet.
//!
//! Fixed-length and shortlex enumeration need a finite alphabet. The diagonal
//! enumerators ([`lists`], [`lists_at_least`]) accept infinite alphabets and still
//! reach every finite list.

use rug::Integer as Int;
use tracing::{debug, trace};

use crate::{
    cache::{Cache, SequenceCache, Shared},
    demux::{Logarithmic, split_bits},
    product::{Cached, LexProduct, Power},
    util::to_index,
};

/// Every list of length `len` over `xs`, in lexicographic order of positions.
/// `xs` must be finite unless `len` is at most 1.
pub fn lists_lex<I>(len: usize, xs: I) -> LexProduct<Power<Cached<I>>>
where
    I: IntoIterator,
    I::Item: Clone,
{
    LexProduct::new(Power::new(SequenceCache::new(xs), len))
}

/// Every list over a finite alphabet, shortest first, each length in lex order.
pub struct ShortlexLists<C> {
    cache: C,
    len: usize,
    current: LexProduct<Power<C>>,
}

impl<C: Cache + Clone> ShortlexLists<C> {
    pub fn new(cache: C) -> Self {
        let current = LexProduct::new(Power::new(cache.clone(), 0));
        Self {
            cache,
            len: 0,
            current,
        }
    }
}

impl<C: Cache + Clone> Iterator for ShortlexLists<C> {
    type Item = Vec<C::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(xs) = self.current.next() {
                return Some(xs);
            }
            if self.len > 0 && self.cache.known_size() == Some(0) {
                return None;
            }
            self.len += 1;
            debug!(len = self.len, "shortlex moving to next length");
            self.current = LexProduct::new(Power::new(self.cache.clone(), self.len));
        }
    }
}

pub fn lists_shortlex<I>(xs: I) -> ShortlexLists<Shared<I::IntoIter>>
where
    I: IntoIterator,
    I::Item: Clone,
{
    ShortlexLists::new(SequenceCache::shared(xs))
}

/// Every list over `xs` of length at least `min_len`, in diagonal order.
///
/// A counter `n` picks a (content, length) pair through the logarithmic demux, and
/// the content index is split into one alphabet position per element. Lists whose
/// positions run past the end of a finite alphabet are skipped, so every list is
/// produced exactly once and no length is starved, although output is not grouped by
/// length.
///
/// The length coordinate grows logarithmically in the counter: the first list of
/// length L sits at counter 2^(L - 1) when `min_len` is 0, and near 2^(L - min_len)
/// otherwise. Small alphabets skip almost every counter on the way, so over one
/// symbol, reaching length 40 takes about 2^39 steps.
pub struct Lists<C> {
    cache: C,
    min_len: usize,
    counter: Int,
    done: bool,
}

impl<C: Cache> Lists<C> {
    pub fn new(cache: C, min_len: usize) -> Self {
        Self {
            cache,
            min_len,
            counter: Int::new(),
            done: false,
        }
    }

    /// Length and per-element alphabet positions for counter `n`, or nothing if a
    /// coordinate does not fit in memory.
    fn decode(&self, n: &Int) -> Option<Vec<usize>> {
        let (content, len) = if self.min_len == 0 {
            // counter 0 is the empty list, so everything else shifts down by one
            let (content, extra) = Logarithmic.pair(&Int::from(n - 1u32));
            (content, to_index(&extra)? + 1)
        } else {
            let (content, extra) = Logarithmic.pair(n);
            (content, to_index(&extra)? + self.min_len)
        };
        split_bits(&content, len).iter().map(to_index).collect()
    }
}

impl<C: Cache> Iterator for Lists<C> {
    type Item = Vec<C::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }
            let n = self.counter.clone();
            self.counter += 1;
            if self.min_len == 0 && n == 0 {
                return Some(Vec::new());
            }
            if self.cache.known_size() == Some(0) {
                debug!(counter = %n, "alphabet is empty");
                self.done = true;
                return None;
            }
            let Some(ix) = self.decode(&n) else {
                continue;
            };
            match self.cache.select(&ix) {
                Some(xs) => return Some(xs),
                None => trace!(counter = %n, len = ix.len(), "list out of range"),
            }
        }
    }
}

pub fn lists<I>(xs: I) -> Lists<Cached<I>>
where
    I: IntoIterator,
    I::Item: Clone,
{
    Lists::new(SequenceCache::new(xs), 0)
}

pub fn lists_at_least<I>(min_len: usize, xs: I) -> Lists<Cached<I>>
where
    I: IntoIterator,
    I::Item: Clone,
{
    Lists::new(SequenceCache::new(xs), min_len)
}

fn collect_strings(it: impl Iterator<Item = Vec<char>>) -> impl Iterator<Item = String> {
    it.map(|cs| cs.into_iter().collect())
}

pub fn strings_lex(len: usize, cs: impl IntoIterator<Item = char>) -> impl Iterator<Item = String> {
    collect_strings(lists_lex(len, cs))
}

pub fn strings_shortlex(cs: impl IntoIterator<Item = char>) -> impl Iterator<Item = String> {
    collect_strings(lists_shortlex(cs))
}

pub fn strings(cs: impl IntoIterator<Item = char>) -> impl Iterator<Item = String> {
    collect_strings(lists(cs))
}

pub fn strings_at_least(
    min_len: usize,
    cs: impl IntoIterator<Item = char>,
) -> impl Iterator<Item = String> {
    collect_strings(lists_at_least(min_len, cs))
}
