//! Cartesian products over memoized operands.
//!
//! [`Product`] orders the index space with a [`Demux`], which reaches every tuple of
//! ℕᵏ exactly once, so operands may be infinite. [`LexProduct`] walks it as an
//! odometer instead, which only makes sense when every operand but the first is
//! finite.

use rug::Integer as Int;
use tracing::{debug, trace};

use crate::{
    cache::{Cache, SequenceCache},
    demux::{Demux, Logarithmic, SquareRoot, Uniform},
    error::{EnumError, EnumResult},
    util::to_index,
};

/// k operands addressed by position, one coordinate per operand.
pub trait IndexSpace {
    type Item;

    fn arity(&self) -> usize;

    fn contains(&mut self, axis: usize, i: usize) -> bool;

    fn is_last(&mut self, axis: usize, i: usize) -> bool;

    fn known_size(&self, axis: usize) -> Option<usize>;

    /// Resolves a full index tuple, or nothing if any coordinate is out of range.
    fn resolve(&mut self, ix: &[usize]) -> Option<Self::Item>;
}

/// One cache read by every coordinate. Uniqueness is over index tuples, so a
/// self-product of a source with repeated values repeats those values too.
pub struct Power<C> {
    cache: C,
    arity: usize,
}

impl<C: Cache> Power<C> {
    pub fn new(cache: C, arity: usize) -> Self {
        Self { cache, arity }
    }
}

impl<C: Cache> IndexSpace for Power<C> {
    type Item = Vec<C::Item>;

    fn arity(&self) -> usize {
        self.arity
    }

    fn contains(&mut self, _axis: usize, i: usize) -> bool {
        self.cache.contains(i)
    }

    fn is_last(&mut self, _axis: usize, i: usize) -> bool {
        self.cache.is_last_index(i)
    }

    fn known_size(&self, _axis: usize) -> Option<usize> {
        self.cache.known_size()
    }

    fn resolve(&mut self, ix: &[usize]) -> Option<Vec<C::Item>> {
        self.cache.select(ix)
    }
}

/// Independent caches of a common element type.
pub struct Operands<C>(pub Vec<C>);

impl<C: Cache> IndexSpace for Operands<C> {
    type Item = Vec<C::Item>;

    fn arity(&self) -> usize {
        self.0.len()
    }

    fn contains(&mut self, axis: usize, i: usize) -> bool {
        self.0[axis].contains(i)
    }

    fn is_last(&mut self, axis: usize, i: usize) -> bool {
        self.0[axis].is_last_index(i)
    }

    fn known_size(&self, axis: usize) -> Option<usize> {
        self.0[axis].known_size()
    }

    fn resolve(&mut self, ix: &[usize]) -> Option<Vec<C::Item>> {
        if !ix.iter().enumerate().all(|(a, &i)| self.0[a].contains(i)) {
            return None;
        }
        ix.iter()
            .enumerate()
            .map(|(a, &i)| self.0[a].get(i))
            .collect()
    }
}

impl<A: Cache, B: Cache> IndexSpace for (A, B) {
    type Item = (A::Item, B::Item);

    fn arity(&self) -> usize {
        2
    }

    fn contains(&mut self, axis: usize, i: usize) -> bool {
        match axis {
            0 => self.0.contains(i),
            _ => self.1.contains(i),
        }
    }

    fn is_last(&mut self, axis: usize, i: usize) -> bool {
        match axis {
            0 => self.0.is_last_index(i),
            _ => self.1.is_last_index(i),
        }
    }

    fn known_size(&self, axis: usize) -> Option<usize> {
        match axis {
            0 => self.0.known_size(),
            _ => self.1.known_size(),
        }
    }

    fn resolve(&mut self, ix: &[usize]) -> Option<Self::Item> {
        // both lookups only ever extend the buffers, so bailing halfway loses nothing
        let a = self.0.get(ix[0])?;
        let b = self.1.get(ix[1])?;
        Some((a, b))
    }
}

impl<A: Cache, B: Cache, C: Cache> IndexSpace for (A, B, C) {
    type Item = (A::Item, B::Item, C::Item);

    fn arity(&self) -> usize {
        3
    }

    fn contains(&mut self, axis: usize, i: usize) -> bool {
        match axis {
            0 => self.0.contains(i),
            1 => self.1.contains(i),
            _ => self.2.contains(i),
        }
    }

    fn is_last(&mut self, axis: usize, i: usize) -> bool {
        match axis {
            0 => self.0.is_last_index(i),
            1 => self.1.is_last_index(i),
            _ => self.2.is_last_index(i),
        }
    }

    fn known_size(&self, axis: usize) -> Option<usize> {
        match axis {
            0 => self.0.known_size(),
            1 => self.1.known_size(),
            _ => self.2.known_size(),
        }
    }

    fn resolve(&mut self, ix: &[usize]) -> Option<Self::Item> {
        let a = self.0.get(ix[0])?;
        let b = self.1.get(ix[1])?;
        let c = self.2.get(ix[2])?;
        Some((a, b, c))
    }
}

/// Demux-ordered Cartesian product.
///
/// Counter values whose tuple falls outside some finite operand are skipped. The
/// enumeration ends right after the tuple made of every operand's last index, when
/// the number of emitted tuples reaches the product of the operand sizes, or as soon
/// as any operand turns out to be empty. With an infinite operand it never ends.
pub struct Product<S, D> {
    space: S,
    demux: D,
    counter: Int,
    emitted: Int,
    bound: Option<Int>,
    done: bool,
}

impl<S: IndexSpace, D: Demux> Product<S, D> {
    pub fn new(space: S, demux: D) -> EnumResult<Self> {
        if space.arity() != 0 && space.arity() != demux.arity() {
            return Err(EnumError::ArityMismatch {
                space: space.arity(),
                demux: demux.arity(),
            });
        }
        Ok(Self::new_unchecked(space, demux))
    }

    pub(crate) fn new_unchecked(space: S, demux: D) -> Self {
        Self {
            space,
            demux,
            counter: Int::new(),
            emitted: Int::new(),
            bound: None,
            done: false,
        }
    }

    /// Number of tuples emitted so far.
    pub fn emitted(&self) -> &Int {
        &self.emitted
    }

    /// The total length, once every operand's size is known.
    pub fn bound(&self) -> Option<&Int> {
        self.bound.as_ref()
    }

    fn refresh_bound(&mut self) {
        if self.bound.is_some() {
            return;
        }
        let sizes = (0..self.space.arity())
            .map(|axis| self.space.known_size(axis))
            .collect::<Vec<_>>();
        // one empty operand settles it even while others are still unknown
        if sizes.contains(&Some(0)) {
            self.bound = Some(Int::new());
        } else if let Some(sizes) = sizes.into_iter().collect::<Option<Vec<_>>>() {
            let bound = sizes
                .into_iter()
                .fold(Int::from(1), |acc, n| acc * Int::from(n));
            self.bound = Some(bound);
        }
    }

    fn reached_bound(&self) -> bool {
        self.bound.as_ref().is_some_and(|b| self.emitted >= *b)
    }

    fn finish(&mut self) {
        self.done = true;
        debug!(emitted = %self.emitted, counter = %self.counter, "product exhausted");
    }
}

impl<S: IndexSpace, D: Demux> Iterator for Product<S, D> {
    type Item = S::Item;

    fn next(&mut self) -> Option<S::Item> {
        loop {
            if self.done {
                return None;
            }
            if self.space.arity() == 0 {
                self.done = true;
                self.emitted += 1;
                return self.space.resolve(&[]);
            }

            let coords = self.demux.demux(&self.counter);
            self.counter += 1;
            let resolved = coords
                .iter()
                .map(to_index)
                .collect::<Option<Vec<usize>>>()
                .and_then(|ix| self.space.resolve(&ix).map(|item| (ix, item)));

            let Some((ix, item)) = resolved else {
                trace!(counter = %self.counter, "tuple out of range");
                self.refresh_bound();
                if self.reached_bound() {
                    self.finish();
                }
                continue;
            };

            self.emitted += 1;
            self.refresh_bound();
            let all_last = (0..ix.len()).all(|axis| self.space.is_last(axis, ix[axis]));
            if all_last || self.reached_bound() {
                self.finish();
            }
            return Some(item);
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        match &self.bound {
            Some(b) => match Int::from(b - &self.emitted).to_usize() {
                Some(n) => (n, Some(n)),
                None => (usize::MAX, None),
            },
            None => (0, None),
        }
    }
}

/// Odometer-ordered product: the last coordinate moves fastest and carries into the
/// one before it once it runs off the end of its operand.
///
/// Only the first operand may be infinite. An infinite operand anywhere else never
/// carries, so the coordinates before it are stuck at their first value.
pub struct LexProduct<S> {
    space: S,
    digits: Vec<usize>,
    started: bool,
    done: bool,
}

impl<S: IndexSpace> LexProduct<S> {
    pub fn new(space: S) -> Self {
        let digits = vec![0; space.arity()];
        Self {
            space,
            digits,
            started: false,
            done: false,
        }
    }

    fn advance(&mut self) -> bool {
        for axis in (0..self.digits.len()).rev() {
            self.digits[axis] += 1;
            if self.space.contains(axis, self.digits[axis]) {
                return true;
            }
            self.digits[axis] = 0;
        }
        false
    }
}

impl<S: IndexSpace> Iterator for LexProduct<S> {
    type Item = S::Item;

    fn next(&mut self) -> Option<S::Item> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
        } else if !self.advance() {
            self.done = true;
            return None;
        }
        let item = self.space.resolve(&self.digits);
        // only the all-zero tuple can fail, and only when some operand is empty
        if item.is_none() {
            self.done = true;
        }
        item
    }
}

pub type Cached<I> = SequenceCache<<I as IntoIterator>::IntoIter>;

/// All pairs, both coordinates growing at the same rate.
pub fn pairs<A, B>(xs: A, ys: B) -> Product<(Cached<A>, Cached<B>), Uniform>
where
    A: IntoIterator,
    B: IntoIterator,
    A::Item: Clone,
    B::Item: Clone,
{
    Product::new_unchecked(
        (SequenceCache::new(xs), SequenceCache::new(ys)),
        Uniform::new_unchecked(2),
    )
}

/// All pairs, the second coordinate growing logarithmically in the first.
pub fn pairs_logarithmic<A, B>(xs: A, ys: B) -> Product<(Cached<A>, Cached<B>), Logarithmic>
where
    A: IntoIterator,
    B: IntoIterator,
    A::Item: Clone,
    B::Item: Clone,
{
    Product::new_unchecked((SequenceCache::new(xs), SequenceCache::new(ys)), Logarithmic)
}

/// All pairs, the second coordinate growing like the square root of the first.
pub fn pairs_square_root<A, B>(xs: A, ys: B) -> Product<(Cached<A>, Cached<B>), SquareRoot>
where
    A: IntoIterator,
    B: IntoIterator,
    A::Item: Clone,
    B::Item: Clone,
{
    Product::new_unchecked((SequenceCache::new(xs), SequenceCache::new(ys)), SquareRoot)
}

pub fn triples<A, B, C>(
    xs: A,
    ys: B,
    zs: C,
) -> Product<(Cached<A>, Cached<B>, Cached<C>), Uniform>
where
    A: IntoIterator,
    B: IntoIterator,
    C: IntoIterator,
    A::Item: Clone,
    B::Item: Clone,
    C::Item: Clone,
{
    Product::new_unchecked(
        (
            SequenceCache::new(xs),
            SequenceCache::new(ys),
            SequenceCache::new(zs),
        ),
        Uniform::new_unchecked(3),
    )
}

/// Product of any number of sources. No sources gives a single empty tuple.
pub fn cartesian<I>(sources: Vec<I>) -> Product<Operands<Cached<I>>, Uniform>
where
    I: IntoIterator,
    I::Item: Clone,
{
    let arity = sources.len().max(1);
    let space = Operands(sources.into_iter().map(SequenceCache::new).collect());
    Product::new_unchecked(space, Uniform { arity })
}

/// All k-tuples over one source. The source is read once and shared by every
/// coordinate.
pub fn power<I>(xs: I, k: usize) -> Product<Power<Cached<I>>, Uniform>
where
    I: IntoIterator,
    I::Item: Clone,
{
    Product::new_unchecked(
        Power::new(SequenceCache::new(xs), k),
        Uniform::new_unchecked(k.max(1)),
    )
}

/// Pairs with `xs` outermost. `ys` must be finite.
pub fn pairs_lex<A, B>(xs: A, ys: B) -> LexProduct<(Cached<A>, Cached<B>)>
where
    A: IntoIterator,
    B: IntoIterator,
    A::Item: Clone,
    B::Item: Clone,
{
    LexProduct::new((SequenceCache::new(xs), SequenceCache::new(ys)))
}

/// Odometer product of any number of sources. Every source but the first must be
/// finite.
pub fn lex_product<I>(sources: Vec<I>) -> LexProduct<Operands<Cached<I>>>
where
    I: IntoIterator,
    I::Item: Clone,
{
    LexProduct::new(Operands(sources.into_iter().map(SequenceCache::new).collect()))
}
