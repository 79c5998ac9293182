use std::{cell::RefCell, rc::Rc};

use tracing::trace;

/// Random-access memo over a single-pass source.
///
/// Values are pulled from the source only when a position is requested and are
/// never recomputed or discarded. Once the source reports its end it is not polled
/// again, and every position at or beyond the buffered length stays absent.
pub struct SequenceCache<I: Iterator> {
    src: I,
    buf: Vec<I::Item>,
    size: Option<usize>,
}

/// A cache that several enumerators, or several items of one enumeration, read from.
pub type Shared<I> = Rc<RefCell<SequenceCache<I>>>;

impl<I: Iterator> SequenceCache<I> {
    pub fn new(src: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            src: src.into_iter(),
            buf: Vec::new(),
            size: None,
        }
    }

    pub fn shared(src: impl IntoIterator<IntoIter = I>) -> Shared<I> {
        Rc::new(RefCell::new(Self::new(src)))
    }

    /// Ensure at least `n` elements are cached. Returns false if source ends.
    pub fn ensure_len(&mut self, n: usize) -> bool {
        while self.buf.len() < n {
            if self.size.is_some() {
                return false;
            }
            match self.src.next() {
                Some(x) => self.buf.push(x),
                None => {
                    trace!(size = self.buf.len(), "source ended");
                    self.size = Some(self.buf.len());
                    return false;
                }
            }
        }
        true
    }

    /// Random access that grows on demand.
    #[inline(always)]
    pub fn at(&mut self, i: usize) -> Option<&I::Item> {
        if self.ensure_len(i + 1) {
            Some(&self.buf[i])
        } else {
            None
        }
    }

    /// Current cached prefix as a slice (no growth).
    pub fn cached(&self) -> &[I::Item] {
        &self.buf
    }

    /// The source length, once the source has reported its end.
    pub fn known_size(&self) -> Option<usize> {
        self.size
    }

    /// True iff `i` is the final position of a finite source. Looks one element ahead,
    /// so an infinite source has its next element pulled.
    pub fn is_last_index(&mut self, i: usize) -> bool {
        self.ensure_len(i + 1) && !self.ensure_len(i + 2)
    }

    /// True iff the source has ended and `x` equals its final element.
    ///
    /// This compares values, so for a source like `[1, 2, 1]` it also answers true for
    /// the element at position 0. The enumerators use [`Self::is_last_index`] instead.
    pub fn is_last(&self, x: &I::Item) -> bool
    where
        I::Item: PartialEq,
    {
        self.size.is_some() && self.buf.last() == Some(x)
    }

    /// Drains the source and returns its length. Never returns for infinite sources.
    pub fn exhaust(&mut self) -> usize {
        while self.ensure_len(self.buf.len() + 1) {}
        self.buf.len()
    }
}

/// Positional access to a memoized source, the capability every enumerator needs from
/// its operands.
pub trait Cache {
    type Item: Clone;

    fn get(&mut self, i: usize) -> Option<Self::Item>;

    fn contains(&mut self, i: usize) -> bool;

    fn known_size(&self) -> Option<usize>;

    fn is_last_index(&mut self, i: usize) -> bool;

    /// Resolves every position or none: if any position lies beyond the end of the
    /// source, nothing is returned.
    fn select(&mut self, ixs: &[usize]) -> Option<Vec<Self::Item>> {
        if let Some(&max) = ixs.iter().max()
            && !self.contains(max)
        {
            return None;
        }
        ixs.iter().map(|&i| self.get(i)).collect()
    }
}

impl<I> Cache for SequenceCache<I>
where
    I: Iterator,
    I::Item: Clone,
{
    type Item = I::Item;

    fn get(&mut self, i: usize) -> Option<I::Item> {
        self.at(i).cloned()
    }

    fn contains(&mut self, i: usize) -> bool {
        self.ensure_len(i + 1)
    }

    fn known_size(&self) -> Option<usize> {
        self.size
    }

    fn is_last_index(&mut self, i: usize) -> bool {
        SequenceCache::is_last_index(self, i)
    }
}

impl<C: Cache> Cache for Rc<RefCell<C>> {
    type Item = C::Item;

    fn get(&mut self, i: usize) -> Option<C::Item> {
        self.borrow_mut().get(i)
    }

    fn contains(&mut self, i: usize) -> bool {
        self.borrow_mut().contains(i)
    }

    fn known_size(&self) -> Option<usize> {
        self.borrow().known_size()
    }

    fn is_last_index(&mut self, i: usize) -> bool {
        self.borrow_mut().is_last_index(i)
    }

    fn select(&mut self, ixs: &[usize]) -> Option<Vec<C::Item>> {
        self.borrow_mut().select(ixs)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn test_pulls_on_demand() {
        let pulled = Cell::new(0);
        let src = (0..100).inspect(|_| pulled.set(pulled.get() + 1));
        let mut c = SequenceCache::new(src);
        assert_eq!(pulled.get(), 0);
        assert_eq!(c.at(4), Some(&4));
        assert_eq!(pulled.get(), 5);
        assert_eq!(c.at(2), Some(&2));
        assert_eq!(pulled.get(), 5);
        assert_eq!(c.cached(), &[0, 1, 2, 3, 4]);
        assert_eq!(c.known_size(), None);
    }

    #[test]
    fn test_exhaustion() {
        let mut c = SequenceCache::new(vec!['a', 'b', 'c']);
        assert_eq!(c.get(2), Some('c'));
        assert_eq!(c.known_size(), None);
        assert_eq!(c.get(3), None);
        assert_eq!(c.known_size(), Some(3));
        assert_eq!(c.get(100), None);
        assert!(c.contains(0));
        assert!(!c.contains(3));
    }

    #[test]
    fn test_source_not_polled_after_end() {
        // a source that would restart after reporting its end
        let mut state = 0;
        let flaky = std::iter::from_fn(move || {
            state += 1;
            if state == 2 { None } else { Some(state) }
        });
        let mut c = SequenceCache::new(flaky);
        assert_eq!(c.get(0), Some(1));
        assert_eq!(c.get(1), None);
        assert_eq!(c.get(1), None);
        assert_eq!(c.known_size(), Some(1));
    }

    #[test]
    fn test_is_last() {
        let mut c = SequenceCache::new(vec![1, 2, 1]);
        assert!(!c.is_last_index(0));
        assert!(!c.is_last_index(1));
        assert!(c.is_last_index(2));
        assert!(!c.is_last_index(3));
        // value equality cannot tell position 0 from position 2
        assert!(c.is_last(&1));
        assert!(!c.is_last(&2));

        let mut naturals = SequenceCache::new(0u64..);
        assert!(!naturals.is_last_index(10));
        assert!(!naturals.is_last(&10));
    }

    #[test]
    fn test_select_is_atomic() {
        let mut c = SequenceCache::new("xyz".chars());
        assert_eq!(c.select(&[2, 0]), Some(vec!['z', 'x']));
        assert_eq!(c.select(&[0, 5]), None);
        assert_eq!(c.select(&[]), Some(vec![]));
        assert_eq!(c.known_size(), Some(3));
    }

    #[test]
    fn test_exhaust() {
        let mut c = SequenceCache::new(1..=7);
        assert_eq!(c.exhaust(), 7);
        assert_eq!(c.known_size(), Some(7));
        let mut empty = SequenceCache::new(std::iter::empty::<u8>());
        assert_eq!(empty.exhaust(), 0);
    }

    #[test]
    fn test_shared() {
        let mut a = SequenceCache::shared(10..);
        let mut b = a.clone();
        assert_eq!(a.get(3), Some(13));
        assert_eq!(b.borrow().cached().len(), 4);
        assert_eq!(b.get(1), Some(11));
    }
}
