//! Sequence utilities.
//!
//! [`XIter`] adds chunking, striding and positional diffing to any iterator;
//! [`TreeItems`] adds record filters and field plucking to iterators of tree
//! items (typically traversal output). Everything else (mapping, filtering,
//! chaining, zipping, products) is plain `Iterator`/`Itertools`.

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;

use std::num::NonZeroUsize;

use itertools::{EitherOrBoth, Itertools};

use crate::model::RecordTypeRef;
use crate::record::Record;
use crate::types::TypeDesc;
use crate::value::{Value, ValueRef};

/// Extension methods for iterators.
pub trait XIter: Iterator + Sized {
    /// Consecutive chunks of `size`; the last chunk may be shorter.
    fn partition_all(self, size: NonZeroUsize) -> Chunks<Self>
    where
        Self::Item: Clone,
    {
        Chunks {
            inner: self,
            size: size.get(),
            pad: None,
        }
    }

    /// Consecutive chunks of exactly `size`. An incomplete tail chunk is
    /// completed with `pad`, or dropped without one.
    fn partition_exact(self, size: NonZeroUsize, pad: Option<Self::Item>) -> Chunks<Self>
    where
        Self::Item: Clone,
    {
        Chunks {
            inner: self,
            size: size.get(),
            pad: Some(pad),
        }
    }

    /// Every `n`-th element, starting with the first.
    fn take_nth(self, n: NonZeroUsize) -> std::iter::StepBy<Self> {
        self.step_by(n.get())
    }

    /// Pairs of elements that differ at the same position. Without a
    /// `default`, comparison stops at the end of the shorter sequence;
    /// with one, the shorter side is padded with it.
    fn diff<J>(self, other: J, default: Option<Self::Item>) -> impl Iterator<Item = (Self::Item, Self::Item)>
    where
        J: IntoIterator<Item = Self::Item>,
        Self::Item: PartialEq + Clone,
    {
        self.zip_longest(other)
            .map_while(move |pair| match pair {
                EitherOrBoth::Both(a, b) => Some((a, b)),
                EitherOrBoth::Left(a) => default.clone().map(|d| (a, d)),
                EitherOrBoth::Right(b) => default.clone().map(|d| (d, b)),
            })
            .filter(|(a, b)| a != b)
    }
}

impl<I: Iterator> XIter for I {}

/// Iterator returned by [`XIter::partition_all`] and [`XIter::partition_exact`].
pub struct Chunks<I: Iterator> {
    inner: I,
    size: usize,
    /// `None`: keep short tails. `Some(pad)`: exact chunks, padded or dropped.
    pad: Option<Option<I::Item>>,
}

impl<I> Iterator for Chunks<I>
where
    I: Iterator,
    I::Item: Clone,
{
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Vec<I::Item>> {
        let chunk: Vec<I::Item> = self.inner.by_ref().take(self.size).collect();
        if chunk.is_empty() {
            return None;
        }
        if chunk.len() == self.size {
            return Some(chunk);
        }
        match &self.pad {
            None => Some(chunk),
            Some(None) => None,
            Some(Some(pad)) => {
                let mut chunk = chunk;
                chunk.resize(self.size, pad.clone());
                Some(chunk)
            }
        }
    }
}

/// Extension methods for iterators of tree items.
pub trait TreeItems<'a>: Iterator<Item = ValueRef<'a>> + Sized {
    /// Record items only.
    fn records(self) -> impl Iterator<Item = &'a Record> {
        self.filter_map(ValueRef::as_record)
    }

    /// Items satisfying `ty`.
    fn of_type(self, ty: &TypeDesc) -> impl Iterator<Item = ValueRef<'a>> {
        self.filter(move |item| item.is_instance(ty))
    }

    /// Records that are instances of `ty`.
    fn instances_of(self, ty: &RecordTypeRef) -> impl Iterator<Item = &'a Record> {
        self.records().filter(move |record| record.is_instance_of(ty))
    }

    /// Value of `field` for every record that has it.
    fn pluck(self, field: &str) -> impl Iterator<Item = &'a Value> {
        self.records().filter_map(move |record| record.get(field))
    }
}

impl<'a, I: Iterator<Item = ValueRef<'a>>> TreeItems<'a> for I {}
