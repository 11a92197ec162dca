//! An ordered, owning container parameterised by a capability set.
//!
//! Every collection in the object graph is a [`List`]. Each list is built with
//! a [`Capabilities`] value that tells it how to render, dispose of, and
//! compare its elements. The list owns what it holds: clearing or dropping it
//! hands each element to the destroy capability exactly once.
//!
//! Iterators borrow the list, so mutating a list while iterating over it is
//! rejected at compile time rather than being undefined behaviour.

use std::{
    cmp::Ordering,
    collections::VecDeque,
    fmt,
    ops::{Index, IndexMut},
};

/// Marker rendered by [`List::stringify`] for a list with no elements.
///
/// Distinct from the empty string, which is what a non-empty list of elements
/// that all render as `""` produces.
pub const EMPTY_MARKER: &str = "empty";

/// The per-list operations a [`List`] needs to manage its elements.
pub struct Capabilities<T> {
    /// Renders one element.
    pub stringify: fn(&T) -> String,
    /// Disposes of one element that is leaving the list.
    pub destroy: fn(T),
    /// Orders two elements. [`Ordering::Equal`] means "matches".
    pub compare: fn(&T, &T) -> Ordering,
}

impl<T> Capabilities<T> {
    /// Capabilities built from the element's own `Display` and `Ord`
    /// implementations, disposing of elements by dropping them.
    #[must_use]
    pub fn ordered() -> Self
    where
        T: fmt::Display + Ord,
    {
        Self {
            stringify: ToString::to_string,
            destroy: drop,
            compare: Ord::cmp,
        }
    }
}

impl<T> Clone for Capabilities<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Capabilities<T> {}

impl<T> fmt::Debug for Capabilities<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities").finish_non_exhaustive()
    }
}

/// An ordered collection that owns its elements.
pub struct List<T> {
    items: VecDeque<T>,
    capabilities: Capabilities<T>,
}

impl<T> List<T> {
    /// Creates an empty list managed by the given capabilities.
    #[must_use]
    pub const fn new(capabilities: Capabilities<T>) -> Self {
        Self {
            items: VecDeque::new(),
            capabilities,
        }
    }

    /// Adds an element before the current first element.
    pub fn insert_front(&mut self, item: T) {
        self.items.push_front(item);
    }

    /// Adds an element after the current last element.
    pub fn insert_back(&mut self, item: T) {
        self.items.push_back(item);
    }

    /// Inserts an element before the first existing element that orders
    /// after it, or at the back when there is none.
    ///
    /// Elements that compare equal keep their insertion order.
    pub fn insert_sorted(&mut self, item: T) {
        let compare = self.capabilities.compare;
        match self
            .items
            .iter()
            .position(|existing| compare(existing, &item) == Ordering::Greater)
        {
            Some(index) => self.items.insert(index, item),
            None => self.items.push_back(item),
        }
    }

    /// Removes and returns the first element that compares equal to `target`.
    ///
    /// Ownership of the removed element passes to the caller; the destroy
    /// capability is not invoked.
    pub fn remove_matching(&mut self, target: &T) -> Option<T> {
        let compare = self.capabilities.compare;
        let index = self
            .items
            .iter()
            .position(|existing| compare(existing, target) == Ordering::Equal)?;
        self.items.remove(index)
    }

    /// Returns the first element accepted by `predicate`.
    pub fn find_matching<P>(&self, mut predicate: P) -> Option<&T>
    where
        P: FnMut(&T) -> bool,
    {
        self.items.iter().find(|item| predicate(item))
    }

    /// Returns the position of the first element accepted by `predicate`.
    pub fn position_matching<P>(&self, predicate: P) -> Option<usize>
    where
        P: FnMut(&T) -> bool,
    {
        self.items.iter().position(predicate)
    }

    /// Whether any element compares equal to `target`.
    pub fn contains(&self, target: &T) -> bool {
        let compare = self.capabilities.compare;
        self.items
            .iter()
            .any(|existing| compare(existing, target) == Ordering::Equal)
    }

    /// Iterates over the elements from front to back.
    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, T> {
        self.items.iter()
    }

    /// Iterates mutably over the elements from front to back.
    pub fn iter_mut(&mut self) -> std::collections::vec_deque::IterMut<'_, T> {
        self.items.iter_mut()
    }

    /// The element at `index`, counting from the front.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// The element at `index`, counting from the front.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    /// The first element.
    #[must_use]
    pub fn front(&self) -> Option<&T> {
        self.items.front()
    }

    /// The last element.
    #[must_use]
    pub fn back(&self) -> Option<&T> {
        self.items.back()
    }

    /// Number of elements held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Concatenates the rendering of every element, front to back.
    ///
    /// An empty list renders as [`EMPTY_MARKER`].
    #[must_use]
    pub fn stringify(&self) -> String {
        if self.items.is_empty() {
            return EMPTY_MARKER.to_string();
        }
        let stringify = self.capabilities.stringify;
        self.items.iter().map(stringify).collect()
    }

    /// Destroys every element and leaves the list empty.
    pub fn clear(&mut self) {
        let destroy = self.capabilities.destroy;
        for item in self.items.drain(..) {
            destroy(item);
        }
    }
}

impl<T> Drop for List<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: Clone> Clone for List<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            capabilities: self.capabilities,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for List<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: Eq> Eq for List<T> {}

impl<'a, T> IntoIterator for &'a List<T> {
    type Item = &'a T;
    type IntoIter = std::collections::vec_deque::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> Index<usize> for List<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T> IndexMut<usize> for List<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.items[index]
    }
}

impl<T> Extend<T> for List<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}
