use std::ops::Deref;

/// Read-only, duplicate-free sequence.
///
/// Elements keep the order of their first occurrence. Membership is by
/// equality. There is no way to add elements after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedSet<E> {
    elements: Vec<E>,
}

impl<E: PartialEq> OrderedSet<E> {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    pub fn contains(&self, element: &E) -> bool {
        self.elements.contains(element)
    }

    pub fn position(&self, element: &E) -> Option<usize> {
        self.elements.iter().position(|e| e == element)
    }
}

impl<E: PartialEq> Default for OrderedSet<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: PartialEq> FromIterator<E> for OrderedSet<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        let mut elements: Vec<E> = Vec::new();
        for element in iter {
            if !elements.contains(&element) {
                elements.push(element);
            }
        }
        Self { elements }
    }
}

impl<E> Deref for OrderedSet<E> {
    type Target = [E];

    fn deref(&self) -> &[E] {
        &self.elements
    }
}

impl<'a, E> IntoIterator for &'a OrderedSet<E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
