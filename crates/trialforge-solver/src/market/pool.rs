//! Registry of the algorithms a market can grant runs to.

use std::fmt::Debug;
use std::sync::Arc;

use crate::algorithm::SearchAlgorithm;

/// Receives pool membership and availability changes.
pub trait AlgorithmPoolListener: Send + Sync + Debug {
    fn algorithm_added(&self, _label: &str) {}

    fn algorithm_removed(&self, _label: &str) {}

    /// The algorithm may be granted runs again.
    fn algorithm_available(&self, _label: &str) {}

    /// The algorithm will not be granted runs until it becomes available.
    fn algorithm_unavailable(&self, _label: &str) {}
}

#[derive(Debug)]
struct PoolEntry {
    algorithm: Box<dyn SearchAlgorithm>,
    available: bool,
}

/// Ordered set of algorithms with an availability flag each.
///
/// Labels are unique: adding an algorithm whose label is already present
/// replaces the previous one.
#[derive(Debug, Default)]
pub struct AlgorithmPool {
    entries: Vec<PoolEntry>,
    listeners: Vec<Arc<dyn AlgorithmPoolListener>>,
}

impl AlgorithmPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&mut self, listener: Arc<dyn AlgorithmPoolListener>) {
        self.listeners.push(listener);
    }

    /// Adds an algorithm, available immediately.
    pub fn add_algorithm(&mut self, algorithm: Box<dyn SearchAlgorithm>) {
        let label = algorithm.label().to_string();
        let entry = PoolEntry {
            algorithm,
            available: true,
        };
        match self.position(&label) {
            Some(index) => self.entries[index] = entry,
            None => self.entries.push(entry),
        }
        for listener in &self.listeners {
            listener.algorithm_added(&label);
        }
    }

    /// Removes and returns the algorithm labelled `label`.
    pub fn remove_algorithm(&mut self, label: &str) -> Option<Box<dyn SearchAlgorithm>> {
        let index = self.position(label)?;
        let entry = self.entries.remove(index);
        for listener in &self.listeners {
            listener.algorithm_removed(label);
        }
        Some(entry.algorithm)
    }

    /// Marks an algorithm available; returns false for unknown labels.
    pub fn make_available(&mut self, label: &str) -> bool {
        self.set_available(label, true)
    }

    /// Marks an algorithm unavailable; returns false for unknown labels.
    pub fn make_unavailable(&mut self, label: &str) -> bool {
        self.set_available(label, false)
    }

    fn set_available(&mut self, label: &str, available: bool) -> bool {
        let Some(index) = self.position(label) else {
            return false;
        };
        let entry = &mut self.entries[index];
        if entry.available != available {
            entry.available = available;
            for listener in &self.listeners {
                if available {
                    listener.algorithm_available(label);
                } else {
                    listener.algorithm_unavailable(label);
                }
            }
        }
        true
    }

    pub fn is_available(&self, label: &str) -> bool {
        self.position(label)
            .map(|index| self.entries[index].available)
            .unwrap_or(false)
    }

    /// Indices of the available algorithms, in insertion order.
    pub fn available_indices(&self) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.available)
            .map(|(index, _)| index)
            .collect()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.algorithm.label()).collect()
    }

    pub fn get(&self, index: usize) -> Option<&dyn SearchAlgorithm> {
        self.entries.get(index).map(|entry| entry.algorithm.as_ref())
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut (dyn SearchAlgorithm + 'static)> {
        self.entries.get_mut(index).map(|entry| entry.algorithm.as_mut())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn SearchAlgorithm>> {
        self.entries.iter_mut().map(|entry| &mut entry.algorithm)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, label: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.algorithm.label() == label)
    }
}
