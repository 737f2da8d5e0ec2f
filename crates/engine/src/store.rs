//! Append-only category store.
//!
//! Categories are identified by their index; the store never reorders them.
//! Scans hold the read lock for the duration of one ranking pass, and every
//! weight change installs a fresh snapshot under the write lock after the
//! scan has finished, so no weight mutates mid-scan.

use parking_lot::RwLock;

/// One stored prototype with its bookkeeping.
#[derive(Debug, Clone)]
pub struct Category<W> {
    pub weight: W,
    /// Cycles survived since commit.
    pub age: u64,
    /// Times this category won a learn cycle.
    pub usage: u64,
}

/// Read-only view of one category for introspection surfaces.
#[derive(Debug, Clone)]
pub struct CategorySnapshot<W> {
    pub index: usize,
    pub weight: W,
    pub age: u64,
    pub usage: u64,
}

#[derive(Debug)]
pub struct CategoryStore<W> {
    categories: RwLock<Vec<Category<W>>>,
}

impl<W: Clone> CategoryStore<W> {
    pub fn new() -> Self {
        Self {
            categories: RwLock::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.categories.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.read().is_empty()
    }

    /// Run `f` against a scan-scoped read view. The lock is held only for
    /// the duration of the closure.
    pub fn with_view<T>(&self, f: impl FnOnce(&[Category<W>]) -> T) -> T {
        let guard = self.categories.read();
        f(&guard)
    }

    /// Append a fresh category; returns its stable index.
    pub fn push(&self, weight: W) -> usize {
        let mut guard = self.categories.write();
        guard.push(Category {
            weight,
            age: 0,
            usage: 1,
        });
        guard.len() - 1
    }

    /// Install an updated weight snapshot and count the win.
    pub fn install(&self, index: usize, weight: W) {
        let mut guard = self.categories.write();
        let category = &mut guard[index];
        category.weight = weight;
        category.usage += 1;
    }

    /// Replace a weight without touching usage, for reinforcement-style
    /// out-of-cycle adjustments.
    pub fn replace_weight(&self, index: usize, weight: W) {
        self.categories.write()[index].weight = weight;
    }

    /// Age every category by one cycle.
    pub fn bump_ages(&self) {
        for category in self.categories.write().iter_mut() {
            category.age += 1;
        }
    }

    pub fn weight(&self, index: usize) -> Option<W> {
        self.categories.read().get(index).map(|c| c.weight.clone())
    }

    pub fn snapshot(&self, index: usize) -> Option<CategorySnapshot<W>> {
        self.categories.read().get(index).map(|c| CategorySnapshot {
            index,
            weight: c.weight.clone(),
            age: c.age,
            usage: c.usage,
        })
    }

    pub fn snapshots(&self) -> Vec<CategorySnapshot<W>> {
        self.categories
            .read()
            .iter()
            .enumerate()
            .map(|(index, c)| CategorySnapshot {
                index,
                weight: c.weight.clone(),
                age: c.age,
                usage: c.usage,
            })
            .collect()
    }

    /// Apply a maintenance pass over every category under the write lock.
    pub fn maintain(&self, mut f: impl FnMut(&mut Category<W>)) {
        for category in self.categories.write().iter_mut() {
            f(category);
        }
    }

    /// Drop every category failing `keep`, compacting indices. Returns how
    /// many were removed. Only maintenance paths (ARTSTAR) call this.
    pub fn prune(&self, keep: impl Fn(&Category<W>) -> bool) -> usize {
        let mut guard = self.categories.write();
        let before = guard.len();
        guard.retain(|c| keep(c));
        before - guard.len()
    }

    pub fn clear(&self) {
        self.categories.write().clear();
    }
}

impl<W: Clone> Default for CategoryStore<W> {
    fn default() -> Self {
        Self::new()
    }
}
