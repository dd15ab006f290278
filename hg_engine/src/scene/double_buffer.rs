/// Double-buffered container.
///
/// Members live in exactly one of three states: `Stable` (visible to
/// iteration), `PendingAdd` (staged, promoted by the next `merge`) or
/// `PendingRemove` (value already dropped, slot purged by the next `merge`).
///
/// Mutation while iterating goes through the `Iteration` guard returned by
/// `iterate()`. The guard borrows the container mutably, so `merge()` cannot
/// run while an iteration is in progress. Adds and removes requested through
/// the guard are staged exactly like the ones requested outside of it.
///
/// Keys are `slotmap` keys: they stay valid across merges and a key of a
/// purged member never aliases a later member.

use slotmap::{Key, SlotMap};

/// Membership state of a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberState {
    Stable,
    PendingAdd,
    PendingRemove,
}

struct Member<T> {
    value: Option<T>,
    state: MemberState,
}

/// Outcome of a `merge()`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Merged<K> {
    /// Keys promoted to `Stable`, in add order
    pub added: Vec<K>,
    /// Number of slots purged
    pub removed: usize,
}

impl<K> Merged<K> {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed == 0
    }
}

/// Container splitting members into stable / pending-add / pending-remove
pub struct DoubleBufferContainer<K: Key, T> {
    members: SlotMap<K, Member<T>>,
    /// Stable and pending-remove keys, in promotion order
    stable: Vec<K>,
    pending_add: Vec<K>,
    pending_remove: Vec<K>,
}

impl<K: Key, T> DoubleBufferContainer<K, T> {
    pub fn new() -> Self {
        Self {
            members: SlotMap::with_key(),
            stable: Vec::new(),
            pending_add: Vec::new(),
            pending_remove: Vec::new(),
        }
    }

    /// Stage `value`; it becomes iterable after the next `merge()`
    pub fn add(&mut self, value: T) -> K {
        let key = self.members.insert(Member {
            value: Some(value),
            state: MemberState::PendingAdd,
        });
        self.pending_add.push(key);
        key
    }

    /// Remove `key`, returning its value
    ///
    /// A stable member moves to `PendingRemove` and its slot stays until the
    /// next `merge()`. A pending-add member is dropped right away and never
    /// becomes stable. Returns None for unknown or already removed keys.
    pub fn remove(&mut self, key: K) -> Option<T> {
        let member = self.members.get_mut(key)?;
        match member.state {
            MemberState::Stable => {
                member.state = MemberState::PendingRemove;
                self.pending_remove.push(key);
                member.value.take()
            }
            MemberState::PendingAdd => {
                self.pending_add.retain(|&pending| pending != key);
                self.members.remove(key).and_then(|member| member.value)
            }
            MemberState::PendingRemove => None,
        }
    }

    /// True between `remove(key)` and the `merge()` purging it
    pub fn is_removing(&self, key: K) -> bool {
        self.state(key) == Some(MemberState::PendingRemove)
    }

    pub fn state(&self, key: K) -> Option<MemberState> {
        self.members.get(key).map(|member| member.state)
    }

    pub fn contains(&self, key: K) -> bool {
        self.members.get(key).is_some_and(|member| member.value.is_some())
    }

    /// Commit staged changes: promote pending adds, purge pending removes
    ///
    /// Calling it again without new staged changes does nothing.
    pub fn merge(&mut self) -> Merged<K> {
        let removed = self.pending_remove.len();
        if removed > 0 {
            for key in self.pending_remove.drain(..) {
                self.members.remove(key);
            }
            let members = &self.members;
            self.stable.retain(|&key| members.contains_key(key));
        }

        let added: Vec<K> = std::mem::take(&mut self.pending_add);
        for &key in &added {
            if let Some(member) = self.members.get_mut(key) {
                member.state = MemberState::Stable;
                self.stable.push(key);
            }
        }

        Merged { added, removed }
    }

    /// Value of a stable or pending-add member
    pub fn get(&self, key: K) -> Option<&T> {
        self.members.get(key)?.value.as_ref()
    }

    pub fn get_mut(&mut self, key: K) -> Option<&mut T> {
        self.members.get_mut(key)?.value.as_mut()
    }

    /// Value of a stable member only
    pub fn active(&self, key: K) -> Option<&T> {
        let member = self.members.get(key)?;
        match member.state {
            MemberState::Stable => member.value.as_ref(),
            _ => None,
        }
    }

    pub fn active_mut(&mut self, key: K) -> Option<&mut T> {
        let member = self.members.get_mut(key)?;
        match member.state {
            MemberState::Stable => member.value.as_mut(),
            _ => None,
        }
    }

    /// Stable, non-removing members in promotion order
    pub fn iter(&self) -> impl Iterator<Item = (K, &T)> + '_ {
        self.stable.iter().filter_map(move |&key| {
            let member = self.members.get(key)?;
            match member.state {
                MemberState::Stable => member.value.as_ref().map(|value| (key, value)),
                _ => None,
            }
        })
    }

    /// Start a mutation-tolerant pass over the stable members
    pub fn iterate(&mut self) -> Iteration<'_, K, T> {
        let end = self.stable.len();
        Iteration { container: self, position: 0, end }
    }

    /// Members holding a value (stable + pending add)
    pub fn len(&self) -> usize {
        self.members.len() - self.pending_remove.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Members visible to iteration
    pub fn stable_len(&self) -> usize {
        self.stable.len() - self.pending_remove.len()
    }

    pub fn pending_add_len(&self) -> usize {
        self.pending_add.len()
    }

    pub fn pending_remove_len(&self) -> usize {
        self.pending_remove.len()
    }
}

impl<K: Key, T> Default for DoubleBufferContainer<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

// ===== ITERATION GUARD =====

/// In-progress pass over the stable members of a container
///
/// Members staged for addition during the pass are not visited. Members
/// removed during the pass (including not yet visited ones) are skipped.
pub struct Iteration<'a, K: Key, T> {
    container: &'a mut DoubleBufferContainer<K, T>,
    position: usize,
    end: usize,
}

impl<'a, K: Key, T> Iteration<'a, K, T> {
    /// Next stable, non-removing member
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<(K, &mut T)> {
        while self.position < self.end {
            let key = self.container.stable[self.position];
            self.position += 1;
            if self.container.state(key) == Some(MemberState::Stable) {
                return self.container.members
                    .get_mut(key)
                    .and_then(|member| member.value.as_mut())
                    .map(|value| (key, value));
            }
        }
        None
    }

    /// Stage a new member
    pub fn add(&mut self, value: T) -> K {
        self.container.add(value)
    }

    /// Remove a member (see `DoubleBufferContainer::remove`)
    pub fn remove(&mut self, key: K) -> Option<T> {
        self.container.remove(key)
    }

    pub fn is_removing(&self, key: K) -> bool {
        self.container.is_removing(key)
    }

    pub fn get(&self, key: K) -> Option<&T> {
        self.container.get(key)
    }
}

#[cfg(test)]
#[path = "double_buffer_tests.rs"]
mod tests;
