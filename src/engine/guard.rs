use crate::runtime::Identity;

/// Identities currently under construction, innermost last.
#[derive(Debug, Clone, Default)]
pub struct RecursionGuard {
    in_progress: Vec<Identity>,
}

impl RecursionGuard {
    /// `false` if `id` is already being constructed: the cycle condition.
    #[must_use]
    pub fn enter(&mut self, id: Identity) -> bool {
        if self.contains(id) {
            return false;
        }
        self.in_progress.push(id);
        true
    }

    pub fn leave(&mut self, id: Identity) {
        if let Some(pos) = self.in_progress.iter().rposition(|x| *x == id) {
            self.in_progress.remove(pos);
        }
    }

    pub fn contains(&self, id: Identity) -> bool {
        self.in_progress.contains(&id)
    }

    pub fn depth(&self) -> usize {
        self.in_progress.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{jdk, ObjRef, Object};

    #[test]
    fn reentry_is_refused_until_left() {
        // keep both alive so their addresses stay distinct
        let first = ObjRef::new(Object::list(&jdk::ARRAY_LIST, vec![]));
        let second = ObjRef::new(Object::list(&jdk::ARRAY_LIST, vec![]));
        let (a, b) = (first.identity(), second.identity());
        let mut guard = RecursionGuard::default();
        assert!(guard.enter(a));
        assert!(guard.enter(b));
        assert!(!guard.enter(a));
        assert_eq!(guard.depth(), 2);
        guard.leave(b);
        guard.leave(a);
        assert!(guard.enter(a));
    }
}
