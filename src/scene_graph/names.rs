use std::collections::{HashMap, HashSet};

/// Hands out `{base}_{n}` names that collide neither with the names it was
/// seeded with nor with anything it handed out before.
#[derive(Debug, Default)]
pub struct UniqueNameAllocator {
    taken: HashSet<String>,
    counters: HashMap<String, usize>,
}

impl UniqueNameAllocator {
    pub fn new<I, S>(existing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            taken: existing.into_iter().map(Into::into).collect(),
            counters: HashMap::new(),
        }
    }

    pub fn allocate(&mut self, base: &str) -> String {
        let mut n = self.counters.get(base).copied().unwrap_or(1);
        let mut name = format!("{}_{}", base, n);
        while self.taken.contains(&name) {
            n += 1;
            name = format!("{}_{}", base, n);
        }

        self.counters.insert(base.to_string(), n + 1);
        self.taken.insert(name.clone());
        name
    }

    /// Marks `name` as used without allocating it.
    pub fn reserve(&mut self, name: impl Into<String>) {
        self.taken.insert(name.into());
    }

    pub fn is_taken(&self, name: &str) -> bool {
        self.taken.contains(name)
    }
}
