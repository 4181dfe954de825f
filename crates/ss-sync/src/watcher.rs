use std::collections::BTreeMap;

pub const DEFAULT_DEBOUNCE: u64 = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiredEdit {
    pub path: String,
    pub text: String,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingEdit {
    text: String,
    generation: u64,
    due: u64,
}

/// Debounces edits per path on an explicitly advanced clock. A newer edit for
/// the same path cancels and replaces the pending one (last-edit-wins); paths
/// are independent of each other. No OS timers, threads, or event loops.
#[derive(Debug)]
pub struct EditWatcher {
    debounce: u64,
    now: u64,
    pending: BTreeMap<String, PendingEdit>,
    generations: BTreeMap<String, u64>,
}

impl EditWatcher {
    pub fn new(debounce: u64) -> Self {
        Self {
            debounce,
            now: 0,
            pending: BTreeMap::new(),
            generations: BTreeMap::new(),
        }
    }

    /// Schedules a parse for `path` after the debounce interval, replacing any
    /// pending edit for the same path. Returns the edit's generation.
    pub fn on_edit(&mut self, path: &str, text: &str) -> u64 {
        let generation = self.generations.entry(path.to_string()).or_insert(0);
        *generation += 1;
        let generation = *generation;
        self.pending.insert(
            path.to_string(),
            PendingEdit {
                text: text.to_string(),
                generation,
                due: self.now + self.debounce,
            },
        );
        generation
    }

    /// Advances the clock and drains every edit whose due time has arrived.
    pub fn advance(&mut self, ticks: u64) -> Vec<FiredEdit> {
        self.now += ticks;
        let now = self.now;
        let due_paths: Vec<String> = self
            .pending
            .iter()
            .filter(|(_, edit)| edit.due <= now)
            .map(|(path, _)| path.clone())
            .collect();
        due_paths
            .into_iter()
            .filter_map(|path| self.take_pending(&path))
            .collect()
    }

    /// Fires the pending edit for `path` immediately, debounce notwithstanding.
    pub fn flush(&mut self, path: &str) -> Option<FiredEdit> {
        self.take_pending(path)
    }

    pub fn flush_all(&mut self) -> Vec<FiredEdit> {
        let paths: Vec<String> = self.pending.keys().cloned().collect();
        paths
            .into_iter()
            .filter_map(|path| self.take_pending(&path))
            .collect()
    }

    pub fn has_pending(&self, path: &str) -> bool {
        self.pending.contains_key(path)
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn debounce(&self) -> u64 {
        self.debounce
    }

    fn take_pending(&mut self, path: &str) -> Option<FiredEdit> {
        self.pending.remove(path).map(|edit| FiredEdit {
            path: path.to_string(),
            text: edit.text,
            generation: edit.generation,
        })
    }
}
