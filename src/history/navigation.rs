// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Platform navigation stack (the browser's session history, or a stand-in).

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque state stored with one platform history entry, restored verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NavigationState(pub Value);

impl NavigationState {
    pub fn value(&self) -> &Value {
        &self.0
    }
}

/// A back/forward navigation stack owned by the host platform.
///
/// The stack starts on a landing entry that carries no state.
pub trait NavigationPlatform: Send + Sync {
    /// Add an entry after the current one, discarding any forward entries.
    fn push_state(&self, state: NavigationState);

    /// Step back one entry. Returns false when already on the first entry.
    fn back(&self) -> bool;

    /// Step forward one entry. Returns false when already on the last entry.
    fn forward(&self) -> bool;

    /// State of the entry under the cursor (`None` on the landing entry).
    fn current(&self) -> Option<NavigationState>;
}

struct Stack {
    entries: Vec<Option<NavigationState>>,
    cursor: usize,
}

/// Browser-like navigation stack kept in memory.
pub struct InMemoryNavigation {
    stack: Mutex<Stack>,
}

impl InMemoryNavigation {
    pub fn new() -> Self {
        Self {
            stack: Mutex::new(Stack {
                entries: vec![None],
                cursor: 0,
            }),
        }
    }

    /// Entries including the landing entry
    pub fn len(&self) -> usize {
        self.stack.lock().entries.len()
    }

    /// Never true: the landing entry always exists
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn cursor(&self) -> usize {
        self.stack.lock().cursor
    }
}

impl Default for InMemoryNavigation {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationPlatform for InMemoryNavigation {
    fn push_state(&self, state: NavigationState) {
        let mut stack = self.stack.lock();
        let keep = stack.cursor + 1;
        stack.entries.truncate(keep);
        stack.entries.push(Some(state));
        stack.cursor = stack.entries.len() - 1;
    }

    fn back(&self) -> bool {
        let mut stack = self.stack.lock();
        if stack.cursor == 0 {
            return false;
        }
        stack.cursor -= 1;
        true
    }

    fn forward(&self) -> bool {
        let mut stack = self.stack.lock();
        if stack.cursor + 1 >= stack.entries.len() {
            return false;
        }
        stack.cursor += 1;
        true
    }

    fn current(&self) -> Option<NavigationState> {
        let stack = self.stack.lock();
        stack.entries.get(stack.cursor).cloned().flatten()
    }
}
