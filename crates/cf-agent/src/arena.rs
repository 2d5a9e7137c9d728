//! `AgentArena` — the live population.
//!
//! Agents live in one `Vec` ordered by ascending `AgentId`.  Ids are handed
//! out monotonically and never reused, so appending keeps the order and
//! lookups are a binary search.  Removal goes through [`AgentArena::retain`],
//! which preserves order; iteration order (and therefore snapshot order) is
//! always by id.

use cf_core::AgentId;

use crate::CustomerAgent;

#[derive(Clone, Debug, Default)]
pub struct AgentArena {
    agents:  Vec<CustomerAgent>,
    next_id: u32,
}

impl AgentArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { agents: Vec::with_capacity(capacity), next_id: 0 }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Reserve the next id.  Never returns the same id twice for the life of
    /// the arena, across [`clear`][Self::clear] included.
    pub fn allocate_id(&mut self) -> AgentId {
        let id = AgentId(self.next_id);
        self.next_id += 1;
        id
    }

    /// The id the next [`allocate_id`][Self::allocate_id] will return.
    pub fn peek_next_id(&self) -> AgentId {
        AgentId(self.next_id)
    }

    /// Append an agent built around an id from [`allocate_id`][Self::allocate_id].
    pub fn push(&mut self, agent: CustomerAgent) {
        debug_assert!(
            self.agents.last().is_none_or(|last| last.id < agent.id),
            "agents must be pushed in id order"
        );
        self.agents.push(agent);
    }

    pub fn get(&self, id: AgentId) -> Option<&CustomerAgent> {
        let i = self.agents.binary_search_by_key(&id, |a| a.id).ok()?;
        Some(&self.agents[i])
    }

    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut CustomerAgent> {
        let i = self.agents.binary_search_by_key(&id, |a| a.id).ok()?;
        Some(&mut self.agents[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CustomerAgent> {
        self.agents.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, CustomerAgent> {
        self.agents.iter_mut()
    }

    pub fn as_slice(&self) -> &[CustomerAgent] {
        &self.agents
    }

    /// Keep only agents for which `keep` returns `true`, preserving order.
    /// Returns the number removed.
    pub fn retain<F: FnMut(&CustomerAgent) -> bool>(&mut self, keep: F) -> usize {
        let before = self.agents.len();
        self.agents.retain(keep);
        before - self.agents.len()
    }

    /// Drop every agent.  Id allocation continues from where it was.
    pub fn clear(&mut self) {
        self.agents.clear();
    }
}

impl<'a> IntoIterator for &'a AgentArena {
    type Item = &'a CustomerAgent;
    type IntoIter = std::slice::Iter<'a, CustomerAgent>;

    fn into_iter(self) -> Self::IntoIter {
        self.agents.iter()
    }
}
