use std::collections::BTreeMap;

/// A ticket selected for a due-date rewrite in the current run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub ticket_id: u64,
    /// Resolved start date, `YYYY-MM-DD`.
    pub start_date: String,
    /// Date portion of the due date at listing time.
    pub previous_due_date: Option<String>,
}

/// Candidates keyed by ticket id. Lives for one run only.
#[derive(Debug, Default)]
pub struct CandidateSet {
    entries: BTreeMap<u64, Candidate>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the ticket was already present.
    pub fn insert(&mut self, candidate: Candidate) -> bool {
        if self.entries.contains_key(&candidate.ticket_id) {
            return false;
        }
        self.entries.insert(candidate.ticket_id, candidate);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for CandidateSet {
    type Item = Candidate;
    type IntoIter = std::collections::btree_map::IntoValues<u64, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_values()
    }
}
