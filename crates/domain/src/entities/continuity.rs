//! Continuity between stories
//!
//! Each finished story is condensed into a [`ContinuitySummary`]. Summaries are
//! folded into a per-child [`ChildMemory`] that the next sequel reads back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::ChildAlias;

/// Placeholder characters used when none can be found in the text
pub const PLACEHOLDER_CHARACTERS: [&str; 2] = ["Bambino", "Fatina"];

/// Condensed state of one story
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinuitySummary {
    pub summary: String,
    #[serde(default)]
    pub characters: Vec<String>,
    #[serde(default)]
    pub moral: Option<String>,
    #[serde(default)]
    pub unresolved_threads: Vec<String>,
}

impl ContinuitySummary {
    /// The fixed summary used for empty input
    pub fn stub() -> Self {
        Self {
            summary: "La storia di prova celebra l'amicizia e la gentilezza.".to_string(),
            characters: PLACEHOLDER_CHARACTERS.iter().map(ToString::to_string).collect(),
            moral: Some("La gentilezza illumina la notte".to_string()),
            unresolved_threads: vec!["Visitare il Carnevale di Venezia".to_string()],
        }
    }

    /// Drop repeated and blank character names, keeping first occurrences in order
    #[must_use]
    pub fn with_unique_characters(mut self) -> Self {
        let mut seen = std::collections::HashSet::new();
        self.characters = self
            .characters
            .into_iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty() && seen.insert(c.clone()))
            .collect();
        self
    }
}

/// Running memory of everything told to one child
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildMemory {
    pub alias: ChildAlias,
    /// Every character met so far, sorted
    pub characters: Vec<String>,
    pub last_moral: Option<String>,
    pub unresolved_threads: Vec<String>,
    pub sequel_hook: Option<String>,
    /// Summary of the most recent story
    pub last_summary: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ChildMemory {
    /// Empty memory for a child
    pub fn new(alias: ChildAlias) -> Self {
        Self {
            alias,
            characters: Vec::new(),
            last_moral: None,
            unresolved_threads: Vec::new(),
            sequel_hook: None,
            last_summary: None,
            updated_at: Utc::now(),
        }
    }

    /// Fold a story summary into the memory
    ///
    /// Characters accumulate. Moral, threads and hook reflect the latest story.
    pub fn merge(&mut self, summary: &ContinuitySummary, sequel_hook: Option<&str>) {
        let mut characters: std::collections::BTreeSet<String> =
            self.characters.drain(..).collect();
        characters.extend(summary.characters.iter().cloned());
        self.characters = characters.into_iter().collect();

        self.last_moral.clone_from(&summary.moral);
        self.unresolved_threads.clone_from(&summary.unresolved_threads);
        self.sequel_hook = sequel_hook.map(ToString::to_string);
        self.last_summary = Some(summary.summary.clone());
        self.updated_at = Utc::now();
    }

    /// Text handed to the prompt builder as previous-story context
    pub fn previous_summary(&self) -> Option<String> {
        let summary = self.last_summary.as_deref()?;
        let mut context = summary.to_string();
        if !self.characters.is_empty() {
            context.push_str(&format!(" Personaggi: {}.", self.characters.join(", ")));
        }
        if !self.unresolved_threads.is_empty() {
            context.push_str(&format!(
                " Da risolvere: {}.",
                self.unresolved_threads.join("; ")
            ));
        }
        if let Some(hook) = &self.sequel_hook {
            context.push(' ');
            context.push_str(hook);
        }
        Some(context)
    }

    /// Read-only view returned to callers
    pub fn snapshot(&self) -> MemorySnapshot {
        MemorySnapshot {
            characters: self.characters.clone(),
            last_moral: self.last_moral.clone(),
            unresolved_threads: self.unresolved_threads.clone(),
            sequel_hook: self.sequel_hook.clone(),
            updated_at: self.updated_at,
        }
    }
}

/// Outbound view of a child's memory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorySnapshot {
    pub characters: Vec<String>,
    pub last_moral: Option<String>,
    pub unresolved_threads: Vec<String>,
    pub sequel_hook: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(characters: &[&str], moral: Option<&str>) -> ContinuitySummary {
        ContinuitySummary {
            summary: "Luca e il drago.".to_string(),
            characters: characters.iter().map(ToString::to_string).collect(),
            moral: moral.map(ToString::to_string),
            unresolved_threads: vec!["Il drago deve tornare a casa".to_string()],
        }
    }

    #[test]
    fn stub_has_placeholder_characters() {
        assert_eq!(ContinuitySummary::stub().characters, PLACEHOLDER_CHARACTERS);
    }

    #[test]
    fn unique_characters_preserve_order() {
        let s = summary(&["Luca", "Drago", "Luca", " ", "Anna"], None).with_unique_characters();
        assert_eq!(s.characters, vec!["Luca", "Drago", "Anna"]);
    }

    #[test]
    fn merge_unions_characters_sorted() {
        let mut memory = ChildMemory::new(ChildAlias::for_child("genitore@example.com", "Luca"));
        memory.merge(&summary(&["Luca", "Drago"], Some("Essere gentili")), None);
        memory.merge(&summary(&["Anna", "Luca"], None), Some("Domani al mare"));

        assert_eq!(memory.characters, vec!["Anna", "Drago", "Luca"]);
        assert!(memory.last_moral.is_none());
        assert_eq!(memory.sequel_hook.as_deref(), Some("Domani al mare"));
    }

    #[test]
    fn previous_summary_includes_context() {
        let mut memory = ChildMemory::new(ChildAlias::for_child("genitore@example.com", "Luca"));
        assert!(memory.previous_summary().is_none());

        memory.merge(&summary(&["Drago"], None), Some("La prossima volta, il mare!"));
        let context = memory.previous_summary().unwrap();
        assert!(context.starts_with("Luca e il drago."));
        assert!(context.contains("Personaggi: Drago."));
        assert!(context.ends_with("La prossima volta, il mare!"));
    }

    #[test]
    fn snapshot_mirrors_memory() {
        let mut memory = ChildMemory::new(ChildAlias::for_child("genitore@example.com", "Luca"));
        memory.merge(&summary(&["Drago"], Some("Coraggio")), None);
        let snap = memory.snapshot();
        assert_eq!(snap.characters, memory.characters);
        assert_eq!(snap.last_moral.as_deref(), Some("Coraggio"));
    }
}
