//! Structured bedtime story
//!
//! A story is a fixed set of narrative fields with two binary choices. The
//! text fields and the string lists are enumerated by [`NarrativeField`] and
//! [`ListField`] so that passes over the payload (sanitizing, validation,
//! narration) can walk them without repeating the field list.

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Number of options every choice must offer
pub const OPTIONS_PER_CHOICE: usize = 2;

/// Single-string fields of a [`StoryPayload`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NarrativeField {
    Intro,
    Choice1Prompt,
    Branch1,
    Choice2Prompt,
    Branch2,
    Resolution,
    MoralSummary,
    SuggestedSequelHook,
}

impl NarrativeField {
    /// Every text field, in reading order
    pub const ALL: [Self; 8] = [
        Self::Intro,
        Self::Choice1Prompt,
        Self::Branch1,
        Self::Choice2Prompt,
        Self::Branch2,
        Self::Resolution,
        Self::MoralSummary,
        Self::SuggestedSequelHook,
    ];

    /// Fields read aloud, in narration order
    pub const NARRATED: [Self; 5] = [
        Self::Intro,
        Self::Branch1,
        Self::Branch2,
        Self::Resolution,
        Self::MoralSummary,
    ];

    /// Wire name of the field
    pub const fn name(self) -> &'static str {
        match self {
            Self::Intro => "intro",
            Self::Choice1Prompt => "choice_1_prompt",
            Self::Branch1 => "branch_1",
            Self::Choice2Prompt => "choice_2_prompt",
            Self::Branch2 => "branch_2",
            Self::Resolution => "resolution",
            Self::MoralSummary => "moral_summary",
            Self::SuggestedSequelHook => "suggested_sequel_hook",
        }
    }

    /// Whether the field may be absent
    pub const fn is_optional(self) -> bool {
        matches!(self, Self::SuggestedSequelHook)
    }
}

/// String-list fields of a [`StoryPayload`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListField {
    Choice1Options,
    Choice2Options,
    PanelPrompts,
}

impl ListField {
    /// Every list field, panel prompts included
    pub const ALL: [Self; 3] = [Self::Choice1Options, Self::Choice2Options, Self::PanelPrompts];

    /// Lists holding the options of a binary choice
    pub const CHOICES: [Self; 2] = [Self::Choice1Options, Self::Choice2Options];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Choice1Options => "choice_1_options",
            Self::Choice2Options => "choice_2_options",
            Self::PanelPrompts => "panel_prompts",
        }
    }
}

/// A generated (or stubbed) interactive bedtime story
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryPayload {
    pub intro: String,
    pub choice_1_prompt: String,
    pub choice_1_options: Vec<String>,
    pub branch_1: String,
    pub choice_2_prompt: String,
    pub choice_2_options: Vec<String>,
    pub branch_2: String,
    pub resolution: String,
    pub moral_summary: String,
    #[serde(default)]
    pub suggested_sequel_hook: Option<String>,
    /// Illustration prompts, one per panel
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub panel_prompts: Vec<String>,
}

impl StoryPayload {
    /// The fixed story served when no provider produced one
    pub fn stub() -> Self {
        Self {
            intro: "Ciao! Questa è una storia di esempio perché il servizio AI non è configurato."
                .to_string(),
            choice_1_prompt: "Vuoi seguire Pinocchio o la fata azzurra?".to_string(),
            choice_1_options: vec!["Pinocchio".to_string(), "Fata".to_string()],
            branch_1: "Pinocchio porta il bambino a scoprire un nuovo bosco pieno di lucciole."
                .to_string(),
            choice_2_prompt: "Preferisci ascoltare una canzone o raccontare un sogno?".to_string(),
            choice_2_options: vec!["Canzone".to_string(), "Sogno".to_string()],
            branch_2: "La fata azzurra insegna al bambino il valore della gentilezza condividendo piccoli gesti d'amore."
                .to_string(),
            resolution: "La serata termina con un abbraccio e un desiderio di sogni tranquilli."
                .to_string(),
            moral_summary: "La gentilezza rende la notte più luminosa.".to_string(),
            suggested_sequel_hook: Some(
                "La prossima volta, esplorate il Carnevale di Venezia!".to_string(),
            ),
            panel_prompts: Vec::new(),
        }
    }

    /// Read a text field; `None` only for an absent optional field
    pub fn text(&self, field: NarrativeField) -> Option<&str> {
        match field {
            NarrativeField::Intro => Some(&self.intro),
            NarrativeField::Choice1Prompt => Some(&self.choice_1_prompt),
            NarrativeField::Branch1 => Some(&self.branch_1),
            NarrativeField::Choice2Prompt => Some(&self.choice_2_prompt),
            NarrativeField::Branch2 => Some(&self.branch_2),
            NarrativeField::Resolution => Some(&self.resolution),
            NarrativeField::MoralSummary => Some(&self.moral_summary),
            NarrativeField::SuggestedSequelHook => self.suggested_sequel_hook.as_deref(),
        }
    }

    /// Mutable access to a text field
    pub fn text_mut(&mut self, field: NarrativeField) -> Option<&mut String> {
        match field {
            NarrativeField::Intro => Some(&mut self.intro),
            NarrativeField::Choice1Prompt => Some(&mut self.choice_1_prompt),
            NarrativeField::Branch1 => Some(&mut self.branch_1),
            NarrativeField::Choice2Prompt => Some(&mut self.choice_2_prompt),
            NarrativeField::Branch2 => Some(&mut self.branch_2),
            NarrativeField::Resolution => Some(&mut self.resolution),
            NarrativeField::MoralSummary => Some(&mut self.moral_summary),
            NarrativeField::SuggestedSequelHook => self.suggested_sequel_hook.as_mut(),
        }
    }

    /// Read a string list
    pub fn list(&self, field: ListField) -> &[String] {
        match field {
            ListField::Choice1Options => &self.choice_1_options,
            ListField::Choice2Options => &self.choice_2_options,
            ListField::PanelPrompts => &self.panel_prompts,
        }
    }

    /// Mutable access to a string list
    pub fn list_mut(&mut self, field: ListField) -> &mut Vec<String> {
        match field {
            ListField::Choice1Options => &mut self.choice_1_options,
            ListField::Choice2Options => &mut self.choice_2_options,
            ListField::PanelPrompts => &mut self.panel_prompts,
        }
    }

    /// Check the binary-choice shape and that required text is present
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStory` naming the first offending field.
    pub fn validate(&self) -> Result<(), DomainError> {
        for field in NarrativeField::ALL {
            if field.is_optional() {
                continue;
            }
            if self.text(field).is_none_or(|t| t.trim().is_empty()) {
                return Err(DomainError::invalid_story(
                    field.name(),
                    "must not be empty",
                ));
            }
        }

        for field in ListField::CHOICES {
            let options = self.list(field);
            if options.len() != OPTIONS_PER_CHOICE {
                return Err(DomainError::invalid_story(
                    field.name(),
                    format!(
                        "expected {OPTIONS_PER_CHOICE} options, got {}",
                        options.len()
                    ),
                ));
            }
            if options.iter().any(|o| o.trim().is_empty()) {
                return Err(DomainError::invalid_story(
                    field.name(),
                    "options must not be empty",
                ));
            }
        }

        Ok(())
    }

    /// Text read aloud by the narrator
    pub fn narration_text(&self) -> String {
        NarrativeField::NARRATED
            .iter()
            .filter_map(|f| self.text(*f))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// All prose of the story, choices included, for summarization
    pub fn full_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(NarrativeField::ALL.len() + 4);
        for field in NarrativeField::ALL {
            if let Some(text) = self.text(field) {
                parts.push(text);
            }
            if field == NarrativeField::Choice1Prompt {
                parts.extend(self.choice_1_options.iter().map(String::as_str));
            } else if field == NarrativeField::Choice2Prompt {
                parts.extend(self.choice_2_options.iter().map(String::as_str));
            }
        }
        parts.join("\n")
    }
}
