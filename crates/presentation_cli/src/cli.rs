//! Command-line arguments

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use domain::{ChildProfile, ControlSettings, StoryRequestDraft, StyleOptions};

/// Storia CLI
#[derive(Debug, Parser)]
#[command(name = "storia-cli")]
#[command(author, version, about = "Bedtime story generation from the command line", long_about = None)]
pub struct Cli {
    /// Configuration file (default: ./storia.toml when present)
    #[arg(short, long, global = true, env = "STORIA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate, narrate and remember a story
    ///
    /// Example: storia-cli generate --parent-email a@b.it --name Luca --age 6 --mood curioso
    Generate(Box<GenerateArgs>),

    /// Summarize story text for continuity
    Summarize(TextInput),

    /// Screen story text for banned terms
    Validate(TextInput),

    /// Show the active provider and enabled narration backends
    Providers,
}

/// Story request fields
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Parent account email
    #[arg(long)]
    pub parent_email: String,

    /// Child's first name or nickname
    #[arg(long)]
    pub name: String,

    /// Child's age in years (2-12)
    #[arg(long)]
    pub age: u8,

    /// How the child feels tonight
    #[arg(long)]
    pub mood: String,

    /// Topic the child likes (repeatable)
    #[arg(long = "interest")]
    pub interests: Vec<String>,

    /// Story language code
    #[arg(short, long, default_value = "it")]
    pub language: String,

    /// Target narration length in minutes (5-10)
    #[arg(short, long, default_value_t = domain::DEFAULT_DURATION_MINUTES)]
    pub duration: u8,

    /// Narration voice, e.g. "piper", "edge:it-IT-IsabellaNeural"
    #[arg(long)]
    pub voice: Option<String>,

    /// Continue the previous story for this child
    #[arg(long)]
    pub sequel: bool,

    /// Identifier of the story being continued
    #[arg(long)]
    pub previous_story_id: Option<String>,

    /// Allow scary elements (banned terms are softened by default)
    #[arg(long)]
    pub allow_scary: bool,

    /// Skip the kindness lesson
    #[arg(long)]
    pub no_kindness: bool,

    /// Use universal fantasy instead of local folklore
    #[arg(long)]
    pub no_locale_focus: bool,

    /// Add light educational curiosities
    #[arg(long)]
    pub educational: bool,

    /// Narrative style hint
    #[arg(long)]
    pub style: Option<String>,

    /// Emotional tone hint
    #[arg(long)]
    pub tone: Option<String>,

    /// Topic to weave in lightly
    #[arg(long)]
    pub educational_topic: Option<String>,

    /// Ask for illustration panel prompts
    #[arg(long)]
    pub panels: bool,

    /// Write the narration audio to this file
    #[arg(long)]
    pub audio_out: Option<PathBuf>,
}

impl GenerateArgs {
    /// Unvalidated request built from the flags
    pub fn to_draft(&self) -> StoryRequestDraft {
        let child = ChildProfile::new(&self.name, self.age, &self.mood)
            .with_interests(self.interests.iter().cloned());

        let mut draft = StoryRequestDraft::new(&self.parent_email, child);
        draft.controls = ControlSettings {
            no_scary: !self.allow_scary,
            kindness_lesson: !self.no_kindness,
            locale_focus: !self.no_locale_focus,
            educational: self.educational,
        };
        draft.style = StyleOptions {
            style: self.style.clone(),
            tone: self.tone.clone(),
            educational_topic: self.educational_topic.clone(),
            generate_panels: self.panels,
        };
        draft.language.clone_from(&self.language);
        draft.target_duration_minutes = self.duration;
        draft.sequel = self.sequel;
        draft.previous_story_id.clone_from(&self.previous_story_id);
        draft.voice.clone_from(&self.voice);
        draft
    }
}

/// Story text given inline or read from a file
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct TextInput {
    /// Story text
    pub text: Option<String>,

    /// Read the story text from a file
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

impl TextInput {
    /// Resolve to the story text
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the file cannot be read.
    pub fn read(&self) -> std::io::Result<String> {
        match (&self.text, &self.file) {
            (Some(text), _) => Ok(text.clone()),
            (None, Some(path)) => std::fs::read_to_string(path),
            (None, None) => Ok(String::new()),
        }
    }
}
