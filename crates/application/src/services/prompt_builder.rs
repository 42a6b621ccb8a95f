//! Story prompt construction
//!
//! Turns a validated [`StoryRequest`] into the instruction text sent to the
//! language model. Pure string assembly; the same request always yields the
//! same prompt.

use domain::StoryRequest;

/// System message for chat-style cloud models
pub const CLOUD_STORY_SYSTEM: &str =
    "Sei un narratore sicuro e gentile per bambini italiani. Rispondi solo con JSON valido.";

/// Instruction prepended to the prompt for local and hosted models
pub const LOCAL_STORY_INSTRUCTION: &str = "You are StoriaAI, an Italian bedtime storyteller. \
     Respond only with strict JSON matching the requested schema.";

/// Used when the child has no listed interests
const DEFAULT_INTERESTS: &str = "sogni dolci";

/// Number of illustration prompts requested when panels are enabled
const PANEL_COUNT: usize = 4;

const SCHEMA_KEYS: &str = "intro, choice_1_prompt, choice_1_options (array), branch_1, \
     choice_2_prompt, choice_2_options (array), branch_2, resolution, moral_summary, \
     suggested_sequel_hook";

/// Build the story prompt for a request
///
/// `previous_summary` is embedded verbatim as continuity context when present.
pub fn build_story_prompt(request: &StoryRequest, previous_summary: Option<&str>) -> String {
    let child = &request.child;
    let interests = if child.interests.is_empty() {
        DEFAULT_INTERESTS.to_string()
    } else {
        child.interests.join(", ")
    };

    let mut prompt = format!(
        "Sei StoriaAI, narratore della buonanotte per bambini italiani. \
         Genera una storia originale per {} ({} anni) interessato a {interests}. \
         Il bambino questa sera si sente {}. \
         Segui esattamente queste istruzioni:\n",
        child.name, child.age, child.mood
    );

    for line in instruction_lines(request, previous_summary) {
        prompt.push_str(&line);
        prompt.push('\n');
    }

    prompt.push_str("Restituisci la risposta in JSON con le chiavi ");
    prompt.push_str(SCHEMA_KEYS);
    if request.style.generate_panels {
        prompt.push_str(", panel_prompts (array)");
    }
    prompt.push_str(
        ". Ogni valore deve essere una stringa senza caratteri di escape e priva di markdown.",
    );

    prompt
}

fn instruction_lines(request: &StoryRequest, previous_summary: Option<&str>) -> Vec<String> {
    let controls = &request.controls;
    let style = &request.style;

    let mut lines = vec![
        format!(
            "- Storia positiva, calma, adatta a bambini di età {}.",
            request.child.age
        ),
        format!("- Linguaggio: {}.", request.language.display_name()),
        format!(
            "- Durata obiettivo: {} minuti.",
            request.target_duration_minutes
        ),
        if controls.no_scary {
            "- Evita elementi spaventosi.".to_string()
        } else {
            "- Elementi avventura ammessi, ma sempre rassicuranti.".to_string()
        },
        if controls.kindness_lesson {
            "- Inserisci una lezione di gentilezza.".to_string()
        } else {
            "- Morale positiva generale.".to_string()
        },
        if controls.locale_focus {
            "- Richiama folklore italiano (Pinocchio, fiabe regionali).".to_string()
        } else {
            "- Inserisci elementi fantasy universali.".to_string()
        },
    ];

    if controls.educational {
        lines.push("- Aggiungi curiosità educative in modo leggero.".to_string());
    }
    if let Some(style_name) = &style.style {
        lines.push(format!("- Stile narrativo: {style_name}."));
    }
    if let Some(tone) = &style.tone {
        lines.push(format!("- Tono: {tone}."));
    }
    if let Some(topic) = &style.educational_topic {
        lines.push(format!("- Tema educativo da intrecciare nella trama: {topic}."));
    }
    if style.generate_panels {
        lines.push(format!(
            "- Descrivi {PANEL_COUNT} scene da illustrare in panel_prompts, una frase ciascuna."
        ));
    }
    if let Some(summary) = previous_summary.filter(|s| !s.trim().is_empty()) {
        lines.push(format!(
            "- Continua la storia riprendendo questi elementi: {summary}."
        ));
    }

    lines
}
