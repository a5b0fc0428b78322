//! Detection of action verbs that escalate a general request to code generation.

/// A verb stem and the endings that make a complete inflected form of it.
#[derive(Debug, Clone, Copy)]
pub struct ActionVerb {
    pub stem: &'static str,
    pub endings: &'static [&'static str],
}

const ENGLISH_ENDINGS: &[&str] = &["", "e", "s", "es", "d", "ed", "ing"];
const FRENCH_ENDINGS: &[&str] = &["e", "es", "er", "ez", "ons", "é", "ée", "és", "ées"];

const fn english(stem: &'static str) -> ActionVerb {
    ActionVerb {
        stem,
        endings: ENGLISH_ENDINGS,
    }
}

const fn french(stem: &'static str) -> ActionVerb {
    ActionVerb {
        stem,
        endings: FRENCH_ENDINGS,
    }
}

/// Verbs that signal the user wants code produced. A lowercase word matches
/// when it is a stem followed by exactly one of its endings, so "creates",
/// "implementing" and "ajouter" match while "address", "additional" and
/// "writer" do not.
pub const ACTION_VERBS: &[ActionVerb] = &[
    english("creat"),
    english("add"),
    english("writ"),
    english("implement"),
    english("develop"),
    english("generat"),
    ActionVerb {
        stem: "wr",
        endings: &["ote", "itten"],
    },
    french("cré"),
    french("ajout"),
    french("implément"),
    french("développ"),
    french("génér"),
    french("génèr"),
    ActionVerb {
        stem: "écri",
        endings: &["s", "re", "t", "te", "vez", "vons"],
    },
];

fn is_action_verb(word: &str) -> bool {
    ACTION_VERBS.iter().any(|verb| {
        word.strip_prefix(verb.stem)
            .is_some_and(|rest| verb.endings.contains(&rest))
    })
}

/// Returns true if `text` contains any action verb.
pub fn contains_action_verb(text: &str) -> bool {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .any(|word| is_action_verb(&word))
}

/// Decides whether the general path should call the generation gateway.
///
/// Either the user message or the guidance text may trigger escalation.
pub fn requires_code_generation(guidance: &str, user_message: &str) -> bool {
    contains_action_verb(user_message) || contains_action_verb(guidance)
}
