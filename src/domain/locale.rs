use serde::{Deserialize, Serialize};

use crate::domain::message::{Message, Role};

/// Interface languages supported by the assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    English,
    Francais,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::Francais];

    /// The tag used in configuration and the language selector.
    pub fn tag(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Francais => "Francais",
        }
    }

    /// Parse a selector tag back into a language.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Language::ALL.into_iter().find(|l| l.tag() == tag)
    }

    /// Look up the display strings and option lists for this language.
    /// Pure lookup into fixed tables, no I/O.
    pub fn bundle(&self) -> &'static LocaleBundle {
        match self {
            Language::English => &ENGLISH,
            Language::Francais => &FRANCAIS,
        }
    }

    /// Hint passed to the transcription endpoint (ISO 639-1).
    pub fn transcription_hint(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Francais => "fr",
        }
    }
}

/// Fixed display strings and option-choice lists for one language.
/// Read-only at runtime.
#[derive(Debug)]
pub struct LocaleBundle {
    pub greeting: &'static str,
    pub assistant_hello: &'static str,
    pub input_placeholder: &'static str,
    pub language_label: &'static str,
    pub units_label: &'static str,
    pub units_choices: &'static [&'static str],
    pub diet_label: &'static str,
    pub diet_choices: &'static [&'static str],
    pub save_label: &'static str,
    pub saved_recipes_title: &'static str,
    pub clear_recipes_label: &'static str,
    pub custom_recipe_prompt: &'static str,
    pub include_label: &'static str,
    pub exclude_label: &'static str,
    pub include_placeholder: &'static str,
    pub exclude_placeholder: &'static str,
    pub custom_submit_label: &'static str,
    pub custom_clear_label: &'static str,
    custom_request_intro: &'static str,
    custom_include_header: &'static str,
    custom_exclude_header: &'static str,
}

impl LocaleBundle {
    /// Synthesize the user message for a custom-recipe request, embedding
    /// both ingredient lists verbatim.
    pub fn custom_recipe_message(&self, include: &str, exclude: &str) -> String {
        format!(
            "{}\n{}\n{}\n{}\n{}",
            self.custom_request_intro,
            self.custom_include_header,
            include,
            self.custom_exclude_header,
            exclude
        )
    }
}

static ENGLISH: LocaleBundle = LocaleBundle {
    greeting: "Welcome to SousChef! What kind of recipe are you looking for?",
    assistant_hello: "Hi there! Ask me for a recipe!",
    input_placeholder: "Need a recipe? Type or record your request here!",
    language_label: "Language",
    units_label: "Measurement units",
    units_choices: &["Metric", "Imperial"],
    diet_label: "Diet type",
    diet_choices: &[
        "None",
        "Vegetarian",
        "Vegan",
        "Gluten-free",
        "Halal",
        "Kosher",
    ],
    save_label: "Save recipe",
    saved_recipes_title: "Saved Recipes",
    clear_recipes_label: "Clear saved recipes",
    custom_recipe_prompt: "Want a custom recipe? Enter the ingredients you want and don't want below, and SousChef will make one for you!",
    include_label: "Ingredients to include",
    exclude_label: "Ingredients to exclude",
    include_placeholder: "Enter ingredients you want included in the recipe here",
    exclude_placeholder: "Enter ingredients you want excluded in the recipe here",
    custom_submit_label: "Create custom recipe",
    custom_clear_label: "Clear inputs",
    custom_request_intro: "Generate a recipe for me!",
    custom_include_header: "Ingredients to include:",
    custom_exclude_header: "Ingredients to exclude:",
};

static FRANCAIS: LocaleBundle = LocaleBundle {
    greeting: "Bienvenue à SousChef ! Quel type de recette recherchez-vous ?",
    assistant_hello: "Salut! Demande-moi une recette!",
    input_placeholder: "Besoin d'une recette ? Tapez ou enregistrez votre demande ici !",
    language_label: "Langue",
    units_label: "Unités de mesure",
    units_choices: &["Métrique", "Impérial"],
    diet_label: "Type de régime",
    diet_choices: &[
        "Aucun",
        "Végétarien",
        "Végétalien",
        "Sans gluten",
        "Halal",
        "Kascher",
    ],
    save_label: "Sauvegarder la recette",
    saved_recipes_title: "Recettes Sauvegardées",
    clear_recipes_label: "Effacer les recettes enregistrées",
    custom_recipe_prompt: "Vous voulez une recette personnalisée ? Entrez les ingrédients que vous voulez et ceux que vous ne voulez pas, et SousChef en fera une pour vous !",
    include_label: "Ingrédients à inclure",
    exclude_label: "Ingrédients à exclure",
    include_placeholder: "Entrez les ingrédients que vous voulez inclure dans la recette ici",
    exclude_placeholder: "Entrez les ingrédients que vous voulez exclure dans la recette ici",
    custom_submit_label: "Créer une recette personnalisée",
    custom_clear_label: "Effacer les entrées",
    custom_request_intro: "Générer une recette pour moi!",
    custom_include_header: "Ingrédients à inclure:",
    custom_exclude_header: "Ingrédients à exclure:",
};

/// Locale-dependent display state.
///
/// Rebuilt wholesale on a language switch: the visible transcript restarts
/// with a fresh greeting and the unit/diet selectors fall back to each
/// list's first choice. The underlying conversation log is not touched
/// here; it is owned by the session.
#[derive(Debug, Clone)]
pub struct UiState {
    pub language: Language,
    transcript: Vec<Message>,
    pub units: String,
    pub diet: String,
}

impl UiState {
    /// Build the full display state for a language.
    pub fn for_language(language: Language) -> Self {
        let bundle = language.bundle();
        Self {
            language,
            transcript: vec![Message::new(Role::Assistant, bundle.assistant_hello)],
            units: bundle.units_choices[0].to_string(),
            diet: bundle.diet_choices[0].to_string(),
        }
    }

    pub fn bundle(&self) -> &'static LocaleBundle {
        self.language.bundle()
    }

    /// The visible transcript (display only, not the model context).
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn transcript_len(&self) -> usize {
        self.transcript.len()
    }

    pub fn push(&mut self, message: Message) {
        self.transcript.push(message);
    }

    /// Roll the visible transcript back to a previous length.
    pub fn truncate_transcript(&mut self, len: usize) {
        self.transcript.truncate(len);
    }

    pub fn select_units(&mut self, units: impl Into<String>) {
        self.units = units.into();
    }

    pub fn select_diet(&mut self, diet: impl Into<String>) {
        self.diet = diet.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_lookup_is_fixed() {
        let en = Language::English.bundle();
        assert_eq!(en.units_choices, &["Metric", "Imperial"]);
        assert_eq!(en.diet_choices[0], "None");

        let fr = Language::Francais.bundle();
        assert_eq!(fr.units_choices[0], "Métrique");
        assert_eq!(fr.diet_choices[0], "Aucun");
    }

    #[test]
    fn test_tag_roundtrip() {
        for lang in Language::ALL {
            assert_eq!(Language::from_tag(lang.tag()), Some(lang));
        }
        assert_eq!(Language::from_tag("Deutsch"), None);
    }

    #[test]
    fn test_ui_state_defaults_to_first_choices() {
        let ui = UiState::for_language(Language::Francais);
        assert_eq!(ui.units, "Métrique");
        assert_eq!(ui.diet, "Aucun");
        assert_eq!(ui.transcript().len(), 1);
        assert_eq!(ui.transcript()[0].role, Role::Assistant);
        assert_eq!(
            ui.transcript()[0].content,
            Language::Francais.bundle().assistant_hello
        );
    }

    #[test]
    fn test_custom_recipe_message_embeds_both_lists() {
        let msg = Language::English
            .bundle()
            .custom_recipe_message("eggs", "nuts");
        assert!(msg.starts_with("Generate a recipe for me!"));
        assert!(msg.contains("Ingredients to include:\neggs"));
        assert!(msg.contains("Ingredients to exclude:\nnuts"));
    }

    #[test]
    fn test_custom_recipe_message_is_localized() {
        let msg = Language::Francais
            .bundle()
            .custom_recipe_message("oeufs", "noix");
        assert!(msg.starts_with("Générer une recette pour moi!"));
        assert!(msg.contains("Ingrédients à inclure:\noeufs"));
        assert!(msg.contains("Ingrédients à exclure:\nnoix"));
    }
}
