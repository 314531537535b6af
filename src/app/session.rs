use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::domain::locale::{Language, LocaleBundle, UiState};
use crate::domain::message::{ConversationLog, Message, Role};
use crate::domain::recipe::{RecipeShelf, ShelfView};
use crate::domain::DomainError;
use crate::ports::{CompletionClient, GenerationParams, Transcriber};

/// Behavioral instruction seeding every conversation.
const SYSTEM_PROMPT: &str = "You are an expert recipe assistant, knowledgeable about every cuisine. \
Answer in the same language the user writes in. Use the measurement units provided in the user \
input and make sure the recipe respects the user's diet. If the provided diet is \"None\", the \
user has no dietary restrictions; do not mention the absence of restrictions. Do not mention that \
your response is tailored to the provided units or the user's language. Include a follow-up \
question in the interface language, related to the recipe, in the form \"Is there...\"; if the \
user is finished with the interaction, ask instead whether there is anything else you can help \
with. For ambiguous input or input unrelated to recipes, do not assume what the user means: ask a \
clarifying question, containing no recipe, that guides the user back to recipes. If the user asks \
for a recipe after providing ingredients to include and exclude, start your reply with something \
along the lines of \"Here is your custom recipe\" in the interface language; include all included \
ingredients and none of the excluded ones. If some listed ingredients are not actual food items, \
or the two lists contradict each other, seek clarification instead.";

/// Prompt for the secondary title-derivation call. The recipe text is
/// appended on the following line.
const TITLE_PROMPT: &str = "Give a title for this recipe in 3 words only. If it is not a recipe, \
your answer should be exactly 'Not a recipe'. If the recipe is in french, give the title in \
french. Your output should only contain the title:";

/// Sentinel returned by the title call when the content is not a recipe.
const NOT_A_RECIPE: &str = "Not a recipe";

/// One user submission: zero or more recorded clips plus optional text.
#[derive(Debug, Clone, Default)]
pub struct TurnInput {
    /// Audio clip references, in capture order.
    pub clips: Vec<PathBuf>,
    pub text: Option<String>,
}

impl TurnInput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            clips: Vec::new(),
            text: Some(text.into()),
        }
    }

    pub fn clips(clips: Vec<PathBuf>) -> Self {
        Self { clips, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// One user session: the canonical conversation log, the recipe shelf, the
/// locale-dependent display state, and the last assistant response.
///
/// All mutation goes through `&mut self`; there is exactly one writer per
/// session and no locking. A multi-session deployment holds one `Session`
/// per user.
#[derive(Debug)]
pub struct Session {
    log: ConversationLog,
    shelf: RecipeShelf,
    ui: UiState,
    last_response: String,
}

impl Session {
    pub fn new(language: Language) -> Self {
        Self {
            log: ConversationLog::new(SYSTEM_PROMPT),
            shelf: RecipeShelf::new(),
            ui: UiState::for_language(language),
            last_response: String::new(),
        }
    }

    /// The canonical message history (model context).
    pub fn conversation(&self) -> &ConversationLog {
        &self.log
    }

    /// The saved-recipe catalog.
    pub fn shelf(&self) -> &RecipeShelf {
        &self.shelf
    }

    /// The locale-dependent display state, including the visible
    /// transcript. This is not the model context.
    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn language(&self) -> Language {
        self.ui.language
    }

    /// The most recent assistant response, empty before the first turn.
    pub fn last_response(&self) -> &str {
        &self.last_response
    }

    pub fn select_units(&mut self, units: impl Into<String>) {
        self.ui.select_units(units);
    }

    pub fn select_diet(&mut self, diet: impl Into<String>) {
        self.ui.select_diet(diet);
    }

    /// Process one user submission through to the assistant reply.
    ///
    /// Clips are transcribed in capture order; each non-empty transcript
    /// becomes one user message, the optional text comes last. The final
    /// segment carries the units/diet suffix into the model context. A clip
    /// that fails to transcribe is skipped and the rest of the submission
    /// proceeds.
    ///
    /// Returns `Ok(None)` for an empty submission. On a completion failure
    /// the whole turn is rolled back, log and visible transcript both.
    pub async fn submit_turn(
        &mut self,
        input: TurnInput,
        transcriber: &dyn Transcriber,
        completion: &dyn CompletionClient,
        params: &GenerationParams,
    ) -> Result<Option<String>, DomainError> {
        let mut segments: Vec<String> = Vec::new();

        let hint = self.ui.language.transcription_hint();
        for clip in &input.clips {
            match transcriber.transcribe(clip, Some(hint)).await {
                Ok(transcript) if !transcript.text.is_empty() => {
                    segments.push(transcript.text);
                }
                Ok(_) => {
                    debug!(clip = ?clip, "Clip produced an empty transcript, skipping");
                }
                Err(e) => {
                    warn!(clip = ?clip, error = %e, "Clip transcription failed, skipping");
                }
            }
        }
        if let Some(text) = input.text.filter(|t| !t.is_empty()) {
            segments.push(text);
        }

        let Some(payload) = segments.pop() else {
            info!("Empty submission, nothing to do");
            return Ok(None);
        };

        let pre_log = self.log.len();
        let pre_transcript = self.ui.transcript_len();

        // Leading segments (earlier clips) go in raw, before the payload.
        for segment in segments {
            self.ui.push(Message::new(Role::User, segment.clone()));
            self.log.append(Role::User, segment);
        }
        // The display shows the payload without the units/diet suffix.
        self.ui.push(Message::new(Role::User, payload.clone()));

        let units = self.ui.units.clone();
        let diet = self.ui.diet.clone();
        match self
            .request_completion(&payload, &units, &diet, completion, params)
            .await
        {
            Ok(reply) => {
                self.ui.push(Message::new(Role::Assistant, reply.clone()));
                Ok(Some(reply))
            }
            Err(e) => {
                self.log.truncate(pre_log);
                self.ui.truncate_transcript(pre_transcript);
                Err(e)
            }
        }
    }

    /// Submit a custom-recipe request built from structured include/exclude
    /// ingredient lists. Bypasses transcription: one synthesized user
    /// message from the active locale's template.
    pub async fn submit_custom_recipe(
        &mut self,
        include: &str,
        exclude: &str,
        completion: &dyn CompletionClient,
        params: &GenerationParams,
    ) -> Result<Option<String>, DomainError> {
        if include.trim().is_empty() && exclude.trim().is_empty() {
            info!("Custom recipe request with no ingredients, nothing to do");
            return Ok(None);
        }

        let message = self.ui.bundle().custom_recipe_message(include, exclude);

        let pre_log = self.log.len();
        let pre_transcript = self.ui.transcript_len();
        self.ui.push(Message::new(Role::User, message.clone()));

        let units = self.ui.units.clone();
        let diet = self.ui.diet.clone();
        match self
            .request_completion(&message, &units, &diet, completion, params)
            .await
        {
            Ok(reply) => {
                self.ui.push(Message::new(Role::Assistant, reply.clone()));
                Ok(Some(reply))
            }
            Err(e) => {
                self.log.truncate(pre_log);
                self.ui.truncate_transcript(pre_transcript);
                Err(e)
            }
        }
    }

    /// Append the outgoing user message (caller text plus the fixed-format
    /// units/diet suffix), call the completion service with the full
    /// snapshot, and append the assistant reply.
    ///
    /// On failure the pending user message is rolled back so the log never
    /// ends with a user message that got no reply.
    pub async fn request_completion(
        &mut self,
        text: &str,
        units: &str,
        diet: &str,
        completion: &dyn CompletionClient,
        params: &GenerationParams,
    ) -> Result<String, DomainError> {
        let pre_len = self.log.len();
        let outgoing = format!("{} Measurement units: {} Diet: {}", text, units, diet);
        self.log.append(Role::User, outgoing);

        debug!(history = self.log.len(), "Requesting main completion");

        match completion.complete(self.log.snapshot(), params).await {
            Ok(reply) => {
                self.log.append(Role::Assistant, reply.clone());
                self.last_response = reply.clone();
                info!(chars = reply.chars().count(), "Turn completed");
                Ok(reply)
            }
            Err(e) => {
                self.log.truncate(pre_len);
                warn!(error = %e, "Main completion failed, turn rolled back");
                Err(e)
            }
        }
    }

    /// Save the last assistant response to the recipe shelf.
    ///
    /// Issues a separate single-message completion call to derive a short
    /// title; the conversation log is not involved and not modified. The
    /// sentinel answer ("not a recipe") and an empty last response are
    /// defined no-ops. A matching existing title is replaced, the fresh
    /// entry landing at the end of the shelf.
    pub async fn save_recipe(
        &mut self,
        completion: &dyn CompletionClient,
        params: &GenerationParams,
    ) -> Result<ShelfView, DomainError> {
        if self.last_response.is_empty() {
            debug!("No response to save");
            return Ok(self.shelf.render());
        }

        let request = [Message::new(
            Role::User,
            format!("{}\n{}", TITLE_PROMPT, self.last_response),
        )];
        let title = completion
            .complete(&request, params)
            .await
            .map_err(|e| DomainError::TitleDerivation(e.to_string()))?;
        let title = title.trim();

        if title == NOT_A_RECIPE {
            info!("Response is not a recipe, nothing saved");
            return Ok(self.shelf.render());
        }

        info!(title = title, "Recipe saved");
        self.shelf.keep(title, self.last_response.clone());
        Ok(self.shelf.render())
    }

    /// Empty the recipe shelf unconditionally.
    pub fn clear_recipes(&mut self) -> ShelfView {
        self.shelf.clear();
        info!("Saved recipes cleared");
        self.shelf.render()
    }

    /// Switch the interface language.
    ///
    /// Rebuilds the display state wholesale: fresh greeting transcript,
    /// selectors back to each locale's first choice. The conversation log
    /// and the recipe shelf persist across the switch; only the visible
    /// transcript restarts.
    pub fn switch_language(&mut self, language: Language) -> &'static LocaleBundle {
        info!(language = language.tag(), "Interface language changed");
        self.ui = UiState::for_language(language);
        language.bundle()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::path::Path;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::ports::Transcript;

    /// Completion double that pops scripted outcomes in order and records
    /// every request payload.
    struct ScriptedCompletion {
        outcomes: Mutex<VecDeque<Result<String, String>>>,
        requests: Mutex<Vec<Vec<Message>>>,
    }

    impl ScriptedCompletion {
        fn new(outcomes: Vec<Result<&str, &str>>) -> Self {
            Self {
                outcomes: Mutex::new(
                    outcomes
                        .into_iter()
                        .map(|o| o.map(String::from).map_err(String::from))
                        .collect(),
                ),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        fn request(&self, index: usize) -> Vec<Message> {
            self.requests.lock().unwrap()[index].clone()
        }
    }

    #[async_trait]
    impl CompletionClient for ScriptedCompletion {
        async fn complete(
            &self,
            messages: &[Message],
            _params: &GenerationParams,
        ) -> Result<String, DomainError> {
            self.requests.lock().unwrap().push(messages.to_vec());
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .expect("unscripted completion call")
                .map_err(DomainError::Completion)
        }
    }

    /// Transcriber double keyed on the clip file name: "fail*" errors,
    /// "empty*" yields an empty transcript, anything else echoes its stem.
    struct StubTranscriber;

    #[async_trait]
    impl Transcriber for StubTranscriber {
        async fn transcribe(
            &self,
            clip: &Path,
            _language: Option<&str>,
        ) -> Result<Transcript, DomainError> {
            let name = clip.file_stem().unwrap().to_string_lossy().into_owned();
            if name.starts_with("fail") {
                return Err(DomainError::Transcription("decode error".to_string()));
            }
            let text = if name.starts_with("empty") {
                String::new()
            } else {
                format!("spoken {}", name)
            };
            Ok(Transcript {
                text,
                detected_language: None,
                duration_ms: 10,
            })
        }
    }

    fn params() -> GenerationParams {
        GenerationParams::default()
    }

    #[tokio::test]
    async fn test_text_turn_appends_suffixed_message_and_reply() {
        let mut session = Session::new(Language::English);
        let completion = ScriptedCompletion::new(vec![Ok(
            "Here is your pasta recipe... Is there anything else?",
        )]);

        let reply = session
            .submit_turn(
                TurnInput::text("I want pasta"),
                &StubTranscriber,
                &completion,
                &params(),
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(reply, "Here is your pasta recipe... Is there anything else?");
        let snapshot = session.conversation().snapshot();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[0].role, Role::System);
        assert_eq!(
            snapshot[1].content,
            "I want pasta Measurement units: Metric Diet: None"
        );
        assert_eq!(snapshot[2].role, Role::Assistant);
        assert_eq!(session.last_response(), reply);

        // The request payload was the snapshot up to and including the
        // suffixed user message.
        let sent = completion.request(0);
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].content, snapshot[1].content);

        // The visible transcript shows the raw text, no suffix.
        let transcript = session.ui().transcript();
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[1].content, "I want pasta");
    }

    #[tokio::test]
    async fn test_clips_precede_text_in_capture_order() {
        let mut session = Session::new(Language::English);
        let completion = ScriptedCompletion::new(vec![Ok("Coming right up!")]);

        let input = TurnInput::clips(vec![PathBuf::from("one.wav"), PathBuf::from("two.wav")])
            .with_text("and some dessert");
        session
            .submit_turn(input, &StubTranscriber, &completion, &params())
            .await
            .unwrap();

        let snapshot = session.conversation().snapshot();
        assert_eq!(snapshot.len(), 5);
        assert_eq!(snapshot[1].content, "spoken one");
        assert_eq!(snapshot[2].content, "spoken two");
        assert!(snapshot[3].content.starts_with("and some dessert Measurement units:"));
        assert_eq!(snapshot[4].role, Role::Assistant);
    }

    #[tokio::test]
    async fn test_failed_and_empty_clips_are_skipped() {
        let mut session = Session::new(Language::English);
        let completion = ScriptedCompletion::new(vec![Ok("Done")]);

        let input = TurnInput::clips(vec![
            PathBuf::from("fail.wav"),
            PathBuf::from("empty.wav"),
            PathBuf::from("good.wav"),
        ]);
        session
            .submit_turn(input, &StubTranscriber, &completion, &params())
            .await
            .unwrap();

        let snapshot = session.conversation().snapshot();
        // Only the surviving clip made it in, as the suffixed payload.
        assert_eq!(snapshot.len(), 3);
        assert!(snapshot[1].content.starts_with("spoken good Measurement units:"));
    }

    #[tokio::test]
    async fn test_empty_submission_is_noop() {
        let mut session = Session::new(Language::English);
        let completion = ScriptedCompletion::new(vec![]);

        let result = session
            .submit_turn(TurnInput::default(), &StubTranscriber, &completion, &params())
            .await
            .unwrap();

        assert!(result.is_none());
        assert_eq!(session.conversation().len(), 1);
        assert_eq!(completion.request_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_completion_rolls_back_turn() {
        let mut session = Session::new(Language::English);
        let completion = ScriptedCompletion::new(vec![Err("quota exceeded")]);

        let err = session
            .submit_turn(
                TurnInput::text("I want pasta"),
                &StubTranscriber,
                &completion,
                &params(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Completion(_)));
        assert_eq!(session.conversation().len(), 1);
        assert_eq!(session.ui().transcript().len(), 1);
        assert!(session.last_response().is_empty());
    }

    #[tokio::test]
    async fn test_selector_updates_feed_next_turn() {
        let mut session = Session::new(Language::English);
        session.select_units("Imperial");
        session.select_diet("Vegan");
        let completion = ScriptedCompletion::new(vec![Ok("Sure")]);

        session
            .submit_turn(
                TurnInput::text("cake please"),
                &StubTranscriber,
                &completion,
                &params(),
            )
            .await
            .unwrap();

        assert_eq!(
            session.conversation().snapshot()[1].content,
            "cake please Measurement units: Imperial Diet: Vegan"
        );
    }

    #[tokio::test]
    async fn test_custom_recipe_is_a_single_synthesized_message() {
        let mut session = Session::new(Language::English);
        let completion =
            ScriptedCompletion::new(vec![Ok("Here is your custom recipe: ... (eggs, rice)")]);

        session
            .submit_custom_recipe("eggs", "nuts", &completion, &params())
            .await
            .unwrap();

        let snapshot = session.conversation().snapshot();
        assert_eq!(snapshot.len(), 3);
        assert!(snapshot[1].content.contains("Ingredients to include:\neggs"));
        assert!(snapshot[1].content.contains("Ingredients to exclude:\nnuts"));
        assert!(snapshot[1].content.ends_with("Measurement units: Metric Diet: None"));
    }

    #[tokio::test]
    async fn test_custom_recipe_with_empty_lists_is_noop() {
        let mut session = Session::new(Language::English);
        let completion = ScriptedCompletion::new(vec![]);

        let result = session
            .submit_custom_recipe("  ", "", &completion, &params())
            .await
            .unwrap();

        assert!(result.is_none());
        assert_eq!(completion.request_count(), 0);
    }

    #[tokio::test]
    async fn test_save_twice_with_same_title_keeps_one_entry_last() {
        let mut session = Session::new(Language::English);
        let completion = ScriptedCompletion::new(vec![
            Ok("pasta body"),
            Ok("Pasta Primavera"),
            Ok("rice body"),
            Ok("Chicken and Rice"),
            Ok("new rice body"),
            Ok("Chicken and Rice"),
        ]);

        session
            .submit_turn(TurnInput::text("pasta"), &StubTranscriber, &completion, &params())
            .await
            .unwrap();
        session.save_recipe(&completion, &params()).await.unwrap();

        session
            .submit_turn(TurnInput::text("rice"), &StubTranscriber, &completion, &params())
            .await
            .unwrap();
        session.save_recipe(&completion, &params()).await.unwrap();

        session
            .submit_turn(TurnInput::text("better rice"), &StubTranscriber, &completion, &params())
            .await
            .unwrap();
        let view = session.save_recipe(&completion, &params()).await.unwrap();

        let shelf = session.shelf();
        assert_eq!(shelf.len(), 2);
        assert_eq!(shelf.entries()[0].title, "Pasta Primavera");
        assert_eq!(shelf.entries()[1].title, "Chicken and Rice");
        assert_eq!(shelf.entries()[1].body, "new rice body");
        assert!(view.visible);
        assert_eq!(view.items[1].filename, "Chicken-and-Rice.txt");
    }

    #[tokio::test]
    async fn test_save_does_not_touch_conversation_log() {
        let mut session = Session::new(Language::English);
        let completion = ScriptedCompletion::new(vec![Ok("pasta body"), Ok("Pasta Primavera")]);

        session
            .submit_turn(TurnInput::text("pasta"), &StubTranscriber, &completion, &params())
            .await
            .unwrap();
        let log_len = session.conversation().len();

        session.save_recipe(&completion, &params()).await.unwrap();

        assert_eq!(session.conversation().len(), log_len);
        // The title call was a fresh single-message request, not the
        // running dialogue.
        let title_request = completion.request(1);
        assert_eq!(title_request.len(), 1);
        assert_eq!(title_request[0].role, Role::User);
        assert!(title_request[0].content.contains("pasta body"));
    }

    #[tokio::test]
    async fn test_save_sentinel_is_noop() {
        let mut session = Session::new(Language::English);
        let completion = ScriptedCompletion::new(vec![Ok("just chatting"), Ok("Not a recipe")]);

        session
            .submit_turn(TurnInput::text("hello"), &StubTranscriber, &completion, &params())
            .await
            .unwrap();
        let view = session.save_recipe(&completion, &params()).await.unwrap();

        assert!(session.shelf().is_empty());
        assert!(!view.visible);
    }

    #[tokio::test]
    async fn test_save_title_failure_is_reported_distinctly() {
        let mut session = Session::new(Language::English);
        let completion = ScriptedCompletion::new(vec![Ok("pasta body"), Err("timeout")]);

        session
            .submit_turn(TurnInput::text("pasta"), &StubTranscriber, &completion, &params())
            .await
            .unwrap();
        let err = session.save_recipe(&completion, &params()).await.unwrap_err();

        assert!(matches!(err, DomainError::TitleDerivation(_)));
        // The failed save never rolls back the visible main turn.
        assert!(session.shelf().is_empty());
        assert_eq!(session.conversation().len(), 3);
        assert_eq!(session.last_response(), "pasta body");
    }

    #[tokio::test]
    async fn test_save_with_no_response_is_noop() {
        let mut session = Session::new(Language::English);
        let completion = ScriptedCompletion::new(vec![]);

        let view = session.save_recipe(&completion, &params()).await.unwrap();

        assert!(!view.visible);
        assert_eq!(completion.request_count(), 0);
    }

    #[tokio::test]
    async fn test_clear_recipes_is_unconditional() {
        let mut session = Session::new(Language::English);
        let completion = ScriptedCompletion::new(vec![Ok("pasta body"), Ok("Pasta Primavera")]);

        session
            .submit_turn(TurnInput::text("pasta"), &StubTranscriber, &completion, &params())
            .await
            .unwrap();
        session.save_recipe(&completion, &params()).await.unwrap();
        assert!(!session.shelf().is_empty());

        let view = session.clear_recipes();
        assert!(!view.visible);
        assert!(view.items.is_empty());
        assert!(session.shelf().is_empty());
    }

    #[tokio::test]
    async fn test_switch_language_resets_ui_only() {
        let mut session = Session::new(Language::English);
        let completion = ScriptedCompletion::new(vec![Ok("pasta body"), Ok("Pasta Primavera")]);

        session.select_units("Imperial");
        session
            .submit_turn(TurnInput::text("pasta"), &StubTranscriber, &completion, &params())
            .await
            .unwrap();
        session.save_recipe(&completion, &params()).await.unwrap();

        let bundle = session.switch_language(Language::Francais);
        assert_eq!(bundle.units_choices[0], "Métrique");

        // Display restarts: fresh greeting, selectors back to defaults.
        let transcript = session.ui().transcript();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript[0].content, "Salut! Demande-moi une recette!");
        assert_eq!(session.ui().units, "Métrique");
        assert_eq!(session.ui().diet, "Aucun");

        // The model context and the shelf persist.
        assert_eq!(session.conversation().len(), 3);
        assert_eq!(session.shelf().len(), 1);
    }
}
