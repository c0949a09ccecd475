//! Message Router - the request-handling workflow.
//!
//! One conversation turn flows through a linear decision sequence:
//!
//! 1. Configuration check: without a usable workspace identifier, answer
//!    with fixed setup guidance and call neither collaborator (fail-soft,
//!    so an unconfigured deployment diagnoses itself).
//! 2. Dialog call: forward context + input; collaborator failures bubble up
//!    with their original status and payload.
//! 3. Flag inspection: a truthy `call_discovery` key in the returned
//!    context triggers a document search with the user's original text.
//!    The key is removed so it cannot re-trigger on the next turn, whatever
//!    the search outcome. The dialog's output text is then replaced with an
//!    apology, a no-results notice, or one HTML fragment of results.
//! 4. Respond.
//!
//! Both collaborator calls are sequential awaits; requests run as
//! independent tasks with no shared mutable state. Each step builds a new
//! value instead of mutating a shared reply object.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::ports::{
    DialogError, DialogInput, DialogOutput, DialogRequest, DialogResponse, DialogService,
    SearchQuery, SearchService,
};

use super::render::render_documents;

/// Fixed result-count limit for document searches.
pub const SEARCH_RESULT_LIMIT: u32 = 5;

/// Context key the dialog model sets to request a document search.
pub const CALL_DISCOVERY_FLAG: &str = "call_discovery";

/// Canned reply for deployments without a configured workspace identifier.
pub const WORKSPACE_GUIDANCE: &str = "The service has not been configured with a \
    <b>DIALOG_GATEWAY__DIALOG__WORKSPACE_ID</b> environment variable. \
    Please refer to the README documentation on how to set this variable.<br>\
    Once a workspace has been defined, import a dialog model into it to get \
    a working application.";

/// User-facing apology when the search collaborator fails.
pub const SEARCH_APOLOGY: &str = "Something unexpected went wrong while searching \
    the knowledge base.<br>Please try again.";

/// User-facing notice when the search returns no documents.
pub const SEARCH_NO_RESULTS: &str =
    "Sorry, I couldn't find anything to help with that.";

/// Identifiers the router needs to address the collaborators.
#[derive(Debug, Clone, Default)]
pub struct RouterSettings {
    /// Resolved workspace identifier; `None` means the deployment is not
    /// configured yet and the router answers with setup guidance.
    pub workspace_id: Option<String>,
    /// Search environment identifier.
    pub environment_id: String,
    /// Search collection identifier.
    pub collection_id: String,
}

/// The sole component: routes one message through dialog and, on request,
/// through search. Holds one stateless client handle per collaborator,
/// constructed once at process start.
pub struct MessageRouter {
    dialog: Arc<dyn DialogService>,
    search: Arc<dyn SearchService>,
    settings: RouterSettings,
}

/// Reply for one conversation turn. Both variants answer HTTP 200.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MessageReply {
    /// The deployment has no workspace configured; fixed guidance.
    SetupRequired(SetupGuidance),
    /// A dialog reply, possibly search-augmented.
    Dialog(DialogResponse),
}

/// Body of the setup-guidance reply. Mirrors the canned shape the UI
/// expects: a single output object whose text is a plain string.
#[derive(Debug, Clone, Serialize)]
pub struct SetupGuidance {
    pub output: GuidanceOutput,
}

/// Output portion of the setup-guidance reply.
#[derive(Debug, Clone, Serialize)]
pub struct GuidanceOutput {
    pub text: String,
}

impl SetupGuidance {
    fn new() -> Self {
        Self {
            output: GuidanceOutput {
                text: WORKSPACE_GUIDANCE.to_string(),
            },
        }
    }
}

impl MessageRouter {
    /// Creates a router over the two collaborator handles.
    pub fn new(
        dialog: Arc<dyn DialogService>,
        search: Arc<dyn SearchService>,
        settings: RouterSettings,
    ) -> Self {
        Self {
            dialog,
            search,
            settings,
        }
    }

    /// Handles one conversation turn.
    ///
    /// # Errors
    ///
    /// Returns [`DialogError`] when the dialog collaborator fails; the
    /// caller propagates its status and payload. Search failures never
    /// surface as errors here, they degrade the reply text instead.
    pub async fn handle(
        &self,
        context: Map<String, Value>,
        input: DialogInput,
    ) -> Result<MessageReply, DialogError> {
        let Some(workspace_id) = self.settings.workspace_id.as_deref() else {
            return Ok(MessageReply::SetupRequired(SetupGuidance::new()));
        };

        let response = self
            .dialog
            .message(DialogRequest {
                workspace_id: workspace_id.to_string(),
                context,
                input,
            })
            .await?;

        Ok(MessageReply::Dialog(self.augment_with_search(response).await))
    }

    /// Applies the `call_discovery` branch of the workflow.
    ///
    /// Returns the reply unchanged when the flag is absent or falsy.
    /// Otherwise removes the flag, queries the search collaborator with the
    /// original user text, and replaces the output text with exactly one
    /// element describing the outcome.
    async fn augment_with_search(&self, response: DialogResponse) -> DialogResponse {
        if !response
            .context
            .get(CALL_DISCOVERY_FLAG)
            .is_some_and(is_truthy)
        {
            return response;
        }

        tracing::info!("dialog requested a document search");

        let mut context = response.context;
        remove_discovery_flag(&mut context);

        // The query is the user's original text echoed back by the dialog
        // collaborator, not any rewritten output
        let query = SearchQuery {
            environment_id: self.settings.environment_id.clone(),
            collection_id: self.settings.collection_id.clone(),
            query: response.input.text.clone(),
            count: SEARCH_RESULT_LIMIT,
        };

        let text = match self.search.query(query).await {
            Err(err) => {
                tracing::error!(error = %err, "document search failed");
                vec![SEARCH_APOLOGY.to_string()]
            }
            Ok(docs) if docs.is_empty() => {
                tracing::info!("document search returned no results");
                vec![SEARCH_NO_RESULTS.to_string()]
            }
            Ok(docs) => {
                tracing::info!(count = docs.len(), "document search returned results");
                vec![render_documents(&docs)]
            }
        };

        DialogResponse {
            context,
            output: DialogOutput {
                text,
                extra: response.output.extra,
            },
            input: response.input,
            extra: response.extra,
        }
    }
}

/// Removes the discovery flag from a context. Removing an absent key is a
/// no-op and leaves the rest of the context untouched.
fn remove_discovery_flag(context: &mut Map<String, Value>) -> Option<Value> {
    context.remove(CALL_DISCOVERY_FLAG)
}

/// Truthiness the way the dialog model's scripting environment defines it:
/// everything except `null`, `false`, `0` and `""` counts as set.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{Document, SearchError};
    use async_trait::async_trait;
    use proptest::prelude::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    // ════════════════════════════════════════════════════════════════════
    // Mock Implementations
    // ════════════════════════════════════════════════════════════════════

    struct MockDialog {
        reply: Mutex<Result<DialogResponse, DialogError>>,
        calls: AtomicUsize,
        last_request: Mutex<Option<DialogRequest>>,
    }

    impl MockDialog {
        fn replying(reply: DialogResponse) -> Self {
            Self {
                reply: Mutex::new(Ok(reply)),
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
            }
        }

        fn failing(error: DialogError) -> Self {
            Self {
                reply: Mutex::new(Err(error)),
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DialogService for MockDialog {
        async fn message(&self, request: DialogRequest) -> Result<DialogResponse, DialogError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request);
            self.reply.lock().unwrap().clone()
        }
    }

    struct MockSearch {
        reply: Mutex<Result<Vec<Document>, SearchError>>,
        calls: AtomicUsize,
        last_query: Mutex<Option<SearchQuery>>,
    }

    impl MockSearch {
        fn returning(docs: Vec<Document>) -> Self {
            Self {
                reply: Mutex::new(Ok(docs)),
                calls: AtomicUsize::new(0),
                last_query: Mutex::new(None),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Mutex::new(Err(SearchError::network("boom"))),
                calls: AtomicUsize::new(0),
                last_query: Mutex::new(None),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SearchService for MockSearch {
        async fn query(&self, query: SearchQuery) -> Result<Vec<Document>, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_query.lock().unwrap() = Some(query);
            self.reply.lock().unwrap().clone()
        }
    }

    // ════════════════════════════════════════════════════════════════════
    // Helpers
    // ════════════════════════════════════════════════════════════════════

    fn settings() -> RouterSettings {
        RouterSettings {
            workspace_id: Some("ws-123".to_string()),
            environment_id: "env-1".to_string(),
            collection_id: "coll-1".to_string(),
        }
    }

    fn router(dialog: Arc<MockDialog>, search: Arc<MockSearch>) -> MessageRouter {
        MessageRouter::new(dialog, search, settings())
    }

    fn dialog_reply(context: Value, output_text: &[&str], input_text: &str) -> DialogResponse {
        DialogResponse {
            context: context.as_object().cloned().unwrap_or_default(),
            output: DialogOutput {
                text: output_text.iter().map(|s| s.to_string()).collect(),
                extra: Map::new(),
            },
            input: DialogInput::new(input_text),
            extra: Map::new(),
        }
    }

    fn reply_response(reply: MessageReply) -> DialogResponse {
        match reply {
            MessageReply::Dialog(response) => response,
            MessageReply::SetupRequired(_) => panic!("expected a dialog reply"),
        }
    }

    // ════════════════════════════════════════════════════════════════════
    // Tests
    // ════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn unconfigured_workspace_short_circuits() {
        let dialog = Arc::new(MockDialog::replying(DialogResponse::default()));
        let search = Arc::new(MockSearch::returning(vec![]));
        let router = MessageRouter::new(
            dialog.clone(),
            search.clone(),
            RouterSettings {
                workspace_id: None,
                ..settings()
            },
        );

        let reply = router
            .handle(Map::new(), DialogInput::new("hello"))
            .await
            .unwrap();

        match reply {
            MessageReply::SetupRequired(guidance) => {
                assert_eq!(guidance.output.text, WORKSPACE_GUIDANCE);
            }
            MessageReply::Dialog(_) => panic!("expected setup guidance"),
        }
        // Neither collaborator was invoked
        assert_eq!(dialog.calls(), 0);
        assert_eq!(search.calls(), 0);
    }

    #[tokio::test]
    async fn dialog_error_propagates() {
        let payload = json!({ "error": "model busy", "code": 503 });
        let dialog = Arc::new(MockDialog::failing(DialogError::Upstream {
            status: 503,
            body: payload.clone(),
        }));
        let search = Arc::new(MockSearch::returning(vec![]));
        let router = router(dialog, search.clone());

        let err = router
            .handle(Map::new(), DialogInput::new("hello"))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 503);
        assert_eq!(err.into_body(), payload);
        assert_eq!(search.calls(), 0);
    }

    #[tokio::test]
    async fn absent_flag_leaves_output_untouched() {
        let dialog = Arc::new(MockDialog::replying(dialog_reply(
            json!({ "turn": 1 }),
            &["Hello there", "How can I help?"],
            "hi",
        )));
        let search = Arc::new(MockSearch::returning(vec![Document::new("A", "x")]));
        let router = router(dialog, search.clone());

        let reply = router.handle(Map::new(), DialogInput::new("hi")).await.unwrap();
        let response = reply_response(reply);

        assert_eq!(
            response.output.text,
            vec!["Hello there".to_string(), "How can I help?".to_string()]
        );
        assert_eq!(search.calls(), 0);
    }

    #[tokio::test]
    async fn falsy_flag_does_not_trigger_search() {
        for falsy in [json!(false), json!(0), json!(""), json!(null)] {
            let dialog = Arc::new(MockDialog::replying(dialog_reply(
                json!({ "call_discovery": falsy }),
                &["dialog text"],
                "hi",
            )));
            let search = Arc::new(MockSearch::returning(vec![]));
            let router = router(dialog, search.clone());

            let reply = router.handle(Map::new(), DialogInput::new("hi")).await.unwrap();
            let response = reply_response(reply);

            assert_eq!(response.output.text, vec!["dialog text".to_string()]);
            assert_eq!(search.calls(), 0);
        }
    }

    #[tokio::test]
    async fn truthy_flag_triggers_search_with_original_text() {
        let dialog = Arc::new(MockDialog::replying(dialog_reply(
            json!({ "call_discovery": true }),
            &["dialog text"],
            "how do I fix the brakes",
        )));
        let search = Arc::new(MockSearch::returning(vec![Document::new("A", "x")]));
        let router = router(dialog, search.clone());

        router
            .handle(Map::new(), DialogInput::new("how do I fix the brakes"))
            .await
            .unwrap();

        assert_eq!(search.calls(), 1);
        let query = search.last_query.lock().unwrap().clone().unwrap();
        assert_eq!(query.query, "how do I fix the brakes");
        assert_eq!(query.count, SEARCH_RESULT_LIMIT);
        assert_eq!(query.environment_id, "env-1");
        assert_eq!(query.collection_id, "coll-1");
    }

    #[tokio::test]
    async fn flag_is_removed_on_search_success() {
        let dialog = Arc::new(MockDialog::replying(dialog_reply(
            json!({ "call_discovery": true, "turn": 3 }),
            &["dialog text"],
            "hi",
        )));
        let search = Arc::new(MockSearch::returning(vec![Document::new("A", "x")]));
        let router = router(dialog, search);

        let response = reply_response(
            router.handle(Map::new(), DialogInput::new("hi")).await.unwrap(),
        );

        assert!(!response.context.contains_key(CALL_DISCOVERY_FLAG));
        assert_eq!(response.context.get("turn"), Some(&json!(3)));
    }

    #[tokio::test]
    async fn flag_is_removed_on_search_failure() {
        let dialog = Arc::new(MockDialog::replying(dialog_reply(
            json!({ "call_discovery": true }),
            &["dialog text"],
            "hi",
        )));
        let search = Arc::new(MockSearch::failing());
        let router = router(dialog, search);

        let response = reply_response(
            router.handle(Map::new(), DialogInput::new("hi")).await.unwrap(),
        );

        assert!(!response.context.contains_key(CALL_DISCOVERY_FLAG));
        assert_eq!(response.output.text, vec![SEARCH_APOLOGY.to_string()]);
    }

    #[tokio::test]
    async fn empty_search_yields_no_results_notice() {
        let dialog = Arc::new(MockDialog::replying(dialog_reply(
            json!({ "call_discovery": true }),
            &["dialog text"],
            "hi",
        )));
        let search = Arc::new(MockSearch::returning(vec![]));
        let router = router(dialog, search);

        let response = reply_response(
            router.handle(Map::new(), DialogInput::new("hi")).await.unwrap(),
        );

        assert_eq!(response.output.text, vec![SEARCH_NO_RESULTS.to_string()]);
    }

    #[tokio::test]
    async fn search_results_replace_output_with_one_fragment() {
        let dialog = Arc::new(MockDialog::replying(dialog_reply(
            json!({ "call_discovery": true }),
            &["dialog text that should be discarded"],
            "hi",
        )));
        let search = Arc::new(MockSearch::returning(vec![
            Document::new("A", "x\ny"),
            Document::new("B", "z"),
            Document::new("C", "w"),
        ]));
        let router = router(dialog, search);

        let response = reply_response(
            router.handle(Map::new(), DialogInput::new("hi")).await.unwrap(),
        );

        assert_eq!(response.output.text.len(), 1);
        let html = &response.output.text[0];
        assert!(!html.contains("discarded"));

        // Titles appear in collaborator order
        let (a, b, c) = (
            html.find(">A<").unwrap(),
            html.find(">B<").unwrap(),
            html.find(">C<").unwrap(),
        );
        assert!(a < b && b < c);

        // Embedded newlines render as line breaks
        assert!(html.contains("x<br>y"));
    }

    #[tokio::test]
    async fn request_carries_workspace_and_caller_context() {
        let dialog = Arc::new(MockDialog::replying(DialogResponse::default()));
        let search = Arc::new(MockSearch::returning(vec![]));
        let router = router(dialog.clone(), search);

        let mut context = Map::new();
        context.insert("topic".to_string(), json!("brakes"));
        router
            .handle(context, DialogInput::new("hello"))
            .await
            .unwrap();

        let request = dialog.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.workspace_id, "ws-123");
        assert_eq!(request.context.get("topic"), Some(&json!("brakes")));
        assert_eq!(request.input.text, "hello");
    }

    #[test]
    fn truthiness_follows_scripting_semantics() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!("yes")));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));

        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(null)));
    }

    proptest! {
        /// Removing an absent flag never fails and leaves the context
        /// exactly as it was.
        #[test]
        fn removing_absent_flag_is_a_noop(
            entries in proptest::collection::hash_map("[a-z_]{1,12}", any::<bool>(), 0..8)
        ) {
            let mut context = Map::new();
            for (key, value) in entries {
                if key != CALL_DISCOVERY_FLAG {
                    context.insert(key, json!(value));
                }
            }
            let before = context.clone();

            let removed = remove_discovery_flag(&mut context);

            prop_assert!(removed.is_none());
            prop_assert_eq!(context, before);
        }
    }
}
