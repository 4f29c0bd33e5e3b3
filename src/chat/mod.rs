use crate::catalog::Catalog;
use crate::chat::client::ChatError;
use crate::chat::transcript::{BubbleKind, ChatBubble};
use crate::selection::store::SelectionStore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod client;
pub mod prompt;
pub mod transcript;

pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub id: RequestId,
    pub messages: Vec<ChatMessage>,
}

/// Delivers a conversation to the endpoint. Completion arrives later as an event.
pub trait ChatBackend {
    fn dispatch(&self, request: ChatRequest);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequestKind {
    Routine,
    Conversation,
}

pub struct ChatController {
    backend: Box<dyn ChatBackend>,
    history: Vec<ChatMessage>,
    bubbles: Vec<ChatBubble>,
    in_flight: HashMap<RequestId, RequestKind>,
    next_request_id: RequestId,
}

impl ChatController {
    pub fn new(backend: Box<dyn ChatBackend>) -> Self {
        Self {
            backend,
            history: Vec::new(),
            bubbles: Vec::new(),
            in_flight: HashMap::new(),
            next_request_id: 1,
        }
    }

    pub fn bubbles(&self) -> &[ChatBubble] {
        &self.bubbles
    }

    /// Free-form conversation turns sent with every chat message.
    #[cfg(test)]
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    #[cfg(test)]
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Asks for a routine built from the current selection alone.
    pub fn generate_routine(&mut self, selection: &SelectionStore) -> Option<RequestId> {
        if selection.is_empty() {
            self.bubbles
                .push(ChatBubble::error(prompt::EMPTY_SELECTION_ERROR));
            return None;
        }

        let request = prompt::routine_request(selection.products());
        self.bubbles.push(ChatBubble::user(request.clone()));
        let messages = vec![
            ChatMessage::system(prompt::PERSONA),
            ChatMessage::user(request),
        ];
        Some(self.dispatch(RequestKind::Routine, messages))
    }

    /// Sends a typed message along with the whole session history.
    pub fn submit(
        &mut self,
        input: &str,
        selection: &SelectionStore,
        catalog: &Catalog,
    ) -> Option<RequestId> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }

        self.bubbles.push(ChatBubble::user(text));
        self.history.push(ChatMessage::user(text));

        let system = prompt::conversation_system_prompt(selection.products(), catalog);
        let mut messages = Vec::with_capacity(self.history.len() + 1);
        messages.push(ChatMessage::system(system));
        messages.extend(self.history.iter().cloned());
        Some(self.dispatch(RequestKind::Conversation, messages))
    }

    fn dispatch(&mut self, kind: RequestKind, messages: Vec<ChatMessage>) -> RequestId {
        let id = self.next_request_id;
        self.next_request_id += 1;
        self.in_flight.insert(id, kind);
        self.bubbles.push(ChatBubble::typing(id));
        self.backend.dispatch(ChatRequest { id, messages });
        id
    }

    /// Replaces the request's typing placeholder with the reply or an error bubble.
    pub fn complete(&mut self, request_id: RequestId, result: Result<String, ChatError>) {
        let kind = self.in_flight.remove(&request_id);
        if kind.is_none() {
            log::warn!("completion for unknown chat request {request_id}");
        }

        let bubble = match result {
            Ok(reply) => {
                if kind == Some(RequestKind::Conversation) {
                    self.history.push(ChatMessage::assistant(reply.clone()));
                }
                ChatBubble::assistant(reply)
            }
            Err(err) => ChatBubble::error(format!("Error: {err}")),
        };

        let placeholder = self
            .bubbles
            .iter()
            .position(|existing| existing.kind == BubbleKind::Typing(request_id));
        match placeholder {
            Some(index) => self.bubbles[index] = bubble,
            None => self.bubbles.push(bubble),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{product, Category};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct RecordingBackend {
        sent: Rc<RefCell<Vec<ChatRequest>>>,
    }

    impl ChatBackend for RecordingBackend {
        fn dispatch(&self, request: ChatRequest) {
            self.sent.borrow_mut().push(request);
        }
    }

    fn controller() -> (ChatController, Rc<RefCell<Vec<ChatRequest>>>) {
        let backend = RecordingBackend::default();
        let sent = Rc::clone(&backend.sent);
        (ChatController::new(Box::new(backend)), sent)
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![
            product(1, "Foaming Cleanser", "CeraVe", Category::Cleanser),
            product(2, "Daily Lotion", "CeraVe", Category::Moisturizer),
        ])
        .expect("catalog")
    }

    fn decode(raw: &str) -> String {
        let body: serde_json::Value = serde_json::from_str(raw).expect("fixture json");
        client::extract_reply(&body)
    }

    #[test]
    fn generate_with_empty_selection_reports_error_without_network() {
        let (mut chat, sent) = controller();
        let selection = SelectionStore::in_memory();

        assert_eq!(chat.generate_routine(&selection), None);
        assert_eq!(chat.bubbles(), &[ChatBubble::error(prompt::EMPTY_SELECTION_ERROR)]);
        assert!(sent.borrow().is_empty());
        assert_eq!(chat.in_flight(), 0);
    }

    #[test]
    fn generate_sends_persona_and_single_user_turn() {
        let (mut chat, sent) = controller();
        let catalog = catalog();
        let mut selection = SelectionStore::in_memory();
        selection.add(catalog.products()[0].clone());

        chat.submit("earlier question", &selection, &catalog);
        let id = chat.generate_routine(&selection).expect("request dispatched");

        let sent = sent.borrow();
        let request = sent.last().expect("routine request");
        assert_eq!(request.id, id);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0], ChatMessage::system(prompt::PERSONA));
        assert_eq!(request.messages[1].role, Role::User);
        assert!(request.messages[1].content.contains("1. Foaming Cleanser (CeraVe)"));
        assert_eq!(chat.history().len(), 1);
    }

    #[test]
    fn reply_replaces_typing_placeholder() {
        let (mut chat, _sent) = controller();
        let catalog = catalog();
        let mut selection = SelectionStore::in_memory();
        selection.add(catalog.products()[1].clone());

        let id = chat.generate_routine(&selection).expect("dispatched");
        assert!(chat.bubbles()[1].is_typing());

        chat.complete(id, Ok(decode(r#"{"choices":[{"message":{"content":"Hello\nWorld"}}]}"#)));
        assert_eq!(chat.bubbles().len(), 2);
        assert_eq!(chat.bubbles()[1].kind, BubbleKind::Assistant);
        assert_eq!(chat.bubbles()[1].to_html(), "Hello<br>World");
        assert!(chat.history().is_empty());
    }

    #[test]
    fn conversation_carries_full_history() {
        let (mut chat, sent) = controller();
        let catalog = catalog();
        let selection = SelectionStore::in_memory();

        let first = chat.submit("  Which cleanser?  ", &selection, &catalog).expect("first");
        chat.complete(first, Ok("Try the foaming one.".to_string()));
        chat.submit("And after that?", &selection, &catalog).expect("second");

        let sent = sent.borrow();
        let roles: Vec<_> = sent[1].messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::User, Role::Assistant, Role::User]
        );
        assert_eq!(sent[1].messages[1].content, "Which cleanser?");
        assert!(sent[1].messages[0].content.contains("(none)"));
        assert!(sent[1].messages[0].content.contains("- Daily Lotion (CeraVe)"));
    }

    #[test]
    fn blank_input_is_ignored() {
        let (mut chat, sent) = controller();
        assert_eq!(chat.submit("   ", &SelectionStore::in_memory(), &catalog()), None);
        assert!(chat.bubbles().is_empty());
        assert!(sent.borrow().is_empty());
    }

    #[test]
    fn failure_becomes_inline_error() {
        let (mut chat, _sent) = controller();
        let id = chat
            .submit("hello", &SelectionStore::in_memory(), &catalog())
            .expect("dispatched");

        let err = serde_json::from_str::<serde_json::Value>("oops").expect_err("not json");
        chat.complete(id, Err(ChatError::from(err)));

        let last = chat.bubbles().last().expect("bubble");
        assert_eq!(last.kind, BubbleKind::Error);
        assert!(last.text.starts_with("Error: invalid response body"));
        assert_eq!(chat.history().len(), 1);
        assert_eq!(chat.in_flight(), 0);
    }

    #[test]
    fn overlapping_requests_resolve_their_own_placeholders() {
        let (mut chat, _sent) = controller();
        let catalog = catalog();
        let selection = SelectionStore::in_memory();

        let first = chat.submit("one", &selection, &catalog).expect("first");
        let second = chat.submit("two", &selection, &catalog).expect("second");
        assert_eq!(chat.in_flight(), 2);

        chat.complete(second, Ok("reply two".to_string()));
        chat.complete(first, Ok("reply one".to_string()));

        let texts: Vec<_> = chat.bubbles().iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "reply one", "two", "reply two"]);
    }

    #[test]
    fn roles_serialize_lowercase() {
        let encoded = serde_json::to_string(&ChatMessage::assistant("hi")).expect("encode");
        assert_eq!(encoded, r#"{"role":"assistant","content":"hi"}"#);
    }
}
