use crate::chat::RequestId;
use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BubbleKind {
    User,
    Assistant,
    Error,
    Typing(RequestId),
}

impl BubbleKind {
    fn css_class(&self) -> &'static str {
        match self {
            Self::User => "chat-msg user",
            Self::Assistant => "chat-msg bot",
            Self::Error => "chat-msg error",
            Self::Typing(_) => "chat-msg bot typing",
        }
    }
}

/// One entry of the visible chat transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatBubble {
    pub kind: BubbleKind,
    pub text: String,
}

impl ChatBubble {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            kind: BubbleKind::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            kind: BubbleKind::Assistant,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: BubbleKind::Error,
            text: text.into(),
        }
    }

    pub fn typing(request_id: RequestId) -> Self {
        Self {
            kind: BubbleKind::Typing(request_id),
            text: String::new(),
        }
    }

    pub fn is_typing(&self) -> bool {
        matches!(self.kind, BubbleKind::Typing(_))
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }

    /// Escaped HTML with newlines turned into `<br>`.
    pub fn to_html(&self) -> String {
        escape_html(&self.text).replace('\n', "<br>")
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn render_html(bubbles: &[ChatBubble]) -> String {
    let mut body = String::new();
    for bubble in bubbles.iter().filter(|bubble| !bubble.is_typing()) {
        body.push_str(&format!(
            "  <div class=\"{}\">{}</div>\n",
            bubble.kind.css_class(),
            bubble.to_html()
        ));
    }
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Chat transcript</title></head>\n<body>\n<div id=\"chatWindow\">\n{body}</div>\n</body>\n</html>\n"
    )
}

pub fn export_html(bubbles: &[ChatBubble], path: &Path) -> io::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, render_html(bubbles))
}
