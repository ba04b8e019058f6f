use super::role::Role;
use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ImageUrl {
    pub fn new<S: Into<String>>(url: S) -> Self {
        Self {
            url: url.into(),
            detail: None,
        }
    }

    pub fn with_detail<S: Into<String>>(mut self, detail: S) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// A typed segment of a multi-part message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

impl ContentPart {
    pub fn text<S: Into<String>>(text: S) -> Self {
        ContentPart::Text { text: text.into() }
    }

    pub fn image(image_url: ImageUrl) -> Self {
        ContentPart::ImageUrl { image_url }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentPart::Text { text } => Some(text),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageUrl> {
        match self {
            ContentPart::ImageUrl { image_url } => Some(image_url),
            _ => None,
        }
    }
}

/// The body of a message: text only, a single image, or an ordered mix of parts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Image(ImageUrl),
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    /// Text carried by the content, or `None` when it holds no text at all.
    /// Multiple text parts are joined with a single space.
    pub fn text(&self) -> Option<String> {
        match self {
            MessageContent::Text(text) => Some(text.clone()),
            MessageContent::Image(_) => None,
            MessageContent::Parts(parts) => {
                let texts: Vec<&str> = parts.iter().filter_map(ContentPart::as_text).collect();
                if texts.is_empty() {
                    None
                } else {
                    Some(texts.join(" "))
                }
            }
        }
    }

    pub fn image_urls(&self) -> Vec<&str> {
        match self {
            MessageContent::Text(_) => Vec::new(),
            MessageContent::Image(image) => vec![image.url.as_str()],
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(ContentPart::as_image)
                .map(|image| image.url.as_str())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A message to or from an LLM
pub struct Message {
    pub role: Role,
    pub created: i64,
    pub content: MessageContent,
}

impl Message {
    pub fn new(role: Role, content: MessageContent) -> Self {
        Message {
            role,
            created: Utc::now().timestamp(),
            content,
        }
    }

    /// Create a text-only message
    pub fn text<S: Into<String>>(role: Role, text: S) -> Self {
        Self::new(role, MessageContent::Text(text.into()))
    }

    /// Create an image-only message
    pub fn image<S: Into<String>>(role: Role, url: S, detail: Option<&str>) -> Self {
        let mut image = ImageUrl::new(url);
        image.detail = detail.map(str::to_string);
        Self::new(role, MessageContent::Image(image))
    }

    /// Create a message holding text followed by one image
    pub fn mixed<S: Into<String>, U: Into<String>>(
        role: Role,
        text: S,
        url: U,
        detail: Option<&str>,
    ) -> Self {
        let mut image = ImageUrl::new(url);
        image.detail = detail.map(str::to_string);
        Self::new(
            role,
            MessageContent::Parts(vec![ContentPart::text(text), ContentPart::image(image)]),
        )
    }

    pub fn system<S: Into<String>>(text: S) -> Self {
        Self::text(Role::System, text)
    }

    pub fn user<S: Into<String>>(text: S) -> Self {
        Self::text(Role::User, text)
    }

    pub fn assistant<S: Into<String>>(text: S) -> Self {
        Self::text(Role::Assistant, text)
    }

    pub fn text_content(&self) -> Option<String> {
        self.content.text()
    }

    pub fn image_urls(&self) -> Vec<&str> {
        self.content.image_urls()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_message() {
        let message = Message::user("Hello");
        assert_eq!(message.text_content().as_deref(), Some("Hello"));
        assert!(message.image_urls().is_empty());
    }

    #[test]
    fn test_image_message() {
        let message = Message::image(Role::User, "https://example.com/image.jpg", Some("high"));
        assert_eq!(message.text_content(), None);
        assert_eq!(message.image_urls(), vec!["https://example.com/image.jpg"]);
    }

    #[test]
    fn test_mixed_message() {
        let message = Message::mixed(
            Role::User,
            "Look at this",
            "https://example.com/image.jpg",
            Some("auto"),
        );
        assert_eq!(message.text_content().as_deref(), Some("Look at this"));
        assert_eq!(message.image_urls(), vec!["https://example.com/image.jpg"]);
    }

    #[test]
    fn test_parts_join_text_in_order() {
        let content = MessageContent::Parts(vec![
            ContentPart::text("first"),
            ContentPart::image(ImageUrl::new("https://example.com/a.png")),
            ContentPart::text("second"),
        ]);
        assert_eq!(content.text().as_deref(), Some("first second"));
    }

    #[test]
    fn test_content_serialization() {
        let message = Message::mixed(Role::User, "Hi", "https://example.com/a.png", None);
        let value = serde_json::to_value(&message.content).unwrap();
        assert_eq!(
            value,
            json!([
                {"type": "text", "text": "Hi"},
                {"type": "image_url", "image_url": {"url": "https://example.com/a.png"}}
            ])
        );
        assert_eq!(serde_json::to_value(Role::Assistant).unwrap(), json!("assistant"));
    }
}
