//! Notion property payloads, normalized to display strings.
//!
//! Each property type the agenda can show is one variant with one
//! normalization rule. Unrecognized types render as an empty string
//! rather than failing the run. Relations carry referenced page ids;
//! resolving those to titles needs the API and lives on the client.

use serde_json::Value;

/// A tagged Notion property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Title(String),
    RichText(String),
    Select(Option<String>),
    MultiSelect(Vec<String>),
    People(Vec<String>),
    /// Referenced page ids, in payload order.
    Relation(Vec<String>),
    Url(Option<String>),
    Email(Option<String>),
    PhoneNumber(Option<String>),
    Unknown,
}

/// Concatenate the plain text of a rich-text span array.
pub fn plain_text(spans: &Value) -> String {
    spans
        .as_array()
        .map(|spans| {
            spans
                .iter()
                .filter_map(|span| span["plain_text"].as_str())
                .collect::<String>()
        })
        .unwrap_or_default()
}

fn string_field(prop: &Value, key: &str) -> Option<String> {
    prop[key].as_str().map(str::to_string)
}

impl PropertyValue {
    /// Parse a property object from the Notion API.
    pub fn from_json(prop: &Value) -> Self {
        let Some(kind) = prop["type"].as_str() else {
            return Self::Unknown;
        };
        match kind {
            "title" => Self::Title(plain_text(&prop["title"])),
            "rich_text" => Self::RichText(plain_text(&prop["rich_text"])),
            "select" => Self::Select(prop["select"]["name"].as_str().map(str::to_string)),
            "multi_select" => Self::MultiSelect(
                prop["multi_select"]
                    .as_array()
                    .map(|tags| {
                        tags.iter()
                            .filter_map(|tag| tag["name"].as_str().map(str::to_string))
                            .collect()
                    })
                    .unwrap_or_default(),
            ),
            "people" => Self::People(
                prop["people"]
                    .as_array()
                    .map(|people| {
                        people
                            .iter()
                            .filter_map(|p| {
                                // Fall back to the user id when the name is
                                // not shared with the integration.
                                p["name"].as_str().or(p["id"].as_str()).map(str::to_string)
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
            ),
            "relation" => Self::Relation(
                prop["relation"]
                    .as_array()
                    .map(|refs| {
                        refs.iter()
                            .filter_map(|r| r["id"].as_str().map(str::to_string))
                            .collect()
                    })
                    .unwrap_or_default(),
            ),
            "url" => Self::Url(string_field(prop, "url")),
            "email" => Self::Email(string_field(prop, "email")),
            "phone_number" => Self::PhoneNumber(string_field(prop, "phone_number")),
            _ => Self::Unknown,
        }
    }

    /// Render the value without network access. Relations render empty
    /// here; the client substitutes resolved page titles.
    pub fn display_text(&self) -> String {
        match self {
            Self::Title(text) | Self::RichText(text) => text.clone(),
            Self::Select(name) => name.clone().unwrap_or_default(),
            Self::MultiSelect(tags) => tags.join(", "),
            Self::People(names) => names.join(", "),
            Self::Relation(_) => String::new(),
            Self::Url(value) | Self::Email(value) | Self::PhoneNumber(value) => {
                value.clone().unwrap_or_default()
            }
            Self::Unknown => String::new(),
        }
    }
}
