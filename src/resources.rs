//! Declarative description of the three managed resources.
//!
//! Every route works off one of these descriptors, so validation and the
//! response message strings live in one place instead of being repeated per
//! handler. The message strings are part of the public contract — the
//! existing client renders them verbatim — and must not drift.

use serde_json::Value;

pub struct Resource {
    /// Singular key under which a created record is returned, e.g. `survey`
    /// in `{message, survey}`.
    pub key: &'static str,
    /// Store collection name. `surveyinformations` is historical; existing
    /// data lives there.
    pub collection: &'static str,
    /// Fields that must be present as non-empty strings on create.
    pub required: &'static [&'static str],
    /// Server-assigned creation timestamp field, if the resource carries one.
    pub timestamp_field: Option<&'static str>,
    pub messages: Messages,
}

pub struct Messages {
    pub created: &'static str,
    pub deleted: &'static str,
    pub not_found: &'static str,
    pub fetch_failed: &'static str,
    pub create_failed: &'static str,
    pub delete_failed: &'static str,
}

pub const SURVEYS: Resource = Resource {
    key: "survey",
    collection: "surveyinformations",
    required: &["section", "query", "answer"],
    timestamp_field: None,
    messages: Messages {
        created: "Survey added successfully",
        deleted: "Survey deleted successfully",
        not_found: "Survey not found",
        fetch_failed: "Failed to fetch surveys",
        create_failed: "Failed to add survey",
        delete_failed: "Failed to delete survey",
    },
};

pub const PROJECTS: Resource = Resource {
    key: "project",
    collection: "projects",
    required: &["title", "description"],
    timestamp_field: None,
    messages: Messages {
        created: "Project added successfully",
        deleted: "Project deleted successfully",
        not_found: "Project not found",
        fetch_failed: "Failed to fetch projects",
        create_failed: "Failed to add project",
        delete_failed: "Failed to delete project",
    },
};

pub const CONTACTS: Resource = Resource {
    key: "contact",
    collection: "contactus",
    required: &["name", "email", "message"],
    timestamp_field: Some("createdAt"),
    messages: Messages {
        created: "Contact message saved successfully",
        deleted: "Contact entry deleted successfully",
        not_found: "Contact entry not found",
        fetch_failed: "Failed to fetch contact entries",
        create_failed: "Failed to save contact message",
        delete_failed: "Failed to delete contact entry",
    },
};

impl Resource {
    /// Required fields the body fails to provide as non-empty strings.
    ///
    /// A non-object body (array, number, ...) provides nothing, so every
    /// required field comes back.
    pub fn missing_fields(&self, body: &Value) -> Vec<&'static str> {
        self.required
            .iter()
            .copied()
            .filter(|field| {
                body.get(field)
                    .and_then(Value::as_str)
                    .is_none_or(str::is_empty)
            })
            .collect()
    }
}

/// Renders a validation message naming the missing fields, e.g.
/// "Section, query, and answer are required".
pub fn required_message(missing: &[&str]) -> String {
    let mut names: Vec<String> = missing.iter().map(|field| (*field).to_string()).collect();
    if let Some(first) = names.first_mut()
        && let Some(head) = first.get_mut(0..1)
    {
        head.make_ascii_uppercase();
    }

    match names.as_slice() {
        [] => String::new(),
        [only] => format!("{only} is required"),
        [first, second] => format!("{first} and {second} are required"),
        [rest @ .., last] => format!("{}, and {last} are required", rest.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn complete_body_has_no_missing_fields() {
        let body = json!({"section": "General", "query": "Q?", "answer": "A."});
        assert!(SURVEYS.missing_fields(&body).is_empty());
    }

    #[test]
    fn absent_and_empty_fields_are_missing() {
        let body = json!({"section": "General", "query": ""});
        assert_eq!(SURVEYS.missing_fields(&body), vec!["query", "answer"]);
    }

    #[test]
    fn non_string_values_are_missing() {
        let body = json!({"title": 7, "description": "Clean water access"});
        assert_eq!(PROJECTS.missing_fields(&body), vec!["title"]);
    }

    #[test]
    fn non_object_body_misses_everything() {
        assert_eq!(
            CONTACTS.missing_fields(&json!("hello")),
            vec!["name", "email", "message"]
        );
    }

    #[test]
    fn message_grammar_matches_field_count() {
        assert_eq!(required_message(&["answer"]), "Answer is required");
        assert_eq!(
            required_message(&["query", "answer"]),
            "Query and answer are required"
        );
        assert_eq!(
            required_message(&["section", "query", "answer"]),
            "Section, query, and answer are required"
        );
    }
}
