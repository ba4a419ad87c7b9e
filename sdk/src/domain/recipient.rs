//! Recipient value object, identifier and write attributes.
//!
//! A [`Recipient`] is whatever object the API returned for a payee. The SDK
//! does not pin the schema: every field is retained and typed accessors
//! cover the ones callers reach for most.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::model::{
    IdentifierError, ModelError, lenient_id, object_fields, str_field, validate_identifier,
};

const MODEL: &str = "recipient";

/// Identifier of a recipient, e.g. `R-91XPU407CRNGR`.
///
/// ## Invariants
/// - Non-empty and free of surrounding whitespace.
///
/// # Examples
/// ```
/// use paymentrails::RecipientId;
///
/// let id = RecipientId::new("R-91XPU407CRNGR").expect("valid id");
/// assert_eq!(id.as_str(), "R-91XPU407CRNGR");
/// assert!(RecipientId::new("  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecipientId(String);

impl RecipientId {
    /// Validate and wrap a raw identifier.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
        validate_identifier(value.into()).map(Self)
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RecipientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for RecipientId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for RecipientId {
    type Err = IdentifierError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::new(value)
    }
}

impl TryFrom<String> for RecipientId {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RecipientId> for String {
    fn from(value: RecipientId) -> Self {
        value.0
    }
}

/// Payee record returned by the recipients endpoints.
///
/// ## Invariants
/// - `fields` is the exact JSON object received, including unknown keys.
/// - [`Recipient::id`] is derived from `fields["id"]` and never rewrites it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Recipient {
    id: Option<RecipientId>,
    fields: Map<String, Value>,
}

impl Recipient {
    /// Build a recipient from a decoded `recipient` JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotAnObject`] when the payload is not a JSON
    /// object. Any object is accepted, with or without an `id`.
    ///
    /// # Examples
    /// ```
    /// use paymentrails::Recipient;
    /// use serde_json::json;
    ///
    /// let recipient = Recipient::factory(json!({
    ///     "id": "R-91XPU407CRNGR",
    ///     "email": "tom.jones@example.com",
    ///     "status": "active",
    /// }))
    /// .expect("valid payload");
    /// assert_eq!(recipient.email(), Some("tom.jones@example.com"));
    /// ```
    pub fn factory(value: Value) -> Result<Self, ModelError> {
        let fields = object_fields(MODEL, value)?;
        Ok(Self {
            id: lenient_id(&fields).map(RecipientId),
            fields,
        })
    }

    /// Recipient identifier, when `id` is a non-blank string or a number.
    pub fn id(&self) -> Option<&RecipientId> {
        self.id.as_ref()
    }

    /// Caller-assigned reference, if set.
    pub fn reference_id(&self) -> Option<&str> {
        str_field(&self.fields, "referenceId")
    }

    /// Contact e-mail address.
    pub fn email(&self) -> Option<&str> {
        str_field(&self.fields, "email")
    }

    /// Display name as reported by the API.
    pub fn name(&self) -> Option<&str> {
        str_field(&self.fields, "name")
    }

    /// Given name of an individual recipient.
    pub fn first_name(&self) -> Option<&str> {
        str_field(&self.fields, "firstName")
    }

    /// Family name of an individual recipient.
    pub fn last_name(&self) -> Option<&str> {
        str_field(&self.fields, "lastName")
    }

    /// Recipient kind, usually `individual` or `business`.
    pub fn recipient_type(&self) -> Option<&str> {
        str_field(&self.fields, "type")
    }

    /// Lifecycle status such as `active` or `incomplete`.
    pub fn status(&self) -> Option<&str> {
        str_field(&self.fields, "status")
    }

    /// Creation time, when present and RFC 3339 formatted.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        str_field(&self.fields, "createdAt")
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|at| at.with_timezone(&Utc))
    }

    /// Look up any field by its API name.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// All fields exactly as received.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Consume the recipient, returning the raw JSON object.
    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }
}

impl TryFrom<Map<String, Value>> for Recipient {
    type Error = ModelError;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        Self::factory(Value::Object(fields))
    }
}

impl From<Recipient> for Map<String, Value> {
    fn from(recipient: Recipient) -> Self {
        recipient.fields
    }
}

/// Recipient kind accepted by the create endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecipientType {
    /// A natural person.
    Individual,
    /// A company or other organisation.
    Business,
}

impl RecipientType {
    /// Wire representation of the kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Business => "business",
        }
    }
}

/// Attribute map sent as the body of create and update calls.
///
/// Keys use the API's camelCase names. Insertion order is preserved.
///
/// # Examples
/// ```
/// use paymentrails::{RecipientAttributes, RecipientType};
///
/// let attributes = RecipientAttributes::new()
///     .with_recipient_type(RecipientType::Individual)
///     .with_first_name("Tom")
///     .with_last_name("Jones")
///     .with_email("tom.jones@example.com");
/// assert_eq!(attributes.len(), 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipientAttributes(Map<String, Value>);

impl RecipientAttributes {
    /// Start an empty attribute map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an arbitrary attribute.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set the recipient kind.
    #[must_use]
    pub fn with_recipient_type(self, recipient_type: RecipientType) -> Self {
        self.with("type", recipient_type.as_str())
    }

    /// Set the caller-assigned reference.
    #[must_use]
    pub fn with_reference_id(self, reference_id: impl Into<String>) -> Self {
        self.with("referenceId", reference_id.into())
    }

    /// Set the contact e-mail address.
    #[must_use]
    pub fn with_email(self, email: impl Into<String>) -> Self {
        self.with("email", email.into())
    }

    /// Set the given name.
    #[must_use]
    pub fn with_first_name(self, first_name: impl Into<String>) -> Self {
        self.with("firstName", first_name.into())
    }

    /// Set the family name.
    #[must_use]
    pub fn with_last_name(self, last_name: impl Into<String>) -> Self {
        self.with("lastName", last_name.into())
    }

    /// Insert or replace one attribute, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Number of attributes set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no attributes are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the underlying map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Render the attributes as a JSON request body.
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

impl From<Map<String, Value>> for RecipientAttributes {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
