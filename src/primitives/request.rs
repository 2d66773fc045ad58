//! The state of a single authorization attempt, as handed to session storage.
use super::{Url, Time};
use super::scope::Scope;

use std::collections::BTreeMap;
use std::collections::btree_map::Iter;

/// Names an extension so that its data can be attached to a request.
pub trait RequestExtension {
    /// A unique identifier for the extension, for example the name registered with IANA.
    fn identifier(&self) -> &'static str;
}

/// The data of one extension, with its intended readers.
///
/// Some extensions have semantics where their presence alone is the data, so the content is
/// optional. Storing no content is distinct from not attaching the extension at all.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    /// Content the client may read back.
    Public(Option<String>),

    /// Content whose existence must not be revealed to the client.
    Private(Option<String>),
}

/// Extension data attached to a request, keyed by extension identifier.
#[derive(Clone, Default, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extensions {
    extensions: BTreeMap<String, Value>,
}

/// Owning record of an authorization request.
///
/// Created by the authorization endpoint, stored under the authorization code it was answered
/// with, and read back by the token endpoint when that code is redeemed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizeRequest {
    /// Identifies the client the request was made by.
    pub client_id: String,

    /// Identifies the resource owner who approved the request.
    pub owner_id: String,

    /// The scope that was requested and granted.
    pub scope: Scope,

    /// Where the client expects to receive the code.
    pub redirect_uri: Url,

    /// After this point in time the code must no longer be redeemed.
    pub until: Time,

    /// Extension data attached during the authorization.
    pub extensions: Extensions,
}

impl Value {
    /// The content, if this is a public extension.
    pub fn public_value(&self) -> Option<Option<&str>> {
        match self {
            Value::Public(content) => Some(content.as_deref()),
            Value::Private(_) => None,
        }
    }

    /// The content, if this is a private extension.
    pub fn private_value(&self) -> Option<Option<&str>> {
        match self {
            Value::Private(content) => Some(content.as_deref()),
            Value::Public(_) => None,
        }
    }
}

impl Extensions {
    /// Create an empty extension set.
    pub fn new() -> Extensions {
        Extensions::default()
    }

    /// Attach content for an extension.
    pub fn set(&mut self, extension: &dyn RequestExtension, content: Value) {
        self.extensions
            .insert(extension.identifier().to_string(), content);
    }

    /// Attach content under a raw identifier.
    pub fn set_raw(&mut self, identifier: String, content: Value) {
        self.extensions.insert(identifier, content);
    }

    /// Look at the content of an extension.
    pub fn get(&self, extension: &dyn RequestExtension) -> Option<&Value> {
        self.extensions.get(extension.identifier())
    }

    /// Take the content of an extension out of the set.
    pub fn remove(&mut self, extension: &dyn RequestExtension) -> Option<Value> {
        self.extensions.remove(extension.identifier())
    }

    /// Iterate over the public extensions.
    pub fn public(&self) -> PublicExtensions<'_> {
        PublicExtensions(self.extensions.iter())
    }

    /// Iterate over the private extensions.
    pub fn private(&self) -> PrivateExtensions<'_> {
        PrivateExtensions(self.extensions.iter())
    }
}

impl AuthorizeRequest {
    /// A request without any extension data.
    pub fn new(client_id: String, owner_id: String, scope: Scope, redirect_uri: Url, until: Time) -> Self {
        AuthorizeRequest {
            client_id,
            owner_id,
            scope,
            redirect_uri,
            until,
            extensions: Extensions::new(),
        }
    }

    /// Whether the request has passed its expiry at `now`.
    pub fn is_expired(&self, now: Time) -> bool {
        self.until <= now
    }
}

/// An iterator over the public extensions of a request.
pub struct PublicExtensions<'a>(Iter<'a, String, Value>);

/// An iterator over the private extensions of a request.
pub struct PrivateExtensions<'a>(Iter<'a, String, Value>);

impl<'a> Iterator for PublicExtensions<'a> {
    type Item = (&'a str, Option<&'a str>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (key, value) = self.0.next()?;

            if let Some(value) = value.public_value() {
                return Some((key, value));
            }
        }
    }
}

impl<'a> Iterator for PrivateExtensions<'a> {
    type Item = (&'a str, Option<&'a str>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (key, value) = self.0.next()?;

            if let Some(value) = value.private_value() {
                return Some((key, value));
            }
        }
    }
}

impl<'a, T: RequestExtension + ?Sized> RequestExtension for &'a T {
    fn identifier(&self) -> &'static str {
        (**self).identifier()
    }
}

impl<T: RequestExtension + ?Sized> RequestExtension for Box<T> {
    fn identifier(&self) -> &'static str {
        (**self).identifier()
    }
}
