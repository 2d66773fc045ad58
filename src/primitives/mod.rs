//! The values exchanged with authorization code session storage.
//!
//! An authorization endpoint stores an [`AuthorizeRequest`] together with some caller defined
//! [`Extra`] data under the code it hands to the client. The token endpoint later reads both
//! back when the client redeems the code.
//!
//! [`AuthorizeRequest`]: request/struct.AuthorizeRequest.html
//! [`Extra`]: extra/enum.Extra.html

use chrono::DateTime;
use chrono::Utc;
use url::Url;

pub mod extra;
pub mod request;
pub mod scope;

type Time = DateTime<Utc>;

/// Commonly used primitives.
pub mod prelude {
    pub use super::extra::{Extra, Opaque};
    pub use super::request::{AuthorizeRequest, Extensions, RequestExtension, Value};
    pub use super::scope::Scope;
}
