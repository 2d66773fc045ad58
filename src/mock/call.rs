use std::fmt;
use std::slice;

use crate::primitives::extra::Extra;
use crate::primitives::request::AuthorizeRequest;

/// The storage operations, as named in the call log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    /// `create_authorize_code_session`
    Create,

    /// `get_authorize_code_session`
    Get,

    /// `delete_authorize_code_session`
    Delete,
}

/// One invocation of the double, with copies of its arguments as they were passed.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "method")]
pub enum CallRecord {
    /// A session was to be created.
    #[serde(rename = "create_authorize_code_session")]
    Create {
        /// The authorization code.
        code: String,
        /// The request to associate with it.
        request: AuthorizeRequest,
        /// The extra data to associate with it.
        extra: Extra,
    },

    /// A session was to be read.
    #[serde(rename = "get_authorize_code_session")]
    Get {
        /// The authorization code.
        code: String,
        /// The output target, before the call.
        request: AuthorizeRequest,
        /// The extra output target, before the call.
        extra: Extra,
    },

    /// A session was to be removed.
    #[serde(rename = "delete_authorize_code_session")]
    Delete {
        /// The authorization code.
        code: String,
    },
}

/// All calls made on a double, in the order they were made.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CallLog {
    records: Vec<CallRecord>,
}

impl Method {
    /// The name of the trait method.
    pub fn name(self) -> &'static str {
        match self {
            Method::Create => "create_authorize_code_session",
            Method::Get => "get_authorize_code_session",
            Method::Delete => "delete_authorize_code_session",
        }
    }
}

impl CallRecord {
    /// Which operation was called.
    pub fn method(&self) -> Method {
        match self {
            CallRecord::Create { .. } => Method::Create,
            CallRecord::Get { .. } => Method::Get,
            CallRecord::Delete { .. } => Method::Delete,
        }
    }

    /// The code every operation is called with.
    pub fn code(&self) -> &str {
        match self {
            CallRecord::Create { code, .. } => code,
            CallRecord::Get { code, .. } => code,
            CallRecord::Delete { code } => code,
        }
    }

    /// The request argument, absent for deletions.
    pub fn request(&self) -> Option<&AuthorizeRequest> {
        match self {
            CallRecord::Create { request, .. } | CallRecord::Get { request, .. } => Some(request),
            CallRecord::Delete { .. } => None,
        }
    }

    /// The extra argument, absent for deletions.
    pub fn extra(&self) -> Option<&Extra> {
        match self {
            CallRecord::Create { extra, .. } | CallRecord::Get { extra, .. } => Some(extra),
            CallRecord::Delete { .. } => None,
        }
    }
}

impl CallLog {
    pub(crate) fn push(&mut self, record: CallRecord) {
        self.records.push(record);
    }

    /// Number of calls made.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no call was made yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over all calls.
    pub fn iter(&self) -> slice::Iter<'_, CallRecord> {
        self.records.iter()
    }

    /// Calls to a single operation, in order.
    pub fn to_method(&self, method: Method) -> impl Iterator<Item = &CallRecord> {
        self.records.iter().filter(move |record| record.method() == method)
    }

    /// The log as json, one object per call with a `method` field.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

impl std::ops::Deref for CallLog {
    type Target = [CallRecord];

    fn deref(&self) -> &[CallRecord] {
        &self.records
    }
}

impl<'a> IntoIterator for &'a CallLog {
    type Item = &'a CallRecord;
    type IntoIter = slice::Iter<'a, CallRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl fmt::Display for Method {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str(self.name())
    }
}

impl fmt::Display for CallRecord {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}({:?}", self.method(), self.code())?;
        if let Some(request) = self.request() {
            write!(
                fmt,
                ", request of {:?} for {:?}",
                request.client_id,
                request.scope.to_string()
            )?;
        }
        if let Some(extra) = self.extra() {
            write!(fmt, ", extra {}", extra)?;
        }
        fmt.write_str(")")
    }
}
