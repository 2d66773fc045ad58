//! A call-recording test double for [`CodeStorage`].
//!
//! The double stores nothing. Each call is appended to a log and then answered by the
//! expectations the test has set on it. Expectations are [`mockall`] expectations: the double
//! dereferences to a generated [`MockStorage`] with one `expect_*` method per storage operation,
//! so argument predicates, call counts, sequences and checkpoints work as they do for any other
//! mockall double. A call that no expectation matches panics, so that the code under test never
//! sees a storage error it was not meant to see.
//!
//! ```
//! # use authcode_mock::mock::{found, MockCodeStorage, Sequence};
//! # use authcode_mock::mock::predicate::*;
//! # use authcode_mock::primitives::prelude::*;
//! # use authcode_mock::storage::{CodeStorage, StorageError};
//! # fn request() -> AuthorizeRequest {
//! #     AuthorizeRequest::new(
//! #         "client".into(), "owner".into(), "read".parse().unwrap(),
//! #         "https://client.example/cb".parse().unwrap(), chrono::Utc::now())
//! # }
//! let issued = request();
//! let mut storage = MockCodeStorage::new();
//! let mut seq = Sequence::new();
//! storage
//!     .expect_create_authorize_code_session()
//!     .with(eq("abc"), always(), eq(Extra::None))
//!     .once()
//!     .in_sequence(&mut seq)
//!     .returning(|_, _, _| Ok(()));
//! storage
//!     .expect_get_authorize_code_session()
//!     .with(eq("abc"), always(), always())
//!     .once()
//!     .in_sequence(&mut seq)
//!     .returning(found(issued.clone(), Extra::None));
//!
//! let mut target = request();
//! target.client_id = String::new();
//! let mut extra = Extra::None;
//! assert_eq!(storage.create_authorize_code_session("abc", &issued, &extra), Ok(()));
//! assert_eq!(storage.get_authorize_code_session("abc", &mut target, &mut extra), Ok(()));
//! assert_eq!(target, issued);
//! assert_eq!(storage.calls().len(), 2);
//! ```
//!
//! The double is meant to be driven from one test at a time through `&mut` access. To share it
//! between threads, put it behind a `Mutex`; the guard is a `CodeStorage` as well.
//!
//! [`CodeStorage`]: ../storage/trait.CodeStorage.html
//! [`mockall`]: https://docs.rs/mockall
//! [`MockStorage`]: struct.MockStorage.html
use std::ops::{Deref, DerefMut};

use log::{debug, trace};
use mockall::mock;

use crate::primitives::extra::Extra;
use crate::primitives::request::AuthorizeRequest;
use crate::storage::{CodeStorage, StorageError};

mod call;

pub use self::call::{CallLog, CallRecord, Method};
pub use mockall::{predicate, Sequence};

mock! {
    /// The expectations answering the calls of a [`MockCodeStorage`].
    ///
    /// [`MockCodeStorage`]: struct.MockCodeStorage.html
    pub Storage {}

    impl CodeStorage for Storage {
        fn create_authorize_code_session(
            &mut self, code: &str, request: &AuthorizeRequest, extra: &Extra,
        ) -> Result<(), StorageError>;

        fn get_authorize_code_session(
            &mut self, code: &str, request: &mut AuthorizeRequest, extra: &mut Extra,
        ) -> Result<(), StorageError>;

        fn delete_authorize_code_session(&mut self, code: &str) -> Result<(), StorageError>;
    }
}

/// Test double for authorization code session storage.
///
/// Set expectations through the `expect_*` methods of [`MockStorage`], which this type
/// dereferences to. Unmet expectations panic when the double is dropped, unless the thread is
/// already panicking.
///
/// [`MockStorage`]: struct.MockStorage.html
#[derive(Default)]
pub struct MockCodeStorage {
    log: CallLog,
    expectations: MockStorage,
}

impl MockCodeStorage {
    /// A double without expectations and an empty log.
    pub fn new() -> Self {
        MockCodeStorage::default()
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> &CallLog {
        &self.log
    }

    /// The calls made to one operation, in order.
    pub fn calls_to(&self, method: Method) -> impl Iterator<Item = &CallRecord> {
        self.log.to_method(method)
    }

    /// How often an operation was called.
    pub fn call_count(&self, method: Method) -> usize {
        self.calls_to(method).count()
    }

    fn record(&mut self, call: CallRecord) {
        debug!("storage double called: {}", call);
        self.log.push(call);
    }
}

/// Answer a `get_authorize_code_session` expectation with a session.
///
/// The returned closure writes clones of `request` and `extra` into the output targets and
/// succeeds. Failing answers are written as plain closures returning `Err`, which leave the
/// targets alone.
///
/// ```
/// # use authcode_mock::mock::{found, MockCodeStorage};
/// # use authcode_mock::primitives::prelude::*;
/// # use authcode_mock::storage::CodeStorage;
/// # use serde_json::json;
/// let request = AuthorizeRequest::new(
///     "client".into(),
///     "owner".into(),
///     "read".parse().unwrap(),
///     "https://client.example/cb".parse().unwrap(),
///     chrono::Utc::now(),
/// );
///
/// let mut storage = MockCodeStorage::new();
/// storage
///     .expect_get_authorize_code_session()
///     .returning(found(request.clone(), Extra::from(json!({"nonce": "n-0S6"}))));
///
/// let mut target = request.clone();
/// let mut extra = Extra::None;
/// storage.get_authorize_code_session("abc", &mut target, &mut extra).unwrap();
/// assert_eq!(extra.as_json(), Some(&json!({"nonce": "n-0S6"})));
/// ```
pub fn found(
    request: AuthorizeRequest, extra: Extra,
) -> impl FnMut(&str, &mut AuthorizeRequest, &mut Extra) -> Result<(), StorageError> + Send + 'static {
    move |_, request_target, extra_target| {
        *request_target = request.clone();
        *extra_target = extra.clone();
        Ok(())
    }
}

impl Deref for MockCodeStorage {
    type Target = MockStorage;

    fn deref(&self) -> &MockStorage {
        &self.expectations
    }
}

impl DerefMut for MockCodeStorage {
    fn deref_mut(&mut self) -> &mut MockStorage {
        &mut self.expectations
    }
}

impl CodeStorage for MockCodeStorage {
    fn create_authorize_code_session(
        &mut self, code: &str, request: &AuthorizeRequest, extra: &Extra,
    ) -> Result<(), StorageError> {
        self.record(CallRecord::Create {
            code: code.to_string(),
            request: request.clone(),
            extra: extra.clone(),
        });

        let result = self.expectations.create_authorize_code_session(code, request, extra);
        trace!("create_authorize_code_session({:?}) answered with {:?}", code, result);
        result
    }

    fn get_authorize_code_session(
        &mut self, code: &str, request: &mut AuthorizeRequest, extra: &mut Extra,
    ) -> Result<(), StorageError> {
        self.record(CallRecord::Get {
            code: code.to_string(),
            request: request.clone(),
            extra: extra.clone(),
        });

        let result = self.expectations.get_authorize_code_session(code, request, extra);
        trace!("get_authorize_code_session({:?}) answered with {:?}", code, result);
        result
    }

    fn delete_authorize_code_session(&mut self, code: &str) -> Result<(), StorageError> {
        self.record(CallRecord::Delete {
            code: code.to_string(),
        });

        let result = self.expectations.delete_authorize_code_session(code);
        trace!("delete_authorize_code_session({:?}) answered with {:?}", code, result);
        result
    }
}

#[cfg(test)]
/// Tests of the double, and fixtures shared with other modules.
pub mod tests {
    use super::predicate::*;
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    /// A fixed request, equal each time it is built.
    pub fn sample_request() -> AuthorizeRequest {
        AuthorizeRequest::new(
            "LocalClient".to_string(),
            "Owner".to_string(),
            "read write".parse().unwrap(),
            "https://client.example/endpoint".parse().unwrap(),
            Utc.with_ymd_and_hms(2030, 1, 1, 12, 0, 0).unwrap(),
        )
    }

    fn other_request() -> AuthorizeRequest {
        let mut request = sample_request();
        request.client_id = "OtherClient".to_string();
        request
    }

    #[test]
    fn configured_create_succeeds() {
        let mut storage = MockCodeStorage::new();
        let request = sample_request();
        storage
            .expect_create_authorize_code_session()
            .with(eq("abc"), eq(request.clone()), eq(Extra::None))
            .once()
            .returning(|_, _, _| Ok(()));

        assert_eq!(
            storage.create_authorize_code_session("abc", &request, &Extra::None),
            Ok(())
        );
    }

    #[test]
    #[should_panic(expected = "No matching expectation found")]
    fn unconfigured_create_panics() {
        let mut storage = MockCodeStorage::new();
        let request = sample_request();
        storage
            .expect_create_authorize_code_session()
            .with(eq("abc"), eq(request.clone()), eq(Extra::None))
            .returning(|_, _, _| Ok(()));

        let _ = storage.create_authorize_code_session("xyz", &request, &Extra::None);
    }

    #[test]
    fn get_leaves_outputs_alone() {
        let mut storage = MockCodeStorage::new();
        storage
            .expect_get_authorize_code_session()
            .with(eq("abc"), eq(sample_request()), eq(Extra::None))
            .returning(|_, _, _| Err(StorageError::NotFound));

        let mut request = sample_request();
        let mut extra = Extra::None;
        assert_eq!(
            storage.get_authorize_code_session("abc", &mut request, &mut extra),
            Err(StorageError::NotFound)
        );
        assert_eq!(request, sample_request());
        assert_eq!(extra, Extra::None);
    }

    #[test]
    fn found_fills_outputs() {
        let mut storage = MockCodeStorage::new();
        storage
            .expect_get_authorize_code_session()
            .with(eq("abc"), always(), function(|extra: &Extra| extra.is_none()))
            .returning(found(other_request(), Extra::from(json!({"nonce": "n"}))));

        let mut request = sample_request();
        let mut extra = Extra::None;
        assert_eq!(
            storage.get_authorize_code_session("abc", &mut request, &mut extra),
            Ok(())
        );
        assert_eq!(request, other_request());
        assert_eq!(extra, Extra::from(json!({"nonce": "n"})));

        // The log keeps the targets as they were passed in.
        match &storage.calls()[0] {
            CallRecord::Get { request, extra, .. } => {
                assert_eq!(*request, sample_request());
                assert_eq!(*extra, Extra::None);
            }
            other => panic!("Unexpected record {:?}", other),
        }
    }

    #[test]
    fn failed_lookup_leaves_outputs_alone() {
        let mut storage = MockCodeStorage::new();
        storage
            .expect_get_authorize_code_session()
            .once()
            .returning(found(other_request(), Extra::from(json!(1))));
        storage
            .expect_get_authorize_code_session()
            .once()
            .returning(|_, _, _| Err(StorageError::Unavailable));

        let mut request = sample_request();
        let mut extra = Extra::None;
        assert_eq!(storage.get_authorize_code_session("abc", &mut request, &mut extra), Ok(()));
        assert_eq!(request, other_request());

        let mut request = sample_request();
        let mut extra = Extra::None;
        assert_eq!(
            storage.get_authorize_code_session("abc", &mut request, &mut extra),
            Err(StorageError::Unavailable)
        );
        assert_eq!(request, sample_request());
        assert_eq!(extra, Extra::None);
    }

    #[test]
    fn double_delete_needs_repeatable_expectation() {
        let mut storage = MockCodeStorage::new();
        storage
            .expect_delete_authorize_code_session()
            .with(eq("abc"))
            .times(2)
            .returning(|_| Ok(()));

        assert_eq!(storage.delete_authorize_code_session("abc"), Ok(()));
        assert_eq!(storage.delete_authorize_code_session("abc"), Ok(()));
        storage.checkpoint();
    }

    #[test]
    #[should_panic(expected = "more than expected")]
    fn once_means_once() {
        let mut storage = MockCodeStorage::new();
        storage
            .expect_delete_authorize_code_session()
            .with(eq("abc"))
            .once()
            .returning(|_| Ok(()));

        let _ = storage.delete_authorize_code_session("abc");
        let _ = storage.delete_authorize_code_session("abc");
    }

    #[test]
    fn exhausted_expectations_pass_on_to_the_next() {
        let mut storage = MockCodeStorage::new();
        storage
            .expect_delete_authorize_code_session()
            .once()
            .returning(|_| Ok(()));
        storage
            .expect_delete_authorize_code_session()
            .once()
            .returning(|_| Err(StorageError::NotFound));

        assert_eq!(storage.delete_authorize_code_session("abc"), Ok(()));
        assert_eq!(
            storage.delete_authorize_code_session("abc"),
            Err(StorageError::NotFound)
        );
    }

    #[test]
    fn log_is_exact_and_ordered() {
        let mut storage = MockCodeStorage::new();
        storage
            .expect_create_authorize_code_session()
            .returning(|_, _, _| Ok(()));
        storage
            .expect_delete_authorize_code_session()
            .returning(|_| Ok(()));

        let request = sample_request();
        let extra = Extra::from(json!(1));
        storage.create_authorize_code_session("a", &request, &extra).unwrap();
        storage.delete_authorize_code_session("b").unwrap();
        storage.create_authorize_code_session("a", &request, &Extra::None).unwrap();

        let codes = storage.calls().iter().map(CallRecord::code).collect::<Vec<_>>();
        assert_eq!(codes, vec!["a", "b", "a"]);
        assert_eq!(storage.call_count(Method::Create), 2);
        assert_eq!(storage.calls()[0].extra(), Some(&extra));
        assert_eq!(storage.calls()[2].extra(), Some(&Extra::None));
    }

    #[test]
    fn unmatched_calls_are_still_logged() {
        let mut storage = MockCodeStorage::new();
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ = storage.delete_authorize_code_session("abc");
        }));

        assert!(outcome.is_err());
        assert_eq!(storage.calls().len(), 1);
        assert_eq!(storage.calls()[0], CallRecord::Delete { code: "abc".into() });
    }

    #[test]
    fn sequence_accepts_calls_in_order() {
        let mut storage = MockCodeStorage::new();
        let mut seq = Sequence::new();
        storage
            .expect_create_authorize_code_session()
            .once()
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));
        storage
            .expect_get_authorize_code_session()
            .once()
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));
        storage
            .expect_delete_authorize_code_session()
            .once()
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let mut request = sample_request();
        let mut extra = Extra::None;
        storage.create_authorize_code_session("c", &request, &extra).unwrap();
        storage.get_authorize_code_session("c", &mut request, &mut extra).unwrap();
        storage.delete_authorize_code_session("c").unwrap();
    }

    #[test]
    #[should_panic(expected = "Method sequence violation")]
    fn sequence_rejects_calls_out_of_order() {
        let mut storage = MockCodeStorage::new();
        let mut seq = Sequence::new();
        storage
            .expect_delete_authorize_code_session()
            .with(eq("a"))
            .once()
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        storage
            .expect_delete_authorize_code_session()
            .with(eq("b"))
            .once()
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let _ = storage.delete_authorize_code_session("b");
    }

    #[test]
    fn checkpoint_clears_expectations_keeps_log() {
        let mut storage = MockCodeStorage::new();
        storage
            .expect_delete_authorize_code_session()
            .once()
            .returning(|_| Ok(()));
        storage.delete_authorize_code_session("abc").unwrap();
        storage.checkpoint();

        storage
            .expect_delete_authorize_code_session()
            .returning(|_| Err(StorageError::NotFound));
        assert_eq!(
            storage.delete_authorize_code_session("abc"),
            Err(StorageError::NotFound)
        );
        assert_eq!(storage.calls().len(), 2);
    }

    #[test]
    #[should_panic(expected = "fewer than expected")]
    fn drop_verifies() {
        let mut storage = MockCodeStorage::new();
        storage
            .expect_delete_authorize_code_session()
            .once()
            .returning(|_| Ok(()));
    }

    #[test]
    fn returning_computes_from_call() {
        let mut storage = MockCodeStorage::new();
        let mut seen = 0;
        storage
            .expect_delete_authorize_code_session()
            .withf(|code| code.len() == 3)
            .returning(move |_| {
                seen += 1;
                if seen > 1 {
                    Err(StorageError::NotFound)
                } else {
                    Ok(())
                }
            });

        assert_eq!(storage.delete_authorize_code_session("abc"), Ok(()));
        assert_eq!(
            storage.delete_authorize_code_session("abc"),
            Err(StorageError::NotFound)
        );
    }

    #[test]
    fn json_log() {
        let mut storage = MockCodeStorage::new();
        storage
            .expect_delete_authorize_code_session()
            .with(ne("abc"))
            .returning(|_| Ok(()));
        storage.delete_authorize_code_session("xyz").unwrap();

        assert_eq!(
            storage.calls().to_json().unwrap(),
            json!([{"method": "delete_authorize_code_session", "code": "xyz"}])
        );
    }
}
