//! Storage of authorization code sessions.
//!
//! The authorization endpoint registers a session under each code it issues. When the client
//! redeems that code at the token endpoint, the session is read back and then removed, so that a
//! code can not be used twice. Implementations decide how and where sessions are kept; this
//! module only defines the contract between them and the endpoints.
use std::error;
use std::fmt;
use std::sync::{MutexGuard, RwLockWriteGuard};

use crate::primitives::extra::Extra;
use crate::primitives::request::AuthorizeRequest;

/// Creates, reads and removes authorization code sessions.
///
/// The following holds for every implementation, although nothing in this trait can enforce it:
/// a code that was never created can not be read or deleted, and a code can not be read after it
/// was deleted. Codes are assumed unique by the caller.
pub trait CodeStorage {
    /// Register a new session under `code`.
    ///
    /// Fails with [`StorageError::AlreadyExists`] if `code` is already in use.
    ///
    /// [`StorageError::AlreadyExists`]: enum.StorageError.html#variant.AlreadyExists
    fn create_authorize_code_session(
        &mut self, code: &str, request: &AuthorizeRequest, extra: &Extra,
    ) -> Result<(), StorageError>;

    /// Read the session registered under `code` into `request` and `extra`.
    ///
    /// Fails with [`StorageError::NotFound`] if there is no such session. The output targets
    /// should only be written on success.
    ///
    /// [`StorageError::NotFound`]: enum.StorageError.html#variant.NotFound
    fn get_authorize_code_session(
        &mut self, code: &str, request: &mut AuthorizeRequest, extra: &mut Extra,
    ) -> Result<(), StorageError>;

    /// Remove the session registered under `code`.
    ///
    /// Deleting is not idempotent: removing a code that does not exist, including one that was
    /// already deleted, fails with [`StorageError::NotFound`].
    ///
    /// [`StorageError::NotFound`]: enum.StorageError.html#variant.NotFound
    fn delete_authorize_code_session(&mut self, code: &str) -> Result<(), StorageError>;
}

/// Failure of a storage operation.
///
/// Backends map their own failures onto these three cases.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageError {
    /// A session with the same code has already been created.
    AlreadyExists,

    /// There is no session for the code.
    NotFound,

    /// The backing medium could not be reached or failed otherwise.
    Unavailable,
}

impl fmt::Display for StorageError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StorageError::AlreadyExists => fmt.write_str("an authorization code session with this code already exists"),
            StorageError::NotFound => fmt.write_str("no authorization code session exists for this code"),
            StorageError::Unavailable => fmt.write_str("authorization code storage is unavailable"),
        }
    }
}

impl error::Error for StorageError {}

impl<'a, S: CodeStorage + ?Sized> CodeStorage for &'a mut S {
    fn create_authorize_code_session(
        &mut self, code: &str, request: &AuthorizeRequest, extra: &Extra,
    ) -> Result<(), StorageError> {
        (**self).create_authorize_code_session(code, request, extra)
    }

    fn get_authorize_code_session(
        &mut self, code: &str, request: &mut AuthorizeRequest, extra: &mut Extra,
    ) -> Result<(), StorageError> {
        (**self).get_authorize_code_session(code, request, extra)
    }

    fn delete_authorize_code_session(&mut self, code: &str) -> Result<(), StorageError> {
        (**self).delete_authorize_code_session(code)
    }
}

impl<S: CodeStorage + ?Sized> CodeStorage for Box<S> {
    fn create_authorize_code_session(
        &mut self, code: &str, request: &AuthorizeRequest, extra: &Extra,
    ) -> Result<(), StorageError> {
        (**self).create_authorize_code_session(code, request, extra)
    }

    fn get_authorize_code_session(
        &mut self, code: &str, request: &mut AuthorizeRequest, extra: &mut Extra,
    ) -> Result<(), StorageError> {
        (**self).get_authorize_code_session(code, request, extra)
    }

    fn delete_authorize_code_session(&mut self, code: &str) -> Result<(), StorageError> {
        (**self).delete_authorize_code_session(code)
    }
}

impl<'a, S: CodeStorage + ?Sized> CodeStorage for MutexGuard<'a, S> {
    fn create_authorize_code_session(
        &mut self, code: &str, request: &AuthorizeRequest, extra: &Extra,
    ) -> Result<(), StorageError> {
        (**self).create_authorize_code_session(code, request, extra)
    }

    fn get_authorize_code_session(
        &mut self, code: &str, request: &mut AuthorizeRequest, extra: &mut Extra,
    ) -> Result<(), StorageError> {
        (**self).get_authorize_code_session(code, request, extra)
    }

    fn delete_authorize_code_session(&mut self, code: &str) -> Result<(), StorageError> {
        (**self).delete_authorize_code_session(code)
    }
}

impl<'a, S: CodeStorage + ?Sized> CodeStorage for RwLockWriteGuard<'a, S> {
    fn create_authorize_code_session(
        &mut self, code: &str, request: &AuthorizeRequest, extra: &Extra,
    ) -> Result<(), StorageError> {
        (**self).create_authorize_code_session(code, request, extra)
    }

    fn get_authorize_code_session(
        &mut self, code: &str, request: &mut AuthorizeRequest, extra: &mut Extra,
    ) -> Result<(), StorageError> {
        (**self).get_authorize_code_session(code, request, extra)
    }

    fn delete_authorize_code_session(&mut self, code: &str) -> Result<(), StorageError> {
        (**self).delete_authorize_code_session(code)
    }
}
