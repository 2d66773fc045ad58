//! # authcode-mock
//!
//! Storage of OAuth2 authorization code sessions, and a test double for it.
//!
//! ## About
//!
//! An authorization server that uses the code grant keeps a session for every code it hands out.
//! The authorization endpoint creates the session, the token endpoint reads it back when the
//! client redeems its code and then removes it. [`CodeStorage`] is the contract between those
//! endpoints and whatever keeps the sessions.
//!
//! Testing the endpoints against a real store makes it hard to provoke failures and to see what
//! was asked of the store. [`MockCodeStorage`] records every call with its arguments and answers
//! with results configured up front, including errors such as [`StorageError::NotFound`].
//!
//! ```
//! use authcode_mock::mock::MockCodeStorage;
//! use authcode_mock::mock::predicate::*;
//! use authcode_mock::primitives::prelude::*;
//! use authcode_mock::storage::{CodeStorage, StorageError};
//!
//! fn redeem(storage: &mut dyn CodeStorage, code: &str, request: &mut AuthorizeRequest)
//!     -> Result<(), StorageError>
//! {
//!     let mut extra = Extra::None;
//!     storage.get_authorize_code_session(code, request, &mut extra)?;
//!     storage.delete_authorize_code_session(code)
//! }
//!
//! let mut storage = MockCodeStorage::new();
//! storage
//!     .expect_get_authorize_code_session()
//!     .with(eq("expired"), always(), always())
//!     .returning(|_, _, _| Err(StorageError::NotFound));
//!
//! let mut request = AuthorizeRequest::new(
//!     "client".into(),
//!     "owner".into(),
//!     "read".parse().unwrap(),
//!     "https://client.example/cb".parse().unwrap(),
//!     chrono::Utc::now(),
//! );
//! assert_eq!(redeem(&mut storage, "expired", &mut request), Err(StorageError::NotFound));
//! ```
//!
//! [`CodeStorage`]: storage/trait.CodeStorage.html
//! [`MockCodeStorage`]: mock/struct.MockCodeStorage.html
//! [`StorageError::NotFound`]: storage/enum.StorageError.html#variant.NotFound
#![warn(missing_docs)]

#[macro_use]
extern crate serde_derive;

pub mod mock;
pub mod primitives;
pub mod storage;
