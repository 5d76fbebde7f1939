//! Account records, validation pipeline, and credential hashing.
//!
//! The board store ([`tacks_core`]) treats users as opaque leaf entities;
//! this crate owns their write path: signup validation with field-level
//! messages, uniqueness checks behind [`UserDirectory`], and salted
//! credential derivation at registration time.

pub mod policy;
pub mod user;
pub mod validate;

pub use policy::{ValidationPolicy, load_policy};
pub use user::{MemoryDirectory, Profile, PublicUser, Signup, User, UserDirectory, register,
    verify_password};
pub use validate::{FieldError, ValidationErrors};
