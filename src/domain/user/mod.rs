//! User module - registered users as seen by the trip core.
//!
//! Registration, login and credential hashing belong to the identity
//! provider. The core only needs to know that a login handle refers to a
//! registered user and to show basic profile fields.

mod profile;

pub use profile::UserProfile;
