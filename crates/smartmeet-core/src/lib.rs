//! # smartmeet-core
//!
//! Logical entity types shared across the smartmeet crates.
//!
//! These are the application-facing shapes — the persistence adapter in
//! `smartmeet-store` is the only place that knows how they map onto the
//! backing store's physical tables. Nothing in this crate performs I/O.

#![deny(unsafe_code)]

pub mod entities;
pub mod validation;

pub use entities::{
    Contact, DeliveryMethod, DeliveryStatus, Distribution, Meeting, MemberType, Organization,
    Priority, Recipient, Template, User,
};
pub use validation::{duration_to_mins, validate_email, validate_phone};
