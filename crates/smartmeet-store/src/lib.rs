//! # smartmeet-store
//!
//! Persistence adapter for smartmeet. The backing relational store was
//! designed for an unrelated meeting-management product (`meetings`,
//! `meeting_minutes`, `meeting_attendees`, `social_posts`, `contacts`,
//! `organizations`), and its query surface exposes only single-table
//! predicates. This crate performs the impedance-matching:
//!
//! - **[`client`]**: the store client — single-table equality/range/id-set
//!   queries, inserts, updates, deletes. Owns no business logic.
//! - **[`migrations`]**: version-tracked schema evolution for the fixed
//!   external schema.
//! - **[`adapter`]**: per-entity translation between logical shapes and
//!   physical rows, including the composite multi-table writes and the
//!   in-memory filter emulation.
//! - **[`store`]**: the [`InviteStore`] facade the rest of the application
//!   talks to. Logical entity shapes never leak table or column names.
//!
//! Composite writes are not transactional across tables — the client has no
//! cross-table primitive — so a dependent-write failure leaves the parent
//! row in place and surfaces as [`StoreError::PartialWrite`].

#![deny(unsafe_code)]

pub mod adapter;
pub mod client;
mod composite;
pub mod errors;
pub mod migrations;
pub mod rows;
pub mod seed;
pub mod store;

pub use adapter::contacts::NewContact;
pub use adapter::distributions::NewDistribution;
pub use adapter::filter::DistributionFilter;
pub use adapter::meetings::NewMeeting;
pub use adapter::organizations::NewOrganization;
pub use adapter::templates::{NewTemplate, TemplateChanges, TemplateWrite};
pub use client::{ConnectionConfig, ConnectionPool, StoreClient};
pub use errors::{Result, StoreError};
pub use seed::seed_demo_data;
pub use store::InviteStore;
