//! # smartmeet-templates
//!
//! The fixed catalog of invitation templates and the HTML renderer. Every
//! kind shares one card layout; the kind picks the badge text and the
//! subject line. Rendering is pure — no I/O, no persistence.

#![deny(unsafe_code)]

pub mod kinds;
pub mod render;

pub use kinds::{available, TemplateKind, TemplateKindInfo};
pub use render::{render, Invite, InviteForm};
