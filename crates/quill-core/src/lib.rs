//! Core domain models for quill
//!
//! This crate contains:
//! - Blog post records and the inputs used to create and patch them
//! - Form submission records (leads)
//! - Presence validation for required fields

pub mod error;
pub mod post;
pub mod submission;

pub use error::{CoreError, Result};
pub use post::{BlogPost, BlogPostPatch, NewBlogPost, PostFields};
pub use submission::{FormSubmission, NewFormSubmission};
