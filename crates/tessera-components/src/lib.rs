//! Fragment discovery and template-variable naming.
//!
//! This crate turns a directory of raw HTML/CSS fragments into named,
//! addressable strings that the render pipeline binds into a template context.

pub mod cache;
pub mod context;
pub mod naming;
pub mod store;

pub use cache::CachedStore;
pub use context::RenderContext;
pub use naming::{derive, display_name, sanitize};
pub use store::{ComponentDescriptor, ComponentStore, Fragment, FragmentKind, StoreError};
