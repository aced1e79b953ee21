// Post domain module
// Post aggregate root and its per-type content

#![allow(clippy::module_inception)]

pub mod post;
pub mod value_objects;

pub use post::{Post, PostParts};
pub use value_objects::{PostContent, PostType};
