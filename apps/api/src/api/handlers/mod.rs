// HTTP handlers, one module per resource

pub mod auth;
pub mod comments;
pub mod posts;
pub mod tags;
pub mod users;
