//! Rendering tests, grouped by backend.

mod codec;
mod dialects;
mod nosql;
