//! Core model – spring smoothing, keyframe curves and the scroll mapper.
//!
//! Nothing in this module depends on any TUI or rendering crate.  The only
//! async primitive is the watch channel behind [`scroll::ScrollFeed`].

pub mod ambient;
pub mod easing;
pub mod element;
pub mod interpolate;
pub mod manifest;
pub mod mapper;
pub mod page;
pub mod scroll;
pub mod spring;
pub mod visual;
