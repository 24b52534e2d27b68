#![forbid(unsafe_code)]

//! Core: pixel geometry shared by the layout engine and its hosts.
//!
//! # Role in Tessera
//! `tessera-core` carries the value types that cross the host boundary:
//! sizes of panes, pointer deltas of drag gestures and positioned rectangles
//! in a render frame. It has no knowledge of layout trees.

pub mod geometry;

pub use geometry::{Axis, Delta, Rect, Size};
