//! Table windowing on top of the `virtual-window` crate.
//!
//! `virtual-window` decides which rows are rendered. This crate adds what a table needs on top
//! of that:
//!
//! - Sticky header rows whose base offsets are cached until the header count changes
//!   ([`StickyRowOffsets`])
//! - The total extent of header, body, and footer sections ([`table_content_size`])
//! - A [`TableWindowing`] wrapper that wires a controller, a body row renderer, and sticky rows
//!   together, and measures rendered row ranges along the viewport's orientation
//!
//! This crate is framework-agnostic: rows and sticky cells are reached through
//! [`virtual_window::SlotFactory`] and [`StickyRows`].
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod extent;
mod sticky;
mod table;


pub use extent::table_content_size;
pub use sticky::{StickyRowOffsets, StickyRows};
pub use table::{TableFrame, TableWindowing};
