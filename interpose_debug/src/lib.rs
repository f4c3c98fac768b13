// Copyright 2026 the Interpose Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and JSON frame reports for interpose
//! diagnostics.
//!
//! This crate provides [`TraceSink`](interpose_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`report::export`]: writes per-frame JSON reports from recorded bytes.

pub mod pretty;
pub mod recorder;
pub mod report;
