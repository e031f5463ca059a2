// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Synchronization primitive guarding coordination state.
//!
//! `parking_lot::Mutex` never poisons, so a panicking transform cannot wedge
//! the state shared by the launch and drain loops.

pub use parking_lot::Mutex;
