// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Recorder core: annotation change handling and session state.

pub mod handler;
pub mod session;
