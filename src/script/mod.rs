// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Script text and generated snippets.

pub mod buffer;
pub mod template;
