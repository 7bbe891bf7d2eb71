// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for images, captures and session storage.

pub mod export;
pub mod media;
pub mod storage;
