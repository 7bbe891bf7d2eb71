// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: annotations, definitions, the metadata store and tools.

pub mod annotation;
pub mod definition;
pub mod metadata;
pub mod tool;
