// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Configuration module for MiniCoder
//!
//! Handles loading and saving the layered `.minicoderrc.json` settings.

pub mod settings;

pub use settings::*;
