// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Chordtree - stochastic chord and melody generator.
//!
//! A piece is built bar by bar from a random rhythm tree. Each chord leaf
//! picks a diatonic chord and voices it near a wandering pitch reference;
//! the melody grows its own subtree under every chord leaf and voices the
//! same chord in a higher range.

pub mod config;
pub mod generators;
pub mod music;
pub mod piece;
pub mod render;
