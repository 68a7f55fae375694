// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod categorize;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod errors;
pub mod liability;
pub mod logging;
pub mod models;
pub mod utils;
