// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod assets;
pub mod transactions;
pub mod importer;
pub mod categorize;
pub mod rules;
pub mod settings;
pub mod reports;
