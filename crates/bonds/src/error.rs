// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use thiserror::Error;

/// Errors raised while setting up a resolver. Once attached, a resolver never fails: states it
/// cannot work with are skipped.
#[derive(Debug, Error)]
pub enum ResolverError {
    #[error("invalid resolver configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse resolver configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("failed to start bond resolution workers: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

// End of File
