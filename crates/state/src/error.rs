// SPDX-License-Identifier: MIT

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("key not found")]
    NotFound,

    #[error("key {0:?} is owned by another agent")]
    NotOwner(String),
}
