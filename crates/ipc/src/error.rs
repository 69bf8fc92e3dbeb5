// SPDX-License-Identifier: MIT

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IpcError {
    #[error("name {0:?} is already registered to another agent")]
    NameTaken(String),

    #[error("no such recipient")]
    UnknownRecipient,

    #[error("message has neither `to` nor `to_name`")]
    MissingTarget,
}
