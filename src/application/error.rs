use thiserror::Error;

use crate::domain::Cents;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("User id must not be empty")]
    EmptyUserId,

    #[error("Amount must not be negative: {0}")]
    NegativeAmount(Cents),

    #[error("Record store error: {0}")]
    Store(#[from] anyhow::Error),
}
