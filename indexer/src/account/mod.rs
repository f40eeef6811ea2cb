//! # Account
//!
//! Module dedicated to the account: everything the synchronization
//! layer needs to know about the user's mail setup lives in the
//! [`AccountConfig`].

pub mod config;
mod error;

#[doc(inline)]
pub use self::{
    config::{ensure_folder_exists, AccountConfig},
    error::{Error, Result},
};
