#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![doc = include_str!("../README.md")]

pub mod account;
pub mod backend;
mod error;
pub mod retrieve;
pub mod session;
pub mod update;

#[doc(inline)]
pub use crate::error::{Error, Result};
