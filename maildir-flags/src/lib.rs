#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![doc = include_str!("../README.md")]

mod error;
mod flag;
mod flags;

#[doc(inline)]
pub use crate::{
    error::{Error, Result},
    flag::Flag,
    flags::Flags,
};
