#![cfg_attr(not(test), no_std)]

#[macro_use]
mod log;

mod error;

pub mod config;
pub mod delay;
pub mod device;
pub mod interface;
pub mod params;
pub mod platform;
pub mod registers;

pub use crate::device::Lis3dh;
pub use crate::error::{Error, Result};
