//! Command handlers

pub mod configure;
pub mod count;
pub mod scan;
