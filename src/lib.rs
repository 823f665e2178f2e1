//! Contribution Engine for INPS pension statements
//!
//! This crate reads the periods of an INPS contribution statement (general
//! regime weeks and entertainment-sector days), computes actual and
//! theoretical contribution days and months per calendar year, and projects
//! forward until the pension contribution target is reached.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod extraction;
pub mod models;
pub mod report;
