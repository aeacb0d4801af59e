// src/lib.rs

//! Post preprocessor library

pub mod annotator;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod storage;
pub mod utils;
