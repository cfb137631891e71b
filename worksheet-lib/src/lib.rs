//! Worksheet table and cache library
//!
//! Client-side building blocks for the worksheet platform: a table view
//! controller that sorts, filters and selects worksheet rows, and a TTL cache
//! service for pre-warmed config objects.

pub mod cache;
pub mod error;
pub mod model;
pub mod table;
