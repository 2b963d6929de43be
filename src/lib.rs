//! # BIM Assistant
//!
//! Chat-driven inspector for the element properties of a 3D building model.
//!
//! ## Features
//!
//! - Normalize bilingual (Korean/English) property bags into typed fields
//! - Parse element rows and model-derivative property dumps
//! - Summarize elements by category, and walls by thickness
//! - Classify chat messages into filter, stats and metadata actions
//! - Filter the property database by structured conditions
//! - Export tables to CSV and JSON, or browse them in a terminal chat
//!
//! ## Example
//!
//! ```
//! use bim_assistant::aggregate::{wall_summary, Collector};
//! use bim_assistant::parser::Scope;
//! use serde_json::json;
//!
//! let rows = json!([
//!     r#"1,"Basic Wall 200","Revit 벽","두께:200|체적:1.5""#,
//!     r#"2,"Basic Wall 200","Revit 벽","두께:200|체적:0.5""#,
//! ]);
//! let records = Collector::default().collect(&rows, Scope::Wall).unwrap();
//! let summary = wall_summary(records);
//! assert_eq!(summary.grouped_summary[0].thickness_mm, 200);
//! assert_eq!(summary.grouped_summary[0].count, 2);
//! ```

pub mod aggregate;
pub mod assistant;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod intent;
pub mod model;
pub mod normalize;
pub mod parser;
pub mod store;
pub mod ui;
