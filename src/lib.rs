//! budgetwise - Terminal personal finance tracker
//!
//! This library provides the core functionality for the budgetwise CLI:
//! categories, income and expense transactions, monthly expense budgets and
//! income estimates, and the analyses built on them (budget vs. actual,
//! deviations, critical categories, projections and monthly balance).
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (categories, transactions, budgets, aggregates)
//! - `storage`: JSON file storage layer and the `RecordStore` trait
//! - `services`: Business logic layer, including the aggregation engine
//! - `audit`: Audit logging system
//! - `reports`: Dashboard and annual reports
//! - `display`: Terminal formatting
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use budgetwise::config::{paths::BudgetPaths, settings::Settings};
//! use budgetwise::services::BudgetEngine;
//! use budgetwise::storage::Storage;
//!
//! let paths = BudgetPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::open(paths).await?;
//! let mut engine = BudgetEngine::new(&storage).with_policy(settings.projection_policy);
//! engine.initialize().await?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{BudgetError, BudgetResult};
