//! Application state for the payroll engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::TaxTables;

/// Shared application state.
///
/// Contains the parsed statutory tables, shared read-only across all
/// request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The parsed statutory tables.
    tables: Arc<TaxTables>,
}

impl AppState {
    /// Creates a new application state with the given tables.
    pub fn new(tables: TaxTables) -> Self {
        Self {
            tables: Arc::new(tables),
        }
    }

    /// Returns a reference to the statutory tables.
    pub fn tables(&self) -> &TaxTables {
        &self.tables
    }
}
