//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services and ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::TableEncoder;
use crate::domain::{
    ExpiryNotifier, IdentityService, InventoryService, ReportService, SpreadsheetCapability,
};

/// Parameter object bundling the services and encoders handlers use.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub identity: IdentityService,
    pub inventory: InventoryService,
    pub reports: ReportService,
    pub notifier: ExpiryNotifier,
    pub csv: Arc<dyn TableEncoder>,
    pub spreadsheet: SpreadsheetCapability,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub identity: IdentityService,
    pub inventory: InventoryService,
    pub reports: ReportService,
    pub notifier: ExpiryNotifier,
    pub csv: Arc<dyn TableEncoder>,
    pub spreadsheet: SpreadsheetCapability,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            identity,
            inventory,
            reports,
            notifier,
            csv,
            spreadsheet,
        } = ports;
        Self {
            identity,
            inventory,
            reports,
            notifier,
            csv,
            spreadsheet,
        }
    }
}
