//! "Generate 4 Buildings": sequential creation of the 80-unit plan.
//!
//! Units are created strictly one after another in plan order. The first
//! failure stops the run; units created before it stay, and nothing after it
//! is attempted. There is no rollback.

use punch_core::bulk::bulk_unit_plan;
use punch_core::UnitId;
use tracing::{info, instrument, warn};

use crate::errors::RepositoryError;
use crate::metrics::{BULK_GENERATION_HALTS_TOTAL, UNITS_CREATED_TOTAL};
use crate::repository::UnitRepository;

/// The create call that stopped a bulk run.
#[derive(Debug)]
pub struct BulkFailure {
    /// Unit whose creation failed.
    pub unit: UnitId,
    /// Why it failed.
    pub error: RepositoryError,
}

/// Result of a bulk run.
#[derive(Debug, Default)]
pub struct BulkReport {
    /// Units created, in order.
    pub created: Vec<UnitId>,
    /// Create calls issued, including the failed one.
    pub attempted: usize,
    /// The failure that halted the run, if any.
    pub failure: Option<BulkFailure>,
}

impl BulkReport {
    /// Whether every planned unit was created.
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

/// Create every planned unit in order, stopping at the first failure.
#[instrument(skip_all, fields(collection = repo.collection()))]
pub async fn generate_buildings(repo: &UnitRepository) -> BulkReport {
    let mut report = BulkReport::default();
    for planned in bulk_unit_plan() {
        report.attempted += 1;
        match repo.create_unit(&planned.name, &planned.address).await {
            Ok(unit) => {
                ::metrics::counter!(UNITS_CREATED_TOTAL, "source" => "bulk").increment(1);
                report.created.push(unit.id());
            }
            Err(error) => {
                warn!(unit = %planned.name, %error, attempted = report.attempted, "bulk generation halted");
                ::metrics::counter!(BULK_GENERATION_HALTS_TOTAL).increment(1);
                report.failure = Some(BulkFailure {
                    unit: UnitId::new(planned.name),
                    error,
                });
                return report;
            }
        }
    }
    info!(created = report.created.len(), "bulk generation finished");
    report
}
