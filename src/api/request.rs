//! Request types for the contribution engine API.
//!
//! This module defines the JSON request structure for the `/calculate` endpoint.

use serde::{Deserialize, Serialize};

use crate::calculation::decode_sex;
use crate::error::EngineResult;
use crate::models::{ContractTransition, EngineConfig, PeriodRecords, Sex};

/// Request body for the `/calculate` endpoint.
///
/// Carries the extracted period records and the two engine inputs. When
/// `sex` is omitted it is decoded from the records' tax code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// The period records to compute.
    pub records: PeriodRecords,
    /// Overrides the sex decoded from the tax code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<Sex>,
    /// Permanent-contract marker: `"always"` or a `DD/MM/YYYY` date.
    /// Absent means fixed-term throughout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_transition: Option<String>,
}

impl CalculationRequest {
    /// Resolves the engine configuration of the request.
    ///
    /// Fails with `InvalidContractTransition` for a malformed marker.
    pub fn engine_config(&self) -> EngineResult<EngineConfig> {
        let sex = self
            .sex
            .unwrap_or_else(|| decode_sex(self.records.identity.tax_code.as_deref()));
        let transition = ContractTransition::parse(self.contract_transition.as_deref())?;
        Ok(EngineConfig::new(sex, transition))
    }
}
