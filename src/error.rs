//! Errors surfaced through the WASM facade.

use wasm_bindgen::JsValue;

use crate::graph::MutationError;
use crate::plan::PlanError;
use crate::salary::SalaryError;

/// Any failure of an `OrgPlannerWasm` call.
#[derive(Debug, thiserror::Error)]
pub enum OrgPlannerError {
    #[error(transparent)]
    Mutation(#[from] MutationError),
    #[error(transparent)]
    Salary(#[from] SalaryError),
    #[error(transparent)]
    Plan(#[from] PlanError),
    /// A JS argument did not match the expected shape, or a result could not
    /// be converted back.
    #[error("invalid value: {0}")]
    Interop(#[from] serde_wasm_bindgen::Error),
}

impl From<OrgPlannerError> for JsValue {
    fn from(err: OrgPlannerError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_pass_through() {
        let err: OrgPlannerError = MutationError::UnknownNode("x".into()).into();
        assert_eq!(err.to_string(), "unknown node: x");

        let err: OrgPlannerError = SalaryError::AutoBandCannotLead("b".into()).into();
        assert_eq!(err.to_string(), "auto-calculated band b cannot lead");
    }
}
