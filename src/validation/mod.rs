// src/validation/mod.rs

//! Conservation checks for walk states, probability tables and coins.
//!
//! Coin and shift are both orthogonal, so the total probability of a run
//! never changes from its seeded value. These functions measure how far a
//! state or table has drifted from that ideal.

use crate::core::{AmplitudeSpace, QwError, Result, NORM_TOLERANCE, ORTHOGONALITY_TOLERANCE};
use crate::operations::CoinMatrix;
use crate::simulation::ProbabilityTable;

// --- Public Validation Functions ---

/// Checks that the total probability of `space` equals `expected`.
///
/// # Arguments
/// * `space` - The state to check.
/// * `expected` - Total it should carry (1.0 for a walk or a search on a graph without isolated vertices).
/// * `tolerance` - Allowed deviation. Defaults to `NORM_TOLERANCE`.
///
/// # Returns
/// * `Err(QwError::NormalizationDrift)` if the deviation exceeds `tolerance`.
pub fn check_normalization(space: &AmplitudeSpace, expected: f64, tolerance: Option<f64>) -> Result<()> {
    let effective_tolerance = tolerance.unwrap_or(NORM_TOLERANCE);
    let total = space.total_probability();
    if (total - expected).abs() > effective_tolerance {
        Err(QwError::NormalizationDrift {
            message: format!(
                "State normalization failed. Sum(|a_ij|^2) = {} expected {} (Deviation > {})",
                total, expected, effective_tolerance
            ),
        })
    } else {
        Ok(())
    }
}

/// Checks that every time step of `table` carries the same total as step 0.
///
/// Returns the first offending step in the error message.
pub fn check_probability_conservation(table: &ProbabilityTable, tolerance: Option<f64>) -> Result<()> {
    let effective_tolerance = tolerance.unwrap_or(NORM_TOLERANCE);
    let Some(initial) = table.total_at(0) else {
        return Ok(());
    };
    for (t, row) in table.rows().enumerate().skip(1) {
        let total: f64 = row.iter().sum();
        if (total - initial).abs() > effective_tolerance {
            return Err(QwError::NormalizationDrift {
                message: format!(
                    "Total probability at step {} is {}, initial total was {} (Deviation > {})",
                    t, total, initial, effective_tolerance
                ),
            });
        }
    }
    Ok(())
}

/// Checks `CᵀC = I` for `coin` within `tolerance` (default `ORTHOGONALITY_TOLERANCE`).
pub fn check_coin_orthogonal(coin: &CoinMatrix, tolerance: Option<f64>) -> Result<()> {
    let effective_tolerance = tolerance.unwrap_or(ORTHOGONALITY_TOLERANCE);
    let defect = coin.orthogonality_defect();
    if defect > effective_tolerance {
        Err(QwError::NormalizationDrift {
            message: format!("Coin of dimension {} is not orthogonal: max |CᵀC - I| = {:.3e}", coin.dim(), defect),
        })
    } else {
        Ok(())
    }
}

/// Checks that every entry of `table` is a probability and that the total is conserved.
/// Uses default tolerances unless specified.
pub fn validate_table(table: &ProbabilityTable, tolerance: Option<f64>) -> Result<()> {
    let effective_tolerance = tolerance.unwrap_or(NORM_TOLERANCE);
    for (t, row) in table.rows().enumerate() {
        if let Some((v, p)) = row
            .iter()
            .enumerate()
            .find(|(_, p)| !p.is_finite() || **p < 0.0 || **p > 1.0 + effective_tolerance)
        {
            return Err(QwError::NormalizationDrift {
                message: format!("Probability of vertex {} at step {} is {}", v, t, p),
            });
        }
    }
    check_probability_conservation(table, Some(effective_tolerance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::{grover_coin, negative_identity_coin};

    #[test]
    fn test_conservation_accepts_constant_totals() -> Result<()> {
        let table = ProbabilityTable::from_rows(vec![vec![0.5, 0.5], vec![0.9, 0.1], vec![0.0, 1.0]])?;
        assert!(check_probability_conservation(&table, None).is_ok());
        assert!(validate_table(&table, None).is_ok());
        Ok(())
    }

    #[test]
    fn test_conservation_reports_drift() -> Result<()> {
        let table = ProbabilityTable::from_rows(vec![vec![0.5, 0.5], vec![0.5, 0.4]])?;
        let err = check_probability_conservation(&table, None).unwrap_err();
        assert!(matches!(err, QwError::NormalizationDrift { .. }));
        assert!(err.to_string().contains("step 1"), "{}", err);
        Ok(())
    }

    #[test]
    fn test_validate_table_rejects_negative_probability() -> Result<()> {
        let table = ProbabilityTable::from_rows(vec![vec![1.2, -0.2]])?;
        assert!(validate_table(&table, None).is_err());
        Ok(())
    }

    #[test]
    fn test_coin_orthogonality() {
        assert!(check_coin_orthogonal(&grover_coin(6), None).is_ok());
        assert!(check_coin_orthogonal(&negative_identity_coin(2), None).is_ok());
    }
}
