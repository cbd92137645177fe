//! Point balance queries.
//!
//! The cached relation answers reads directly; the recomputed sum walks the
//! address's outputs and exists for auditing. The two must agree at every
//! quiescent state.

use crate::records::decode_output_key;
use crate::{StateResult, StoreView};

/// Read the cached balance for an address. Absence reads as 0.
pub fn cached_balance(view: &StoreView<'_>, address: &str) -> StateResult<i64> {
    view.cached_balance(address)
}

/// Recompute the balance by summing the address's unspent outputs.
pub fn computed_balance(view: &StoreView<'_>, address: &str) -> StateResult<i64> {
    let mut sum = 0i64;
    for key in view.address_outputs(address)? {
        let (tx_id, index) = decode_output_key(&key)?;
        if let Some(output) = view.get_output(&tx_id, index)? {
            if !output.spent {
                sum += output.value as i64;
            }
        }
    }
    Ok(sum)
}
