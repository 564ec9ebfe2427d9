use serde::{Deserialize, Serialize};
use tracing::info;

use super::{RpcContext, RpcError};

/// The payload of the `rewards` function, both ways.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rewards {
    /// The number of rewards.
    pub rewards: i64,
}

/// Doubles the rewards: `{"rewards":5}` gives `{"rewards":10}`.
///
/// # Errors
///
/// Fails with [`RpcError::InvalidPayload`] when the payload is not exactly a
/// `Rewards` object, or when doubling overflows.
pub fn rewards(context: &RpcContext, payload: &str) -> Result<String, RpcError> {
    let request = serde_json::from_str::<Rewards>(payload).map_err(RpcError::invalid_payload)?;

    let Some(doubled) = request.rewards.checked_mul(2) else {
        return Err(RpcError::InvalidPayload {
            message: format!("rewards {} is too large", request.rewards),
        });
    };
    info!(user_id = ?context.user_id, rewards = request.rewards, doubled, "rewards granted");

    serde_json::to_string(&Rewards { rewards: doubled }).map_err(|error| RpcError::Internal {
        message: error.to_string(),
    })
}
