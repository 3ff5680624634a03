//! Eligibility gate — combined local + ledger voting eligibility.

use std::sync::Arc;

use evote_chain::ChainRpc;
use evote_store::{StoreError, VoterStore};
use evote_types::WalletAddress;

use crate::EngineError;

/// Why a wallet is or is not eligible. Callers get the full picture, not a
/// collapsed boolean, so "never registered" and "deactivated" stay
/// distinguishable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EligibilityVerdict {
    Eligible,
    NotRegistered,
    DeactivatedLocally,
    IneligibleOnChain,
}

/// Structured eligibility outcome for one wallet.
#[derive(Debug)]
pub struct EligibilityReport {
    pub wallet: WalletAddress,
    pub verdict: EligibilityVerdict,
    pub registered_locally: bool,
    pub active_locally: bool,
    pub eligible_on_chain: bool,
}

impl EligibilityReport {
    /// Eligible for voting: locally active AND ledger-eligible.
    pub fn is_eligible(&self) -> bool {
        self.verdict == EligibilityVerdict::Eligible
    }
}

pub struct EligibilityGate<S, C> {
    store: Arc<S>,
    chain: Arc<C>,
}

impl<S, C> EligibilityGate<S, C>
where
    S: VoterStore,
    C: ChainRpc,
{
    pub fn new(store: Arc<S>, chain: Arc<C>) -> Self {
        Self { store, chain }
    }

    /// Check a wallet's eligibility. Ledger unavailability propagates as an
    /// error — eligibility cannot be vouched without the ledger.
    pub async fn check(&self, wallet: &WalletAddress) -> Result<EligibilityReport, EngineError> {
        let local = match self.store.get_voter(wallet) {
            Ok(voter) => Some(voter),
            Err(StoreError::NotFound(_)) => None,
            Err(other) => return Err(other.into()),
        };

        let eligible_on_chain = self.chain.is_voter_eligible(wallet).await?;

        let registered_locally = local.is_some();
        let active_locally = local.as_ref().map(|v| v.is_active).unwrap_or(false);

        let verdict = if !registered_locally {
            EligibilityVerdict::NotRegistered
        } else if !active_locally {
            EligibilityVerdict::DeactivatedLocally
        } else if !eligible_on_chain {
            EligibilityVerdict::IneligibleOnChain
        } else {
            EligibilityVerdict::Eligible
        };

        Ok(EligibilityReport {
            wallet: wallet.clone(),
            verdict,
            registered_locally,
            active_locally,
            eligible_on_chain,
        })
    }
}
