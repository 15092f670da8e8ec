use kindaebay_accounts::SessionClaims;
use kindaebay_core::AccountId;

/// Authenticated caller for a request, derived from a validated session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    claims: SessionClaims,
}

impl SessionContext {
    pub fn new(claims: SessionClaims) -> Self {
        Self { claims }
    }

    pub fn account_id(&self) -> AccountId {
        self.claims.sub
    }

    pub fn username(&self) -> &str {
        &self.claims.username
    }

    pub fn claims(&self) -> &SessionClaims {
        &self.claims
    }
}
