use keyward_application::{AccessRepository, AuthService, TokenClaimsGate};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub access_repository: AccessRepository,
    pub token_claims_gate: TokenClaimsGate,
    pub auth_service: AuthService,
}
