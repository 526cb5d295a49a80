use crate::wire::HealthRes;

/// Health service backing `GET /health`.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    pub fn new() -> Self {
        Self
    }

    /// Check health without creating an instance.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "PromptDesk is alive".into(),
        }
    }
}
