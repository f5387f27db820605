//! `/practice/link/{code}`: guest practice links.

use learnhub_core::practice::{
    is_valid_practice_code, JoinPracticeRequest, PracticeJoinResponse, PracticeLinkInfo,
};

use crate::api::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    pub async fn practice_link(&self, code: &str) -> Result<PracticeLinkInfo, ApiError> {
        ensure_code(code)?;
        self.get(&format!("/practice/link/{code}")).await
    }

    pub async fn join_practice_link(
        &self,
        code: &str,
        request: &JoinPracticeRequest,
    ) -> Result<PracticeJoinResponse, ApiError> {
        ensure_code(code)?;
        self.post(&format!("/practice/link/{code}/join"), request)
            .await
    }
}

/// Malformed codes are answered locally as "not found" so they never
/// reach the URL.
fn ensure_code(code: &str) -> Result<(), ApiError> {
    if is_valid_practice_code(code) {
        Ok(())
    } else {
        Err(ApiError::Client {
            status: 404,
            code: None,
            message: format!("Malformed practice code '{code}'"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_code_maps_to_not_found() {
        let err = ensure_code("../../admin").unwrap_err();
        assert!(err.is_not_found());
    }
}
