//! `HP_INVESTIGATE` request payload.

use hpx_id::RuId;
use serde::{Deserialize, Serialize};

/// RUs the upstream predictor proposes for sleep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestigateRequest {
    #[serde(rename = "RUPredictionSet")]
    pub ru_prediction_set: Vec<RuId>,
}

impl InvestigateRequest {
    pub fn new(ru_prediction_set: Vec<RuId>) -> Self {
        Self { ru_prediction_set }
    }

    pub fn from_payload(payload: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(payload)
    }
}

#[cfg(test)]
mod tests {
    use hpx_testing::ids::rus;

    use super::*;

    #[test]
    fn test_parse_request() {
        let request =
            InvestigateRequest::from_payload(br#"{"RUPredictionSet":["RU_1","RU_2"]}"#).unwrap();
        assert_eq!(request.ru_prediction_set, rus(&["RU_1", "RU_2"]));
    }

    #[test]
    fn test_parse_rejects_bad_payloads() {
        assert!(InvestigateRequest::from_payload(b"not json").is_err());
        assert!(InvestigateRequest::from_payload(br#"{"RUs":["RU_1"]}"#).is_err());
        assert!(InvestigateRequest::from_payload(br#"{"RUPredictionSet":["bad id"]}"#).is_err());
    }

    #[test]
    fn test_serialize_request() {
        let request = InvestigateRequest::new(rus(&["RU_1"]));
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"RUPredictionSet":["RU_1"]}"#
        );
    }
}
