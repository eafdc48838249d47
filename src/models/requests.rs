use serde::{Deserialize, Serialize};
use validator::Validate;

/// Query parameters for the recommendations endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RecommendationsQuery {
    #[validate(range(min = 1, max = 20))]
    #[serde(default)]
    pub limit: Option<u16>,
    #[serde(default)]
    pub refresh: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_validation() {
        let ok = RecommendationsQuery { limit: Some(5), refresh: false };
        assert!(ok.validate().is_ok());

        let unset = RecommendationsQuery::default();
        assert!(unset.validate().is_ok());

        let too_many = RecommendationsQuery { limit: Some(50), refresh: false };
        assert!(too_many.validate().is_err());

        let zero = RecommendationsQuery { limit: Some(0), refresh: false };
        assert!(zero.validate().is_err());
    }
}
