use axum::http::StatusCode;
use serde_json::Value;

// ============================================================================
// Response Assertions
// ============================================================================

pub struct BattleAssertion {
    body: Value,
}

impl BattleAssertion {
    pub fn for_response((status, body): (StatusCode, Value)) -> Self {
        assert_eq!(status, StatusCode::OK, "battle failed: {body}");
        Self { body }
    }

    pub fn won_by(self, login: &str) -> Self {
        assert_eq!(self.body["winner"], login);
        self
    }

    pub fn tied(self) -> Self {
        assert!(self.body["winner"].is_null());
        assert_eq!(self.body["result"]["victory"], "draw");
        self
    }

    pub fn with_score(self, player1: u64, player2: u64) -> Self {
        assert_eq!(self.body["result"]["player1_score"], player1);
        assert_eq!(self.body["result"]["player2_score"], player2);
        self
    }

    pub fn with_rounds(self, count: usize) -> Self {
        assert_eq!(self.body["rounds"].as_array().unwrap().len(), count);
        self
    }

    pub fn perfect(self) -> Self {
        assert_eq!(self.body["result"]["perfect"], true);
        self
    }

    pub fn unlocked(self, achievement: &str) -> Self {
        let unlocked = self.body["ledger"]["new_achievements"]
            .as_array()
            .unwrap()
            .iter()
            .any(|id| id == achievement);
        assert!(unlocked, "{achievement} not unlocked in {}", self.body["ledger"]);
        self
    }

    pub fn body(self) -> Value {
        self.body
    }
}

pub fn assert_error(response: (StatusCode, Value), expected: StatusCode) -> String {
    let (status, body) = response;
    assert_eq!(status, expected, "unexpected body: {body}");
    body["error"].as_str().unwrap().to_string()
}
