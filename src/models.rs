use serde::{Deserialize, Serialize};

pub type Questions = Vec<Question>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    #[serde(alias = "area")]
    pub discipline: String,
    /// Statement as imported; may carry HTML markup.
    pub statement: String,
    pub alternatives: Vec<Alternative>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alternative {
    pub letter: String,
    pub text: String,
    #[serde(alias = "correct")]
    pub is_correct: bool,
}

impl Question {
    pub fn correct_alternative(&self) -> Option<&Alternative> {
        self.alternatives.iter().find(|a| a.is_correct)
    }

    /// At least two alternatives and exactly one of them correct.
    pub fn is_well_formed(&self) -> bool {
        self.alternatives.len() >= 2
            && self.alternatives.iter().filter(|a| a.is_correct).count() == 1
    }
}
