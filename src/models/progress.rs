use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

use super::level::Level;

/// One completed run through a vocabulary list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PracticeSession {
    pub id: Uuid,
    pub list_id: Uuid,
    pub user_id: Uuid,
    pub correct: u32,
    pub incorrect: u32,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct PracticeRequest {
    pub correct: u32,
    pub incorrect: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressColor {
    Primary,
    Sky,
    Green,
}

/// `GET /api/dashboard` response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_words_learned: u32,
    pub active_lists: u32,
    pub mastery_rate: u32,
}

/// Entry of the public learner board.
#[derive(Debug, Clone, Serialize)]
pub struct LearnerProgress {
    pub user_id: Uuid,
    pub username: String,
    pub level: Level,
    pub progress: u32,
    pub color: ProgressColor,
}

/// Per-list aggregate the stores hand back for progress maths.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ListStats {
    pub total_words: u32,
    pub best_correct: u32,
}

/// Sums of all practice sessions of one user.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnswerTotals {
    pub correct: u64,
    pub answered: u64,
}

impl PracticeSession {
    pub fn new(list_id: Uuid, user_id: Uuid, correct: u32, incorrect: u32) -> Self {
        PracticeSession {
            id: Uuid::new_v4(),
            list_id,
            user_id,
            correct,
            incorrect,
            completed_at: Utc::now(),
        }
    }
}

impl PracticeRequest {
    /// A session answers each word of the list at most once.
    pub fn validate(&self, total_words: usize) -> Result<(), String> {
        let answered = u64::from(self.correct) + u64::from(self.incorrect);

        if answered == 0 {
            return Err("A practice session must answer at least one word".to_string());
        }

        if answered > total_words as u64 {
            return Err(format!(
                "A practice session cannot answer more than the {} words in the list",
                total_words
            ));
        }

        Ok(())
    }
}

impl ProgressColor {
    pub fn for_progress(progress: u32) -> Self {
        if progress >= 80 {
            ProgressColor::Primary
        } else if progress >= 60 {
            ProgressColor::Sky
        } else {
            ProgressColor::Green
        }
    }
}

impl ListStats {
    /// Best session score as a whole percentage of the list.
    pub fn progress(&self) -> u32 {
        percentage(u64::from(self.best_correct), u64::from(self.total_words))
    }
}

impl AnswerTotals {
    pub fn mastery_rate(&self) -> u32 {
        percentage(self.correct, self.answered)
    }
}

impl DashboardSummary {
    pub fn compute(lists: &[ListStats], totals: AnswerTotals) -> Self {
        DashboardSummary {
            total_words_learned: lists.iter().map(|l| l.best_correct).sum(),
            active_lists: lists.len() as u32,
            mastery_rate: totals.mastery_rate(),
        }
    }
}

impl LearnerProgress {
    pub fn new(user_id: Uuid, username: String, level: Level, totals: AnswerTotals) -> Self {
        let progress = totals.mastery_rate();

        LearnerProgress {
            user_id,
            username,
            level,
            progress,
            color: ProgressColor::for_progress(progress),
        }
    }
}

fn percentage(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        return 0;
    }

    let rounded = (part * 100 + whole / 2) / whole;
    rounded.min(100) as u32
}
