use chrono::{DateTime, Utc};

use crate::errors::CoreError;
use crate::models::journal::{Answer, Direction, JournalEntry, JournalField, JournalInput, Outcome};

/// Validated required fields of a journal submission.
struct Required {
    symbol: String,
    risk: String,
    risk_reward: String,
    session: String,
    direction: Direction,
    timeframe: String,
    outcome: Outcome,
    quality: u8,
    emotion: String,
    would_retake: Answer,
    followed_plan: Answer,
}

/// Journal record rules: validation, id assignment, create/replace/delete.
pub struct JournalService;

impl JournalService {
    pub fn new() -> Self {
        Self
    }

    /// Check every required field, reporting the first one missing.
    pub fn validate(&self, input: &JournalInput) -> Result<(), CoreError> {
        Self::required(input).map(|_| ())
    }

    /// Create a record (prepended, fresh id) or replace `editing_id` in place.
    ///
    /// When editing, the id and creation time are kept, and so is the stored
    /// image unless `input` carries a new one. Returns the id of the saved record.
    pub fn upsert(
        &self,
        journals: &mut Vec<JournalEntry>,
        input: JournalInput,
        editing_id: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<i64, CoreError> {
        let required = Self::required(&input)?;

        match editing_id {
            Some(id) => {
                let index = journals
                    .iter()
                    .position(|j| j.id == id)
                    .ok_or(CoreError::JournalNotFound(id))?;
                let previous = &mut journals[index];
                let previous_image = previous.trade_image.take();
                let mut entry = Self::build(id, required, input, previous.created_at);
                if entry.trade_image.is_none() {
                    entry.trade_image = previous_image;
                }
                journals[index] = entry;
                Ok(id)
            }
            None => {
                let id = self.next_id(journals, now);
                journals.insert(0, Self::build(id, required, input, now));
                Ok(id)
            }
        }
    }

    /// Remove every record whose id is in `ids`. Returns how many were removed.
    pub fn delete(&self, journals: &mut Vec<JournalEntry>, ids: &[i64]) -> usize {
        let before = journals.len();
        journals.retain(|j| !ids.contains(&j.id));
        before - journals.len()
    }

    /// Millisecond timestamp of `now`, bumped past the largest id in use so
    /// ids stay unique and increasing even within one millisecond.
    pub fn next_id(&self, journals: &[JournalEntry], now: DateTime<Utc>) -> i64 {
        let stamp = now.timestamp_millis();
        match journals.iter().map(|j| j.id).max() {
            Some(max) if max >= stamp => max + 1,
            _ => stamp,
        }
    }

    fn required(input: &JournalInput) -> Result<Required, CoreError> {
        fn text(value: &Option<String>, field: JournalField) -> Result<String, CoreError> {
            match value.as_deref().map(str::trim) {
                Some(v) if !v.is_empty() => Ok(v.to_string()),
                _ => Err(CoreError::Validation { field }),
            }
        }
        fn present<T: Copy>(value: Option<T>, field: JournalField) -> Result<T, CoreError> {
            value.ok_or(CoreError::Validation { field })
        }

        Ok(Required {
            symbol: text(&input.symbol, JournalField::Symbol)?,
            risk: text(&input.risk, JournalField::Risk)?,
            risk_reward: text(&input.risk_reward, JournalField::RiskReward)?,
            session: text(&input.session, JournalField::Session)?,
            direction: present(input.direction, JournalField::Direction)?,
            timeframe: text(&input.timeframe, JournalField::Timeframe)?,
            outcome: present(input.outcome, JournalField::Outcome)?,
            quality: present(input.quality.filter(|q| (1..=5).contains(q)), JournalField::Quality)?,
            emotion: text(&input.emotion, JournalField::Emotion)?,
            would_retake: present(input.would_retake, JournalField::WouldRetake)?,
            followed_plan: present(input.followed_plan, JournalField::FollowedPlan)?,
        })
    }

    fn build(id: i64, required: Required, input: JournalInput, now: DateTime<Utc>) -> JournalEntry {
        JournalEntry {
            id,
            symbol: required.symbol,
            direction: required.direction,
            outcome: required.outcome,
            risk: required.risk,
            risk_reward: required.risk_reward,
            timeframe: required.timeframe,
            session: required.session,
            stop_type: input.stop_type.unwrap_or_default(),
            quality: required.quality,
            emotion: required.emotion,
            would_retake: required.would_retake,
            followed_plan: required.followed_plan,
            mistake: input.mistake.unwrap_or_default(),
            comment: input.comment.unwrap_or_default(),
            chart_link: input.chart_link.unwrap_or_default(),
            trade_image: input.trade_image.filter(|img| !img.is_empty()),
            trade_date: input.trade_date.unwrap_or_default(),
            trade_time: input.trade_time.unwrap_or_default(),
            created_at: now,
        }
    }
}

impl Default for JournalService {
    fn default() -> Self {
        Self::new()
    }
}
