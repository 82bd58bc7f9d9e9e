use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Buy,
    Sell,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Buy => write!(f, "buy"),
            Direction::Sell => write!(f, "sell"),
        }
    }
}

/// How the trade ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Take-profit hit (a win)
    #[serde(rename = "TP")]
    TakeProfit,
    /// Stop-loss hit (a loss)
    #[serde(rename = "SL")]
    StopLoss,
    /// Closed at entry
    #[serde(rename = "BE")]
    BreakEven,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::TakeProfit => write!(f, "TP"),
            Outcome::StopLoss => write!(f, "SL"),
            Outcome::BreakEven => write!(f, "BE"),
        }
    }
}

/// Answer to a yes/no self-assessment question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Answer {
    Yes,
    No,
}

impl std::fmt::Display for Answer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Answer::Yes => write!(f, "yes"),
            Answer::No => write!(f, "no"),
        }
    }
}

/// Required journal fields, in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JournalField {
    Symbol,
    Risk,
    RiskReward,
    Session,
    Direction,
    Timeframe,
    Outcome,
    Quality,
    Emotion,
    WouldRetake,
    FollowedPlan,
}

impl std::fmt::Display for JournalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            JournalField::Symbol => "symbol",
            JournalField::Risk => "risk",
            JournalField::RiskReward => "risk:reward",
            JournalField::Session => "trading session",
            JournalField::Direction => "trade direction",
            JournalField::Timeframe => "timeframe",
            JournalField::Outcome => "outcome",
            JournalField::Quality => "execution quality",
            JournalField::Emotion => "dominant emotion",
            JournalField::WouldRetake => "would retake",
            JournalField::FollowedPlan => "followed plan",
        };
        f.write_str(label)
    }
}

/// A single logged trade.
///
/// Field names serialize in camelCase; `tradeType` and `result` are accepted
/// on input so exports from older versions of the journal still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    /// Millisecond timestamp assigned at creation, stable across edits
    pub id: i64,

    pub symbol: String,

    #[serde(alias = "tradeType")]
    pub direction: Direction,

    #[serde(alias = "result")]
    pub outcome: Outcome,

    /// Risk percentage as entered (e.g. "1", "0.5")
    pub risk: String,

    /// Risk:reward ratio as entered (e.g. "1:2")
    pub risk_reward: String,

    pub timeframe: String,

    pub session: String,

    #[serde(default)]
    pub stop_type: String,

    /// Execution quality, 1 to 5
    #[serde(deserialize_with = "quality_from_any")]
    pub quality: u8,

    pub emotion: String,

    pub would_retake: Answer,

    pub followed_plan: Answer,

    /// Most important mistake (or lesson, for winners)
    #[serde(default)]
    pub mistake: String,

    #[serde(default)]
    pub comment: String,

    #[serde(default)]
    pub chart_link: String,

    /// Screenshot as a data URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade_image: Option<String>,

    /// Display date as entered; not guaranteed to sort chronologically
    #[serde(default)]
    pub trade_date: String,

    #[serde(default)]
    pub trade_time: String,

    pub created_at: DateTime<Utc>,
}

/// Raw journal form submission. Every field may be missing; validation
/// decides whether the record is accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JournalInput {
    pub symbol: Option<String>,
    pub risk: Option<String>,
    pub risk_reward: Option<String>,
    pub session: Option<String>,
    pub direction: Option<Direction>,
    pub timeframe: Option<String>,
    pub outcome: Option<Outcome>,
    #[serde(deserialize_with = "optional_quality_from_any")]
    pub quality: Option<u8>,
    pub emotion: Option<String>,
    pub would_retake: Option<Answer>,
    pub followed_plan: Option<Answer>,
    pub stop_type: Option<String>,
    pub mistake: Option<String>,
    pub comment: Option<String>,
    pub chart_link: Option<String>,
    pub trade_image: Option<String>,
    pub trade_date: Option<String>,
    pub trade_time: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════
// Quality parsing
// ═══════════════════════════════════════════════════════════════════

/// Quality as stored by older journals (a string such as `"4"`) or as a number.
#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Number(u64),
    Text(String),
}

impl StringOrNumber {
    fn into_rating<E: de::Error>(self) -> Result<Option<u64>, E> {
        match self {
            StringOrNumber::Number(n) => Ok(Some(n)),
            StringOrNumber::Text(text) if text.trim().is_empty() => Ok(None),
            StringOrNumber::Text(text) => text
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| E::custom(format!("invalid quality '{text}'"))),
        }
    }
}

fn quality_from_any<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let rating = StringOrNumber::deserialize(deserializer)?
        .into_rating()?
        .ok_or_else(|| de::Error::custom("quality is empty"))?;
    match u8::try_from(rating) {
        Ok(q) if (1..=5).contains(&q) => Ok(q),
        _ => Err(de::Error::custom(format!("quality {rating} is outside 1 to 5"))),
    }
}

/// Form input keeps out-of-range values; validation rejects them later.
fn optional_quality_from_any<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u8>, D::Error> {
    let Some(value) = Option::<StringOrNumber>::deserialize(deserializer)? else {
        return Ok(None);
    };
    Ok(value
        .into_rating()?
        .map(|rating| u8::try_from(rating).unwrap_or(u8::MAX)))
}
