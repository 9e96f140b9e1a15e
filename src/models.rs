use serde::{Deserialize, Deserializer};

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub token: TokenPair,
}

#[derive(Debug, Deserialize)]
pub struct TokenPair {
    pub refresh: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub username: String,
}

/// Balance, play passes and farming status as returned by the balance endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSnapshot {
    #[serde(default, deserialize_with = "decimal")]
    pub available_balance: f64,
    #[serde(default)]
    pub play_passes: u32,
    #[serde(default)]
    pub farming: Option<FarmingStatus>,
}

/// Present only while a farming cycle runs.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmingStatus {
    pub end_time: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendBalance {
    #[serde(default, deserialize_with = "decimal")]
    pub amount_for_claim: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    pub game_id: String,
}

// Amounts come back as JSON numbers, numeric strings or null (read as zero).
fn decimal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(0.0),
        Some(Raw::Number(n)) => Ok(n),
        Some(Raw::Text(s)) => s.trim().parse::<f64>().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn balance_accepts_string_amount_and_missing_farming() {
        let snapshot: BalanceSnapshot =
            serde_json::from_value(json!({"availableBalance": "100.25", "playPasses": 2})).unwrap();
        assert_eq!(snapshot.available_balance, 100.25);
        assert_eq!(snapshot.play_passes, 2);
        assert!(snapshot.farming.is_none());
    }

    #[test]
    fn balance_reads_farming_end_time() {
        let snapshot: BalanceSnapshot = serde_json::from_value(json!({
            "availableBalance": 7,
            "playPasses": 0,
            "farming": {"startTime": 1_700_000_000_000i64, "endTime": 1_700_028_800_000i64, "balance": "57.6"}
        }))
        .unwrap();
        assert_eq!(snapshot.farming.map(|f| f.end_time), Some(1_700_028_800_000));
    }

    #[test]
    fn null_farming_is_absent() {
        let snapshot: BalanceSnapshot =
            serde_json::from_value(json!({"availableBalance": "0", "playPasses": 1, "farming": null})).unwrap();
        assert!(snapshot.farming.is_none());
    }

    #[test]
    fn friend_balance_defaults_to_zero() {
        let friends: FriendBalance = serde_json::from_value(json!({"canClaim": false})).unwrap();
        assert_eq!(friends.amount_for_claim, 0.0);
    }

    #[test]
    fn null_friend_amount_reads_as_zero() {
        let friends: FriendBalance = serde_json::from_value(json!({"amountForClaim": null})).unwrap();
        assert_eq!(friends.amount_for_claim, 0.0);
    }

    #[test]
    fn balance_without_amount_keeps_passes_and_farming() {
        let snapshot: BalanceSnapshot =
            serde_json::from_value(json!({"playPasses": 3, "farming": {"endTime": 1_700_000_000_000i64}})).unwrap();
        assert_eq!(snapshot.available_balance, 0.0);
        assert_eq!(snapshot.play_passes, 3);
        assert!(snapshot.farming.is_some());

        let null_amount: BalanceSnapshot =
            serde_json::from_value(json!({"availableBalance": null, "playPasses": 1})).unwrap();
        assert_eq!(null_amount.available_balance, 0.0);
    }

    #[test]
    fn non_numeric_amount_is_an_error() {
        let parsed = serde_json::from_value::<BalanceSnapshot>(json!({"availableBalance": "lots"}));
        assert!(parsed.is_err());
    }
}
