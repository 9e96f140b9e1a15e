use url::Url;

pub const WEB_ORIGIN: &str = "https://telegram.blum.codes";
pub const WEB_REFERER: &str = "https://telegram.blum.codes/";

pub const AUTH_URL: &str = "https://gateway.blum.codes/v1/auth/provider/PROVIDER_TELEGRAM_MINI_APP";
pub const USER_ME_URL: &str = "https://gateway.blum.codes/v1/user/me";
pub const FRIENDS_BALANCE_URL: &str = "https://gateway.blum.codes/v1/friends/balance";
pub const FRIENDS_CLAIM_URL: &str = "https://gateway.blum.codes/v1/friends/claim";

pub const BALANCE_URL: &str = "https://game-domain.blum.codes/api/v1/user/balance";
pub const FARMING_START_URL: &str = "https://game-domain.blum.codes/api/v1/farming/start";
pub const FARMING_CLAIM_URL: &str = "https://game-domain.blum.codes/api/v1/farming/claim";
pub const GAME_PLAY_URL: &str = "https://game-domain.blum.codes/api/v1/game/play";
pub const GAME_CLAIM_URL: &str = "https://game-domain.blum.codes/api/v1/game/claim";
pub const DAILY_REWARD_URL: &str = "https://game-domain.blum.codes/api/v1/daily-reward";

/// Timezone offset in minutes the daily check-in is submitted with.
pub const DAILY_REWARD_OFFSET: &str = "-420";

/// Game identifier sent when opening a session.
pub const GAME_NAME: &str = "example_game";

pub const IP_CHECK_URL: &str = "https://api.ipify.org?format=json";

pub fn daily_reward_url() -> Result<Url, url::ParseError> {
    Url::parse_with_params(DAILY_REWARD_URL, &[("offset", DAILY_REWARD_OFFSET)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_reward_url_carries_offset() {
        let url = daily_reward_url().unwrap();
        assert_eq!(url.as_str(), "https://game-domain.blum.codes/api/v1/daily-reward?offset=-420");
    }
}
