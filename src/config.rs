use std::env;

const DEFAULT_LEADERBOARD_LIMIT: i64 = 10;
const MAX_LEADERBOARD_LIMIT: i64 = 100;

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres URL. `None` runs the service on the in-memory store.
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub cors_extra_origins: Vec<String>,

    pub jwt_secret: String,

    pub activity_api_url: Option<String>,

    pub leaderboard_limit: i64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()
                .expect("PORT must be a number"),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            cors_extra_origins: env::var("CORS_EXTRA_ORIGINS")
                .map(|extra| parse_origins(&extra))
                .unwrap_or_default(),

            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),

            activity_api_url: env::var("ACTIVITY_API_URL")
                .ok()
                .map(|s| s.trim_end_matches('/').to_string())
                .filter(|s| !s.is_empty()),

            leaderboard_limit: parse_leaderboard_limit(
                &env::var("LEADERBOARD_LIMIT").unwrap_or_default(),
            ),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Rows per leaderboard page, kept within 1..=100. Unparsable or
/// non-positive values fall back to 10.
fn parse_leaderboard_limit(raw: &str) -> i64 {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|n| *n > 0)
        .map(|n| n.min(MAX_LEADERBOARD_LIMIT))
        .unwrap_or(DEFAULT_LEADERBOARD_LIMIT)
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Self {
            database_url: None,
            host: "127.0.0.1".into(),
            port: 0,
            frontend_url: "http://localhost:3000".into(),
            cors_extra_origins: Vec::new(),
            jwt_secret: "test-secret".into(),
            activity_api_url: None,
            leaderboard_limit: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins_trims_and_skips_empty() {
        let origins = parse_origins(" http://a.local, ,http://b.local ");
        assert_eq!(origins, vec!["http://a.local", "http://b.local"]);
    }

    #[test]
    fn test_leaderboard_limit_rejects_non_positive() {
        assert_eq!(parse_leaderboard_limit(""), 10);
        assert_eq!(parse_leaderboard_limit("-1"), 10);
        assert_eq!(parse_leaderboard_limit("0"), 10);
        assert_eq!(parse_leaderboard_limit("abc"), 10);
        assert_eq!(parse_leaderboard_limit(" 25 "), 25);
        assert_eq!(parse_leaderboard_limit("5000"), 100);
    }

    #[test]
    fn test_listen_addr() {
        let mut config = Config::for_tests();
        config.port = 9000;
        assert_eq!(config.listen_addr(), "127.0.0.1:9000");
    }
}
