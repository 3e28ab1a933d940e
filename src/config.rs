use serde::Deserialize;
use time::{Date, OffsetDateTime, UtcOffset};

/// Verification settings for access tokens issued by the accounts service.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
    /// Offset used to decide which calendar day "today" is.
    pub utc_offset_hours: i8,
    /// Length of the default report window, ending today.
    pub report_default_days: i64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "librahealth".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "librahealth-users".into()),
        };
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = std::env::var("APP_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(8080);
        let utc_offset_hours = std::env::var("APP_UTC_OFFSET_HOURS")
            .ok()
            .and_then(|v| v.parse::<i8>().ok())
            .filter(|h| (-23..=23).contains(h))
            .unwrap_or(7);
        let report_default_days = std::env::var("REPORT_DEFAULT_DAYS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|d| *d > 0)
            .unwrap_or(14);
        Ok(Self {
            database_url,
            host,
            port,
            jwt,
            utc_offset_hours,
            report_default_days,
        })
    }

    /// Current calendar date in the configured offset.
    pub fn today(&self) -> Date {
        let offset = UtcOffset::from_hms(self.utc_offset_hours, 0, 0).unwrap_or(UtcOffset::UTC);
        OffsetDateTime::now_utc().to_offset(offset).date()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(offset: i8) -> AppConfig {
        AppConfig {
            database_url: "postgres://localhost/test".into(),
            host: "127.0.0.1".into(),
            port: 8080,
            jwt: JwtConfig {
                secret: "s".into(),
                issuer: "i".into(),
                audience: "a".into(),
            },
            utc_offset_hours: offset,
            report_default_days: 14,
        }
    }

    #[test]
    fn today_is_within_one_day_of_utc() {
        let utc = OffsetDateTime::now_utc().date();
        for offset in [-12, 0, 7, 14] {
            let today = config(offset).today();
            let diff = (today - utc).whole_days().abs();
            assert!(diff <= 1, "offset {offset} gave {today}");
        }
    }
}
