use std::env;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://restaurant.db?mode=rwc";
/// Upper bound for `ORDER_READY_DELAY_SECS`: one day.
pub const MAX_READY_DELAY_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    /// Seconds between order creation and the automatic move to `ready`.
    pub order_ready_delay_secs: u64,
    /// How often the ready worker checks for due orders.
    pub ready_tick_millis: u64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| anyhow::anyhow!("JWT_SECRET is not set"))?;
        let order_ready_delay_secs = env::var("ORDER_READY_DELAY_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(60)
            .min(MAX_READY_DELAY_SECS);
        let ready_tick_millis = env::var("READY_TICK_MILLIS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(1000);
        Ok(Self {
            port,
            database_url,
            host,
            jwt_secret,
            order_ready_delay_secs,
            ready_tick_millis,
        })
    }

    pub fn order_ready_delay(&self) -> chrono::Duration {
        let secs = self.order_ready_delay_secs.min(MAX_READY_DELAY_SECS) as i64;
        chrono::Duration::try_seconds(secs).unwrap_or(chrono::Duration::zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(order_ready_delay_secs: u64) -> AppConfig {
        AppConfig {
            database_url: DEFAULT_DATABASE_URL.into(),
            host: "127.0.0.1".into(),
            port: 3000,
            jwt_secret: "secret".into(),
            order_ready_delay_secs,
            ready_tick_millis: 1000,
        }
    }

    #[test]
    fn ready_delay_is_capped() {
        assert_eq!(config(60).order_ready_delay(), chrono::Duration::seconds(60));
        assert_eq!(
            config(u64::MAX).order_ready_delay(),
            chrono::Duration::seconds(MAX_READY_DELAY_SECS as i64)
        );
    }
}
