use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub pricing: PricingConfig,
}

/// Knobs the pricing engines need. Passed in explicitly through `AppState`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingConfig {
    /// Country whose cities are priced domestically; any other country is international.
    pub home_country: String,
    /// Other spellings of `home_country` accepted in addresses ("CI", "Ivory Coast").
    pub home_country_aliases: Vec<String>,
    /// Fee of the `other_domestic` zone when it has to be created on the fly.
    pub default_zone_fee: i64,
    pub default_zone_days: i32,
}

const IVORIAN_ALIASES: &[&str] = &[
    "Cote d'Ivoire",
    "Côte d’Ivoire",
    "Cote d’Ivoire",
    "Ivory Coast",
    "CI",
    "CIV",
];

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            home_country: "Côte d'Ivoire".to_string(),
            home_country_aliases: IVORIAN_ALIASES.iter().map(|a| a.to_string()).collect(),
            default_zone_fee: 3000,
            default_zone_days: 3,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET is not set"))?;
        Ok(Self {
            port,
            database_url,
            host,
            jwt_secret,
            pricing: PricingConfig::from_env()?,
        })
    }
}

impl PricingConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        let home_country = env::var("PRICING_HOME_COUNTRY").ok();
        // Default aliases only describe the default home country.
        let home_country_aliases = match env::var("PRICING_HOME_COUNTRY_ALIASES") {
            Ok(raw) => parse_aliases(&raw),
            Err(_) if home_country.is_some() => Vec::new(),
            Err(_) => defaults.home_country_aliases,
        };
        let home_country = home_country.unwrap_or(defaults.home_country);
        let default_zone_fee = match env::var("PRICING_DEFAULT_ZONE_FEE") {
            Ok(raw) => raw.parse::<i64>()?,
            Err(_) => defaults.default_zone_fee,
        };
        let default_zone_days = match env::var("PRICING_DEFAULT_ZONE_DAYS") {
            Ok(raw) => raw.parse::<i32>()?,
            Err(_) => defaults.default_zone_days,
        };
        if default_zone_fee < 0 {
            anyhow::bail!("PRICING_DEFAULT_ZONE_FEE must not be negative");
        }
        if default_zone_days < 1 {
            anyhow::bail!("PRICING_DEFAULT_ZONE_DAYS must be at least 1");
        }
        Ok(Self {
            home_country,
            home_country_aliases,
            default_zone_fee,
            default_zone_days,
        })
    }
}

fn parse_aliases(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|alias| !alias.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_are_comma_separated_and_trimmed() {
        assert_eq!(parse_aliases(" SN, Senegal ,,"), vec!["SN", "Senegal"]);
        assert!(parse_aliases("").is_empty());
    }
}
