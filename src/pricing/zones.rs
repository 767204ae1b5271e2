use std::{collections::HashMap, sync::LazyLock};

use chrono::{Days, NaiveDate};

use crate::config::PricingConfig;

pub use crate::entity::delivery_zones::ZoneType;

/// Known city names, already normalized, with the zone each is priced in.
const CITY_ZONES: &[(&str, ZoneType)] = &[
    // Abidjan and its communes
    ("abidjan", ZoneType::Abidjan),
    ("abobo", ZoneType::Abidjan),
    ("adjamé", ZoneType::Abidjan),
    ("adjame", ZoneType::Abidjan),
    ("anyama", ZoneType::Abidjan),
    ("attécoubé", ZoneType::Abidjan),
    ("attecoube", ZoneType::Abidjan),
    ("bingerville", ZoneType::Abidjan),
    ("cocody", ZoneType::Abidjan),
    ("koumassi", ZoneType::Abidjan),
    ("marcory", ZoneType::Abidjan),
    ("plateau", ZoneType::Abidjan),
    ("port-bouët", ZoneType::Abidjan),
    ("port-bouet", ZoneType::Abidjan),
    ("songon", ZoneType::Abidjan),
    ("treichville", ZoneType::Abidjan),
    ("yopougon", ZoneType::Abidjan),
    // Grand-Bassam
    ("grand-bassam", ZoneType::GrandBassam),
    ("grand bassam", ZoneType::GrandBassam),
    ("bassam", ZoneType::GrandBassam),
    // Rest of the country
    ("yamoussoukro", ZoneType::OtherDomestic),
    ("bouaké", ZoneType::OtherDomestic),
    ("bouake", ZoneType::OtherDomestic),
    ("daloa", ZoneType::OtherDomestic),
    ("san-pédro", ZoneType::OtherDomestic),
    ("san-pedro", ZoneType::OtherDomestic),
    ("korhogo", ZoneType::OtherDomestic),
    ("man", ZoneType::OtherDomestic),
    ("gagnoa", ZoneType::OtherDomestic),
    ("divo", ZoneType::OtherDomestic),
    ("abengourou", ZoneType::OtherDomestic),
    ("soubré", ZoneType::OtherDomestic),
    ("agboville", ZoneType::OtherDomestic),
    ("dabou", ZoneType::OtherDomestic),
    ("assinie", ZoneType::OtherDomestic),
    // Frequent foreign destinations
    ("dakar", ZoneType::International),
    ("accra", ZoneType::International),
    ("lagos", ZoneType::International),
    ("bamako", ZoneType::International),
    ("ouagadougou", ZoneType::International),
    ("lomé", ZoneType::International),
    ("lome", ZoneType::International),
    ("cotonou", ZoneType::International),
    ("conakry", ZoneType::International),
    ("paris", ZoneType::International),
];

static CITY_TABLE: LazyLock<HashMap<&'static str, ZoneType>> =
    LazyLock::new(|| CITY_ZONES.iter().copied().collect());

/// Lower-cases and trims. Accents are kept.
pub fn normalize_city(city: &str) -> String {
    city.trim().to_lowercase()
}

/// Zone type listed for `city`, if the city is known at all.
pub fn lookup_city(city: &str) -> Option<ZoneType> {
    CITY_TABLE.get(normalize_city(city).as_str()).copied()
}

/// Zone type a delivery to `city` in `country` is priced in.
///
/// A blank country is taken to be the home country. A foreign country is always
/// international; otherwise unknown cities fall into `other_domestic`.
pub fn zone_type_for(city: &str, country: &str, config: &PricingConfig) -> ZoneType {
    if !is_home_country(country, config) {
        return ZoneType::International;
    }
    lookup_city(city).unwrap_or(ZoneType::OtherDomestic)
}

/// Matches the configured home country or one of its aliases, ignoring case.
pub fn is_home_country(country: &str, config: &PricingConfig) -> bool {
    let country = normalize_city(country);
    if country.is_empty() || country == normalize_city(&config.home_country) {
        return true;
    }
    config
        .home_country_aliases
        .iter()
        .any(|alias| normalize_city(alias) == country)
}

/// Calendar-day estimate; weekends and holidays are not skipped.
pub fn estimated_delivery_date(today: NaiveDate, estimated_days: i32) -> NaiveDate {
    let days = u64::try_from(estimated_days.max(0)).unwrap_or_default();
    today.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}

/// Human name and fee a zone is seeded with.
pub fn seed_defaults(zone_type: ZoneType) -> (&'static str, i64, i32) {
    match zone_type {
        ZoneType::Abidjan => ("Abidjan", 1500, 1),
        ZoneType::GrandBassam => ("Grand-Bassam", 2000, 2),
        ZoneType::OtherDomestic => ("Autres villes", 3000, 3),
        ZoneType::International => ("International", 15000, 7),
    }
}
