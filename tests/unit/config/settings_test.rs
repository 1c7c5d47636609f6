// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置设置测试模块
///
/// 测试默认配置以及由配置派生出的运行参数

#[cfg(test)]
mod tests {
    use config::{Environment, File, FileFormat};
    use listrs::config::settings::Settings;
    use std::collections::HashMap;
    use std::time::Duration;

    #[test]
    fn test_defaults_match_listing_tracker() {
        let settings = Settings::from_defaults().expect("Failed to load defaults");

        assert_eq!(settings.ledger.worksheet, "Zameen_Listings_Tracker");
        assert_eq!(settings.ledger.api_base, "https://sheets.googleapis.com");
        assert!(settings.browser.remote_debugging_url.is_none());
        assert!(!settings.browser.headless);
        assert_eq!(settings.extraction.currency_marker, "PKR");
        assert_eq!(settings.extraction.unit_keyword, "Marla");
        assert_eq!(
            settings.extraction.magnitude_words,
            vec!["Lakh", "Crore", "Million", "Thousand"]
        );
        assert_eq!(
            settings.extraction.noise_labels,
            vec!["months ago", "%", "Scheme"]
        );
    }

    #[test]
    fn test_derived_timings() {
        let settings = Settings::from_defaults().expect("Failed to load defaults");

        let timings = settings.resolver_timings();
        assert_eq!(timings.ready_timeout, Duration::from_secs(40));
        assert_eq!(timings.settle_initial, Duration::from_secs(5));
        assert_eq!(timings.settle_after_bottom, Duration::from_secs(3));
        assert_eq!(timings.settle_after_top, Duration::from_secs(2));

        let probe = settings.contact_probe();
        assert_eq!(probe.reveal_timeout, Duration::from_secs(10));
        assert_eq!(probe.phone_timeout, Duration::from_secs(10));
        assert_eq!(probe.reveal_pause, Duration::from_secs(2));

        assert_eq!(settings.pipeline_options().pacing, Duration::from_secs(8));
        assert_eq!(settings.poll_interval(), Duration::from_millis(250));

        let schema = settings.extraction_schema();
        assert_eq!(schema.field_map.canonical("Bath(s)"), Some("Bathrooms"));
        assert_eq!(schema.currency_marker, "PKR");
    }

    #[test]
    fn test_validate_requires_ledger_credentials() {
        let mut settings = Settings::from_defaults().expect("Failed to load defaults");
        settings.ledger.spreadsheet_id = String::new();
        settings.ledger.access_token = "token".to_string();
        assert!(settings.validate().is_err());

        settings.ledger.spreadsheet_id = "sheet-id".to_string();
        settings.ledger.access_token = "  ".to_string();
        assert!(settings.validate().is_err());

        settings.ledger.access_token = "token".to_string();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_layers_override_defaults() {
        let env: HashMap<String, String> = [
            ("LISTRS__LEDGER__SPREADSHEET_ID", "sheet-id"),
            ("LISTRS__TIMING__PACING_SECS", "3"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let settings: Settings = Settings::defaults()
            .unwrap()
            .add_source(File::from_str(
                "[ledger]\nworksheet = \"Lahore\"\n[timing]\npacing_secs = 5\n",
                FileFormat::Toml,
            ))
            .add_source(
                Environment::with_prefix("LISTRS")
                    .separator("__")
                    .source(Some(env)),
            )
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.ledger.worksheet, "Lahore");
        assert_eq!(settings.ledger.spreadsheet_id, "sheet-id");
        assert_eq!(settings.timing.pacing_secs, 3);
        assert_eq!(settings.timing.ready_timeout_secs, 40);
    }
}
