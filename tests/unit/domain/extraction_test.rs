// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 提取测试模块
///
/// 在合成页面上组合扫描、规范化和专用提取器

#[cfg(test)]
mod tests {
    use listrs::domain::schema::{ExtractionSchema, FieldMap};
    use listrs::domain::services::field_extractors::{extract_min_unit_size, extract_price};
    use listrs::domain::services::normalizer::normalize;
    use listrs::domain::services::pair_scanner::{PairScanner, SpanPairScanner};
    use listrs::engines::document::PageSnapshot;

    const DETAILS: &str = r#"
        <html><body>
            <div class="summary">
                <div>PKR <b>95 Lakh</b></div>
                <div>PKR 2.1 Crore</div>
            </div>
            <ul>
                <li><span>Type</span><span>Flat</span></li>
                <li><span>Bedrooms</span><span>2</span></li>
                <li><span>Updated 3 Months Ago</span><span>yes</span></li>
                <li><span>Payment Scheme</span><span>Available</span></li>
                <li><span>Token</span><span>5%</span></li>
                <li><span>Bath(s)</span><span></span></li>
            </ul>
            <table>
                <tr><td><span>3.5 Marla</span></td></tr>
                <tr><td><span>Marla 4</span></td></tr>
                <tr><td><span>12 Marla</span></td></tr>
                <tr><td><span>Corner 8 Marla</span></td></tr>
            </table>
        </body></html>
    "#;

    #[test]
    fn test_scan_then_normalize() {
        let schema = ExtractionSchema::default();
        let page = PageSnapshot::parse(DETAILS);

        let raw = SpanPairScanner::new(schema.noise_labels.clone()).scan(&page);
        assert_eq!(raw.get("Type").map(String::as_str), Some("Flat"));
        // Noise is matched against the label only, case-insensitively
        assert!(!raw.contains_key("Updated 3 Months Ago"));
        assert!(!raw.contains_key("Payment Scheme"));
        assert_eq!(raw.get("Token").map(String::as_str), Some("5%"));
        assert!(!raw.contains_key("Bath(s)"));

        let fields = normalize(&raw, &schema.field_map);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["Property Type"], "Flat");
        assert_eq!(fields["Bedrooms"], "2");
    }

    #[test]
    fn test_custom_field_map() {
        let page = PageSnapshot::parse(DETAILS);
        let raw = SpanPairScanner::new(Vec::new()).scan(&page);

        let map = FieldMap::new([("Token", "Token Money")]);
        let fields = normalize(&raw, &map);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["Token Money"], "5%");
    }

    #[test]
    fn test_price_and_size_on_same_page() {
        let schema = ExtractionSchema::default();
        let page = PageSnapshot::parse(DETAILS);

        // The first element owning the marker includes descendant text
        assert_eq!(extract_price(&page, &schema).unwrap(), "PKR 95 Lakh");
        assert_eq!(extract_min_unit_size(&page, &schema).unwrap(), "3.5");
    }

    #[test]
    fn test_alternate_vocabulary() {
        let schema = ExtractionSchema {
            currency_marker: "USD".to_string(),
            magnitude_words: vec!["K".to_string()],
            unit_keyword: "sqft".to_string(),
            ..ExtractionSchema::default()
        };
        let page = PageSnapshot::parse(
            "<div><p>USD 450K</p><p>900 sqft</p><p>1200 sqft</p></div>",
        );

        assert_eq!(extract_price(&page, &schema).unwrap(), "USD 450K");
        assert_eq!(extract_min_unit_size(&page, &schema).unwrap(), "900.0");
    }
}
