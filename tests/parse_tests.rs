use vatid::core::*;

// ---------------------------------------------------------------------------
// Length and normalization
// ---------------------------------------------------------------------------

#[test]
fn blank_input_is_invalid_format() {
    assert_eq!(VatId::parse("    "), Err(VatError::InvalidFormat));
}

#[test]
fn prefix_only_is_invalid_format() {
    assert_eq!(VatId::parse("NL"), Err(VatError::InvalidFormat));
}

#[test]
fn lowercase_and_spaces_are_normalized() {
    let id = VatId::parse("nl 8220 1069 0b01").unwrap();
    assert_eq!(id.country_code(), "NL");
    assert_eq!(id.number(), "822010690B01");
}

#[test]
fn non_breaking_space_is_stripped() {
    assert!(VatId::parse("DE\u{a0}123456789").is_ok());
}

// ---------------------------------------------------------------------------
// Country codes
// ---------------------------------------------------------------------------

#[test]
fn unknown_country_is_distinct_from_format_error() {
    assert_eq!(
        VatId::parse("AR822010690B05"),
        Err(VatError::InvalidCountryCode)
    );
    assert_eq!(
        VatId::parse("US123456789"),
        Err(VatError::InvalidCountryCode)
    );
}

#[test]
fn greece_uses_el_not_gr() {
    assert!(VatId::parse("EL123456789").is_ok());
    assert_eq!(
        VatId::parse("GR123456789"),
        Err(VatError::InvalidCountryCode)
    );
}

#[test]
fn northern_ireland_uses_gb_format() {
    assert!(VatId::parse("XI123456789").is_ok());
    assert!(VatId::parse("XI123456789012").is_ok());
    assert_eq!(VatId::parse("XI1234567890"), Err(VatError::InvalidFormat));
}

#[test]
fn supported_codes_are_listed() {
    let codes: Vec<_> = supported_country_codes().collect();
    assert!(codes.contains(&"AU"));
    assert!(codes.contains(&"CH"));
    assert!(codes.contains(&"XI"));
    assert!(!codes.contains(&"US"));
}

// ---------------------------------------------------------------------------
// Per-country formats
// ---------------------------------------------------------------------------

#[test]
fn valid_numbers_per_country() {
    let valid = [
        "ATU12345678",
        "BE0123456789",
        "BE1234567890",
        "BG123456789",
        "BG1234567890",
        "CHE123456789",
        "CHE123456789MWST",
        "CHE-123.456.789",
        "CY12345678L",
        "CZ12345678",
        "CZ1234567890",
        "DE123456789",
        "DK12345678",
        "EE123456789",
        "EL123456789",
        "ESX1234567X",
        "ES12345678Z",
        "ESA12345678",
        "FI12345678",
        "FR12345678901",
        "FRAB123456789",
        "GB123456789",
        "GB123456789012",
        "HR12345678901",
        "HU12345678",
        "IE1234567T",
        "IE1234567FA",
        "IT12345678901",
        "LT123456789",
        "LT123456789012",
        "LU12345678",
        "LV12345678901",
        "MT12345678",
        "NL822010690B01",
        "PL1234567890",
        "PT123456789",
        "RO12",
        "RO1234567890",
        "SE123456789012",
        "SI12345678",
        "SK1234567890",
    ];
    for raw in valid {
        let id = VatId::parse(raw).unwrap_or_else(|e| panic!("{raw} should parse: {e}"));
        assert_eq!(id.to_string(), raw);
    }
}

#[test]
fn swiss_printed_forms() {
    let id = VatId::parse("CHE-123.456.789 MWST").unwrap();
    assert_eq!(id.number(), "E-123.456.789MWST");
    assert_eq!(
        VatId::parse("CHE 123 456 789").unwrap().number(),
        "E123456789"
    );
    assert_eq!(VatId::parse("CHE-123.456.78"), Err(VatError::InvalidFormat));
}

#[test]
fn invalid_numbers_per_country() {
    let invalid = [
        "AT12345678",     // missing U
        "BE123456789",    // 9 digits
        "DE12345678",     // too short
        "DE1234567890",   // too long
        "DE12345678A",    // letter
        "FR1A123456789",  // mixed key
        "GB1234567890",   // 10 digits
        "GBGD123",        // government departments not accepted
        "IE1234567XZ",    // second letter out of range
        "NL123456789A01", // missing B
        "RO1",            // too short
        "SE12345678901",  // 11 digits
    ];
    for raw in invalid {
        assert_eq!(VatId::parse(raw), Err(VatError::InvalidFormat), "{raw}");
    }
}

// ---------------------------------------------------------------------------
// Australia (ABN checksum)
// ---------------------------------------------------------------------------

#[test]
fn au_valid_abn() {
    let id = VatId::parse("AU51824753556").unwrap();
    assert_eq!(id.country_code(), "AU");
    assert_eq!(id.number(), "51824753556");
}

#[test]
fn au_bad_length() {
    assert_eq!(VatId::parse("AU5182475355"), Err(VatError::InvalidFormat));
}

#[test]
fn au_bad_check_digits() {
    assert_eq!(VatId::parse("AU41824753556"), Err(VatError::InvalidFormat));
}

#[test]
fn au_leading_zero() {
    assert_eq!(VatId::parse("AU01824753556"), Err(VatError::InvalidFormat));
}

#[test]
fn au_with_spaces_as_printed() {
    assert!(VatId::parse("AU 51 824 753 556").is_ok());
}

// ---------------------------------------------------------------------------
// Trusted constants
// ---------------------------------------------------------------------------

#[test]
fn must_parse_returns_id() {
    assert_eq!(VatId::must_parse("DE123456789").number(), "123456789");
}

#[test]
#[should_panic]
fn must_parse_panics_on_unknown_country() {
    VatId::must_parse("XX123456789");
}
