use kimlik_match::models::RawLine;
use kimlik_match::processing::{extract, extract_name_block, parse_lines};
use kimlik_match::validation::{extract_id, Matcher};
use kimlik_match::IdentityValidator;

fn lines(text: &str) -> Vec<RawLine> {
    parse_lines(text).unwrap()
}

#[test]
fn card_and_form_agree() {
    let card = extract(&lines("ADI\nMEHMET\nSOYADI\nYILMAZ\n12345678901"));
    let form = extract(&lines("AD SOYAD: MEHMET YILMAZ\n12345678901"));

    assert_eq!(card.name.as_ref().unwrap().as_str(), "MEHMET YILMAZ");
    assert_eq!(form.name.as_ref().unwrap().as_str(), "MEHMET YILMAZ");
    assert_eq!(card.id.as_ref().unwrap().as_str(), "12345678901");
    assert_eq!(form.id.as_ref().unwrap().as_str(), "12345678901");

    let result = Matcher::new(80).compare(
        card.name.as_ref(),
        form.name.as_ref(),
        card.id.as_ref(),
        form.id.as_ref(),
    );
    assert_eq!(result.name_similarity, 100);
    assert!(result.id_match);
    assert!(result.is_valid);
}

#[test]
fn different_ids_fail_despite_equal_names() {
    let report = IdentityValidator::default().validate_lines(
        &lines("ADI\nMEHMET\nSOYADI\nYILMAZ\n12345678901"),
        &lines("AD SOYAD: MEHMET YILMAZ\n10987654321"),
    );
    assert_eq!(report.scores.name_similarity, 100);
    assert!(!report.scores.tckn_match);
    assert!(!report.is_valid);
}

#[test]
fn digits_only_document_has_no_name() {
    assert!(extract_name_block("12345678901\n2024\n06").is_empty());

    let report = IdentityValidator::default().validate_lines(
        &lines("12345678901\n2024"),
        &lines("AD SOYAD: MEHMET YILMAZ\n12345678901"),
    );
    assert!(report.document_a.name.is_none());
    assert_eq!(report.scores.name_similarity, 0);
    assert!(report.scores.tckn_match);
    assert!(!report.is_valid);
}

#[test]
fn only_eleven_digit_runs_are_ids() {
    assert!(extract_id("1234567890").is_none());
    assert!(extract_id("123456789012").is_none());
    assert_eq!(extract_id("12345678901").unwrap().as_str(), "12345678901");
}

#[test]
fn report_serializes_for_the_api_layer() {
    let report = IdentityValidator::default().validate_lines(
        &lines("ADI\t0.8\nMEHMET\t0.8\nSOYADI\t0.8\nYILMAZ\t0.8\n12345678950\t0.8"),
        &lines("AD SOYAD: MEHMET YILMAZ\t0.6\n12345678950\t0.6"),
    );
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["isValid"], true);
    assert_eq!(json["scores"]["nameSimilarity"], 100);
    assert_eq!(json["scores"]["tcknMatch"], true);
    assert_eq!(json["documentA"]["name"], "MEHMET YILMAZ");
    assert_eq!(json["documentB"]["id"], "12345678950");
    assert_eq!(json["checksum"]["documentA"], true);
    let hint = json["scores"]["ocrConfidenceHint"].as_f64().unwrap();
    assert!((hint - 0.8).abs() < 1e-6);
}
