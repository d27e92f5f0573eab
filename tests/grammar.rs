use juicio_abreviado::grammar::agreement::gender_agreement;
use juicio_abreviado::grammar::lists::{dedup_referral_clauses, join_with_and, join_with_semicolon_and};
use juicio_abreviado::grammar::numerals::{date_long, date_numeric, date_to_words, number_to_words};
use juicio_abreviado::markup::sanitize::{sanitize_html, sanitize_italic_only};
use juicio_abreviado::types::case_record::Gender;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;

#[test]
fn joins_with_and() {
    let none: [&str; 0] = [];
    assert_eq!(join_with_and(&none), "");
    assert_eq!(join_with_and(&["A"]), "A");
    assert_eq!(join_with_and(&["A", "B"]), "A y B");
    assert_eq!(join_with_and(&["A", "B", "C"]), "A, B y C");
}

#[test]
fn joins_with_semicolons() {
    assert_eq!(join_with_semicolon_and(&["A", "B", "C"]), "A; B; y C");
    assert_eq!(join_with_semicolon_and(&["A", "B"]), "A; y B");
}

#[test]
fn agreement_follows_the_group() {
    let male = gender_agreement(&[Gender::Male]);
    assert_eq!(male.defendant(), "el imputado");
    assert_eq!(male.accused(), "acusado");

    let female = gender_agreement(&[Gender::Female]);
    assert_eq!(female.defendant(), "la imputada");
    assert_eq!(female.accused(), "acusada");

    let mixed = gender_agreement(&[Gender::Male, Gender::Female]);
    assert_eq!(mixed.defendant(), "los imputados");
    assert_eq!(mixed.accused(), "acusados");

    let women = gender_agreement(&[Gender::Female, Gender::Female]);
    assert_eq!(women.to_defendant(), "a las imputadas");

    assert_eq!(gender_agreement(&[]).defendant(), "el imputado");
}

#[test]
fn numbers_in_words() {
    assert_eq!(number_to_words(0), "cero");
    assert_eq!(number_to_words(100), "cien");
    assert_eq!(number_to_words(101), "ciento uno");
    assert_eq!(number_to_words(1000), "mil");
    assert_eq!(number_to_words(21_000), "veintiún mil");
    assert_eq!(number_to_words(-5), "menos cinco");
    assert_eq!(number_to_words(1_000_000), "1000000");
}

#[test]
fn dates_in_three_styles() {
    let date = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
    assert_eq!(date_to_words(date), "diecisiete de octubre de dos mil veintiséis");
    assert_eq!(date_long(date), "17 de octubre de 2026");
    assert_eq!(date_numeric(date), "17/10/2026");
}

#[test]
fn boilerplate_referrals_give_way_to_specific_ones() {
    let clauses = [
        "El auto de elevación a juicio",
        "El auto de elevación a juicio",
        "El requerimiento de citación a juicio dictado por X",
    ];
    assert_eq!(
        dedup_referral_clauses(&clauses),
        vec!["El requerimiento de citación a juicio dictado por X".to_string()]
    );
}

#[test]
fn lone_boilerplate_referral_survives() {
    let clauses = ["El auto de elevación a juicio", "el  auto de elevación a juicio"];
    assert_eq!(
        dedup_referral_clauses(&clauses),
        vec!["El auto de elevación a juicio".to_string()]
    );
}

#[test]
fn sanitizing_is_idempotent() {
    let raw = r#"<html><head><style>p { color: red }</style></head><body>
        <p style="margin:0"><span style="font-weight:600">Juan</span>&nbsp;dijo <i>algo</i></p>
        <p></p><p><u>otra</u> cosa</p></body></html>"#;
    let once = sanitize_html(raw);
    assert_eq!(sanitize_html(&once), once);

    let italic = sanitize_italic_only(raw);
    assert_eq!(sanitize_italic_only(&italic), italic);
}
