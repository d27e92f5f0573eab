use juicio_abreviado::config::Config;
use juicio_abreviado::markup::highlight::changed_spans;
use juicio_abreviado::render::context::RenderContext;
use juicio_abreviado::render::letters::LetterKind;
use juicio_abreviado::session::FormSession;
use juicio_abreviado::types::case_record::{CaseRecord, SentenceKind};
use juicio_abreviado::types::field_key::FieldKey;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use std::time::{Duration, Instant};

fn session() -> FormSession {
    let config = Config::default();
    let ctx = RenderContext::from_config(&config, NaiveDate::from_ymd_opt(2026, 10, 17).unwrap());
    FormSession::new(CaseRecord::with_counts(1, 1), ctx, &config)
}

#[test]
fn session_renders_with_its_context() {
    let session = session();
    assert_eq!(session.context().default_locality, "Córdoba");
    assert_eq!(session.context().today, NaiveDate::from_ymd_opt(2026, 10, 17).unwrap());
}

#[test]
fn anchor_edits_are_sanitized_and_rerendered() {
    let mut session = session();
    assert!(session.apply_href_edit("edit_caratula", "<span style=\"font-weight:bold\">Causa</span> X"));

    assert_eq!(session.record().caption, "Causa X");
    assert_eq!(session.field_value(FieldKey::Caption).as_deref(), Some("Causa X"));
    assert!(session.document().contains("causa Causa X"));
}

#[test]
fn rich_fields_keep_their_marks() {
    let mut session = session();
    assert!(session.apply_field_edit(FieldKey::Conditions(0), "<p>es <b>soltero</b></p><script>x()</script>"));
    assert_eq!(session.record().defendants[0].personal_conditions, "es <b>soltero</b>");

    assert!(session.apply_field_edit(FieldKey::FactDescription(0), "Sustrajo una bicicleta"));
    assert_eq!(session.record().facts[0].description, "<i>Sustrajo una bicicleta</i>");
}

#[test]
fn unknown_anchor_is_ignored() {
    let mut session = session();
    let before = session.document().clone();
    assert!(!session.apply_href_edit("edit_inexistente", "x"));
    assert_eq!(session.document(), &before);
}

#[test]
fn edits_highlight_what_changed() {
    let mut session = session();
    let before = session.plain_text().to_string();
    session.update(|record| record.defendants[0].agreed_sentence = "tres años de prisión".into());

    let highlight = session.highlight(Instant::now()).expect("edit should highlight");
    assert_eq!(highlight.spans, changed_spans(&before, session.plain_text()));
    assert!(session.highlight(highlight.created_at + Duration::from_millis(3000)).is_none());
}

#[test]
fn resizing_lists_rerenders() {
    let mut session = session();
    session.set_defendant_count(3);
    assert_eq!(session.record().defendants.len(), 3);
    assert!(session.document().contains("Imputado#3"));
    assert!(session.document().contains("los imputados"));

    session.set_fact_count(2);
    assert!(session.document().contains("Segundo hecho:"));

    session.set_defendant_count(1);
    assert!(!session.document().contains("Imputado#2"));
}

#[test]
fn section_highlight_finds_headings() {
    let mut session = session();
    session.update(|record| record.confiscation = true);
    assert!(session.highlight_section("Decomiso"));
    assert!(!session.highlight_section("Inexistente"));
}

#[test]
fn letters_and_prescription_follow_the_record() {
    let mut session = session();
    session.update(|record| {
        record.defendants[0].name = "Juan Pérez".into();
        record.defendants[0].sentence_kind = SentenceKind::Conditional;
    });
    assert!(session.letter(LetterKind::Release, 0).contains("a Juan Pérez, DNI n.°"));
    assert!(session.prescription().contains("Juan Pérez"));
}
