use juicio_abreviado::render::context::RenderContext;
use juicio_abreviado::render::letters::{
    declaratory_points, render_letter, waiver_time, LetterKind, NOT_FOR_CONDITIONAL, NOT_FOR_EFFECTIVE,
    NOT_NEEDED_FOR_CONDITIONAL, NO_DEFENDANT, NO_WAIVER, TREATMENT_NOT_ORDERED,
};
use juicio_abreviado::types::case_record::{CaseRecord, Gender, SentenceKind};

use chrono::NaiveDate;
use pretty_assertions::assert_eq;

fn ctx() -> RenderContext {
    RenderContext::new(NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(), "Córdoba")
}

fn case_with(kind: SentenceKind) -> CaseRecord {
    let mut record = CaseRecord::with_counts(1, 1);
    record.caption = "PÉREZ, Juan p.s.a. robo".into();
    record.court_kind = "Juzgado de Control".into();
    record.court = "Juzgado de Control n.° 2".into();
    record.clerk_office = "3".into();
    record.sentence_number = "45".into();
    record.hearing_date = "16/10/2026".into();
    record.hearing_time = "10:00".into();
    record.prosecutor_name = "Carlos Díaz".into();
    record.operative_part = "<p>I. Declarar a Juan Pérez autor penalmente responsable del delito de robo.</p>\
                             <p>II. Imponerle la pena de un año de prisión.</p>"
        .into();

    let defendant = &mut record.defendants[0];
    defendant.name = "Juan Pérez".into();
    defendant.national_id = "30.123.456".into();
    defendant.defender = "Ana Ruiz".into();
    defendant.facility = "EP9 (UCA)".into();
    defendant.sentence_kind = kind;
    record
}

fn plain(kind: LetterKind, record: &CaseRecord) -> String {
    render_letter(kind, record, 0, &ctx()).to_plain_text()
}

#[test]
fn every_letter_has_a_title() {
    assert_eq!(LetterKind::ALL.len(), 17);
    assert!(LetterKind::ALL.iter().all(|kind| !kind.title().is_empty()));
}

#[test]
fn effective_only_letters() {
    let conditional = case_with(SentenceKind::Conditional);
    assert_eq!(plain(LetterKind::Computation, &conditional), NOT_FOR_CONDITIONAL);
    assert_eq!(plain(LetterKind::PenitentiaryTreatment, &conditional), NOT_FOR_CONDITIONAL);
    assert_eq!(plain(LetterKind::SentenceCommunication, &conditional), NOT_NEEDED_FOR_CONDITIONAL);
    assert_eq!(plain(LetterKind::CustodyTransfer, &conditional), NOT_NEEDED_FOR_CONDITIONAL);

    let effective = case_with(SentenceKind::Effective);
    let custody = plain(LetterKind::CustodyTransfer, &effective);
    assert!(custody.contains("se le hace saber que el condenado Juan Pérez, DNI n.° 30.123.456"));
    assert!(custody.contains("que se tramitan ante este Juzgado de Control n.° 2"));

    let computation = plain(LetterKind::Computation, &effective);
    assert!(computation.contains("DOMICILIO: Establecimiento Penitenciario n.° 9 (UCA)."));
    assert!(computation.contains("Of. Córdoba, 17/10/2026."));
}

#[test]
fn conditional_only_letters() {
    let effective = case_with(SentenceKind::Effective);
    assert_eq!(plain(LetterKind::Release, &effective), NOT_FOR_EFFECTIVE);
    assert_eq!(plain(LetterKind::NeuroTreatment, &effective), TREATMENT_NOT_ORDERED);

    let mut conditional = case_with(SentenceKind::Conditional);
    assert_eq!(plain(LetterKind::CivTreatment, &conditional), TREATMENT_NOT_ORDERED);
    conditional.defendants[0].civ_treatment = true;
    let civ = plain(LetterKind::CivTreatment, &conditional);
    assert!(civ.contains("CENTRO INTEGRAL DE VARONES"));
    assert!(civ.contains("asistencia psicoterapéutica a Juan Pérez, DNI n.° 30.123.456"));
}

#[test]
fn enforcement_file_subtitle_follows_sentence_kind() {
    let conditional = plain(LetterKind::EnforcementFile, &case_with(SentenceKind::Conditional));
    assert!(conditional.contains("Pena privativa de la libertad de ejecución condicional"));

    let effective = plain(LetterKind::EnforcementFile, &case_with(SentenceKind::Effective));
    assert!(effective.contains("Pena privativa de la libertad"));
    assert!(!effective.contains("ejecución condicional"));
}

#[test]
fn waiver_record_is_one_hour_after_the_hearing() {
    let mut record = case_with(SentenceKind::Effective);
    assert_eq!(plain(LetterKind::AppealWaiver, &record), NO_WAIVER);

    record.appeal_waived = true;
    let text = plain(LetterKind::AppealWaiver, &record);
    assert!(text.starts_with("En la ciudad de Córdoba, el 17 de octubre de 2026, siendo las 11:00 horas"));
    assert!(text.contains("Carlos Díaz; Ana Ruiz; y el imputado Juan Pérez manifestaron"));

    assert_eq!(waiver_time("9:45"), "10:45");
    assert_eq!(waiver_time("25:00"), "Hora inválida");
}

#[test]
fn waiver_record_agrees_with_the_defendants() {
    let mut record = case_with(SentenceKind::Effective);
    record.appeal_waived = true;
    record.defendants[0].name = "Ana Gómez".into();
    record.defendants[0].gender = Gender::Female;
    let text = plain(LetterKind::AppealWaiver, &record);
    assert!(text.contains("y la imputada Ana Gómez manifestaron"));
    assert!(!text.contains("el imputado"));

    record.resize_defendants(2);
    record.defendants[1].name = "Lía Sosa".into();
    record.defendants[1].gender = Gender::Female;
    let text = plain(LetterKind::AppealWaiver, &record);
    assert!(text.contains("y las imputadas Ana Gómez y Lía Sosa manifestaron"));
    assert!(!text.contains("los imputados"));
}

#[test]
fn case_wide_letters_ignore_the_defendant_index() {
    let mut record = case_with(SentenceKind::Effective);
    record.appeal_waived = true;
    for kind in LetterKind::ALL.iter().copied().filter(|kind| !kind.per_defendant()) {
        assert_eq!(
            render_letter(kind, &record, 0, &ctx()),
            render_letter(kind, &record, 5, &ctx()),
            "{}",
            kind.title()
        );
    }
    assert_eq!(
        plain(LetterKind::Police, &CaseRecord::default()),
        NO_DEFENDANT
    );
}

#[test]
fn recidivism_testimony_quotes_declaratory_points() {
    let mut record = case_with(SentenceKind::Effective);
    record.appeal_waived = true;
    let text = plain(LetterKind::Recidivism, &record);

    assert!(text.contains("TESTIMONIO DE SENTENCIA CONDENATORIA"));
    assert!(text.contains("I. Declarar a Juan Pérez autor penalmente responsable del delito de robo."));
    assert!(!text.contains("Imponerle"));
    assert!(text.contains("Fecha en que la sentencia quedó firme: 16/10/2026"));
    assert!(text.contains("Descripción de la pena: prisión de ejecución efectiva"));
}

#[test]
fn declaratory_points_with_arabic_numbers() {
    assert_eq!(
        declaratory_points("1. Declarar reincidente a Luis Sosa. 2. Ordenar el decomiso."),
        "1. Declarar reincidente a Luis Sosa."
    );
    assert_eq!(declaratory_points("Sin puntos numerados."), "");
}

#[test]
fn hearing_decree_without_names() {
    let text = plain(LetterKind::HearingDecree, &CaseRecord::default());
    assert!(text.starts_with("Córdoba, diecisiete de octubre de dos mil veintiséis."));
    assert!(text.contains("la situación procesal del imputado para el día Fecha a las Hora h"));
}

#[test]
fn victims_are_listed_once() {
    let mut record = case_with(SentenceKind::Effective);
    record.resize_defendants(2);
    record.defendants[0].victims = "Rosa Paz".into();
    record.defendants[1].victims = "Rosa Paz".into();
    let text = plain(LetterKind::VictimCertificate, &record);
    assert!(text.starts_with("Certifico: que en el día de la fecha logré entablar comunicación con Rosa Paz, damnificado/s"));
    assert!(text.ends_with("Of., 17/10/2026."));
}
