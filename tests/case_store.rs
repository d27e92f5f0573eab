use juicio_abreviado::case_io::{load_case, save_case, CaseStore};
use juicio_abreviado::config::{load_config_from_file, parse_config, Config};
use juicio_abreviado::error::CaseError;
use juicio_abreviado::types::case_record::{CaseRecord, Gender, SentenceKind};

use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;

fn sample() -> CaseRecord {
    let mut record = CaseRecord::with_counts(2, 1);
    record.caption = "GÓMEZ, Ana y otro p.s.a. hurto".into();
    record.confiscation = true;
    record.defendants[0].name = "Ana Gómez".into();
    record.defendants[0].gender = Gender::Female;
    record.defendants[1].sentence_kind = SentenceKind::Conditional;
    record.defendants[1].no_prior_record = false;
    record.facts[0].description = "<i>Sustrajo</i> una bicicleta".into();
    record
}

#[test]
fn save_then_load_preserves_the_case() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("causa.json");

    save_case(&sample(), &path).unwrap();
    assert_eq!(load_case(&path).unwrap(), sample());
}

#[test]
fn saved_file_uses_the_stored_key_names() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("causa.json");
    save_case(&sample(), &path).unwrap();

    let json = fs::read_to_string(&path).unwrap();
    assert!(json.contains("\"caratula\""));
    assert!(json.contains("\"imputados\""));
    assert!(json.contains("\"sexo\": \"F\""));
    assert!(json.contains("\"tipo_pena\": \"condicional\""));
}

#[test]
fn missing_keys_take_defaults_and_unknown_keys_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vieja.json");
    fs::write(
        &path,
        r#"{"caratula": "Causa vieja", "imputados": [{"nombre": "Luis"}], "campo_nuevo": 3}"#,
    )
    .unwrap();

    let record = load_case(&path).unwrap();
    assert_eq!(record.caption, "Causa vieja");
    assert_eq!(record.locality, "Córdoba");
    assert_eq!(record.defendants.len(), 1);
    assert_eq!(record.defendants[0].name, "Luis");
    assert!(record.defendants[0].no_prior_record);
    assert!(record.facts.is_empty());
    assert!(record.prescription.total);
}

#[test]
fn malformed_json_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rota.json");
    fs::write(&path, "{\"caratula\": ").unwrap();

    assert!(matches!(load_case(&path), Err(CaseError::Json { .. })));
}

#[test]
fn store_lists_loads_and_deletes() {
    let dir = tempfile::tempdir().unwrap();
    let store = CaseStore::new(dir.path().join("causas"));
    assert!(store.list().unwrap().is_empty());

    store.save("zeta", &CaseRecord::default()).unwrap();
    store.save("alfa", &sample()).unwrap();
    fs::write(dir.path().join("causas").join("notas.txt"), "x").unwrap();

    assert_eq!(store.list().unwrap(), vec!["alfa".to_string(), "zeta".to_string()]);
    assert_eq!(store.load("alfa").unwrap(), sample());

    assert!(store.delete("zeta").unwrap());
    assert!(!store.delete("zeta").unwrap());
    assert_eq!(store.list().unwrap(), vec!["alfa".to_string()]);
    assert!(matches!(store.load("zeta"), Err(CaseError::NotFound(_))));
}

#[test]
fn store_refuses_path_like_names() {
    let dir = tempfile::tempdir().unwrap();
    let store = CaseStore::new(dir.path());
    assert!(matches!(
        store.save("../fuera", &CaseRecord::default()),
        Err(CaseError::InvalidName(_))
    ));
}

#[test]
fn store_opens_at_the_configured_directory() {
    let config = parse_config("cases_dir = \"archivo\"\n", Path::new("inline.toml")).unwrap();
    assert_eq!(CaseStore::open(&config).dir(), Path::new("archivo"));
    assert_eq!(CaseStore::open(&Config::default()).dir(), Path::new("causas_guardadas"));
}

#[test]
fn config_errors_name_the_file() {
    let err = parse_config("highlight_ms = \"tres\"", Path::new("juicio.toml")).unwrap_err();
    assert!(matches!(err, CaseError::Config { .. }));
    assert!(err.to_string().contains("juicio.toml"));
}

#[test]
fn config_file_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let cases = dir.path().join("causas");
    let path = dir.path().join("juicio.toml");
    fs::write(
        &path,
        format!("cases_dir = {:?}\ndefault_locality = \"Río Cuarto\"\n", cases.display().to_string()),
    )
    .unwrap();

    let config = load_config_from_file(path.to_str().unwrap()).unwrap();
    assert_eq!(config.cases_dir, cases);
    assert_eq!(config.default_locality, "Río Cuarto");
    assert_eq!(config.highlight_ms, 3000);
}

#[test]
fn config_rejects_a_file_as_cases_dir() {
    let dir = tempfile::tempdir().unwrap();
    let occupied = dir.path().join("causas");
    fs::write(&occupied, "no soy un directorio").unwrap();
    let path = dir.path().join("juicio.toml");
    fs::write(&path, format!("cases_dir = {:?}\n", occupied.display().to_string())).unwrap();

    let err = load_config_from_file(path.to_str().unwrap()).unwrap_err();
    assert!(matches!(err, CaseError::NotADirectory(ref found) if *found == occupied));
}

#[test]
fn missing_config_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no_existe.toml");

    let err = load_config_from_file(path.to_str().unwrap()).unwrap_err();
    assert!(matches!(err, CaseError::Io { .. }));
    assert!(err.to_string().contains("no_existe.toml"));
}
