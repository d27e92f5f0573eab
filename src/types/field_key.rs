use std::fmt;

/// Names a single bound field of a case, so a click on rendered text can be
/// routed back to the value it came from.
///
/// The textual form is the anchor `href` used in the rendered markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Locality,
    HearingDate,
    Caption,
    Court,
    Courtroom,
    JudgeName,
    JudgeRole,
    Prosecutor,
    EventualSubject,
    SubjectStatement,
    Victim,
    VictimStatement,
    Evidence,
    KeyEvidence,
    ProsecutionClosing,
    DefenseClosing,
    CalificationCorrection,
    Confiscation,
    Restriction,
    OperativePart,
    DefendantName(usize),
    DefendantData(usize),
    Defender(usize),
    Offenses(usize),
    AgreedSentence(usize),
    Conditions(usize),
    PriorRecord(usize),
    Confession(usize),
    FinalStatement(usize),
    SentencingFactors(usize),
    FactDescription(usize),
    FactOffice(usize),
    FactOrderNumber(usize),
    FactReferralDate(usize),
    FactClarifications(usize),
}

/// How edited rich text must be cleaned before it is stored in a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditPolicy {
    /// Single-line value; all markup is dropped.
    Plain,
    /// Bold, italic and underline survive.
    Rich,
    /// Rendered inside bold context, so bold is dropped.
    RichWithoutBold,
    /// Rendered as a quotation, only italics survive.
    ItalicOnly,
}

const SCALAR_KEYS: &[(FieldKey, &str)] = &[
    (FieldKey::Locality, "edit_localidad"),
    (FieldKey::HearingDate, "edit_fecha_audiencia"),
    (FieldKey::Caption, "edit_caratula"),
    (FieldKey::Court, "edit_tribunal"),
    (FieldKey::Courtroom, "edit_sala"),
    (FieldKey::JudgeName, "edit_juez"),
    (FieldKey::JudgeRole, "edit_cargo_juez"),
    (FieldKey::Prosecutor, "edit_fiscal"),
    (FieldKey::EventualSubject, "edit_sujeto_eventual"),
    (FieldKey::SubjectStatement, "edit_manifestacion_sujeto"),
    (FieldKey::Victim, "edit_victima"),
    (FieldKey::VictimStatement, "edit_manifestacion_victima"),
    (FieldKey::Evidence, "prueba"),
    (FieldKey::KeyEvidence, "pruebas_importantes"),
    (FieldKey::ProsecutionClosing, "alegato_fiscal"),
    (FieldKey::DefenseClosing, "alegato_defensa"),
    (FieldKey::CalificationCorrection, "edit_correccion_calif"),
    (FieldKey::Confiscation, "decomiso"),
    (FieldKey::Restriction, "restriccion"),
    (FieldKey::OperativePart, "resuelvo"),
];

const DEFENDANT_PREFIX: &str = "edit_imp_";
const FACT_PREFIX: &str = "edit_hecho_";

const DEFENDANT_FIELDS: &[&str] = &[
    "nombre",
    "datos",
    "defensor",
    "delitos",
    "condena",
    "condiciones",
    "antecedentes",
    "confesion",
    "ultima",
    "pautas",
];

const FACT_FIELDS: &[&str] = &["descripcion", "oficina", "num_auto", "fecha_elev", "aclaraciones"];

impl FieldKey {
    pub fn href(&self) -> String {
        match *self {
            FieldKey::DefendantName(i) => format!("{DEFENDANT_PREFIX}nombre_{i}"),
            FieldKey::DefendantData(i) => format!("{DEFENDANT_PREFIX}datos_{i}"),
            FieldKey::Defender(i) => format!("{DEFENDANT_PREFIX}defensor_{i}"),
            FieldKey::Offenses(i) => format!("{DEFENDANT_PREFIX}delitos_{i}"),
            FieldKey::AgreedSentence(i) => format!("{DEFENDANT_PREFIX}condena_{i}"),
            FieldKey::Conditions(i) => format!("{DEFENDANT_PREFIX}condiciones_{i}"),
            FieldKey::PriorRecord(i) => format!("{DEFENDANT_PREFIX}antecedentes_{i}"),
            FieldKey::Confession(i) => format!("{DEFENDANT_PREFIX}confesion_{i}"),
            FieldKey::FinalStatement(i) => format!("{DEFENDANT_PREFIX}ultima_{i}"),
            FieldKey::SentencingFactors(i) => format!("{DEFENDANT_PREFIX}pautas_{i}"),
            FieldKey::FactDescription(i) => format!("{FACT_PREFIX}descripcion_{i}"),
            FieldKey::FactOffice(i) => format!("{FACT_PREFIX}oficina_{i}"),
            FieldKey::FactOrderNumber(i) => format!("{FACT_PREFIX}num_auto_{i}"),
            FieldKey::FactReferralDate(i) => format!("{FACT_PREFIX}fecha_elev_{i}"),
            FieldKey::FactClarifications(i) => format!("{FACT_PREFIX}aclaraciones_{i}"),
            scalar => SCALAR_KEYS
                .iter()
                .find(|(key, _)| *key == scalar)
                .map(|(_, href)| (*href).to_string())
                .unwrap_or_default(),
        }
    }

    /// Inverse of [`FieldKey::href`]. Unknown hrefs give `None`.
    pub fn from_href(href: &str) -> Option<FieldKey> {
        if let Some((key, _)) = SCALAR_KEYS.iter().find(|(_, h)| *h == href) {
            return Some(*key);
        }

        if let Some(rest) = href.strip_prefix(DEFENDANT_PREFIX) {
            let (field, index) = split_index(rest)?;
            if !DEFENDANT_FIELDS.contains(&field) {
                return None;
            }
            return Some(match field {
                "nombre" => FieldKey::DefendantName(index),
                "datos" => FieldKey::DefendantData(index),
                "defensor" => FieldKey::Defender(index),
                "delitos" => FieldKey::Offenses(index),
                "condena" => FieldKey::AgreedSentence(index),
                "condiciones" => FieldKey::Conditions(index),
                "antecedentes" => FieldKey::PriorRecord(index),
                "confesion" => FieldKey::Confession(index),
                "ultima" => FieldKey::FinalStatement(index),
                _ => FieldKey::SentencingFactors(index),
            });
        }

        if let Some(rest) = href.strip_prefix(FACT_PREFIX) {
            let (field, index) = split_index(rest)?;
            if !FACT_FIELDS.contains(&field) {
                return None;
            }
            return Some(match field {
                "descripcion" => FieldKey::FactDescription(index),
                "oficina" => FieldKey::FactOffice(index),
                "num_auto" => FieldKey::FactOrderNumber(index),
                "fecha_elev" => FieldKey::FactReferralDate(index),
                _ => FieldKey::FactClarifications(index),
            });
        }

        None
    }

    pub fn edit_policy(&self) -> EditPolicy {
        match self {
            FieldKey::Evidence
            | FieldKey::KeyEvidence
            | FieldKey::ProsecutionClosing
            | FieldKey::DefenseClosing
            | FieldKey::Confiscation
            | FieldKey::Restriction
            | FieldKey::OperativePart
            | FieldKey::Conditions(_)
            | FieldKey::PriorRecord(_)
            | FieldKey::SentencingFactors(_) => EditPolicy::Rich,
            FieldKey::DefendantData(_) => EditPolicy::RichWithoutBold,
            FieldKey::FactDescription(_) => EditPolicy::ItalicOnly,
            _ => EditPolicy::Plain,
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.href())
    }
}

/// "num_auto_3" -> ("num_auto", 3)
fn split_index(rest: &str) -> Option<(&str, usize)> {
    let (field, index) = rest.rsplit_once('_')?;
    let index = index.parse().ok()?;
    Some((field, index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexed_keys_round_trip_through_href() {
        for key in [
            FieldKey::DefendantName(0),
            FieldKey::PriorRecord(4),
            FieldKey::FactOrderNumber(2),
            FieldKey::FactReferralDate(11),
            FieldKey::OperativePart,
            FieldKey::JudgeRole,
        ] {
            assert_eq!(FieldKey::from_href(&key.href()), Some(key));
        }
    }

    #[test]
    fn unknown_hrefs_are_rejected() {
        assert_eq!(FieldKey::from_href("edit_imp_apodo_0"), None);
        assert_eq!(FieldKey::from_href("edit_hecho_descripcion_x"), None);
        assert_eq!(FieldKey::from_href("https://example.org"), None);
    }
}
