use serde::{Deserialize, Serialize};

// --- Enumerations stored with the labels the form offers ---

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gender {
    #[default]
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Gender {
    pub fn is_female(self) -> bool {
        self == Gender::Female
    }

    /// "el" / "la"
    pub fn article(self) -> &'static str {
        match self {
            Gender::Male => "el",
            Gender::Female => "la",
        }
    }

    /// "del" / "de la"
    pub fn of_article(self) -> &'static str {
        match self {
            Gender::Male => "del",
            Gender::Female => "de la",
        }
    }

    /// "el Sr." / "la Sra."
    pub fn honorific(self) -> &'static str {
        match self {
            Gender::Male => "el Sr.",
            Gender::Female => "la Sra.",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DefenderKind {
    #[default]
    #[serde(rename = "Público")]
    Public,
    #[serde(rename = "Privado")]
    Private,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JudgeRole {
    #[default]
    #[serde(rename = "juez")]
    Judge,
    #[serde(rename = "vocal")]
    ChamberMember,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Calification {
    #[default]
    #[serde(rename = "Correcta")]
    Correct,
    #[serde(rename = "Incorrecta")]
    Incorrect,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViolenceContext {
    #[default]
    #[serde(rename = "No")]
    NotApplicable,
    #[serde(rename = "violencia de género")]
    Gender,
    #[serde(rename = "violencia de género doméstica")]
    DomesticGender,
    #[serde(rename = "violencia familiar")]
    Family,
}

impl ViolenceContext {
    pub fn is_violence_case(self) -> bool {
        self != ViolenceContext::NotApplicable
    }

    pub fn label(self) -> &'static str {
        match self {
            ViolenceContext::NotApplicable => "No",
            ViolenceContext::Gender => "violencia de género",
            ViolenceContext::DomesticGender => "violencia de género doméstica",
            ViolenceContext::Family => "violencia familiar",
        }
    }
}

/// Which office sent the case to trial.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReferralOffice {
    #[default]
    #[serde(rename = "Juzgado")]
    Court,
    #[serde(rename = "Fiscalía")]
    Prosecution,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SentenceKind {
    #[default]
    #[serde(rename = "efectiva")]
    Effective,
    #[serde(rename = "condicional")]
    Conditional,
}

impl SentenceKind {
    pub fn label(self) -> &'static str {
        match self {
            SentenceKind::Effective => "efectiva",
            SentenceKind::Conditional => "condicional",
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_locality() -> String {
    crate::config::DEFAULT_LOCALITY.to_string()
}

// --- Records ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct DefendantRecord {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "sexo")]
    pub gender: Gender,
    #[serde(rename = "datos")]
    pub personal_data: String,
    #[serde(rename = "defensa")]
    pub defender: String,
    #[serde(rename = "tipo")]
    pub defender_kind: DefenderKind,
    #[serde(rename = "delitos")]
    pub offenses: String,
    #[serde(rename = "condena")]
    pub agreed_sentence: String,
    #[serde(rename = "condiciones")]
    pub personal_conditions: String,
    #[serde(rename = "anteced_no", default = "default_true")]
    pub no_prior_record: bool,
    #[serde(rename = "anteced")]
    pub prior_record: String,
    #[serde(rename = "confesion")]
    pub confession: String,
    #[serde(rename = "ultima")]
    pub final_statement: String,
    #[serde(rename = "pautas")]
    pub sentencing_factors: String,

    // Letter fields
    #[serde(rename = "dni")]
    pub national_id: String,
    #[serde(rename = "estable")]
    pub facility: String,
    #[serde(rename = "detenc")]
    pub detention: String,
    #[serde(rename = "victimas")]
    pub victims: String,
    #[serde(rename = "hechos_n")]
    pub fact_count_label: String,
    #[serde(rename = "fechas")]
    pub fact_dates: String,
    #[serde(rename = "tipo_pena")]
    pub sentence_kind: SentenceKind,
    #[serde(rename = "decreto")]
    pub computation_decree: String,
    #[serde(rename = "firm_dec")]
    pub decree_signatories: String,
    #[serde(rename = "trat")]
    pub ordered_treatment: String,
    #[serde(rename = "punto")]
    pub treatment_clause: String,
    #[serde(rename = "cumpl")]
    pub completion_date: String,
    #[serde(rename = "neuro")]
    pub neuro_treatment: bool,
    #[serde(rename = "civ")]
    pub civ_treatment: bool,
}

impl DefendantRecord {
    pub fn new() -> Self {
        Self {
            no_prior_record: true,
            ..Self::default()
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct FactRecord {
    /// Rich text as stored by the editor.
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "tipo_oficina")]
    pub referral: ReferralOffice,
    #[serde(rename = "oficina")]
    pub issuing_office: String,
    #[serde(rename = "num_auto")]
    pub order_number: String,
    #[serde(rename = "fecha_elev")]
    pub referral_date: String,
    #[serde(rename = "aclaraciones")]
    pub clarifications: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PrescriptionDetails {
    /// Total dismissal, or partial when other charges survive.
    pub total: bool,
    #[serde(rename = "pena_maxima")]
    pub max_penalty: String,
    #[serde(rename = "interrupcion")]
    pub interruption: String,
    /// The term counts from an interrupting event instead of the fact date.
    #[serde(rename = "desde_interrupcion")]
    pub runs_from_interruption: bool,
    #[serde(rename = "fundamentacion")]
    pub reasoning: String,
    #[serde(rename = "argumentos_fiscal")]
    pub prosecutor_arguments: String,
    #[serde(rename = "fechas_hechos")]
    pub fact_dates: String,
}

impl Default for PrescriptionDetails {
    fn default() -> Self {
        Self {
            total: true,
            max_penalty: String::new(),
            interruption: String::new(),
            runs_from_interruption: false,
            reasoning: String::new(),
            prosecutor_arguments: String::new(),
            fact_dates: String::new(),
        }
    }
}

/// Everything the form knows about one case.
///
/// Field names on disk follow the saved-case files; absent keys fall back to
/// defaults so older snapshots keep loading.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CaseRecord {
    #[serde(rename = "caratula")]
    pub caption: String,
    /// "Cámara en lo Criminal y Correccional", "Juzgado de Control", ...
    #[serde(rename = "articulo")]
    pub court_kind: String,
    #[serde(rename = "tribunal")]
    pub court: String,
    #[serde(rename = "sala")]
    pub courtroom: String,
    #[serde(rename = "secretaria")]
    pub clerk_office: String,
    #[serde(rename = "fecha_audiencia")]
    pub hearing_date: String,
    #[serde(rename = "hora_audiencia")]
    pub hearing_time: String,
    #[serde(rename = "localidad", default = "default_locality")]
    pub locality: String,
    #[serde(rename = "funcionario")]
    pub official: String,

    #[serde(rename = "fiscal_nombre")]
    pub prosecutor_name: String,
    #[serde(rename = "fiscal_sexo")]
    pub prosecutor_gender: Gender,

    #[serde(rename = "sentencia_num")]
    pub sentence_number: String,
    #[serde(rename = "resuelvo")]
    pub operative_part: String,
    #[serde(rename = "firmantes")]
    pub signatories: String,
    #[serde(rename = "renuncia")]
    pub appeal_waived: bool,

    #[serde(rename = "juez_nombre")]
    pub judge_name: String,
    #[serde(rename = "juez_sexo")]
    pub judge_gender: Gender,
    #[serde(rename = "juez_cargo")]
    pub judge_role: JudgeRole,

    #[serde(rename = "sujeto_eventual")]
    pub eventual_subject: String,
    #[serde(rename = "manifestacion_sujeto")]
    pub subject_statement: String,
    #[serde(rename = "victima")]
    pub victim: String,
    #[serde(rename = "victima_plural")]
    pub victim_plural: bool,
    #[serde(rename = "manifestacion_victima")]
    pub victim_statement: String,
    #[serde(rename = "pruebas")]
    pub evidence: String,
    #[serde(rename = "pruebas_relevantes")]
    pub key_evidence: String,
    #[serde(rename = "alegato_fiscal")]
    pub prosecution_closing: String,
    #[serde(rename = "alegato_defensa")]
    pub defense_closing: String,
    #[serde(rename = "calif_legal")]
    pub calification: Calification,
    #[serde(rename = "calif_correccion")]
    pub calification_correction: String,
    #[serde(rename = "usa_potenciales")]
    pub potential_terms: bool,
    #[serde(rename = "decomiso_si")]
    pub confiscation: bool,
    #[serde(rename = "decomiso_texto")]
    pub confiscation_text: String,
    #[serde(rename = "restriccion_si")]
    pub contact_restriction: bool,
    #[serde(rename = "restriccion_texto")]
    pub restriction_text: String,
    #[serde(rename = "caso_vf")]
    pub violence_context: ViolenceContext,

    #[serde(rename = "imputados")]
    pub defendants: Vec<DefendantRecord>,
    #[serde(rename = "hechos")]
    pub facts: Vec<FactRecord>,

    #[serde(rename = "prescripcion")]
    pub prescription: PrescriptionDetails,
}

impl Default for CaseRecord {
    fn default() -> Self {
        Self {
            caption: String::new(),
            court_kind: String::new(),
            court: String::new(),
            courtroom: String::new(),
            clerk_office: String::new(),
            hearing_date: String::new(),
            hearing_time: String::new(),
            locality: default_locality(),
            official: String::new(),
            prosecutor_name: String::new(),
            prosecutor_gender: Gender::Male,
            sentence_number: String::new(),
            operative_part: String::new(),
            signatories: String::new(),
            appeal_waived: false,
            judge_name: String::new(),
            judge_gender: Gender::Male,
            judge_role: JudgeRole::Judge,
            eventual_subject: String::new(),
            subject_statement: String::new(),
            victim: String::new(),
            victim_plural: false,
            victim_statement: String::new(),
            evidence: String::new(),
            key_evidence: String::new(),
            prosecution_closing: String::new(),
            defense_closing: String::new(),
            calification: Calification::Correct,
            calification_correction: String::new(),
            potential_terms: false,
            confiscation: false,
            confiscation_text: String::new(),
            contact_restriction: false,
            restriction_text: String::new(),
            violence_context: ViolenceContext::NotApplicable,
            defendants: Vec::new(),
            facts: Vec::new(),
            prescription: PrescriptionDetails::default(),
        }
    }
}

impl CaseRecord {
    /// A blank case with `defendants` and `facts` empty rows, as the form opens.
    pub fn with_counts(defendants: usize, facts: usize) -> Self {
        let mut record = Self::default();
        record.resize_defendants(defendants);
        record.resize_facts(facts);
        record
    }

    /// Grows with blank defendants or drops the trailing ones.
    pub fn resize_defendants(&mut self, count: usize) {
        self.defendants.resize_with(count, DefendantRecord::new);
    }

    pub fn resize_facts(&mut self, count: usize) {
        self.facts.resize_with(count, FactRecord::default);
    }

    pub fn defendant_genders(&self) -> Vec<Gender> {
        self.defendants.iter().map(|d| d.gender).collect()
    }

    /// The defendant's name, or a numbered stand-in while it is still blank.
    pub fn defendant_name(&self, index: usize) -> String {
        match self.defendants.get(index) {
            Some(defendant) if !defendant.name.trim().is_empty() => defendant.name.trim().to_string(),
            _ => format!("Imputado#{}", index + 1),
        }
    }

    /// "esta" for chambers, "este" for courts.
    pub fn court_demonstrative(&self) -> &'static str {
        if self.court_kind.trim_start().starts_with("Cámara") {
            "esta"
        } else {
            "este"
        }
    }

    pub fn locality_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        let locality = self.locality.trim();
        if locality.is_empty() {
            fallback
        } else {
            locality
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_keeps_existing_rows() {
        let mut record = CaseRecord::with_counts(2, 1);
        record.defendants[0].name = "Juan Pérez".into();
        record.resize_defendants(3);
        assert_eq!(record.defendants.len(), 3);
        assert_eq!(record.defendants[0].name, "Juan Pérez");
        assert!(record.defendants[2].no_prior_record);
        record.resize_defendants(1);
        assert_eq!(record.defendants.len(), 1);
        assert_eq!(record.defendants[0].name, "Juan Pérez");
    }

    #[test]
    fn blank_names_get_numbered_stand_ins() {
        let record = CaseRecord::with_counts(2, 0);
        assert_eq!(record.defendant_name(1), "Imputado#2");
        assert_eq!(record.defendant_name(7), "Imputado#8");
    }

    #[test]
    fn chamber_takes_feminine_demonstrative() {
        let mut record = CaseRecord::default();
        record.court_kind = "Cámara en lo Criminal y Correccional".into();
        assert_eq!(record.court_demonstrative(), "esta");
        record.court_kind = "Juzgado de Control".into();
        assert_eq!(record.court_demonstrative(), "este");
    }

    #[test]
    fn enums_use_form_labels() {
        let json = serde_json::to_string(&ViolenceContext::DomesticGender).unwrap();
        assert_eq!(json, "\"violencia de género doméstica\"");
        let kind: DefenderKind = serde_json::from_str("\"Privado\"").unwrap();
        assert_eq!(kind, DefenderKind::Private);
    }
}
