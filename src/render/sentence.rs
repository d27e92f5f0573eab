use tracing::debug;

use crate::grammar::agreement::{gender_agreement, Agreement};
use crate::grammar::lists::{dedup_referral_clauses_by, group_by_shared_value, join_with_and, join_with_semicolon_and};
use crate::grammar::numerals::fact_ordinal;
use crate::grammar::punctuation::{
    capitalize_first, lowercase_first, lowercase_leading_article, trim_trailing_punctuation, without_final_period,
};
use crate::markup::document::{anchor, anchor_html, escape_html, Document};
use crate::markup::sanitize::{inline_with_paragraphs, to_plain_text};
use crate::render::context::RenderContext;
use crate::render::sections::{emit_numbered, ClauseRule, SectionCounter};
use crate::types::case_record::{
    Calification, CaseRecord, DefenderKind, Gender, JudgeRole, ReferralOffice, ViolenceContext,
};
use crate::types::field_key::FieldKey;

pub const DEFAULT_CONFISCATION_TEXT: &str = "corresponde ordenar el decomiso de XXX, en razón de que se trata de un \
    instrumento/provecho/producto del delito, debido a que XXX (art. 23 del CP).";

pub const DEFAULT_RESTRICTION_TEXT: &str = "dadas las características y el contexto de la victimización acreditada en \
    los presentes, considero adecuado imponer a XXX la prohibición de establecer cualquier clase de contacto o \
    comunicación (verbal, telefónica, personalmente o por interpósita persona o por cualquier medio electrónico o \
    informático, etc.) con XXX, hasta que la presente sentencia, luego de que quede firme, sea comunicada al Tribunal de \
    Gestión Asociada del Fuero de Niñez, Adolescencia, Violencia Familiar y de Género de esta ciudad / a la Oficina \
    Única de Violencia Familiar y de Genero de la ciudad de XXX, para que allí se adopten las medidas que pudieren \
    corresponder al respecto (arts. 16 –inc. e– de la Ley Nacional 26485; y 3, 4, 9, 20, 21 –inc. e– y cc de la Ley \
    Provincial 9283). Ello obedece a que, de conformidad a lo prescripto por el art. 16 –inc. e– de la Ley Nacional n° \
    26485, los organismos del Estado, en cualquier procedimiento judicial, deben garantizar a las mujeres el derecho a \
    recibir protección judicial urgente y preventiva cuando se encuentren amenazados o vulnerados cualquiera de los \
    derechos enunciados en el artículo 3º de la misma ley, entre ellos la integridad psicológica, que podría verse \
    afectada si el encartado procura lograr alguna clase de comunicación con ella desde su lugar de encierro. Por todo \
    ello, se debe remitir copia de la presente sentencia al órgano judicial que preintervino en este conflicto para \
    que, a partir de su recepción, adopte las medidas que pudieren corresponder a partir de ese momento, a dichos fines.";

const CONDITION_PREFIXES: [&str; 4] = ["A su vez, ", "Por su parte, ", "A su turno, ", "También, "];
const CONDITION_VERBS: [&str; 4] = ["agregó", "dijo", "mencionó", "añadió"];
const RECORD_PREFIXES: [&str; 3] = ["A su vez,", "Separadamente,", "Asimismo,"];
const CONFESSION_PREFIXES: [&str; 4] = ["Ante ello,", "A su turno,", "Luego,", "Después,"];
const CONFESSION_VERBS: [&str; 5] = ["expresó", "manifestó", "refirió", "declaró", "afirmó"];
const FACTOR_INTROS: [&str; 4] = ["respecto de", "en cuanto a", "con relación a", "en lo relativo a"];
const FACTOR_VERBS: [&str; 4] = ["estimo", "valoro", "pondero", "considero"];
const PENALTY_INTROS: [&str; 4] = ["Asimismo,", "En el mismo sentido,", "De igual manera,", "Del mismo modo,"];

const QUESTION_INDENT: &str = "&nbsp;&nbsp;&nbsp;&nbsp;";

/// Renders the reasons of an abbreviated-trial sentence.
///
/// Pure: the same record and context always give the same document.
pub fn render_sentence(record: &CaseRecord, ctx: &RenderContext) -> Document {
    let view = SentenceView::new(record, ctx);
    let mut doc = Document::new();

    view.opening(&mut doc);
    view.referral_and_facts(&mut doc);
    view.questions(&mut doc);
    view.first_question(&mut doc);
    view.second_question(&mut doc);
    view.third_question(&mut doc);

    debug!(
        defendants = record.defendants.len(),
        facts = record.facts.len(),
        paragraphs = doc.len(),
        "rendered sentence"
    );
    doc
}

/// Flattens stored rich text for use inside a sentence paragraph.
fn rich(markup: &str) -> String {
    without_final_period(&inline_with_paragraphs(markup)).to_string()
}

fn plain(text: &str) -> &str {
    without_final_period(text.trim())
}

/// Derived values shared by every part of the sentence.
struct SentenceView<'a> {
    record: &'a CaseRecord,
    ctx: &'a RenderContext,
    defendants: Agreement,
    single_fact: bool,
    /// Escaped display names, with numbered stand-ins for blanks.
    plain_names: Vec<String>,
    /// The same names as field anchors.
    names: Vec<String>,
}

impl<'a> SentenceView<'a> {
    fn new(record: &'a CaseRecord, ctx: &'a RenderContext) -> Self {
        let plain_names: Vec<String> = (0..record.defendants.len())
            .map(|i| escape_html(&record.defendant_name(i)))
            .collect();
        let names = (0..record.defendants.len())
            .map(|i| anchor(&record.defendant_name(i), FieldKey::DefendantName(i), Some("Nombre imputado")))
            .collect();
        Self {
            record,
            ctx,
            defendants: gender_agreement(&record.defendant_genders()),
            single_fact: record.facts.len() <= 1,
            plain_names,
            names,
        }
    }

    fn single_defendant(&self) -> bool {
        !self.defendants.is_plural()
    }

    fn all_names(&self) -> String {
        let joined = join_with_and(&self.names);
        if joined.is_empty() {
            "[imputados]".to_string()
        } else {
            joined
        }
    }

    fn judge_title(&self) -> &'static str {
        match (self.record.judge_role, self.record.judge_gender) {
            (JudgeRole::Judge, Gender::Male) => "juez",
            (JudgeRole::Judge, Gender::Female) => "jueza",
            (JudgeRole::ChamberMember, _) => "vocal",
        }
    }

    /// "EL JUEZ PÉREZ DIJO:" style heading for each question.
    fn speaker_heading(&self, question: &str) -> String {
        let article = match self.record.judge_gender {
            Gender::Male => "EL",
            Gender::Female => "LA",
        };
        let role = anchor(
            &format!("{article} {}", self.judge_title().to_uppercase()),
            FieldKey::JudgeRole,
            Some("Cargo"),
        );
        let name = anchor(&self.record.judge_name.trim().to_uppercase(), FieldKey::JudgeName, Some("JUEZ"));
        format!("<b>A LA {question}, {role} {name} DIJO:</b>")
    }

    /// Defenders in first-seen order, each linked to its first defendant.
    fn defender_groups(&self, skip_blank: bool) -> Vec<String> {
        let pairs = self
            .record
            .defendants
            .iter()
            .enumerate()
            .map(|(i, d)| (d.defender.trim(), i))
            .filter(|(name, _)| !skip_blank || !name.is_empty());
        group_by_shared_value(pairs)
            .into_iter()
            .map(|group| anchor(group.key, FieldKey::Defender(group.members[0]), Some("Defensor")))
            .collect()
    }

    // --- Opening ---

    fn opening(&self, doc: &mut Document) {
        let r = self.record;
        let locality = anchor(r.locality_or(&self.ctx.default_locality), FieldKey::Locality, Some("Localidad"));
        let date = anchor(&r.hearing_date, FieldKey::HearingDate, Some("Fecha"));
        let caption = anchor(&r.caption, FieldKey::Caption, Some("Carátula"));
        let court = anchor(&r.court, FieldKey::Court, Some("Tribunal"));
        let courtroom = anchor(&r.courtroom, FieldKey::Courtroom, Some("Sala"));
        let judge = anchor(&r.judge_name, FieldKey::JudgeName, Some("Juez"));
        let title = anchor(self.judge_title(), FieldKey::JudgeRole, Some("Cargo"));
        let court_article = match r.judge_role {
            JudgeRole::Judge => "el",
            JudgeRole::ChamberMember => "la",
        };

        doc.push(format!(
            "En la ciudad de {locality}, el {date}, se dan a conocer los fundamentos de la sentencia dictada en la \
             causa <b>{caption}</b>, juzgada por {court_article} {court}, en la {courtroom} a cargo {} {title} {judge}.",
            r.judge_gender.of_article()
        ));

        let prosecutor = anchor(&r.prosecutor_name, FieldKey::Prosecutor, Some("Fiscal"));
        let defenders = join_with_and(&self.defender_groups(false));
        doc.push(format!(
            "En el debate intervinieron {} {prosecutor}, y {} {}, {} por {defenders}.",
            r.prosecutor_gender.article(),
            self.defendants.defendant(),
            self.all_names(),
            self.defendants.assisted(),
        ));

        let personal: Vec<String> = r
            .defendants
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let data = anchor_html(&rich(&d.personal_data), FieldKey::DefendantData(i), Some("Datos"));
                format!("<b>{}</b>, {data}", self.names[i])
            })
            .collect();
        doc.push(format!(
            "En esta causa {} {} {}.",
            self.defendants.by_number("fue", "fueron"),
            self.defendants.accused(),
            join_with_semicolon_and(&personal)
        ));
    }

    // --- Referral and facts ---

    fn referral_clauses(&self) -> Vec<String> {
        struct Clause {
            plain: String,
            html: String,
        }

        let clauses: Vec<Clause> = self
            .record
            .facts
            .iter()
            .enumerate()
            .map(|(i, fact)| {
                let number = fact.order_number.trim();
                let date = fact.referral_date.trim();
                let office = fact.issuing_office.trim();
                let mut plain = String::new();
                let mut html = String::new();
                let mut push = |text: &str, linked: String| {
                    plain.push_str(text);
                    html.push_str(&linked);
                };

                match fact.referral {
                    ReferralOffice::Court => {
                        push("El auto de elevación a juicio", "El auto de elevación a juicio".into());
                        if !number.is_empty() {
                            push(
                                &format!(" n° {number}"),
                                format!(" n° {}", anchor(number, FieldKey::FactOrderNumber(i), Some("n°"))),
                            );
                        }
                    }
                    ReferralOffice::Prosecution => {
                        push("El requerimiento de citación a juicio", "El requerimiento de citación a juicio".into());
                    }
                }
                if !date.is_empty() {
                    push(
                        &format!(" de fecha {date}"),
                        format!(" de fecha {}", anchor(date, FieldKey::FactReferralDate(i), Some("fecha"))),
                    );
                }
                if !office.is_empty() {
                    push(
                        &format!(", dictado por {office},"),
                        format!(", dictado por {},", anchor(office, FieldKey::FactOffice(i), Some("oficina"))),
                    );
                }
                Clause { plain, html }
            })
            .collect();

        dedup_referral_clauses_by(clauses, |clause| clause.plain.as_str())
            .into_iter()
            .enumerate()
            .map(|(i, clause)| {
                let html = trim_trailing_punctuation(clause.html.trim());
                if i > 0 {
                    lowercase_first(html)
                } else {
                    html.to_string()
                }
            })
            .collect()
    }

    fn referral_and_facts(&self, doc: &mut Document) {
        let clauses = self.referral_clauses();
        let verb = if clauses.len() > 1 { "atribuyeron" } else { "atribuyó" };
        let joined = join_with_semicolon_and(&clauses);
        let joined = if joined.is_empty() { "[Acusación]".to_string() } else { joined };
        let label = if self.single_fact { "el siguiente hecho" } else { "los siguientes hechos" };
        doc.push(format!("{joined} {verb} {} {label}:", self.defendants.to_defendant()));

        for (i, fact) in self.record.facts.iter().enumerate() {
            let description = inline_with_paragraphs(&fact.description);
            let description = if description.is_empty() {
                anchor("", FieldKey::FactDescription(i), Some("hecho"))
            } else {
                anchor_html(&format!("<i>{description}</i>"), FieldKey::FactDescription(i), None)
            };
            let clarification = fact.clarifications.trim();
            let clarification =
                (!clarification.is_empty()).then(|| anchor(clarification, FieldKey::FactClarifications(i), None));

            let paragraph = match (self.single_fact, clarification) {
                (true, Some(note)) => format!("{description} ({note})"),
                (true, None) => description,
                (false, Some(note)) => format!("<b>{} hecho ({note})</b>: {description}", fact_ordinal(i)),
                (false, None) => format!("<b>{} hecho:</b> {description}", fact_ordinal(i)),
            };
            doc.push(paragraph);
        }
    }

    // --- Questions ---

    fn questions(&self, doc: &mut Document) {
        let existence = if self.single_fact {
            "la existencia del hecho"
        } else {
            "la existencia de los hechos"
        };
        doc.push("El tribunal se planteó las siguientes cuestiones a resolver:");
        doc.push(format!(
            "{QUESTION_INDENT}<b>PRIMERA CUESTIÓN:</b> ¿Están probadas {existence} y la participación responsable {}?",
            self.defendants.of_accused()
        ));
        doc.push(format!(
            "{QUESTION_INDENT}<b>SEGUNDA CUESTIÓN:</b> en su caso, ¿qué calificación legal es aplicable?"
        ));
        doc.push(format!(
            "{QUESTION_INDENT}<b>TERCERA CUESTIÓN:</b> ¿qué pronunciamiento corresponde dictar?"
        ));
    }

    // --- First question ---

    fn first_question(&self, doc: &mut Document) {
        doc.push(self.speaker_heading("PRIMERA CUESTIÓN PLANTEADA"));
        self.accusation(doc);
        self.abbreviated_procedure(doc);
        self.declarations(doc);
        self.acceptance(doc);
        self.evidence_and_closings(doc);
        self.last_word(doc);
        self.assessment(doc);
        self.conclusion(doc);
    }

    /// Defendants grouped by identical charges: (joined names, charge anchor, group size).
    fn charge_groups(&self) -> Vec<(String, String, usize)> {
        let pairs = self
            .record
            .defendants
            .iter()
            .enumerate()
            .map(|(i, d)| (d.offenses.trim(), i));
        group_by_shared_value(pairs)
            .into_iter()
            .map(|group| {
                let names: Vec<&str> = group.members.iter().map(|&i| self.plain_names[i].as_str()).collect();
                let charge = anchor(group.key, FieldKey::Offenses(group.members[0]), Some("Delitos"));
                (join_with_and(&names), charge, group.members.len())
            })
            .collect()
    }

    fn accusation(&self, doc: &mut Document) {
        let clauses = join_with_semicolon_and(&self.referral_clauses());
        let contained = if self.single_fact {
            "del hecho contenido"
        } else {
            "de los hechos contenidos"
        };
        doc.push(format!(
            "<b>1. Acusación:</b> la exigencia impuesta en el artículo 408, inc. 1º del CPP se encuentra satisfecha \
             con la enunciación al comienzo de la sentencia {contained} en {}, a donde me remito para ser breve.",
            lowercase_leading_article(&clauses)
        ));

        let prefix = if self.single_defendant() && self.single_fact {
            "Por tal conducta se acusa"
        } else {
            "Por tales conductas se acusa"
        };
        let charged: Vec<String> = self
            .charge_groups()
            .into_iter()
            .map(|(names, charge, _)| format!("a {names} bajo la calificación legal de {charge}"))
            .collect();
        if !charged.is_empty() {
            doc.push(format!("{prefix} {}.", join_with_semicolon_and(&charged)));
        }
    }

    fn abbreviated_procedure(&self, doc: &mut Document) {
        let r = self.record;
        doc.push("<b>2. Trámite de juicio abreviado (art. 415 CPP):</b>");

        let (defense, agreement) = if self.single_defendant() {
            ("la defensa", "del acuerdo alcanzado")
        } else if self.defender_groups(true).len() > 1 {
            ("las defensas", "de los acuerdos alcanzados")
        } else {
            ("la defensa", "de los acuerdos alcanzados")
        };
        let penalties = if self.single_defendant() {
            let sentence = r.defendants.first().map_or("", |d| plain(&d.agreed_sentence));
            format!("la de {}", anchor(sentence, FieldKey::AgreedSentence(0), Some("Condena")))
        } else {
            let parts: Vec<String> = r
                .defendants
                .iter()
                .enumerate()
                .map(|(i, d)| {
                    let sentence = anchor(plain(&d.agreed_sentence), FieldKey::AgreedSentence(i), Some("Condena"));
                    format!("para {}, la de {sentence}", self.plain_names[i])
                })
                .collect();
            join_with_semicolon_and(&parts)
        };
        doc.push(format!(
            "<b>a) Acuerdo:</b> {defense} y la fiscalía hicieron conocer los términos {agreement} para la realización \
             de un juicio abreviado que, en cuanto a la pena, determinó {penalties}."
        ));

        let subject = plain(&r.eventual_subject);
        let statement = plain(&r.subject_statement);
        if !subject.is_empty() || !statement.is_empty() {
            doc.push(format!(
                "Se le concedió la palabra a {} para que exprese su opinión acerca del acuerdo informado, y manifestó: {}.",
                anchor(subject, FieldKey::EventualSubject, None),
                anchor(statement, FieldKey::SubjectStatement, None),
            ));
        }

        let (understood, knew) = if self.single_defendant() {
            ("comprendía", "conocía")
        } else {
            ("comprendían", "conocían")
        };
        doc.push(format!(
            "Las características de esta modalidad de juzgamiento y del acuerdo mencionado fueron explicados por el \
             tribunal {}, y se verificó así que {understood} su contenido y sus consecuencias, que {knew} su derecho \
             a exigir un juicio oral, y que su conformidad era libre y voluntaria.",
            self.defendants.to_accused()
        ));

        let victim_statement = plain(&r.victim_statement);
        if !victim_statement.is_empty() {
            let victim = anchor(plain(&r.victim), FieldKey::Victim, Some("la víctima"));
            let statement = anchor(victim_statement, FieldKey::VictimStatement, None);
            let (informed, said) = if r.victim_plural {
                ("fueron previamente informadas", "manifestaron")
            } else {
                ("fue previamente informada", "manifestó")
            };
            doc.push(format!(
                "Además, {} fiscal hizo saber que {victim} {informed} acerca de dichos aspectos y que {said} {statement}.",
                r.prosecutor_gender.article()
            ));
        }
    }

    fn declarations(&self, doc: &mut Document) {
        let r = self.record;
        doc.push(format!("<b>b) Declaración {}:</b>", self.defendants.of_defendant()));

        let mut conditions = format!(
            "<b>Condiciones personales:</b> al ser {} por el tribunal y las partes, además de los datos consignados \
             al comienzo de esta resolución, ",
            self.defendants.questioned()
        );
        for (i, d) in r.defendants.iter().enumerate() {
            let said = anchor_html(&rich(&d.personal_conditions), FieldKey::Conditions(i), Some("[condiciones]"));
            let verb = CONDITION_VERBS[i % CONDITION_VERBS.len()];
            if i == 0 {
                conditions.push_str(&format!("<b>{}</b> {verb} que {said}.", self.names[i]));
            } else {
                let prefix = CONDITION_PREFIXES[(i - 1) % CONDITION_PREFIXES.len()];
                conditions.push_str(&format!(" {prefix}<b>{}</b> {verb} que {said}.", self.names[i]));
            }
        }
        doc.push(conditions);

        self.prior_records(doc);
        self.confessions(doc);
    }

    fn prior_records(&self, doc: &mut Document) {
        let r = self.record;
        if r.defendants.is_empty() {
            doc.push(
                "En cuanto a sus antecedentes penales, por Secretaría no se cuenta con información alguna o no hubo \
                 datos cargados.",
            );
            return;
        }

        let mentions: Vec<String> = r
            .defendants
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let name = format!("<b>{}</b>", self.names[i]);
                let key = FieldKey::PriorRecord(i);
                let detail = rich(&d.prior_record);
                if d.no_prior_record {
                    format!("{name} {}.", anchor("no registra condenas computables", key, None))
                } else if detail.is_empty() {
                    format!("{name} {}", anchor("registra antecedentes penales (sin detalle).", key, None))
                } else {
                    format!(
                        "{name} registra los siguientes antecedentes: {}.",
                        anchor_html(&detail, key, None)
                    )
                }
            })
            .collect();

        let mixed = r.defendants.iter().any(|d| d.no_prior_record) && r.defendants.iter().any(|d| !d.no_prior_record);
        let mut text = String::from("En cuanto a sus antecedentes penales, por Secretaría se informó que ");
        let last = mentions.len() - 1;
        for (i, mention) in mentions.iter().enumerate() {
            if i == 0 {
                text.push_str(mention);
                continue;
            }
            let prefix = if i == 1 && mixed {
                "Por su parte,"
            } else if i == last {
                "Finalmente,"
            } else {
                RECORD_PREFIXES[(i - 1) % RECORD_PREFIXES.len()]
            };
            text.push_str(&format!(" {prefix} {mention}"));
        }
        doc.push(text);
    }

    fn confessions(&self, doc: &mut Document) {
        let r = self.record;
        let facts = if self.single_fact { "del hecho" } else { "de los hechos" };
        let attributed = match (self.single_defendant(), self.single_fact) {
            (true, true) => "se le atribuye",
            (true, false) => "se le atribuyen",
            (false, true) => "se les atribuye",
            (false, false) => "se les atribuyen",
        };
        let informed = format!(
            "{} {} {}",
            self.defendants.defendant(),
            self.defendants.by_number("fue", "fueron"),
            self.defendants.informed()
        );
        let law_grants = self
            .defendants
            .by_number("que le acuerda la ley", "que la ley les acuerda");
        let preamble = format!(
            "<b>Confesión:</b> A fin de ratificar la voluntad manifestada en el acuerdo previo para la realización del \
             juicio abreviado, {informed} detalladamente {facts} que {attributed}, de las pruebas existentes en su \
             contra y de la facultad {law_grants} de abstenerse de prestar declaración sin que su silencio implique \
             una presunción de culpabilidad (arts. 385 y 259 CPP) sino la sola consecuencia de impedir el trámite del \
             art. 415 CPP."
        );

        let confession = |i: usize| {
            let text = r.defendants.get(i).map_or("", |d| plain(&d.confession));
            anchor(text, FieldKey::Confession(i), Some("[confesión]"))
        };

        if self.single_defendant() {
            let name = self.names.first().cloned().unwrap_or_else(|| "[imputado]".to_string());
            doc.push(format!("{preamble} Ante ello, {name} dijo: “{}”.", confession(0)));
            return;
        }

        doc.push(preamble);
        for i in 0..r.defendants.len() {
            let prefix = CONFESSION_PREFIXES[i % CONFESSION_PREFIXES.len()];
            let verb = CONFESSION_VERBS[i % CONFESSION_VERBS.len()];
            doc.push(format!("{prefix} {} {verb}: “{}”.", self.names[i], confession(i)));
        }
    }

    fn acceptance(&self, doc: &mut Document) {
        let subject = if self.single_defendant() {
            self.defendants.defendant()
        } else {
            self.defendants.accused_noun()
        };
        let by_number = |s, p| self.defendants.by_number(s, p);
        doc.push(format!(
            "<b>c) Aceptación del Tribunal:</b> de la reseña que precede surge que se han cumplimentado los requisitos \
             de ley, pues se ha corroborado que {subject} {} acabadamente {} de los términos del acuerdo y que {} su \
             conformidad de manera libre y voluntaria. Asimismo, {} lisa y llanamente su responsabilidad en los mismos \
             términos en que {} ha sido atribuida por la acusación.",
            by_number("ha sido", "han sido"),
            self.defendants.informed(),
            by_number("ha expresado", "han expresado"),
            by_number("ha reconocido", "han reconocido"),
            by_number("le", "les"),
        ));

        doc.push(self.calification_check());

        let requests = self
            .defendants
            .by_number("la solicitud formulada", "las solicitudes formuladas");
        let defense = match self.defender_groups(true).len() {
            0 => "la defensa",
            1 => "su defensa",
            _ => "sus defensas",
        };
        doc.push(format!(
            "Tales constataciones son las únicas habilitadas por la ley al Tribunal en el marco del juicio abreviado \
             (TSJ, Sala Penal, S. n° 124, 19/04/2017, \"Cabrera\", entre otros; Jaime, Marcelo Nicolás, \"El juicio \
             abreviado\", en AAVV, Comentarios a la reforma del Código Procesal Penal, dir. Maximiliano Hairabedián, \
             Advocatus, 2017, págs. 161/162; Cafferata Nores –Tarditti, cit., T. 2, pág. 314), y por ello corresponde \
             hacer lugar a {requests} por el Ministerio Público Fiscal, {} y {defense}.",
            self.defendants.defendant()
        ));
    }

    /// The four-way (defendants × facts) wording of the calification check.
    fn calification_check(&self) -> String {
        let one_each = self.single_defendant() && self.single_fact;
        match self.record.calification {
            Calification::Correct => {
                let facts = match (self.single_fact, self.single_defendant()) {
                    (true, true) => "el hecho que se le achaca",
                    (true, false) => "el hecho que se les achaca",
                    (false, true) => "los hechos que se le achacan",
                    (false, false) => "los hechos que se les achacan",
                };
                let penalty = self.defendants.by_number(
                    "la pena pactada se encuentra",
                    "las penas pactadas se encuentran",
                );
                let offense = if one_each { "el delito endilgado" } else { "los delitos endilgados" };
                format!(
                    "La calificación legal asignada por la fiscalía es correcta para {facts} y {penalty} dentro de la \
                     escala penal prevista para {offense} (art. 415 CPP)."
                )
            }
            Calification::Incorrect => {
                let amount = self.defendants.by_number(
                    "el monto punitivo acordado porque este se encuentra",
                    "los montos punitivos acordados porque estos se encuentran",
                );
                let offense = if one_each { "el delito aplicable" } else { "los delitos aplicables" };
                format!(
                    "La calificación legal amerita cierta corrección que se expondrá luego en la segunda cuestión, \
                     pero que no afecta {amount} dentro de la escala penal prevista para {offense} (art. 415 CPP)."
                )
            }
        }
    }

    fn evidence_and_closings(&self, doc: &mut Document) {
        let r = self.record;
        let evidence = anchor_html(&rich(&r.evidence), FieldKey::Evidence, Some("pruebas"));
        doc.push(format!(
            "<b>3. Enumeración de la prueba:</b> según lo dispuesto por el artículo 415 CPP y a pedido de las partes, \
             se incorporó la prueba recolectada durante la investigación penal preparatoria y la investigación \
             preliminar: {evidence}."
        ));
        let prosecution = anchor_html(&rich(&r.prosecution_closing), FieldKey::ProsecutionClosing, Some("alegato fiscal"));
        let defense = anchor_html(&rich(&r.defense_closing), FieldKey::DefenseClosing, Some("alegato defensa"));
        doc.push(format!(
            "<b>4. Discusión final:</b> finalmente, las partes emitieron sus conclusiones de acuerdo con sus \
             respectivos intereses. Así, la Fiscalía manifestó {prosecution}. Por su parte, la defensa expuso {defense}."
        ));
    }

    fn last_word(&self, doc: &mut Document) {
        let r = self.record;
        let (speakers, silent): (Vec<usize>, Vec<usize>) =
            (0..r.defendants.len()).partition(|&i| !r.defendants[i].final_statement.trim().is_empty());
        let said = |i: usize| {
            anchor(
                plain(&r.defendants[i].final_statement),
                FieldKey::FinalStatement(i),
                Some("[última palabra]"),
            )
        };

        if speakers.is_empty() {
            for i in silent {
                let declined = anchor("manifestó que no haría uso de ella", FieldKey::FinalStatement(i), None);
                doc.push(format!(
                    "Finalmente, al concederse la última palabra, {} {declined}.",
                    self.names[i]
                ));
            }
            return;
        }

        for (n, &i) in speakers.iter().enumerate() {
            if n == 0 {
                doc.push(format!(
                    "Finalmente, al concederse la última palabra, {} dijo: “{}”.",
                    self.names[i],
                    said(i)
                ));
            } else {
                doc.push(format!("Seguidamente, {} dijo: “{}”.", self.names[i], said(i)));
            }
        }
        for i in silent {
            let declined = anchor("manifestó que no haría uso de la palabra", FieldKey::FinalStatement(i), None);
            doc.push(format!("Por último, {} {declined}.", self.names[i]));
        }
    }

    fn assessment(&self, doc: &mut Document) {
        let r = self.record;
        let facts = if self.single_fact { "el hecho" } else { "los hechos" };
        let configure = if self.single_fact { "configura" } else { "configuran" };
        let accused = self.defendants.of_accused();
        let to_them = self.defendants.by_number("le", "les");
        let standard = "satisfacen plenamente el estándar probatorio requerido para tener por acreditada la \
                        plataforma fáctica";

        let body = match r.violence_context {
            ViolenceContext::NotApplicable => format!(
                "los elementos de juicio enunciados y los argumentos desarrollados en la acusación base del juicio de \
                 la causa aquí juzgada, sumados a la argumentación del fiscal al momento emitir las conclusiones, en \
                 las que solicitó la condena –todo lo cual hago mío por razones de brevedad– {standard} bajo análisis \
                 y la participación {accused} tal como {to_them} ha sido atribuida."
            ),
            ViolenceContext::DomesticGender => format!(
                "{facts} motivo de juzgamiento {configure} un caso de violencia de género doméstica. De acuerdo con \
                 ello, debe recordarse que el rasgo característico de la violencia de género es el posicionamiento del \
                 varón, respecto de la mujer, en una condición de superioridad, a través de cualquiera de los tipos de \
                 violencia (art. 5, ley 26485), y en desmedro de su derecho a contar con un ámbito de determinación \
                 para su personal proyecto de vida; de allí la demostración de poder, dominación o control por la \
                 violencia (TSJ, Sala Penal, S. nº 273, 23/06/2016, “Medina”, entre otros). Estos casos, a su vez, \
                 tienen “...particularidades que los diferencian de otros delitos pues aquí la víctima sufre reiterados \
                 comportamientos agresivos, una escalada de violencia cada día o semana más agravada y de mayor riesgo, \
                 caracterizada por su duración, multiplicidad y aumento de gravedad. Precisamente, el contexto de \
                 violencia, comprendido como un fenómeno de múltiples ofensas de gravedad progresiva que se extienden a \
                 través del tiempo, debe ser ponderado en su capacidad de suministrar indicios… Máxime, cuando estos \
                 hechos ocurren en un marco de vulnerabilidad, dado que raramente se realizan a la vista de terceros, \
                 porque una de las características de la dominación por violencia en sus múltiples manifestaciones es \
                 precisamente el aislamiento de la víctima. Las particulares características de los hechos de violencia \
                 doméstica y de género, hace que cobre especial relevancia, como también sucede con la violencia \
                 sexual, el relato de la víctima, el que adquiere un valor convictivo de preferente ponderación en la \
                 medida que resulte fiable y se encuentre corroborado por indicios, siempre que éstos tengan una \
                 confluencia de conjunto que conduzcan a dotar de razón suficiente la conclusión…” (TSJ, Sala Penal, S. \
                 n° 84, 04/05/2012, “Sánchez”, entre muchos otros). Y en función de tales circunstancias, es necesario \
                 abordar su investigación y juzgamiento bajo un criterio de amplitud probatoria (TSJ, Sala Penal, S. n° \
                 266, 15/10/2010, “Agüero”; S. nº 28, 11/3/2014, “Sosa”; S. n° 182, 26/05/2017, “Oviedo”; entre muchos \
                 otros). Tales exigencias derivan de la obligación de debida diligencia que impone el conjunto de \
                 instrumentos internacionales ratificados por nuestro país para este tipo de casos (arts. 7 “b”, \
                 Convención Interamericana para Prevenir, Sancionar y Erradicar la Violencia contra la Mujer –Belém do \
                 Pará-, 2 “c”, CEDAW). A partir de dicho marco, considero que los elementos de juicio enunciados y los \
                 argumentos desarrollados en la acusación base del juicio, sumados a la argumentación del fiscal al \
                 momento de emitir las conclusiones, en las que solicitó la condena –todo lo cual hago mío por razones \
                 de brevedad– {standard} bajo análisis y la intervención {accused} tal como {to_them} ha sido atribuida."
            ),
            context @ (ViolenceContext::Gender | ViolenceContext::Family) => format!(
                "{facts} motivo de juzgamiento {configure} un caso de {}. Los elementos de juicio enunciados y los \
                 argumentos desarrollados en la acusación base del juicio de la causa aquí juzgada, sumados a la \
                 argumentación del fiscal al momento emitir las conclusiones, en las que solicitó la condena –todo lo \
                 cual hago mío por razones de brevedad– {standard} y la intervención {accused} tal como {to_them} ha \
                 sido atribuida.",
                context.label()
            ),
        };
        doc.push(format!("<b>5. Valoración de la prueba:</b> {body}"));

        let (occurred, described) = if self.single_fact {
            ("ocurrió", "ha sido")
        } else {
            ("ocurrieron", "han sido")
        };
        let key_evidence = anchor_html(&rich(&r.key_evidence), FieldKey::KeyEvidence, Some("pruebas relevantes"));
        doc.push(format!(
            "Al examinar el contenido de tales evidencias, las encuentro suficientes para dictar una condena, pues \
             –sin espacio para el principio según el cual la duda debe favorecer a la persona imputada– ponen de \
             manifiesto que {facts} {occurred} tal como {described} en la acusación (TSJ, Sala Penal, “Bergamaschi”, \
             S. n° 363, 26/08/2021; “Moreira”, S. n° 361, 26/09/2022, entre otros). Tal confluencia es la que emerge, \
             en especial a partir de {key_evidence}."
        ));

        let g = &self.defendants;
        let subject = g.defendant();
        doc.push(format!(
            "Agrego que esta contundencia probatoria ha sido expresamente admitida por la defensa técnica {} durante \
             la audiencia. Ello ocurrió, además, en un contexto en el que el tribunal se aseguró de corroborar que \
             {subject} {} en plenas condiciones de libertad para reconocer su responsabilidad, que comprendieran la \
             naturaleza de lo que asentían y el alcance de los hechos que luego reconocieron y sus consecuencias \
             jurídicas. Más allá de lo ya expuesto, el contenido de la prueba y los fundamentos de la acusación constan \
             en el expediente, y las conclusiones de las partes han quedado en el registro fílmico de la audiencia. A \
             todo ello me remito para su consulta si fuere necesario, pues cualquier transcripción adicional de todo o \
             parte de tal motivación de la premisa fáctica supondría un desgaste innecesario e inútil que, incluso, \
             contradiría los objetivos de economía y celeridad a los que se orienta la modalidad abreviada de juicio \
             elegida. Cabe recordar, en este sentido, que tanto el máximo tribunal de la Nación como el de la \
             Provincia, han sostenido de manera constante la validez de la argumentación por remisión en la medida en \
             que esas razones sean asequibles, tal como ocurre en el caso (cfme., CSJN \"Macasa S.A. v/ Caja Popular \
             de Ahorro...\", Fallos 319:308; TSJ, Sala Penal, \"Rivero\", S. n° 33, 9/11/1984; \"González\", S. n° \
             90, 16/10/2002; “Romero”, S. nº 50, 19/3/2008; entre otros). Aclaro, finalmente, que no existen causales \
             de inimputabilidad o de justificación (adviértase que ninguna de las partes ha hecho invocación alguna \
             en ese sentido), por lo que {subject} {} penalmente {} y como {} {} responder.",
            g.of_defendant(),
            g.by_number("se hallara", "se hallaran"),
            g.by_number("es", "son"),
            g.by_number("responsable", "responsables"),
            g.by_number("tal", "tales"),
            g.by_number("debe", "deben"),
        ));
    }

    fn conclusion(&self, doc: &mut Document) {
        let (facts, leave, fixed, transcribed) = if self.single_fact {
            ("el hecho", "dejarlo", "fijado", "ha sido transcripto")
        } else {
            ("los hechos", "dejarlos", "fijados", "han sido transcriptos")
        };
        let potential = if self.record.potential_terms {
            ", debiendo entenderse que, con motivo de haberse arribado al grado de certeza exigido en esta instancia \
             procesal, los términos potenciales allí utilizados deben ser comprendidos aquí de modo indicativo"
        } else {
            ""
        };
        doc.push(format!(
            "<b>6. Conclusión:</b> en función de lo expuesto, corresponde dar por acreditada la responsabilidad de {} \
             en {facts} motivo de juicio y {leave} {fixed} tal como {transcribed}{potential}. Dejo así satisfecha la \
             exigencia impuesta en el artículo 408 inc. 3° del CPP y respondo afirmativamente a esta primera cuestión.",
            self.all_names()
        ));
    }

    // --- Second question ---

    fn second_question(&self, doc: &mut Document) {
        let r = self.record;
        doc.push(self.speaker_heading("SEGUNDA CUESTIÓN"));

        let framings: Vec<String> = self
            .charge_groups()
            .into_iter()
            .map(|(names, charge, size)| {
                let verb = if size > 1 { "deben responder" } else { "debe responder" };
                format!("{names} {verb} bajo el encuadre legal de {charge}")
            })
            .collect();
        let framings = join_with_semicolon_and(&framings);

        let subsumption = match r.calification {
            Calification::Correct => "La subsunción legal propuesta por la Fiscalía al emitir sus conclusiones \
                 resulta correcta. Dado que la subsunción legal propuesta por la Fiscalía coincide con la de la \
                 acusación base del juicio y no ha sido materia de controversia por las partes, me exime de mayores \
                 consideraciones, pues a los fines de la debida motivación jurídica de la sentencia, es suficiente la \
                 mención de la norma en la que se apoya la decisión (TSJ, Sala Penal, S. n° 190, del 11/8/2010, \
                 “Castillo”)."
                .to_string(),
            Calification::Incorrect => {
                let correction = plain(&r.calification_correction);
                let caveat = if correction.is_empty() {
                    String::new()
                } else {
                    format!(
                        ", con la salvedad de que {}",
                        anchor(correction, FieldKey::CalificationCorrection, None)
                    )
                };
                format!(
                    "La subsunción legal propuesta por la Fiscalía coincide con la de la acusación base del juicio y \
                     no ha sido materia de controversia por las partes, lo que me exime de mayores consideraciones, \
                     pues a los fines de la debida motivación jurídica de la sentencia, es suficiente la mención de la \
                     norma en la que se apoya la decisión (TSJ, Sala Penal, S. n° 190, del 11/8/2010, \
                     “Castillo”){caveat}."
                )
            }
        };

        doc.push(format!(
            "En función del modo en que se ha dado respuesta al primer interrogante, {framings}. {subsumption}"
        ));
        doc.push("Así respondo a la presente cuestión.");
    }

    // --- Third question ---

    fn third_question(&self, doc: &mut Document) {
        let r = self.record;
        doc.push(self.speaker_heading("TERCERA CUESTIÓN"));

        let mut counter = SectionCounter::new();
        doc.push(format!(
            "<b>{}. Pena:</b> Para graduar {} a imponer, tengo en cuenta las pautas objetivas y subjetivas de \
             mensuración de la pena establecidas en los arts. 40 y 41 del CP.",
            counter.next_label(),
            self.defendants.by_number("la sanción", "las sanciones"),
        ));

        for (i, d) in r.defendants.iter().enumerate() {
            let factors = anchor_html(&rich(&d.sentencing_factors), FieldKey::SentencingFactors(i), Some("[pautas]"));
            let intro = FACTOR_INTROS[i % FACTOR_INTROS.len()];
            let verb = FACTOR_VERBS[i % FACTOR_VERBS.len()];
            if i == 0 {
                doc.push(format!("Así, {intro} {}, {verb} {factors}.", self.names[i]));
            } else {
                doc.push(format!("{} {}, {verb} {factors}.", capitalize_first(intro), self.names[i]));
            }
        }

        for (i, d) in r.defendants.iter().enumerate() {
            let sentence = anchor(plain(&d.agreed_sentence), FieldKey::AgreedSentence(i), Some("Condena"));
            if i == 0 {
                doc.push(format!(
                    "Por ello, teniendo en especial consideración el límite máximo que impone el art. 415 del CPP al \
                     Tribunal para la individualización judicial de la pena, al establecer que no se podrá aplicar una \
                     pena más grave que la pedida por el Representante del Ministerio Público Fiscal y acordada con el \
                     acusado y su defensor, ni modificar su forma de ejecución, corresponde imponerle a {}, para su \
                     tratamiento penitenciario, la pena de {sentence}.",
                    self.names[i]
                ));
            } else {
                let intro = PENALTY_INTROS[(i - 1) % PENALTY_INTROS.len()];
                doc.push(format!("{intro} corresponde imponerle a {} la pena de {sentence}.", self.names[i]));
            }
        }

        let clause_view = ClauseView {
            record: r,
            names: &self.names,
        };
        for paragraph in emit_numbered(&third_question_rules(), &clause_view, &mut counter) {
            doc.push(paragraph);
        }

        doc.push("Así respondo a la presente cuestión.");
        doc.push("Por todo lo expuesto, y normas legales citadas, <b>RESUELVO:</b>");
        doc.push(operative_part(&r.operative_part));
    }
}

/// The operative part as written, or a prompt to write it.
pub fn operative_part(markup: &str) -> String {
    if to_plain_text(markup).trim().is_empty() {
        anchor("[Editar resuelvo]", FieldKey::OperativePart, None)
    } else {
        anchor_html(&inline_with_paragraphs(markup), FieldKey::OperativePart, None)
    }
}

// --- Third question: conditional numbered clauses ---

struct ClauseView<'a> {
    record: &'a CaseRecord,
    names: &'a [String],
}

impl ClauseView<'_> {
    fn with_defender(&self, kind: DefenderKind) -> impl Iterator<Item = usize> + '_ {
        self.record
            .defendants
            .iter()
            .enumerate()
            .filter(move |(_, d)| d.defender_kind == kind)
            .map(|(i, _)| i)
    }
}

/// Order matters: numbering follows emission order after "I. Pena".
fn third_question_rules<'a>() -> [ClauseRule<ClauseView<'a>>; 5] {
    [
        ClauseRule {
            title: "Decomiso",
            applies: |v| v.record.confiscation,
            body: confiscation_clause,
        },
        ClauseRule {
            title: "Restricción de contacto y acercamiento",
            applies: |v| v.record.contact_restriction,
            body: restriction_clause,
        },
        ClauseRule {
            title: "Honorarios y eximición de tasa de justicia",
            applies: |v| v.with_defender(DefenderKind::Public).next().is_some(),
            body: public_defense_clause,
        },
        ClauseRule {
            title: "Tasa de justicia",
            applies: |v| v.with_defender(DefenderKind::Private).next().is_some(),
            body: court_fee_clause,
        },
        ClauseRule {
            title: "Comunicaciones",
            applies: |_| true,
            body: communications_clause,
        },
    ]
}

fn confiscation_clause(view: &ClauseView<'_>) -> String {
    let text = inline_with_paragraphs(&view.record.confiscation_text);
    if text.is_empty() {
        anchor(DEFAULT_CONFISCATION_TEXT, FieldKey::Confiscation, None)
    } else {
        anchor_html(&text, FieldKey::Confiscation, None)
    }
}

fn restriction_clause(view: &ClauseView<'_>) -> String {
    let text = inline_with_paragraphs(&view.record.restriction_text);
    if text.is_empty() {
        anchor(DEFAULT_RESTRICTION_TEXT, FieldKey::Restriction, None)
    } else {
        anchor_html(&text, FieldKey::Restriction, None)
    }
}

fn public_defense_clause(view: &ClauseView<'_>) -> String {
    let public: Vec<usize> = view.with_defender(DefenderKind::Public).collect();
    let mut defenders: Vec<String> = public
        .iter()
        .map(|&i| view.record.defendants[i].defender.trim())
        .filter(|name| !name.is_empty())
        .map(escape_html)
        .collect();
    defenders.sort();
    defenders.dedup();
    let defenders = if defenders.is_empty() {
        "la Asesoría Letrada".to_string()
    } else {
        join_with_and(&defenders)
    };

    let genders: Vec<Gender> = public.iter().map(|&i| view.record.defendants[i].gender).collect();
    let group = gender_agreement(&genders);
    format!(
        "por otra parte, debe retribuirse la labor prestada por la defensa pública a cargo de {defenders}, la que, \
         conforme las reglas cualitativas del artículo 39 de la ley arancelaria, estimo adecuado fijar en la suma de \
         30 jus (arts. 24, 36, 39, 89, 90 y cc. Ley 9459), y a la vez eximir {} del pago de la tasa de justicia por \
         ser {} de la asistencia jurídica gratuita (art. 31 ley 7982).",
        group.to_defendant(),
        group.beneficiary()
    )
}

fn court_fee_clause(view: &ClauseView<'_>) -> String {
    let private: Vec<&str> = view
        .with_defender(DefenderKind::Private)
        .map(|i| view.names[i].as_str())
        .collect();
    let pay = if private.len() == 1 { "abone" } else { "abonen" };
    format!(
        "corresponde emplazar a {} para que, en el plazo de quince días desde que quede firme la presente sentencia, \
         {pay} la suma equivalente a 1,5 jus en concepto de Tasa de Justicia, bajo apercibimiento de certificarse su \
         existencia y librarse título para su remisión a la Oficina de Tasa de Justicia del Área Administración del \
         Poder Judicial a los fines de su ejecución (arts. 295 y cc del Código Tributario Provincial, ley 6006 y sus \
         modificatorias).",
        join_with_and(&private)
    )
}

fn communications_clause(view: &ClauseView<'_>) -> String {
    let r = view.record;
    let extra_law = if r.violence_context.is_violence_case() {
        " y por el art. 28 de la Ley provincial 9283"
    } else {
        ""
    };
    let victims = r.victim.split(',').filter(|v| !v.trim().is_empty()).count();
    let (whom, require, express) = if victims > 1 {
        ("las personas damnificadas", "requerírseles", "manifiesten su voluntad")
    } else {
        ("la persona damnificada", "requerírsele", "manifieste su voluntad")
    };
    format!(
        "finalmente, de conformidad a lo dispuesto por el art. 11 bis –penúltimo párrafo– de la Ley 24660{extra_law}, \
         así como por el art. 96 del CPP, debe informarse lo resuelto a {whom} y {require} que {express} en relación a \
         las facultades que les corresponde a partir del dictado de esta sentencia. También se deberá efectuar el \
         cómputo de pena y formar el legajo de ejecución (art. 4 del Acuerdo Reglamentario nº 896, Serie A, del Excmo. \
         Tribunal Superior de Justicia) y, una vez que quede firme la presente sentencia, oficiar al Registro Nacional \
         de Reincidencia a los fines del art. 2° de la Ley 22117."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ctx() -> RenderContext {
        RenderContext::new(NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(), "Córdoba")
    }

    #[test]
    fn referral_clauses_lowercase_after_the_first() {
        let mut record = CaseRecord::with_counts(1, 2);
        record.facts[0].order_number = "12".into();
        record.facts[1].referral = ReferralOffice::Prosecution;
        record.facts[1].referral_date = "3/4/2024".into();
        record.facts[1].issuing_office = "Fiscalía de Instrucción".into();
        let doc = render_sentence(&record, &ctx());
        let text = doc.to_plain_text();
        assert!(text.contains(
            "El auto de elevación a juicio n° 12; y el requerimiento de citación a juicio de fecha 3/4/2024, \
             dictado por Fiscalía de Instrucción atribuyeron al imputado los siguientes hechos:"
        ));
        assert!(text.contains("Primer hecho:"));
        assert!(text.contains("Segundo hecho:"));
    }

    #[test]
    fn shared_charges_are_merged() {
        let mut record = CaseRecord::with_counts(3, 1);
        for (i, name) in ["Ana", "Luis", "Eva"].iter().enumerate() {
            record.defendants[i].name = name.to_string();
        }
        record.defendants[0].offenses = "robo".into();
        record.defendants[1].offenses = "hurto".into();
        record.defendants[2].offenses = "robo".into();
        let text = render_sentence(&record, &ctx()).to_plain_text();
        assert!(text.contains("Por tales conductas se acusa a Ana y Eva bajo la calificación legal de robo; y a Luis"));
        assert!(text.contains("Ana y Eva deben responder bajo el encuadre legal de robo; y Luis debe responder"));
    }

    #[test]
    fn blank_operative_part_prompts_for_it() {
        assert!(operative_part("<p> </p>").contains("[Editar resuelvo]"));
        assert!(operative_part("<p>I. Declarar</p>").contains("I. Declarar"));
    }
}
