use chrono::{Duration, NaiveTime};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

use crate::grammar::agreement::gender_agreement;
use crate::grammar::lists::join_with_and;
use crate::grammar::numerals::{date_long, date_numeric, date_to_words};
use crate::grammar::punctuation::without_final_period;
use crate::markup::document::{escape_html, text_or, Alignment, Document};
use crate::markup::sanitize::to_plain_text;
use crate::render::context::RenderContext;
use crate::types::case_record::{CaseRecord, DefendantRecord, SentenceKind};

pub const NO_DEFENDANT: &str = "Aún no hay datos del imputado.";
pub const NOT_FOR_EFFECTIVE: &str = "No aplica para penas efectivas.";
pub const NOT_FOR_CONDITIONAL: &str = "No aplica para penas condicionales.";
pub const NOT_NEEDED_FOR_CONDITIONAL: &str = "No es necesario en penas de ejecución condicional.";
pub const TREATMENT_NOT_ORDERED: &str = "No aplica para penas efectivas o no seleccionado.";
pub const NO_WAIVER: &str = "No hubo renuncia a los plazos para interponer recurso de casación.";

const PENITENTIARY_HEAD: [&str; 4] = [
    "SRA. JEFA DEL SERVICIO",
    "PENITENCIARIO DE LA",
    "PROVINCIA DE CÓRDOBA",
    "S______________/______________D",
];

const FACILITIES: [(&str, &str); 10] = [
    ("CC1 (Bouwer)", "Complejo Carcelario n.° 1 (Bouwer)"),
    ("EP9 (UCA)", "Establecimiento Penitenciario n.° 9 (UCA)"),
    ("EP3 (para mujeres)", "Establecimiento Penitenciario n.° 3 (para mujeres)"),
    ("CC2 (Cruz del Eje)", "Complejo Carcelario n.° 2 (Cruz del Eje)"),
    ("EP4 (Monte Cristo)", "Establecimiento Penitenciario n.° 4 (Colonia Abierta Monte Cristo)"),
    (
        "EP4 (Colonia Abierta Monte Cristo)",
        "Establecimiento Penitenciario n.° 4 (Colonia Abierta Monte Cristo)",
    ),
    ("EP5 (Villa María)", "Establecimiento Penitenciario n.° 5 (Villa María)"),
    ("EP6 (Río Cuarto)", "Establecimiento Penitenciario n.° 6 (Río Cuarto)"),
    ("EP7 (San Francisco)", "Establecimiento Penitenciario n.° 7 (San Francisco)"),
    ("EP8 (Villa Dolores)", "Establecimiento Penitenciario n.° 8 (Villa Dolores)"),
];

/// Every document issued around an abbreviated trial besides the sentence itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LetterKind {
    HearingRequest,
    HearingOfficeLetter,
    HearingDecree,
    Notification,
    AppealWaiver,
    RecordingCertificate,
    VictimCertificate,
    NeuroTreatment,
    CivTreatment,
    Release,
    Police,
    Recidivism,
    Computation,
    PenitentiaryTreatment,
    SentenceCommunication,
    EnforcementFile,
    CustodyTransfer,
}

impl LetterKind {
    pub const ALL: [LetterKind; 17] = [
        LetterKind::HearingRequest,
        LetterKind::HearingOfficeLetter,
        LetterKind::HearingDecree,
        LetterKind::Notification,
        LetterKind::AppealWaiver,
        LetterKind::RecordingCertificate,
        LetterKind::VictimCertificate,
        LetterKind::NeuroTreatment,
        LetterKind::CivTreatment,
        LetterKind::Release,
        LetterKind::Police,
        LetterKind::Recidivism,
        LetterKind::Computation,
        LetterKind::PenitentiaryTreatment,
        LetterKind::SentenceCommunication,
        LetterKind::EnforcementFile,
        LetterKind::CustodyTransfer,
    ];

    /// Tab title shown next to the sentence.
    pub fn title(self) -> &'static str {
        match self {
            LetterKind::HearingRequest => "Pedido de audiencia",
            LetterKind::HearingOfficeLetter => "Oficio OGA",
            LetterKind::HearingDecree => "Decreto audiencia",
            LetterKind::Notification => "Oficio notificación",
            LetterKind::AppealWaiver => "Acta renuncia",
            LetterKind::RecordingCertificate => "Constancia grabación",
            LetterKind::VictimCertificate => "Certificado víctimas",
            LetterKind::NeuroTreatment => "Oficio Neuro",
            LetterKind::CivTreatment => "Oficio CIV",
            LetterKind::Release => "Oficio libertad",
            LetterKind::Police => "Oficio Policía",
            LetterKind::Recidivism => "Oficio Reincidencia",
            LetterKind::Computation => "Oficio cómputo",
            LetterKind::PenitentiaryTreatment => "Oficio SPC",
            LetterKind::SentenceCommunication => "Oficio comunicación",
            LetterKind::EnforcementFile => "Legajo",
            LetterKind::CustodyTransfer => "Puesta a disposición",
        }
    }

    /// Whether the letter depends on the selected defendant.
    pub fn per_defendant(self) -> bool {
        !matches!(
            self,
            LetterKind::HearingRequest
                | LetterKind::HearingOfficeLetter
                | LetterKind::HearingDecree
                | LetterKind::AppealWaiver
                | LetterKind::RecordingCertificate
                | LetterKind::VictimCertificate
        )
    }
}

/// Renders one letter for the defendant at `defendant`.
///
/// Letters that do not apply to the case come back as a single notice line.
pub fn render_letter(kind: LetterKind, record: &CaseRecord, defendant: usize, ctx: &RenderContext) -> Document {
    let letter = Letter { record, ctx };
    let doc = match (kind, record.defendants.get(defendant)) {
        (LetterKind::HearingRequest, _) => letter.hearing_request(),
        (LetterKind::HearingOfficeLetter, _) => letter.hearing_office_letter(),
        (LetterKind::HearingDecree, _) => letter.hearing_decree(),
        (LetterKind::AppealWaiver, _) => letter.appeal_waiver(),
        (LetterKind::RecordingCertificate, _) => letter.recording_certificate(),
        (LetterKind::VictimCertificate, _) => letter.victim_certificate(),
        (LetterKind::NeuroTreatment | LetterKind::CivTreatment, None) => notice(TREATMENT_NOT_ORDERED),
        (LetterKind::CustodyTransfer, None) => notice(NOT_NEEDED_FOR_CONDITIONAL),
        (_, None) => notice(NO_DEFENDANT),
        (LetterKind::Notification, Some(d)) => letter.notification(d),
        (LetterKind::NeuroTreatment, Some(d)) => letter.neuro_treatment(d),
        (LetterKind::CivTreatment, Some(d)) => letter.civ_treatment(d),
        (LetterKind::Release, Some(d)) => letter.release(d),
        (LetterKind::Police, Some(d)) => letter.police(d),
        (LetterKind::Recidivism, Some(d)) => letter.recidivism(d),
        (LetterKind::Computation, Some(d)) => letter.computation(d),
        (LetterKind::PenitentiaryTreatment, Some(d)) => letter.penitentiary_treatment(d),
        (LetterKind::SentenceCommunication, Some(d)) => letter.sentence_communication(d),
        (LetterKind::EnforcementFile, Some(d)) => letter.enforcement_file(d),
        (LetterKind::CustodyTransfer, Some(d)) => letter.custody_transfer(d),
    };
    debug!(letter = kind.title(), defendant, paragraphs = doc.len(), "rendered letter");
    doc
}

fn notice(text: &str) -> Document {
    let mut doc = Document::new();
    doc.push(escape_html(text));
    doc
}

/// Full name for a facility abbreviation; unknown values pass through.
pub fn facility_full_name(facility: &str) -> &str {
    let facility = facility.trim();
    FACILITIES
        .iter()
        .find(|(short, _)| *short == facility)
        .map_or(facility, |(_, full)| full)
}

/// The time printed on the waiver record: one hour after the hearing.
pub fn waiver_time(hearing_time: &str) -> String {
    let hearing_time = hearing_time.trim();
    if hearing_time.is_empty() {
        return "Hora no especificada".to_string();
    }
    match NaiveTime::parse_from_str(hearing_time, "%H:%M") {
        Ok(time) => (time + Duration::hours(1)).format("%H:%M").to_string(),
        Err(_) => "Hora inválida".to_string(),
    }
}

fn point_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b([IVX]+|\d{1,2})\.\s+").unwrap_or_else(|e| panic!("invalid point regex: {e}"))
    })
}

fn declares() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bdeclar").unwrap_or_else(|e| panic!("invalid declar regex: {e}")))
}

/// Operative points ("I. ...", "2. ...") that declare something, joined by
/// spaces. These are the ones the recidivism registry records.
pub fn declaratory_points(operative: &str) -> String {
    let markers: Vec<_> = point_marker().captures_iter(operative).collect();
    let mut points = Vec::new();
    for (i, caps) in markers.iter().enumerate() {
        let (Some(whole), Some(number)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let end = markers
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(operative.len(), |m| m.start());
        let body = operative[whole.end()..end].trim();
        if declares().is_match(body) {
            points.push(format!("{}. {body}", number.as_str()));
        }
    }
    points.join(" ")
}

fn bold(text: &str) -> String {
    format!("<b>{}</b>", escape_html(text))
}

fn quoted(text: &str) -> String {
    format!("<i>“{}”</i>", escape_html(text.trim()))
}

/// Single-line plain text of a stored rich field.
fn flat(markup: &str) -> String {
    to_plain_text(markup).split_whitespace().collect::<Vec<_>>().join(" ")
}

struct Letter<'a> {
    record: &'a CaseRecord,
    ctx: &'a RenderContext,
}

impl Letter<'_> {
    fn locality(&self) -> &str {
        self.record.locality_or(&self.ctx.default_locality)
    }

    fn dated_heading(&self, doc: &mut Document) {
        doc.push_aligned(
            Alignment::Right,
            format!("{}, {}.", escape_html(self.locality()), date_long(self.ctx.today)),
        );
    }

    fn office_stamp(&self) -> String {
        format!("{}, {}", escape_html(self.locality()), date_numeric(self.ctx.today))
    }

    fn addressee(&self, doc: &mut Document, lines: &[&str], underlined: Option<usize>) {
        for (i, line) in lines.iter().enumerate() {
            if Some(i) == underlined {
                doc.push_aligned(Alignment::Left, format!("<b><u>{}</u></b>", escape_html(line)));
            } else {
                doc.push_aligned(Alignment::Left, bold(line));
            }
        }
        doc.blank_line();
    }

    fn closing(&self, doc: &mut Document, text: &str) {
        doc.blank_line();
        doc.push_aligned(Alignment::Center, bold(text));
    }

    fn caption(&self) -> String {
        bold(self.record.caption.trim())
    }

    fn court(&self) -> String {
        escape_html(self.record.court.trim())
    }

    /// "esta Cámara ..." / "este Juzgado ...".
    fn before_court(&self) -> String {
        format!("{} {}", self.record.court_demonstrative(), self.court())
    }

    fn named_defendants(&self) -> Vec<&DefendantRecord> {
        self.record
            .defendants
            .iter()
            .filter(|d| !d.name.trim().is_empty())
            .collect()
    }

    fn named_list(&self) -> String {
        let names: Vec<String> = self
            .named_defendants()
            .iter()
            .map(|d| escape_html(d.name.trim()))
            .collect();
        join_with_and(&names)
    }

    fn operative_plain(&self) -> String {
        flat(&self.record.operative_part)
    }

    fn hearing_request(&self) -> Document {
        let mut doc = Document::new();
        doc.push(format!(
            "{}, {}.",
            escape_html(self.locality()),
            date_to_words(self.ctx.today)
        ));
        doc.push(
            "Atento al requerimiento de audiencia oral de juicio abreviado inicial, admítase la solicitud y \
             requiérase vía e-oficio a la Oficina de Gestión de Audiencias (OGA) que fije día y hora de realización \
             de la audiencia presencial y asigne la sala para su desarrollo (art. 336 del CPP y Anexo II del AR n.º \
             1747 Serie “A” de fecha 1/4/2022).",
        );
        doc
    }

    fn hearing_office_letter(&self) -> Document {
        let mut doc = Document::new();
        self.dated_heading(&mut doc);
        doc.blank_line();
        self.addressee(&mut doc, &["Sr. Director de", "OGA Penal", "S ____________/______________D"], None);
        doc.push(format!(
            "En los autos caratulados {}, que se tramitan en {}, secretaría a cargo de {}, se ha resuelto librar a \
             Ud. el presente oficio a fin de solicitar fecha y hora de audiencia de juicio abreviado inicial, \
             conforme la información que se suministra por archivo adjunto.",
            self.caption(),
            self.before_court(),
            escape_html(self.record.clerk_office.trim()),
        ));
        self.closing(&mut doc, "Saludo a Ud. atentamente.");
        doc
    }

    /// The decree body, shared with the notification letter.
    fn decree_body(&self) -> String {
        let named = self.named_defendants();
        let genders: Vec<_> = named.iter().map(|d| d.gender).collect();
        let group = gender_agreement(&genders);
        let situation = match named.len() {
            0 => group.of_defendant(),
            _ => format!("{} {}", group.of_defendant(), self.named_list()),
        };
        format!(
            "Atento a lo informado por la Oficina de Gestión de Audiencias (OGA) mediante oficio electrónico, \
             notifíquese a las partes que se ha fijado audiencia a los fines de resolver la situación procesal \
             {situation} para el <b><u>día {} a las {} h en la {} de Tribunales II</u></b> (art. 336 del CPP).",
            text_or(&self.record.hearing_date, "Fecha"),
            text_or(&self.record.hearing_time, "Hora"),
            text_or(&self.record.courtroom, "Sala"),
        )
    }

    fn hearing_decree(&self) -> Document {
        let mut doc = Document::new();
        doc.push(format!(
            "{}, {}.",
            escape_html(self.locality()),
            date_to_words(self.ctx.today)
        ));
        doc.blank_line();
        doc.push(self.decree_body());
        doc
    }

    fn notification(&self, defendant: &DefendantRecord) -> Document {
        let group = gender_agreement(&[defendant.gender]);
        let name = escape_html(defendant.name.trim());
        let mut doc = Document::new();
        self.dated_heading(&mut doc);
        doc.blank_line();
        self.addressee(
            &mut doc,
            &[
                "Sra. Jefa del Servicio Penitenciario",
                "de la Provincia de Córdoba",
                "S ____________/______________D",
            ],
            None,
        );
        doc.push(format!(
            "En los autos caratulados {}, que se tramitan en {} se ha resuelto enviar el presente oficio a fin de \
             solicitarle quiera tener a bien notificar la siguiente cédula {} <b>{name}</b>, DNI n.° {}, cuya \
             constancia de diligenciamiento deberá ser remitida a esta dependencia judicial:",
            self.caption(),
            self.before_court(),
            group.to_defendant(),
            escape_html(defendant.national_id.trim()),
        ));
        doc.blank_line();
        doc.push_aligned(Alignment::Center, "<b><u>CÉDULA DE NOTIFICACIÓN</u></b>");
        doc.push_aligned(Alignment::Left, format!("TRIBUNAL: {}.", self.court()));
        doc.push_aligned(
            Alignment::Left,
            format!("SECRETARÍA: {}.", escape_html(self.record.clerk_office.trim())),
        );
        doc.push_aligned(Alignment::Left, format!("SEÑOR/A: {name}."));
        doc.push_aligned(
            Alignment::Left,
            format!("DOMICILIO: {}.", escape_html(facility_full_name(&defendant.facility))),
        );
        doc.blank_line();
        doc.push(format!(
            "Se le hace saber a Ud. que en los autos caratulados {}, que se tramitan en {} se ha dictado la \
             siguiente resolución: “{}, {}. {}” <b>Fdo.:</b> {}.",
            self.caption(),
            self.before_court(),
            escape_html(self.locality()),
            date_to_words(self.ctx.today),
            self.decree_body(),
            escape_html(self.record.official.trim()),
        ));
        doc.blank_line();
        doc.push_aligned(Alignment::Center, "<b>QUEDA UD. DEBIDAMENTE NOTIFICADO.</b>");
        doc.push_aligned(Alignment::Center, "<b>Sin otro particular, saludo a Ud. atte.</b>");
        doc
    }

    fn appeal_waiver(&self) -> Document {
        if !self.record.appeal_waived {
            return notice(NO_WAIVER);
        }
        let named = self.named_defendants();
        let mut defenders: Vec<String> = Vec::new();
        for d in &self.record.defendants {
            let defender = d.defender.trim();
            if !defender.is_empty() && !defenders.iter().any(|seen| seen == defender) {
                defenders.push(defender.to_string());
            }
        }
        let defenders: Vec<String> = defenders.iter().map(|d| escape_html(d)).collect();
        let genders: Vec<_> = named.iter().map(|d| d.gender).collect();
        let defendants_label = gender_agreement(&genders).defendant();

        let mut doc = Document::new();
        doc.push(format!(
            "En la ciudad de {}, el {}, siendo las {} horas, en los presentes autos caratulados {}, luego de haberse \
             impuesto los fundamentos y el veredicto del día de la fecha, {}; {}; y {defendants_label} {} manifestaron \
             su voluntad de renunciar al plazo para interponer el recurso establecido en los arts. 468 y 469 del CPP, \
             conforme lo estipulado por el art. 474 del CPP.",
            escape_html(self.locality()),
            date_long(self.ctx.today),
            waiver_time(&self.record.hearing_time),
            escape_html(self.record.caption.trim()),
            text_or(&self.record.prosecutor_name, "Sin datos de fiscal"),
            if defenders.is_empty() {
                "Sin datos de defensa".to_string()
            } else {
                join_with_and(&defenders)
            },
            if named.is_empty() {
                "Sin datos del penado".to_string()
            } else {
                self.named_list()
            },
        ));
        doc.blank_line();
        doc.push(
            "Con lo que dio por terminado el acto, el que previa lectura dada en alta voz y ratificación de su \
             contenido, firman las partes, todo por ante mí, de lo que doy fe.",
        );
        doc
    }

    fn recording_certificate(&self) -> Document {
        let mut doc = Document::new();
        doc.push(format!(
            "Por medio de la presente, adjunto el archivo PDF que contiene el enlace de la grabación de la audiencia \
             de juicio abreviado inicial celebrada con fecha {}, en la que se resolvió la situación procesal de {}. \
             Of., {}.",
            escape_html(self.record.hearing_date.trim()),
            self.named_list(),
            date_numeric(self.ctx.today),
        ));
        doc
    }

    fn victim_certificate(&self) -> Document {
        let mut victims: Vec<&str> = Vec::new();
        for d in &self.record.defendants {
            let v = d.victims.trim();
            if !v.is_empty() && !victims.contains(&v) {
                victims.push(v);
            }
        }
        let victims: Vec<String> = victims.into_iter().map(escape_html).collect();
        let victims = join_with_and(&victims);

        let mut doc = Document::new();
        doc.push(format!(
            "Certifico: que en el día de la fecha logré entablar comunicación con {victims}, damnificado/s en la \
             presente causa, a fin de hacerle/s conocer la sentencia recaída en autos y conocer su voluntad respecto \
             de las facultades que le/s confiere el art. 11 bis de la Ley 24.660. En dicha ocasión, {victims} \
             manifestó/aron su voluntad de SER / NO SER anoticiado/s de los eventuales beneficios de libertad. Of., \
             {}.",
            date_numeric(self.ctx.today),
        ));
        doc
    }

    fn neuro_treatment(&self, defendant: &DefendantRecord) -> Document {
        if !defendant.neuro_treatment || defendant.sentence_kind != SentenceKind::Conditional {
            return notice(TREATMENT_NOT_ORDERED);
        }
        let mut doc = Document::new();
        self.dated_heading(&mut doc);
        doc.blank_line();
        self.addressee(
            &mut doc,
            &[
                "AL SR. DIRECTOR",
                "DEL HOSPITAL",
                "NEUROPSIQUIÁTRICO",
                "PROVINCIAL",
                "(Rector León Morra 160)",
                "S___________/___________D",
            ],
            Some(4),
        );
        doc.push(format!(
            "En los autos caratulados {}, que se tramitan ante {}, se ha resuelto librar a Ud. el presente a fin de \
             solicitarle que arbitre los medios necesarios para que {}, DNI n.° {}, reciba en la institución a su \
             cargo un tratamiento interdisciplinario acorde con la problemática de adicción a sustancias \
             estupefacientes que padece. Fundamenta el presente lo resuelto por veredicto dictado por este tribunal \
             en el día de la fecha, en el que se impuso a la persona nombrada la pena bajo una serie de condiciones, \
             entre ellas: <i>“Iniciar un tratamiento interdisciplinario acorde a la problemática de adicción a \
             sustancias estupefacientes que padece, debiendo presentar constancia del inicio del mismo en el término \
             de 15 días ante el tribunal de ejecución interviniente”.</i> En consecuencia, se solicita a Ud. la \
             elaboración de un informe periódico dirigido a este tribunal, en el que comente la asistencia al \
             tratamiento, así como su avance, y todo otro dato de interés.",
            self.caption(),
            self.before_court(),
            bold(defendant.name.trim()),
            escape_html(defendant.national_id.trim()),
        ));
        self.closing(&mut doc, "Saluda a Ud. atte.");
        doc
    }

    fn civ_treatment(&self, defendant: &DefendantRecord) -> Document {
        if !defendant.civ_treatment || defendant.sentence_kind != SentenceKind::Conditional {
            return notice(TREATMENT_NOT_ORDERED);
        }
        let mut doc = Document::new();
        self.dated_heading(&mut doc);
        doc.blank_line();
        self.addressee(
            &mut doc,
            &[
                "AL SR. DIRECTOR DEL",
                "CENTRO INTEGRAL DE VARONES",
                "(Rondeau 258, Nueva Córdoba)",
                "S______________/______________D",
            ],
            Some(1),
        );
        doc.push(format!(
            "En los presentes autos caratulados {}, que se tramitan por ante {}, secretaría a cargo de {}, por \
             disposición de S.S. se dirige a Ud. el presente oficio a fin de solicitarle disponga los medios \
             necesarios para brindar asistencia psicoterapéutica a {}, DNI n.° {}, con relación a su problemática de \
             violencia de género. Tal petición encuentra razón en que este Tribunal dispuso como condición de su \
             libertad la realización de dicho tratamiento.",
            self.caption(),
            self.before_court(),
            escape_html(self.record.clerk_office.trim()),
            bold(defendant.name.trim()),
            escape_html(defendant.national_id.trim()),
        ));
        self.closing(&mut doc, "Sin otro particular, saluda a Ud. atte.");
        doc
    }

    fn release(&self, defendant: &DefendantRecord) -> Document {
        if defendant.sentence_kind != SentenceKind::Conditional {
            return notice(NOT_FOR_EFFECTIVE);
        }
        let mut doc = Document::new();
        self.dated_heading(&mut doc);
        self.addressee(
            &mut doc,
            &[
                "A LA SRA. JEFA DEL",
                "SERVICIO PENITENCIARIO",
                "DE LA PROVINCIA DE CÓRDOBA",
                "S___________/___________D",
            ],
            None,
        );
        doc.push(format!(
            "En los autos caratulados {} que se tramitan ante {}, se ha dispuesto dirigir a Ud. el presente a fin de \
             que disponga lo necesario para que se ponga inmediatamente en libertad, desde la Alcaidía de Tribunales \
             II, a {}, DNI n.° {}, en virtud de que por veredicto de este tribunal dictado en el día de la fecha se le \
             impuso la pena de {}, disponiéndose su inmediata libertad. Deberá labrarse el acta respectiva y deberá \
             requerírsele a la persona condenada que fije domicilio, el que deberá quedar consignado en el acta de \
             libertad. La libertad se deberá disponer previa constatación de que el nombrado no se encuentre a \
             disposición de otro tribunal.",
            self.caption(),
            self.before_court(),
            bold(defendant.name.trim()),
            escape_html(defendant.national_id.trim()),
            escape_html(without_final_period(&flat(&defendant.agreed_sentence))),
        ));
        self.closing(&mut doc, "Sin otro particular, saludo a Ud. atte.");
        doc
    }

    fn police(&self, defendant: &DefendantRecord) -> Document {
        let facts = if defendant.fact_count_label.trim() == "uno" {
            "un hecho"
        } else {
            "hechos"
        };
        let signatories = self.record.signatories.trim();
        let mut doc = Document::new();
        self.dated_heading(&mut doc);
        self.addressee(
            &mut doc,
            &[
                "AL SEÑOR DIRECTOR DE LA",
                "DIVISIÓN DOCUMENTACIÓN PERSONAL",
                "POLICÍA DE LA PROVINCIA DE CÓRDOBA",
                "S______________/______________D",
            ],
            None,
        );
        doc.push(format!(
            "En los autos caratulados {}, tramitados por ante {}, se ha resuelto librar a Ud. el presente a fin de \
             que proceda a la anotación correspondiente de la <b>sentencia n.° {}</b> en los presentes autos, con \
             relación a {}, DNI n.° {}, por {facts} de fecha {}, que <b>RESUELVE:</b> {}. <b>Fdo.:</b> {}.",
            self.caption(),
            self.before_court(),
            escape_html(self.record.sentence_number.trim()),
            bold(defendant.name.trim()),
            escape_html(defendant.national_id.trim()),
            escape_html(without_final_period(defendant.fact_dates.trim())),
            quoted(&self.operative_plain()),
            bold(signatories),
        ));
        self.closing(&mut doc, "Saludo a Ud. atte.");
        doc
    }

    fn recidivism(&self, defendant: &DefendantRecord) -> Document {
        let pair = |title: &str, value: &str| format!("<b>{}:</b> {}", escape_html(title), escape_html(value.trim()));
        let final_date = if self.record.appeal_waived {
            self.record.hearing_date.trim()
        } else {
            ""
        };

        let mut doc = Document::new();
        doc.push_aligned(Alignment::Center, "MINISTERIO DE JUSTICIA, SEGURIDAD Y DERECHOS HUMANOS");
        doc.push_aligned(Alignment::Center, "REGISTRO NACIONAL DE REINCIDENCIA");
        doc.blank_line();
        doc.push_aligned(Alignment::Center, "<b><u>TESTIMONIO DE SENTENCIA CONDENATORIA</u></b>");
        doc.blank_line();
        doc.push(pair("Sentencia", &format!("N° {}", self.record.sentence_number.trim())));
        doc.push(pair(
            "Tribunal interviniente",
            &format!(
                "{}, Secretaría n.° {}",
                self.record.court.trim(),
                self.record.clerk_office.trim()
            ),
        ));
        doc.push(pair(
            "Otros juzgados o tribunales intervinientes en la causa con anterioridad",
            "",
        ));
        doc.push(pair("Expediente", &self.record.caption));
        doc.push(pair("Datos personales", &flat(&defendant.personal_data)));
        doc.push(pair("Fecha de comisión del delito", &defendant.fact_dates));
        doc.push(pair("Localidad de comisión del delito", self.locality()));
        doc.push(pair("Damnificado", &defendant.victims));
        doc.push(pair(
            "Descripción de la pena",
            &format!("prisión de ejecución {}", defendant.sentence_kind.label()),
        ));
        doc.push(format!(
            "<b>•    Pena:</b> {}",
            escape_html(&flat(&defendant.agreed_sentence))
        ));
        doc.push(format!(
            "<b><u>TESTIMONIO</u>:</b> <i>\"(...) {} (...)\"</i>",
            escape_html(&declaratory_points(&self.operative_plain()))
        ));
        doc.push(pair("Fecha de cumplimiento total de la pena", &defendant.completion_date));
        doc.push(pair("Fecha en que la sentencia quedó firme", final_date));
        doc.push(pair("Fecha de envío del testimonio", &date_numeric(self.ctx.today)));
        doc.push(pair("Organismo remitente", "Poder Judicial de la Provincia de Córdoba"));
        doc
    }

    fn computation(&self, defendant: &DefendantRecord) -> Document {
        if defendant.sentence_kind != SentenceKind::Effective {
            return notice(NOT_FOR_CONDITIONAL);
        }
        let name = defendant.name.trim();
        let mut doc = Document::new();
        self.dated_heading(&mut doc);
        self.addressee(&mut doc, &PENITENTIARY_HEAD, None);
        doc.push(format!(
            "En los autos caratulados {}, que se tramitan por ante {}, se ha resuelto enviar el presente oficio a fin \
             de solicitarle quiera tener a bien notificar la siguiente cédula a {}, DNI n.° {}, cuya constancia de \
             diligenciamiento deberá ser remitida a esta dependencia judicial:",
            self.caption(),
            self.before_court(),
            bold(name),
            escape_html(defendant.national_id.trim()),
        ));
        doc.blank_line();
        doc.push_aligned(Alignment::Center, "<b><u>CÉDULA DE NOTIFICACIÓN</u></b>");
        doc.blank_line();
        doc.push(format!(
            "TRIBUNAL: {}, Fructuoso Rivera n.° 720, Palacio de Tribunales II.",
            self.court()
        ));
        doc.push(format!(
            "SECRETARÍA: {}.",
            escape_html(self.record.clerk_office.trim())
        ));
        doc.push(format!("SEÑOR: {}.", escape_html(name)));
        doc.push(format!(
            "DOMICILIO: {}.",
            escape_html(facility_full_name(&defendant.facility))
        ));
        doc.blank_line();
        doc.push(format!(
            "Se hace saber a Ud. que en los autos caratulados {}, que se tramitan por ante {}, se ha dictado la \
             siguiente resolución: {}. <b>Fdo.:</b> {}.",
            self.caption(),
            self.before_court(),
            quoted(&flat(&defendant.computation_decree)),
            bold(defendant.decree_signatories.trim()),
        ));
        doc.push_aligned(Alignment::Right, format!("Of. {}.", self.office_stamp()));
        doc.push_aligned(Alignment::Center, "<b>Saludo a Ud. atte.</b>");
        doc
    }

    fn penitentiary_treatment(&self, defendant: &DefendantRecord) -> Document {
        if defendant.sentence_kind != SentenceKind::Effective {
            return notice(NOT_FOR_CONDITIONAL);
        }
        let mut doc = Document::new();
        self.dated_heading(&mut doc);
        self.addressee(
            &mut doc,
            &[
                "SR. DIRECTOR DEL",
                "ESTABLECIMIENTO PENITENCIARIO",
                "PBRO. LUCHESSE –BOWER–",
                "S__________________/__________________D",
            ],
            None,
        );
        doc.push(format!(
            "En los autos caratulados {}, que se tramitan por ante {}, se ha dispuesto librar a Ud. el presente, a \
             fin de que cumplimente con lo resuelto por este tribunal en la <b>sentencia n.° {}</b>, con relación a \
             {}, DNI n.° {}, a los efectos de que arbitre los medios necesarios para que {}.",
            self.caption(),
            self.before_court(),
            escape_html(self.record.sentence_number.trim()),
            bold(defendant.name.trim()),
            escape_html(defendant.national_id.trim()),
            escape_html(without_final_period(&flat(&defendant.ordered_treatment))),
        ));
        doc.blank_line();
        doc.push(format!(
            "Para mayor recaudo se transcribe la parte resolutiva que así lo dispone: {}. <b>Fdo.:</b> {}.",
            quoted(&flat(&defendant.treatment_clause)),
            bold(self.record.signatories.trim()),
        ));
        self.closing(&mut doc, "Saludo a Ud. atte.");
        doc
    }

    fn sentence_communication(&self, defendant: &DefendantRecord) -> Document {
        if defendant.sentence_kind != SentenceKind::Effective {
            return notice(NOT_NEEDED_FOR_CONDITIONAL);
        }
        let group = gender_agreement(&[defendant.gender]);
        let mut doc = Document::new();
        self.dated_heading(&mut doc);
        self.addressee(&mut doc, &PENITENTIARY_HEAD, None);
        doc.push(format!(
            "En los autos caratulados {}, tramitados por ante {}, se ha resuelto librar a Ud. el presente a fin de \
             informarle que {} {}, DNI n.° {}, ha sido {} a la pena de {}. Ello en virtud de que se ha llevado a \
             cabo un juicio abreviado inicial y mediante <b>sentencia n.° {}</b>, se resolvió: {}. <b>Fdo.:</b> {}.",
            self.caption(),
            self.before_court(),
            group.defendant(),
            bold(defendant.name.trim()),
            escape_html(defendant.national_id.trim()),
            group.inflect("condenad"),
            bold(without_final_period(&flat(&defendant.agreed_sentence))),
            escape_html(self.record.sentence_number.trim()),
            quoted(&self.operative_plain()),
            bold(self.record.signatories.trim()),
        ));
        let finality = if self.record.appeal_waived {
            format!(
                " {} por renuncia expresa de las partes a los plazos para interponer recurso de casación",
                escape_html(self.record.hearing_date.trim())
            )
        } else {
            String::new()
        };
        doc.push(format!(
            "Asimismo, se hace saber que dicha sentencia quedó firme con fecha{finality}. A continuación, se \
             transcribe el decreto que establece el cómputo definitivo de la pena impuesta: {}. <b>Fdo.:</b> {}.",
            quoted(&flat(&defendant.computation_decree)),
            bold(defendant.decree_signatories.trim()),
        ));
        self.closing(&mut doc, "Saludo a Ud. atte.");
        doc
    }

    fn enforcement_file(&self, defendant: &DefendantRecord) -> Document {
        let subtitle = match defendant.sentence_kind {
            SentenceKind::Conditional => "Pena privativa de la libertad de ejecución condicional",
            SentenceKind::Effective => "Pena privativa de la libertad",
        };
        let fields = [
            ("Causa caratulada", self.record.caption.trim().to_string()),
            ("Tribunal", self.record.court.trim().to_string()),
            (
                "Penado",
                format!("{}, {}", defendant.name.trim(), flat(&defendant.personal_data)),
            ),
            ("Detención", defendant.detention.trim().to_string()),
            ("Sentencia", format!("n.° {}", self.record.sentence_number.trim())),
            ("Delitos", flat(&defendant.offenses)),
            ("Condena", flat(&defendant.agreed_sentence)),
            ("Cómputo de pena", defendant.completion_date.trim().to_string()),
            ("Defensa", defendant.defender.trim().to_string()),
            ("Víctimas", defendant.victims.trim().to_string()),
        ];

        let mut doc = Document::new();
        doc.push_aligned(
            Alignment::Center,
            "<b><u>LEGAJO DE REMISIÓN AL JUZGADO DE EJECUCIÓN PENAL</u></b>",
        );
        doc.push_aligned(Alignment::Center, bold(subtitle));
        for (title, value) in fields {
            doc.blank_line();
            doc.push(format!("<u>{title}</u>: {}", escape_html(&value)));
        }
        doc.blank_line();
        doc.push("-La sentencia recaída en autos se encuentra firme y el cómputo de pena es definitivo.");
        doc.push(
            "-Se hace saber a Ud. que ya se han remitido los correspondientes oficios al Servicio Penitenciario en \
             cumplimiento del art. 505 del Código Procesal Penal de la Provincia de Córdoba, a la Policía de la \
             Provincia de Córdoba y al Registro Nacional de Reincidencia, comunicando la sentencia dictada en autos y \
             el cómputo de pena.",
        );
        doc
    }

    fn custody_transfer(&self, defendant: &DefendantRecord) -> Document {
        if defendant.sentence_kind != SentenceKind::Effective {
            return notice(NOT_NEEDED_FOR_CONDITIONAL);
        }
        let name = bold(defendant.name.trim());
        let mut doc = Document::new();
        self.dated_heading(&mut doc);
        self.addressee(&mut doc, &PENITENTIARY_HEAD, None);
        doc.push(format!(
            "En los autos caratulados {}, que se tramitan ante {}, se le hace saber que el condenado {name}, DNI n.° \
             {}, queda a exclusiva disposición del Juzgado de Ejecución Penal n.° ……, bajo las actuaciones del \
             <b>Cuerpo de Ejecución de Pena Privativa de Libertad</b> de {name} (SAC n.º ……), siempre que no se \
             encuentre a disposición de otro tribunal.",
            self.caption(),
            self.before_court(),
            escape_html(defendant.national_id.trim()),
        ));
        self.closing(&mut doc, "Sin otro particular, saludo a Ud. atte.");
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::case_record::Gender;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn ctx() -> RenderContext {
        RenderContext::new(NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(), "Córdoba")
    }

    fn record(kind: SentenceKind) -> CaseRecord {
        let mut record = CaseRecord::with_counts(1, 1);
        record.caption = "PÉREZ, Juan p.s.a. robo".into();
        record.court = "Cámara en lo Criminal y Correccional de 5ª Nominación".into();
        record.court_kind = "Cámara en lo Criminal".into();
        record.defendants[0].name = "Juan Pérez".into();
        record.defendants[0].national_id = "30.123.456".into();
        record.defendants[0].sentence_kind = kind;
        record
    }

    #[test]
    fn facilities_expand_and_unknown_ones_pass_through() {
        assert_eq!(facility_full_name("CC1 (Bouwer)"), "Complejo Carcelario n.° 1 (Bouwer)");
        assert_eq!(facility_full_name("Comisaría 3"), "Comisaría 3");
    }

    #[test]
    fn waiver_is_one_hour_after_the_hearing() {
        assert_eq!(waiver_time("10:30"), "11:30");
        assert_eq!(waiver_time("23:15"), "00:15");
        assert_eq!(waiver_time(""), "Hora no especificada");
        assert_eq!(waiver_time("mediodía"), "Hora inválida");
    }

    #[test]
    fn only_declaratory_points_are_kept() {
        let operative = "I. Declarar a Juan Pérez autor del delito de robo. II. Imponerle la pena de un año. \
                         III. Declararlo reincidente.";
        assert_eq!(
            declaratory_points(operative),
            "I. Declarar a Juan Pérez autor del delito de robo. III. Declararlo reincidente."
        );
    }

    #[test]
    fn release_only_for_conditional_sentences() {
        let effective = render_letter(LetterKind::Release, &record(SentenceKind::Effective), 0, &ctx());
        assert_eq!(effective.to_plain_text(), NOT_FOR_EFFECTIVE);

        let conditional = render_letter(LetterKind::Release, &record(SentenceKind::Conditional), 0, &ctx());
        let text = conditional.to_plain_text();
        assert!(text.starts_with("Córdoba, 17 de octubre de 2026."));
        assert!(text.contains("que se tramitan ante esta Cámara en lo Criminal"));
        assert!(text.contains("a Juan Pérez, DNI n.° 30.123.456"));
    }

    #[test]
    fn missing_defendant_gets_a_notice() {
        let doc = render_letter(LetterKind::Police, &CaseRecord::default(), 0, &ctx());
        assert_eq!(doc.to_plain_text(), NO_DEFENDANT);
    }

    #[test]
    fn decree_agrees_with_a_single_woman() {
        let mut record = record(SentenceKind::Effective);
        record.defendants[0].gender = Gender::Female;
        record.defendants[0].name = "Ana Gómez".into();
        let text = render_letter(LetterKind::HearingDecree, &record, 0, &ctx()).to_plain_text();
        assert!(text.contains("situación procesal de la imputada Ana Gómez para el día"));
    }
}
