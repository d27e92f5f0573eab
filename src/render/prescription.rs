use tracing::debug;

use crate::grammar::agreement::gender_agreement;
use crate::grammar::lists::{group_by_shared_value, join_with_and, join_with_semicolon_and};
use crate::grammar::numerals::date_to_words;
use crate::grammar::punctuation::without_final_period;
use crate::markup::document::{anchor, anchor_html, text_or, Alignment, Document};
use crate::markup::sanitize::inline_with_paragraphs;
use crate::render::context::RenderContext;
use crate::types::case_record::CaseRecord;
use crate::types::field_key::FieldKey;

/// Renders a dismissal ruling for an expired prosecution (art. 350 inc. 4º CPP).
pub fn render_prescription(record: &CaseRecord, ctx: &RenderContext) -> Document {
    let details = &record.prescription;
    let group = gender_agreement(&record.defendant_genders());
    let single_fact = record.facts.len() <= 1;
    let fact_form = |singular: &'static str, plural: &'static str| if single_fact { singular } else { plural };

    let names: Vec<String> = (0..record.defendants.len())
        .map(|i| anchor(&record.defendant_name(i), FieldKey::DefendantName(i), None))
        .collect();
    let names = if names.is_empty() {
        "[imputado]".to_string()
    } else {
        join_with_and(&names)
    };

    let personal_data: Vec<String> = record
        .defendants
        .iter()
        .enumerate()
        .map(|(i, d)| {
            anchor_html(
                without_final_period(&inline_with_paragraphs(&d.personal_data)),
                FieldKey::DefendantData(i),
                Some("[datos personales]"),
            )
        })
        .collect();

    let offenses: Vec<String> = group_by_shared_value(
        record
            .defendants
            .iter()
            .enumerate()
            .map(|(i, d)| (d.offenses.trim(), i)),
    )
    .into_iter()
    .map(|g| anchor(g.key, FieldKey::Offenses(g.members[0]), Some("[delitos]")))
    .collect();
    let offenses = if offenses.is_empty() {
        "[delitos]".to_string()
    } else {
        join_with_and(&offenses)
    };

    let max_penalty = text_or(&details.max_penalty, "[pena máxima]");
    let total = if details.total { "total" } else { "parcial" };
    let mut doc = Document::new();

    doc.push_aligned(
        Alignment::Right,
        format!(
            "{}, {}.",
            text_or(record.locality_or(&ctx.default_locality), "Córdoba"),
            date_to_words(ctx.today)
        ),
    );

    doc.push(format!(
        "<b>VISTA:</b> la presente causa caratulada <b>{}</b>, venida a {} {} a los efectos de resolver la situación \
         procesal de {names}, {}.",
        anchor(&record.caption, FieldKey::Caption, Some("Carátula")),
        record.court_demonstrative(),
        anchor(&record.court, FieldKey::Court, Some("Tribunal")),
        join_with_semicolon_and(&personal_data),
    ));

    doc.push(format!(
        "<b>DE LA QUE RESULTA:</b> Que {} {names} se {} {} {}:",
        group.to_defendant(),
        group.by_number("le", "les"),
        fact_form("atribuye", "atribuyen"),
        fact_form("el siguiente hecho", "los siguientes hechos"),
    ));
    for (i, fact) in record.facts.iter().enumerate() {
        let description = inline_with_paragraphs(&fact.description);
        if description.is_empty() {
            doc.push(anchor("", FieldKey::FactDescription(i), Some("[hecho]")));
        } else {
            doc.push(anchor_html(&format!("<i>{description}</i>"), FieldKey::FactDescription(i), None));
        }
    }

    doc.push("<b>Y CONSIDERANDO:</b>");
    doc.push("I. Que durante la instrucción se colectaron los siguientes elementos probatorios:");
    doc.push(anchor_html(&inline_with_paragraphs(&record.evidence), FieldKey::Evidence, Some("[prueba]")));

    doc.push(format!(
        "II. Que {} {} requiere el sobreseimiento {total} en la presente causa respecto de {names}, por {} supra, {} \
         bajo la calificación legal de {offenses}, en virtud de lo dispuesto por los arts. 348 y 350 inc. 4º del CPP, \
         en función del art. 59 inc. 3º del CP, brindando los siguientes argumentos: {}",
        record.prosecutor_gender.honorific(),
        anchor(&record.prosecutor_name, FieldKey::Prosecutor, Some("Fiscal")),
        fact_form("el hecho mencionado", "los hechos mencionados"),
        fact_form("encuadrado", "encuadrados"),
        text_or(&details.prosecutor_arguments, "[argumentos del fiscal]"),
    ));

    doc.push("III. Conclusiones");
    doc.push(format!(
        "Analizada la cuestión traída a estudio, se advierte que {} a {names} {} efectivamente bajo la calificación \
         legal de {offenses}, cuya pena máxima conminada en abstracto es de {max_penalty} de prisión. En este \
         sentido, cabe aclarar que a los fines de computar el término para la prescripción del hecho imputado a \
         {names} en los presentes autos se debe tener en cuenta {}, conforme surge de la planilla prontuarial, del \
         Registro Nacional de Reincidencia y del Sistema de Administración de Causas. En efecto, {}",
        fact_form("el hecho atribuido", "los hechos atribuidos"),
        fact_form("encuadra", "encuadran"),
        text_or(&details.interruption, "[interrupción]"),
        text_or(&details.reasoning, "[fundamentación]"),
    ));

    let term_start = if details.runs_from_interruption {
        "de interrupción del plazo de la prescripción hasta su fecha del cumplimiento"
    } else {
        "del hecho hasta la fecha del cumplimiento de la prescripción"
    };
    doc.push(format!(
        "Así, teniendo en cuenta los términos referidos, entiendo que corresponde desvincular de la presente causa \
         {} {names} por la causal de procedencia descripta en el art. 350 inc. 4º del CPP. Ello así, porque, tal como \
         lo manifestó {} fiscal, a la fecha, ha transcurrido con exceso el término establecido por el art. 62 inc. 2° \
         del CP ({max_penalty} en este caso), el que desde la fecha {term_start} no fue interrumpido por la comisión \
         de nuevos delitos, conforme surge de la planilla prontuarial y del informe del Registro Nacional de \
         Reincidencia incorporados digitalmente, y no procede ninguna de las causales contempladas por el art. 67 del \
         CP, motivo por el cual ha de tenerse a la prescripción como causal de previo y especial pronunciamiento. Así \
         lo establece el alto tribunal de esta provincia: “…Esta Sala, compartiendo la posición ya asumida por otra \
         integración y por mayoría (A. nº 76, 29/6/93, \"Cappa\"; A. nº 60, 14/6/94, \"Vivian\"), ha sostenido que \
         habida cuenta de la naturaleza sustancial de las distintas causales de sobreseimiento, las extintivas de la \
         acción deben ser de previa consideración (T.S.J., Sala Penal, A. n° 26, 19/2/99, \"Rivarola\"; \"Pérez\", \
         cit.). Por ello, la sola presencia de una causal extintiva de la acción -en el caso, la prescripción- debe \
         ser estimada independientemente cualquiera sea la oportunidad de su producción y de su conocimiento por el \
         Tribunal, toda vez que -en términos procesales- significa un impedimento para continuar ejerciendo los \
         poderes de acción y de jurisdicción en procura de un pronunciamiento sobre el fondo (TSJ, Sala Penal, \
         “CARUNCHIO, Oscar Rubén p.s.a. Homicidio Culposo -Recurso de Casación-” -Expte. \"C\", 36/03-, S. n.° 104 \
         de fecha 16/9/2005).",
        group.to_defendant(),
        record.prosecutor_gender.article(),
    ));

    doc.push(format!(
        "IV. En consecuencia, y de conformidad a lo normado por los arts. 59 inc. 3° y 62 inc. 2° del CP y 350 del \
         CPP, corresponde declarar prescripta la pretensión punitiva penal emergente {} de {offenses} que se {} {} a \
         {names}.",
        fact_form(
            "del hecho calificado como configurativo",
            "de los hechos calificados como configurativos"
        ),
        group.by_number("le", "les"),
        fact_form("atribuía", "atribuían"),
    ));
    doc.push(
        "V. Finalmente, deberá oficiarse a la Policía de la Provincia de Córdoba y al Registro Nacional de \
         Reincidencia a fin de informar lo aquí resuelto.",
    );

    doc.push("Por lo expresado y disposiciones legales citadas; <b>RESUELVO:</b>");
    doc.push(format!(
        "I. Sobreseer {}, respecto {} de {} {}, a {names}, de condiciones personales ya relacionadas, por {} como \
         {offenses}, de conformidad con lo establecido por los arts. 348 y 350 inc. 4º del CPP, en función de los \
         arts. 59 inc. 3º, 62 inc. 2º y 67 del CP.",
        if details.total { "totalmente" } else { "parcialmente" },
        fact_form("del hecho", "de los hechos"),
        fact_form("fecha", "fechas"),
        text_or(&details.fact_dates, "[fechas de los hechos]"),
        fact_form("el hecho calificado", "los hechos calificados"),
    ));
    doc.push("II. Ofícese a la Policía de la Provincia de Córdoba y al Registro Nacional de Reincidencia, a sus efectos.");
    doc.push("<b>PROTOCOLÍCESE Y NOTIFÍQUESE.</b>");

    debug!(defendants = record.defendants.len(), total = details.total, "rendered prescription ruling");
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::case_record::Gender;
    use chrono::NaiveDate;

    #[test]
    fn partial_dismissal_for_two_women() {
        let mut record = CaseRecord::with_counts(2, 2);
        record.defendants[0].gender = Gender::Female;
        record.defendants[1].gender = Gender::Female;
        record.prescription.total = false;
        record.court_kind = "Cámara en lo Criminal".into();
        let ctx = RenderContext::new(NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(), "Córdoba");
        let text = render_prescription(&record, &ctx).to_plain_text();

        assert!(text.starts_with("Córdoba, diecisiete de octubre de dos mil veintiséis."));
        assert!(text.contains("venida a esta"));
        assert!(text.contains("Que a las imputadas Imputado#1 y Imputado#2 se les atribuyen los siguientes hechos:"));
        assert!(text.contains("I. Sobreseer parcialmente, respecto de los hechos de fechas"));
        assert!(text.ends_with("PROTOCOLÍCESE Y NOTIFÍQUESE."));
    }
}
