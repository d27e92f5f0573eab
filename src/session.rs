use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::config::Config;
use crate::markup::document::Document;
use crate::markup::highlight::{changed_spans, occurrence_spans, Highlight};
use crate::markup::sanitize::sanitize_for;
use crate::render::context::RenderContext;
use crate::render::letters::{render_letter, LetterKind};
use crate::render::prescription::render_prescription;
use crate::render::sentence::render_sentence;
use crate::types::case_record::{CaseRecord, JudgeRole};
use crate::types::field_key::FieldKey;

/// The case being edited together with its current sentence render.
///
/// Every mutation goes through this type and re-renders the sentence, so
/// `document()` always reflects `record()`.
pub struct FormSession {
    record: CaseRecord,
    ctx: RenderContext,
    document: Document,
    plain: String,
    highlight: Option<Highlight>,
    highlight_ttl: Duration,
}

impl FormSession {
    pub fn new(record: CaseRecord, ctx: RenderContext, config: &Config) -> Self {
        let document = render_sentence(&record, &ctx);
        let plain = document.to_plain_text();
        Self {
            record,
            ctx,
            document,
            plain,
            highlight: None,
            highlight_ttl: Duration::from_millis(config.highlight_ms),
        }
    }

    pub fn record(&self) -> &CaseRecord {
        &self.record
    }

    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Plain text of the current render, the text highlight spans index into.
    pub fn plain_text(&self) -> &str {
        &self.plain
    }

    /// Applies `edit` and re-renders.
    pub fn update(&mut self, edit: impl FnOnce(&mut CaseRecord)) {
        edit(&mut self.record);
        self.rerender(Instant::now());
    }

    /// Replaces the whole case, e.g. after opening a saved one. No highlight.
    pub fn replace_record(&mut self, record: CaseRecord) {
        self.record = record;
        self.document = render_sentence(&self.record, &self.ctx);
        self.plain = self.document.to_plain_text();
        self.highlight = None;
        debug!(defendants = self.record.defendants.len(), "replaced case");
    }

    fn rerender(&mut self, now: Instant) {
        let document = render_sentence(&self.record, &self.ctx);
        let plain = document.to_plain_text();
        let spans = changed_spans(&self.plain, &plain);
        debug!(changed_spans = spans.len(), paragraphs = document.len(), "re-rendered sentence");

        self.highlight = if spans.is_empty() {
            None
        } else {
            Some(Highlight::new(spans, now, self.highlight_ttl))
        };
        self.document = document;
        self.plain = plain;
    }

    /// The pending highlight, if it has not expired at `now`.
    pub fn highlight(&self, now: Instant) -> Option<&Highlight> {
        self.highlight.as_ref().filter(|h| h.is_active_at(now))
    }

    /// Highlights every occurrence of a section heading, e.g. when a toggle
    /// makes a clause appear.
    pub fn highlight_section(&mut self, heading: &str) -> bool {
        let spans = occurrence_spans(&self.plain, heading);
        if spans.is_empty() {
            return false;
        }
        self.highlight = Some(Highlight::new(spans, Instant::now(), self.highlight_ttl));
        true
    }

    /// Stores an edit coming back from a clicked anchor.
    ///
    /// The raw markup is cleaned per the field's policy. Returns `false` when
    /// the key points past the current defendant or fact lists.
    pub fn apply_field_edit(&mut self, key: FieldKey, raw: &str) -> bool {
        let value = sanitize_for(key.edit_policy(), raw);
        if key == FieldKey::JudgeRole {
            let role = if value.trim().eq_ignore_ascii_case("vocal") {
                JudgeRole::ChamberMember
            } else {
                JudgeRole::Judge
            };
            self.update(|record| record.judge_role = role);
            return true;
        }

        match text_field_mut(&mut self.record, key) {
            Some(slot) => *slot = value,
            None => {
                warn!(%key, "edit for a row that does not exist");
                return false;
            }
        }
        self.rerender(Instant::now());
        true
    }

    /// Like [`apply_field_edit`](Self::apply_field_edit), addressed by anchor href.
    pub fn apply_href_edit(&mut self, href: &str, raw: &str) -> bool {
        match FieldKey::from_href(href) {
            Some(key) => self.apply_field_edit(key, raw),
            None => {
                warn!(href, "unknown field anchor");
                false
            }
        }
    }

    /// Current stored value of a field, for pre-filling the editor.
    pub fn field_value(&self, key: FieldKey) -> Option<String> {
        if key == FieldKey::JudgeRole {
            let role = match self.record.judge_role {
                JudgeRole::Judge => "juez",
                JudgeRole::ChamberMember => "vocal",
            };
            return Some(role.to_string());
        }
        text_field(&self.record, key).cloned()
    }

    pub fn set_defendant_count(&mut self, count: usize) {
        self.update(|record| record.resize_defendants(count));
    }

    pub fn set_fact_count(&mut self, count: usize) {
        self.update(|record| record.resize_facts(count));
    }

    pub fn letter(&self, kind: LetterKind, defendant: usize) -> Document {
        render_letter(kind, &self.record, defendant, &self.ctx)
    }

    pub fn prescription(&self) -> Document {
        render_prescription(&self.record, &self.ctx)
    }
}

fn text_field_mut(record: &mut CaseRecord, key: FieldKey) -> Option<&mut String> {
    let field = match key {
        FieldKey::Locality => &mut record.locality,
        FieldKey::HearingDate => &mut record.hearing_date,
        FieldKey::Caption => &mut record.caption,
        FieldKey::Court => &mut record.court,
        FieldKey::Courtroom => &mut record.courtroom,
        FieldKey::JudgeName => &mut record.judge_name,
        FieldKey::JudgeRole => return None,
        FieldKey::Prosecutor => &mut record.prosecutor_name,
        FieldKey::EventualSubject => &mut record.eventual_subject,
        FieldKey::SubjectStatement => &mut record.subject_statement,
        FieldKey::Victim => &mut record.victim,
        FieldKey::VictimStatement => &mut record.victim_statement,
        FieldKey::Evidence => &mut record.evidence,
        FieldKey::KeyEvidence => &mut record.key_evidence,
        FieldKey::ProsecutionClosing => &mut record.prosecution_closing,
        FieldKey::DefenseClosing => &mut record.defense_closing,
        FieldKey::CalificationCorrection => &mut record.calification_correction,
        FieldKey::Confiscation => &mut record.confiscation_text,
        FieldKey::Restriction => &mut record.restriction_text,
        FieldKey::OperativePart => &mut record.operative_part,
        FieldKey::DefendantName(i) => &mut record.defendants.get_mut(i)?.name,
        FieldKey::DefendantData(i) => &mut record.defendants.get_mut(i)?.personal_data,
        FieldKey::Defender(i) => &mut record.defendants.get_mut(i)?.defender,
        FieldKey::Offenses(i) => &mut record.defendants.get_mut(i)?.offenses,
        FieldKey::AgreedSentence(i) => &mut record.defendants.get_mut(i)?.agreed_sentence,
        FieldKey::Conditions(i) => &mut record.defendants.get_mut(i)?.personal_conditions,
        FieldKey::PriorRecord(i) => &mut record.defendants.get_mut(i)?.prior_record,
        FieldKey::Confession(i) => &mut record.defendants.get_mut(i)?.confession,
        FieldKey::FinalStatement(i) => &mut record.defendants.get_mut(i)?.final_statement,
        FieldKey::SentencingFactors(i) => &mut record.defendants.get_mut(i)?.sentencing_factors,
        FieldKey::FactDescription(i) => &mut record.facts.get_mut(i)?.description,
        FieldKey::FactOffice(i) => &mut record.facts.get_mut(i)?.issuing_office,
        FieldKey::FactOrderNumber(i) => &mut record.facts.get_mut(i)?.order_number,
        FieldKey::FactReferralDate(i) => &mut record.facts.get_mut(i)?.referral_date,
        FieldKey::FactClarifications(i) => &mut record.facts.get_mut(i)?.clarifications,
    };
    Some(field)
}

fn text_field(record: &CaseRecord, key: FieldKey) -> Option<&String> {
    let field = match key {
        FieldKey::Locality => &record.locality,
        FieldKey::HearingDate => &record.hearing_date,
        FieldKey::Caption => &record.caption,
        FieldKey::Court => &record.court,
        FieldKey::Courtroom => &record.courtroom,
        FieldKey::JudgeName => &record.judge_name,
        FieldKey::JudgeRole => return None,
        FieldKey::Prosecutor => &record.prosecutor_name,
        FieldKey::EventualSubject => &record.eventual_subject,
        FieldKey::SubjectStatement => &record.subject_statement,
        FieldKey::Victim => &record.victim,
        FieldKey::VictimStatement => &record.victim_statement,
        FieldKey::Evidence => &record.evidence,
        FieldKey::KeyEvidence => &record.key_evidence,
        FieldKey::ProsecutionClosing => &record.prosecution_closing,
        FieldKey::DefenseClosing => &record.defense_closing,
        FieldKey::CalificationCorrection => &record.calification_correction,
        FieldKey::Confiscation => &record.confiscation_text,
        FieldKey::Restriction => &record.restriction_text,
        FieldKey::OperativePart => &record.operative_part,
        FieldKey::DefendantName(i) => &record.defendants.get(i)?.name,
        FieldKey::DefendantData(i) => &record.defendants.get(i)?.personal_data,
        FieldKey::Defender(i) => &record.defendants.get(i)?.defender,
        FieldKey::Offenses(i) => &record.defendants.get(i)?.offenses,
        FieldKey::AgreedSentence(i) => &record.defendants.get(i)?.agreed_sentence,
        FieldKey::Conditions(i) => &record.defendants.get(i)?.personal_conditions,
        FieldKey::PriorRecord(i) => &record.defendants.get(i)?.prior_record,
        FieldKey::Confession(i) => &record.defendants.get(i)?.confession,
        FieldKey::FinalStatement(i) => &record.defendants.get(i)?.final_statement,
        FieldKey::SentencingFactors(i) => &record.defendants.get(i)?.sentencing_factors,
        FieldKey::FactDescription(i) => &record.facts.get(i)?.description,
        FieldKey::FactOffice(i) => &record.facts.get(i)?.issuing_office,
        FieldKey::FactOrderNumber(i) => &record.facts.get(i)?.order_number,
        FieldKey::FactReferralDate(i) => &record.facts.get(i)?.referral_date,
        FieldKey::FactClarifications(i) => &record.facts.get(i)?.clarifications,
    };
    Some(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn session() -> FormSession {
        let ctx = RenderContext::new(NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(), "Córdoba");
        FormSession::new(CaseRecord::with_counts(1, 1), ctx, &Config::default())
    }

    #[test]
    fn edits_past_the_list_are_rejected() {
        let mut session = session();
        assert!(!session.apply_field_edit(FieldKey::DefendantName(3), "Nadie"));
        assert!(session.highlight(Instant::now()).is_none());
    }

    #[test]
    fn judge_role_round_trips_as_text() {
        let mut session = session();
        assert!(session.apply_field_edit(FieldKey::JudgeRole, "vocal"));
        assert_eq!(session.record().judge_role, JudgeRole::ChamberMember);
        assert_eq!(session.field_value(FieldKey::JudgeRole).as_deref(), Some("vocal"));
    }
}
