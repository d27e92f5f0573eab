use crate::types::case_record::Gender;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupGender {
    Masculine,
    Feminine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrammaticalNumber {
    Singular,
    Plural,
}

/// The agreement class of a group of people referred to jointly.
///
/// Groups that mix genders take the masculine plural; an empty group is
/// treated as a single man so that an unfilled form still reads naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Agreement {
    pub gender: GroupGender,
    pub number: GrammaticalNumber,
}

pub fn gender_agreement(genders: &[Gender]) -> Agreement {
    let number = if genders.len() > 1 {
        GrammaticalNumber::Plural
    } else {
        GrammaticalNumber::Singular
    };
    let gender = if !genders.is_empty() && genders.iter().all(|g| g.is_female()) {
        GroupGender::Feminine
    } else {
        GroupGender::Masculine
    };
    Agreement { gender, number }
}

impl Agreement {
    pub fn is_plural(&self) -> bool {
        self.number == GrammaticalNumber::Plural
    }

    /// Picks one of the four forms: masculine/feminine × singular/plural.
    pub fn form<'a>(&self, masc_sing: &'a str, fem_sing: &'a str, masc_pl: &'a str, fem_pl: &'a str) -> &'a str {
        match (self.gender, self.number) {
            (GroupGender::Masculine, GrammaticalNumber::Singular) => masc_sing,
            (GroupGender::Feminine, GrammaticalNumber::Singular) => fem_sing,
            (GroupGender::Masculine, GrammaticalNumber::Plural) => masc_pl,
            (GroupGender::Feminine, GrammaticalNumber::Plural) => fem_pl,
        }
    }

    /// Picks by number only (verbs, possessives).
    pub fn by_number<'a>(&self, singular: &'a str, plural: &'a str) -> &'a str {
        if self.is_plural() {
            plural
        } else {
            singular
        }
    }

    /// Appends the gender/number ending to a regular adjective stem
    /// ("acusad" -> "acusado", "acusadas", ...).
    pub fn inflect(&self, stem: &str) -> String {
        format!("{stem}{}", self.form("o", "a", "os", "as"))
    }

    pub fn article(&self) -> &'static str {
        self.form("el", "la", "los", "las")
    }

    /// "el imputado", "la imputada", "los imputados", "las imputadas"
    pub fn defendant(&self) -> String {
        format!("{} {}", self.article(), self.inflect("imputad"))
    }

    /// "el acusado", ...
    pub fn accused_noun(&self) -> String {
        format!("{} {}", self.article(), self.inflect("acusad"))
    }

    /// Bare participle: "acusado", "acusada", "acusados", "acusadas".
    pub fn accused(&self) -> String {
        self.inflect("acusad")
    }

    pub fn assisted(&self) -> String {
        self.inflect("asistid")
    }

    pub fn informed(&self) -> String {
        self.inflect("informad")
    }

    pub fn questioned(&self) -> String {
        self.inflect("interrogad")
    }

    pub fn beneficiary(&self) -> String {
        self.inflect("beneficiari")
    }

    fn dative_article(&self) -> &'static str {
        self.form("al", "a la", "a los", "a las")
    }

    fn genitive_article(&self) -> &'static str {
        self.form("del", "de la", "de los", "de las")
    }

    /// "al imputado", "a la imputada", ...
    pub fn to_defendant(&self) -> String {
        format!("{} {}", self.dative_article(), self.inflect("imputad"))
    }

    pub fn to_accused(&self) -> String {
        format!("{} {}", self.dative_article(), self.inflect("acusad"))
    }

    /// "del imputado", "de la imputada", ...
    pub fn of_defendant(&self) -> String {
        format!("{} {}", self.genitive_article(), self.inflect("imputad"))
    }

    pub fn of_accused(&self) -> String {
        format!("{} {}", self.genitive_article(), self.inflect("acusad"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Gender::{Female as F, Male as M};

    #[test]
    fn four_forms() {
        assert_eq!(gender_agreement(&[M]).defendant(), "el imputado");
        assert_eq!(gender_agreement(&[F]).defendant(), "la imputada");
        assert_eq!(gender_agreement(&[M, M]).defendant(), "los imputados");
        assert_eq!(gender_agreement(&[F, F, F]).defendant(), "las imputadas");
    }

    #[test]
    fn mixed_group_is_masculine_plural() {
        let agreement = gender_agreement(&[F, M, F]);
        assert_eq!(agreement.to_defendant(), "a los imputados");
        assert_eq!(agreement.of_accused(), "de los acusados");
    }

    #[test]
    fn empty_group_reads_as_one_man() {
        let agreement = gender_agreement(&[]);
        assert!(!agreement.is_plural());
        assert_eq!(agreement.to_defendant(), "al imputado");
    }
}
