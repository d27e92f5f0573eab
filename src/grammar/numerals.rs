use chrono::{Datelike, NaiveDate};

const UNITS: [&str; 30] = [
    "cero",
    "uno",
    "dos",
    "tres",
    "cuatro",
    "cinco",
    "seis",
    "siete",
    "ocho",
    "nueve",
    "diez",
    "once",
    "doce",
    "trece",
    "catorce",
    "quince",
    "dieciséis",
    "diecisiete",
    "dieciocho",
    "diecinueve",
    "veinte",
    "veintiuno",
    "veintidós",
    "veintitrés",
    "veinticuatro",
    "veinticinco",
    "veintiséis",
    "veintisiete",
    "veintiocho",
    "veintinueve",
];

const TENS: [&str; 7] = [
    "treinta", "cuarenta", "cincuenta", "sesenta", "setenta", "ochenta", "noventa",
];

const HUNDREDS: [&str; 9] = [
    "ciento",
    "doscientos",
    "trescientos",
    "cuatrocientos",
    "quinientos",
    "seiscientos",
    "setecientos",
    "ochocientos",
    "novecientos",
];

const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

const FACT_ORDINALS: [&str; 15] = [
    "Primer",
    "Segundo",
    "Tercer",
    "Cuarto",
    "Quinto",
    "Sexto",
    "Séptimo",
    "Octavo",
    "Noveno",
    "Décimo",
    "Undécimo",
    "Duodécimo",
    "Decimotercero",
    "Decimocuarto",
    "Decimoquinto",
];

const MAX_IN_WORDS: i64 = 999_999;

/// Spanish cardinal words for `n`.
///
/// Magnitudes past the hundred thousands are returned as digits.
pub fn number_to_words(n: i64) -> String {
    if n < 0 {
        return match n.checked_neg() {
            Some(abs) if abs <= MAX_IN_WORDS => format!("menos {}", number_to_words(abs)),
            _ => n.to_string(),
        };
    }
    if n > MAX_IN_WORDS {
        return n.to_string();
    }

    // 0..=999_999 from here on, so the casts below cannot truncate.
    let n = n as usize;
    match n {
        0..=29 => UNITS[n].to_string(),
        30..=99 => {
            let tens = TENS[n / 10 - 3];
            match n % 10 {
                0 => tens.to_string(),
                unit => format!("{tens} y {}", UNITS[unit]),
            }
        }
        100 => "cien".to_string(),
        101..=999 => {
            let hundreds = HUNDREDS[n / 100 - 1];
            match n % 100 {
                0 => hundreds.to_string(),
                rest => format!("{hundreds} {}", number_to_words(rest as i64)),
            }
        }
        _ => {
            let thousands = n / 1000;
            let prefix = if thousands == 1 {
                "mil".to_string()
            } else {
                format!("{} mil", apocopate(&number_to_words(thousands as i64)))
            };
            match n % 1000 {
                0 => prefix,
                rest => format!("{prefix} {}", number_to_words(rest as i64)),
            }
        }
    }
}

/// "uno" shortens before a noun: "veintiún mil", "treinta y un mil".
fn apocopate(words: &str) -> String {
    if let Some(stem) = words.strip_suffix("veintiuno") {
        format!("{stem}veintiún")
    } else if let Some(stem) = words.strip_suffix("uno") {
        format!("{stem}un")
    } else {
        words.to_string()
    }
}

/// Month name for 1..=12, or the number itself when out of range.
pub fn month_name(month: u32) -> String {
    match month {
        1..=12 => MONTHS[(month - 1) as usize].to_string(),
        other => other.to_string(),
    }
}

/// "diecisiete de octubre de dos mil veintiséis"
pub fn date_to_words(date: NaiveDate) -> String {
    format!(
        "{} de {} de {}",
        number_to_words(i64::from(date.day())),
        month_name(date.month()),
        number_to_words(i64::from(date.year()))
    )
}

/// "17 de octubre de 2026"
pub fn date_long(date: NaiveDate) -> String {
    format!("{} de {} de {}", date.day(), month_name(date.month()), date.year())
}

/// "17/10/2026"
pub fn date_numeric(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Roman numeral for 1..=3999; other values fall back to digits.
pub fn roman_numeral(n: u32) -> String {
    if n == 0 || n > 3999 {
        return n.to_string();
    }
    const TABLE: [(u32, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    let mut rest = n;
    let mut out = String::new();
    for (value, symbol) in TABLE {
        while rest >= value {
            out.push_str(symbol);
            rest -= value;
        }
    }
    out
}

/// Label for the fact at zero-based `index`: "Primer", "Segundo", ... then "16°".
pub fn fact_ordinal(index: usize) -> String {
    FACT_ORDINALS
        .get(index)
        .map(|label| label.to_string())
        .unwrap_or_else(|| format!("{}°", index + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compound_numbers() {
        assert_eq!(number_to_words(21), "veintiuno");
        assert_eq!(number_to_words(45), "cuarenta y cinco");
        assert_eq!(number_to_words(200), "doscientos");
        assert_eq!(number_to_words(999), "novecientos noventa y nueve");
        assert_eq!(number_to_words(2026), "dos mil veintiséis");
        assert_eq!(number_to_words(21_000), "veintiún mil");
        assert_eq!(number_to_words(31_500), "treinta y un mil quinientos");
        assert_eq!(number_to_words(-3), "menos tres");
    }

    #[test]
    fn out_of_range_degrades_to_digits() {
        assert_eq!(number_to_words(1_000_000), "1000000");
        assert_eq!(number_to_words(i64::MIN), i64::MIN.to_string());
        assert_eq!(month_name(13), "13");
        assert_eq!(roman_numeral(0), "0");
        assert_eq!(fact_ordinal(15), "16°");
    }

    #[test]
    fn roman_numerals() {
        assert_eq!(roman_numeral(4), "IV");
        assert_eq!(roman_numeral(9), "IX");
        assert_eq!(roman_numeral(14), "XIV");
    }
}
