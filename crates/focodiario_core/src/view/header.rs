//! Greeting header with a short pt-BR date label.

use chrono::{Datelike, NaiveDate, Weekday};

const MONTHS: [&str; 12] = [
    "jan.", "fev.", "mar.", "abr.", "mai.", "jun.", "jul.", "ago.", "set.", "out.", "nov.", "dez.",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderView {
    pub greeting: String,
    pub date_label: String,
}

impl HeaderView {
    pub fn build(display_name: &str, today: NaiveDate) -> Self {
        Self {
            greeting: format!("Olá, {display_name}!"),
            date_label: date_label(today),
        }
    }
}

/// Formats `date` like `qui., 16 de out.`.
pub fn date_label(date: NaiveDate) -> String {
    let weekday = match date.weekday() {
        Weekday::Mon => "seg.",
        Weekday::Tue => "ter.",
        Weekday::Wed => "qua.",
        Weekday::Thu => "qui.",
        Weekday::Fri => "sex.",
        Weekday::Sat => "sáb.",
        Weekday::Sun => "dom.",
    };
    let month = MONTHS[date.month0() as usize];
    format!("{weekday}, {} de {month}", date.day())
}
