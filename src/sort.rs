// Sort Stage - stable ordering by the selected key

use crate::record::Record;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Ascending by name
    #[default]
    Name,
    /// Descending by annual income
    Income,
    /// Descending by loan amount
    Loan,
}

impl SortKey {
    pub fn next(&self) -> Self {
        match self {
            SortKey::Name => SortKey::Income,
            SortKey::Income => SortKey::Loan,
            SortKey::Loan => SortKey::Name,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Income => "income",
            SortKey::Loan => "loan",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            SortKey::Name => "Sort: Name",
            SortKey::Income => "Sort: Income",
            SortKey::Loan => "Sort: Loan Amount",
        }
    }

    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        match self {
            SortKey::Name => compare_names(&a.name, &b.name),
            SortKey::Income => b.annual_income.total_cmp(&a.annual_income),
            SortKey::Loan => b.loan_amount.total_cmp(&a.loan_amount),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "income" => Ok(SortKey::Income),
            "loan" => Ok(SortKey::Loan),
            other => Err(format!(
                "unknown sort key '{}' (expected name, income or loan)",
                other
            )),
        }
    }
}

/// Dictionary-style comparison in three passes:
/// base letters (accents and case ignored), then accents, then case
/// with lowercase first. "resume" < "Resume" < "résumé" < "rt".
pub fn compare_names(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| accented(a).cmp(accented(b)))
        .then_with(|| {
            a.nfd()
                .map(char::is_uppercase)
                .cmp(b.nfd().map(char::is_uppercase))
        })
}

fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn accented(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().flat_map(char::to_lowercase)
}

/// New ordered sequence; `slice::sort_by` is stable so ties keep input order
pub fn sort_records<'a>(records: &[&'a Record], key: SortKey) -> Vec<&'a Record> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| key.compare(a, b));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RawRecord;

    fn create_test_record(name: &str, income: Option<f64>, loan: Option<f64>) -> Record {
        Record::from_raw(RawRecord {
            name: if name.is_empty() { None } else { Some(name.to_string()) },
            annual_income: income,
            loan_amount: loan,
            ..Default::default()
        })
    }

    fn names(records: &[&Record]) -> Vec<String> {
        records.iter().map(|r| r.name.clone()).collect()
    }

    #[test]
    fn test_sort_by_name_ascending_case_insensitive() {
        let records = vec![
            create_test_record("cy", None, None),
            create_test_record("Bo", None, None),
            create_test_record("", None, None),
            create_test_record("ann", None, None),
        ];
        let refs: Vec<&Record> = records.iter().collect();

        let sorted = sort_records(&refs, SortKey::Name);
        assert_eq!(names(&sorted), vec!["", "ann", "Bo", "cy"]);
    }

    #[test]
    fn test_lowercase_before_uppercase_on_tie() {
        assert_eq!(compare_names("abc", "Abc"), Ordering::Less);
        assert_eq!(compare_names("Abc", "abc"), Ordering::Greater);
        assert_eq!(compare_names("abc", "abc"), Ordering::Equal);
    }

    #[test]
    fn test_accented_names_sort_with_their_base_letter() {
        let records = vec![
            create_test_record("Zoe", None, None),
            create_test_record("Émile", None, None),
            create_test_record("Ava", None, None),
            create_test_record("Ödön", None, None),
        ];
        let refs: Vec<&Record> = records.iter().collect();

        let sorted = sort_records(&refs, SortKey::Name);
        assert_eq!(names(&sorted), vec!["Ava", "Émile", "Ödön", "Zoe"]);
    }

    #[test]
    fn test_accent_outranks_case() {
        let mut words = vec!["résumé", "Resume", "rt", "resume"];
        words.sort_by(|a, b| compare_names(a, b));
        assert_eq!(words, vec!["resume", "Resume", "résumé", "rt"]);
    }

    #[test]
    fn test_sort_by_income_descending_missing_as_zero() {
        let records = vec![
            create_test_record("Ann", Some(50000.0), None),
            create_test_record("Nil", None, None),
            create_test_record("Bo", Some(80000.0), None),
        ];
        let refs: Vec<&Record> = records.iter().collect();

        let sorted = sort_records(&refs, SortKey::Income);
        assert_eq!(names(&sorted), vec!["Bo", "Ann", "Nil"]);
    }

    #[test]
    fn test_sort_by_loan_is_stable() {
        let records = vec![
            create_test_record("First", None, Some(1000.0)),
            create_test_record("Big", None, Some(9000.0)),
            create_test_record("Second", None, Some(1000.0)),
            create_test_record("Third", None, Some(1000.0)),
        ];
        let refs: Vec<&Record> = records.iter().collect();

        let sorted = sort_records(&refs, SortKey::Loan);
        assert_eq!(names(&sorted), vec!["Big", "First", "Second", "Third"]);
    }

    #[test]
    fn test_sort_is_idempotent_for_every_key() {
        let records = vec![
            create_test_record("delta", Some(1.0), Some(4.0)),
            create_test_record("Alpha", Some(3.0), Some(4.0)),
            create_test_record("charlie", Some(3.0), Some(1.0)),
            create_test_record("bravo", Some(2.0), Some(2.0)),
        ];
        let refs: Vec<&Record> = records.iter().collect();

        for key in [SortKey::Name, SortKey::Income, SortKey::Loan] {
            let once = sort_records(&refs, key);
            let twice = sort_records(&once, key);
            assert_eq!(once, twice, "key={}", key);
        }
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!("INCOME".parse::<SortKey>().unwrap(), SortKey::Income);
        assert!("age".parse::<SortKey>().is_err());
        assert_eq!(SortKey::Loan.next(), SortKey::Name);
    }
}
