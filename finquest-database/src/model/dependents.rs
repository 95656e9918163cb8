use anyhow::Context as _;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const BLOOD_TYPES: [&str; 8] = ["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependentEventKind {
    Medical,
    School,
    Birthday,
    Other,
}

impl DependentEventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DependentEventKind::Medical => "medical",
            DependentEventKind::School => "school",
            DependentEventKind::Birthday => "birthday",
            DependentEventKind::Other => "other",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "medical" => Some(DependentEventKind::Medical),
            "school" => Some(DependentEventKind::School),
            "birthday" => Some(DependentEventKind::Birthday),
            "other" => Some(DependentEventKind::Other),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependentExpenseKind {
    Education,
    Health,
    Activities,
    Other,
}

impl DependentExpenseKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DependentExpenseKind::Education => "education",
            DependentExpenseKind::Health => "health",
            DependentExpenseKind::Activities => "activities",
            DependentExpenseKind::Other => "other",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "education" => Some(DependentExpenseKind::Education),
            "health" => Some(DependentExpenseKind::Health),
            "activities" => Some(DependentExpenseKind::Activities),
            "other" => Some(DependentExpenseKind::Other),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependent {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub birth_date: NaiveDate,
    pub school_name: Option<String>,
    pub school_grade: Option<String>,
    pub health_insurance: Option<String>,
    pub blood_type: Option<String>,
    pub allergies: Option<String>,
    pub medications: Option<String>,
    pub monthly_cost_cents: i64,
    pub created_at: u64,
    pub updated_at: u64,
}

impl Dependent {
    /// Age in whole years on `today`.
    pub fn age_on(&self, today: NaiveDate) -> u32 {
        today.years_since(self.birth_date).unwrap_or(0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependentEvent {
    pub id: Uuid,
    pub dependent_id: Uuid,
    pub kind: DependentEventKind,
    pub date: NaiveDate,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependentExpense {
    pub id: Uuid,
    pub dependent_id: Uuid,
    pub kind: DependentExpenseKind,
    pub description: String,
    pub amount_cents: i64,
    pub date: NaiveDate,
    pub recurrent: bool,
}

/// A dependent together with its events and expenses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DependentDetails {
    pub dependent: Dependent,
    pub events: Vec<DependentEvent>,
    pub expenses: Vec<DependentExpense>,
}

impl DependentDetails {
    /// Earliest event on or after `today`.
    pub fn next_event(&self, today: NaiveDate) -> Option<&DependentEvent> {
        self.events
            .iter()
            .filter(|event| event.date >= today)
            .min_by_key(|event| event.date)
    }

    pub fn expenses_total_cents(&self) -> anyhow::Result<i64> {
        self.expenses
            .iter()
            .try_fold(0_i64, |total, expense| total.checked_add(expense.amount_cents))
            .context("dependent expense total out of i64 range")
    }

    /// Sum of expenses marked as recurrent.
    pub fn recurrent_cents(&self) -> anyhow::Result<i64> {
        self.expenses
            .iter()
            .filter(|expense| expense.recurrent)
            .try_fold(0_i64, |total, expense| total.checked_add(expense.amount_cents))
            .context("recurrent expense total out of i64 range")
    }
}

/// Editable details of a dependent. Updates replace every field.
#[derive(Clone, Debug)]
pub struct NewDependent {
    pub name: String,
    pub birth_date: NaiveDate,
    pub school_name: Option<String>,
    pub school_grade: Option<String>,
    pub health_insurance: Option<String>,
    pub blood_type: Option<String>,
    pub allergies: Option<String>,
    pub medications: Option<String>,
    pub monthly_cost_cents: i64,
}

impl NewDependent {
    pub fn validate(&self, today: NaiveDate) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.name.trim().is_empty(),
            "dependent name must not be blank"
        );
        anyhow::ensure!(
            self.birth_date <= today,
            "birth date must not be in the future"
        );
        anyhow::ensure!(
            self.monthly_cost_cents >= 0,
            "monthly cost must not be negative"
        );
        if let Some(blood_type) = &self.blood_type {
            let normalized = blood_type.trim().to_ascii_uppercase();
            anyhow::ensure!(
                BLOOD_TYPES.contains(&normalized.as_str()),
                "`{blood_type}` is not a blood type (A+, A-, B+, B-, AB+, AB-, O+, O-)"
            );
        }
        Ok(())
    }

    pub fn blood_type(&self) -> Option<String> {
        self.blood_type
            .as_deref()
            .map(|blood_type| blood_type.trim().to_ascii_uppercase())
    }
}

#[derive(Clone, Debug)]
pub struct NewDependentEvent {
    pub kind: DependentEventKind,
    pub date: NaiveDate,
    pub description: String,
}

impl NewDependentEvent {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.description.trim().is_empty(),
            "event description must not be blank"
        );
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct NewDependentExpense {
    pub kind: DependentExpenseKind,
    pub description: String,
    pub amount_cents: i64,
    pub date: NaiveDate,
    pub recurrent: bool,
}

impl NewDependentExpense {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.description.trim().is_empty(),
            "expense description must not be blank"
        );
        anyhow::ensure!(self.amount_cents > 0, "amount must be greater than zero");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::{
        Dependent, DependentDetails, DependentEvent, DependentEventKind, DependentExpense,
        DependentExpenseKind, NewDependent, NewDependentEvent, NewDependentExpense,
    };

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    fn new_dependent() -> NewDependent {
        NewDependent {
            name: "Lia".to_owned(),
            birth_date: date(2018, 6, 20),
            school_name: Some("Escola Sol".to_owned()),
            school_grade: Some("2º ano".to_owned()),
            health_insurance: None,
            blood_type: Some("ab-".to_owned()),
            allergies: None,
            medications: None,
            monthly_cost_cents: 150_000,
        }
    }

    fn dependent() -> Dependent {
        let template = new_dependent();
        Dependent {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            name: template.name,
            birth_date: template.birth_date,
            school_name: None,
            school_grade: None,
            health_insurance: None,
            blood_type: None,
            allergies: None,
            medications: None,
            monthly_cost_cents: template.monthly_cost_cents,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn event(date: NaiveDate, description: &str) -> DependentEvent {
        DependentEvent {
            id: Uuid::new_v4(),
            dependent_id: Uuid::nil(),
            kind: DependentEventKind::Medical,
            date,
            description: description.to_owned(),
        }
    }

    fn expense(amount_cents: i64, recurrent: bool) -> DependentExpense {
        DependentExpense {
            id: Uuid::new_v4(),
            dependent_id: Uuid::nil(),
            kind: DependentExpenseKind::Education,
            description: "Mensalidade".to_owned(),
            amount_cents,
            date: date(2026, 3, 5),
            recurrent,
        }
    }

    #[test]
    fn valid_dependent_passes_and_normalizes_blood_type() {
        let new = new_dependent();
        assert!(new.validate(date(2026, 3, 1)).is_ok());
        assert_eq!(new.blood_type().as_deref(), Some("AB-"));
    }

    #[test]
    fn rejects_bad_dependents() {
        let today = date(2026, 3, 1);

        let mut new = new_dependent();
        new.name = String::new();
        assert!(new.validate(today).is_err());

        let mut new = new_dependent();
        new.birth_date = date(2026, 3, 2);
        assert!(new.validate(today).is_err());

        let mut new = new_dependent();
        new.monthly_cost_cents = -1;
        assert!(new.validate(today).is_err());

        let mut new = new_dependent();
        new.blood_type = Some("C+".to_owned());
        assert!(new.validate(today).is_err());
    }

    #[test]
    fn events_and_expenses_validate() {
        let event = NewDependentEvent {
            kind: DependentEventKind::School,
            date: date(2026, 4, 1),
            description: " ".to_owned(),
        };
        assert!(event.validate().is_err());

        let mut expense = NewDependentExpense {
            kind: DependentExpenseKind::Health,
            description: "Consulta".to_owned(),
            amount_cents: 25_000,
            date: date(2026, 4, 1),
            recurrent: false,
        };
        assert!(expense.validate().is_ok());
        expense.amount_cents = 0;
        assert!(expense.validate().is_err());
    }

    #[test]
    fn next_event_is_the_earliest_upcoming_one() {
        let today = date(2026, 3, 10);
        let details = DependentDetails {
            dependent: dependent(),
            events: vec![
                event(date(2026, 5, 1), "Vacina"),
                event(date(2026, 2, 1), "Pediatra"),
                event(date(2026, 3, 10), "Reunião"),
            ],
            expenses: Vec::new(),
        };
        let next = details.next_event(today).expect("upcoming event");
        assert_eq!(next.description, "Reunião");

        assert!(details.next_event(date(2026, 6, 1)).is_none());
    }

    #[test]
    fn expense_totals() {
        let details = DependentDetails {
            dependent: dependent(),
            events: Vec::new(),
            expenses: vec![expense(50_000, true), expense(12_000, false)],
        };
        assert_eq!(details.expenses_total_cents().expect("fits"), 62_000);
        assert_eq!(details.recurrent_cents().expect("fits"), 50_000);

        let huge = DependentDetails {
            expenses: vec![expense(i64::MAX, true), expense(1, true)],
            ..details
        };
        assert!(huge.expenses_total_cents().is_err());
        assert!(huge.recurrent_cents().is_err());
    }

    #[test]
    fn age_counts_whole_years() {
        let dependent = dependent();
        assert_eq!(dependent.age_on(date(2026, 6, 19)), 7);
        assert_eq!(dependent.age_on(date(2026, 6, 20)), 8);
    }

    #[test]
    fn parses_kinds() {
        assert_eq!(
            DependentEventKind::parse("Birthday"),
            Some(DependentEventKind::Birthday)
        );
        assert_eq!(
            DependentExpenseKind::parse("activities"),
            Some(DependentExpenseKind::Activities)
        );
        assert_eq!(DependentExpenseKind::parse("food"), None);
    }
}
