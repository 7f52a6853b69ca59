use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

pub type CategoryId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub user_id: i64,
    pub amount: i64,
    #[serde(with = "day")]
    pub date: NaiveDate,
    #[serde(default)]
    pub memo: String,
    pub category_id: CategoryId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default)]
    pub created_at: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<FixedOffset>>,
}

/// Body of `POST /expenses` and `PUT /expenses/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct NewExpense {
    pub user_id: i64,
    pub amount: i64,
    #[serde(with = "day")]
    pub date: NaiveDate,
    pub category_id: CategoryId,
    pub memo: String,
}

/// Billing frequency accepted when creating or updating a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Monthly,
    Yearly,
}

impl std::str::FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "monthly" => Ok(Frequency::Monthly),
            "yearly" => Ok(Frequency::Yearly),
            other => Err(format!("unknown frequency: {other} (expected monthly or yearly)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: i64,
    pub user_id: i64,
    pub product_name: String,
    pub category_id: CategoryId,
    #[serde(default)]
    pub amount: i64,
    /// Stored free-form by the backend; only new writes are checked
    /// against [`Frequency`].
    #[serde(default)]
    pub frequency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default)]
    pub created_at: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewSubscription {
    pub user_id: i64,
    pub product_name: String,
    pub category_id: CategoryId,
    pub frequency: Frequency,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub real_name: String,
    pub email: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub profile_memo: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub name: String,
    pub real_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_memo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicUtility {
    pub id: i64,
    pub user_id: i64,
    pub amount: i64,
    #[serde(with = "day")]
    pub date: NaiveDate,
    pub category_id: CategoryId,
    #[serde(default)]
    pub memo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default)]
    pub created_at: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewPublicUtility {
    pub user_id: i64,
    pub amount: i64,
    #[serde(with = "day")]
    pub date: NaiveDate,
    pub category_id: CategoryId,
    pub memo: String,
}

/// Partial body of `PUT /public-utilities/{id}`: only set fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PublicUtilityPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", with = "opt_day")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

impl PublicUtilityPatch {
    pub fn is_empty(&self) -> bool {
        self.user_id.is_none()
            && self.amount.is_none()
            && self.date.is_none()
            && self.category_id.is_none()
            && self.memo.is_none()
    }
}

/// Query filter for `GET /public-utilities`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UtilityFilter {
    pub user_id: Option<i64>,
    pub category_id: Option<CategoryId>,
}

/// Calendar-day (de)serialization. Dates go out as `YYYY-MM-DD`; incoming
/// values may also be full RFC 3339 timestamps, of which only the day is kept.
pub mod day {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub fn parse(raw: &str) -> Result<NaiveDate, String> {
        let head = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(head, FORMAT).map_err(|e| format!("{raw}: {e}"))
    }
}

mod opt_day {
    use chrono::NaiveDate;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => super::day::serialize(d, s),
            None => s.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expense_accepts_plain_date() {
        let json = r#"{"id":1,"user_id":1,"amount":1200,"date":"2025-03-04",
            "memo":"lunch","category_id":2,"created_at":"2025-03-04T12:00:00Z",
            "updated_at":"2025-03-04T12:00:00Z"}"#;
        let e: Expense = serde_json::from_str(json).unwrap();
        assert_eq!(e.date, NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
        assert!(e.category.is_none());
        assert!(e.created_at.is_some());
    }

    #[test]
    fn test_expense_accepts_rfc3339_date_and_embedded_category() {
        let json = r#"{"id":1,"user_id":1,"amount":1200,
            "date":"2025-03-04T00:00:00+09:00","memo":"","category_id":2,
            "category":{"id":2,"name":"Food"}}"#;
        let e: Expense = serde_json::from_str(json).unwrap();
        assert_eq!(e.date, NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
        assert_eq!(e.category.unwrap().name, "Food");
        assert!(e.updated_at.is_none());
    }

    #[test]
    fn test_new_expense_body_shape() {
        let body = NewExpense {
            user_id: 1,
            amount: 500,
            date: NaiveDate::from_ymd_opt(2025, 1, 9).unwrap(),
            category_id: 3,
            memo: "bus".into(),
        };
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "user_id": 1, "amount": 500, "date": "2025-01-09",
                "category_id": 3, "memo": "bus"
            })
        );
    }

    #[test]
    fn test_frequency_parse_and_wire_name() {
        assert_eq!("Monthly".parse::<Frequency>().unwrap(), Frequency::Monthly);
        assert!("weekly".parse::<Frequency>().is_err());
        let v = serde_json::to_value(Frequency::Yearly).unwrap();
        assert_eq!(v, serde_json::json!("yearly"));
    }

    #[test]
    fn test_subscription_keeps_unrecognised_frequency() {
        let json = r#"[
            {"id":1,"user_id":1,"product_name":"Gym","category_id":2,"frequency":"weekly"},
            {"id":2,"user_id":1,"product_name":"Netflix","category_id":3,"frequency":"monthly"},
            {"id":3,"user_id":1,"product_name":"Cloud","category_id":3}
        ]"#;
        let subs: Vec<Subscription> = serde_json::from_str(json).unwrap();
        assert_eq!(subs.len(), 3);
        assert_eq!(subs[0].frequency, "weekly");
        assert_eq!(subs[1].frequency, "monthly");
        assert_eq!(subs[2].frequency, "");
    }

    #[test]
    fn test_utility_patch_sends_only_set_fields() {
        let patch = PublicUtilityPatch {
            amount: Some(4200),
            date: Some(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
        let v = serde_json::to_value(&patch).unwrap();
        assert_eq!(v, serde_json::json!({"amount": 4200, "date": "2025-02-01"}));
        assert!(PublicUtilityPatch::default().is_empty());
    }
}
