use std::time::Duration;

use chrono::NaiveDate;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{KakeiboError, Result};
use crate::models::{
    Category, CategoryId, Expense, NewExpense, NewPublicUtility, NewSubscription, NewUser,
    PublicUtility, PublicUtilityPatch, Subscription, User, UtilityFilter,
};
use crate::settings::Settings;

/// Expense queries the analysis windows are resolved against.
pub trait ExpenseSource {
    fn expenses_by_day(&self, date: NaiveDate) -> Result<Vec<Expense>>;
    fn expenses_by_week(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Expense>>;
    fn expenses_by_month(&self, year: i32, month: u32) -> Result<Vec<Expense>>;
    fn expenses_by_year(&self, year: i32) -> Result<Vec<Expense>>;
    fn expenses_by_category(&self, category_id: CategoryId) -> Result<Vec<Expense>>;
}

/// JSON client for the kakeibo backend. Every call is a single request: no
/// retries and no timeout.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
}

fn date_param(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Option::<Duration>::None)
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { base_url, http })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(settings.api_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }

    fn send(&self, req: RequestBuilder) -> Result<Response> {
        let resp = req.header("Content-Type", "application/json").send()?;
        let status = resp.status();
        log::debug!("{} {}", status.as_u16(), resp.url());
        if !status.is_success() {
            let text = status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| status.as_str().to_string());
            return Err(KakeiboError::Api { status: text });
        }
        Ok(resp)
    }

    fn get<T: DeserializeOwned>(&self, endpoint: &str, query: &[(&str, String)]) -> Result<T> {
        let req = self.http.get(self.url(endpoint)).query(query);
        Ok(self.send(req)?.json()?)
    }

    fn post<B: Serialize, T: DeserializeOwned>(&self, endpoint: &str, body: &B) -> Result<T> {
        let req = self.http.post(self.url(endpoint)).json(body);
        Ok(self.send(req)?.json()?)
    }

    fn put<B: Serialize, T: DeserializeOwned>(&self, endpoint: &str, body: &B) -> Result<T> {
        let req = self.http.put(self.url(endpoint)).json(body);
        Ok(self.send(req)?.json()?)
    }

    /// PUT whose response body (an echo of the request) is not needed.
    fn put_discard<B: Serialize>(&self, endpoint: &str, body: &B) -> Result<()> {
        let req = self.http.put(self.url(endpoint)).json(body);
        self.send(req)?.bytes()?;
        Ok(())
    }

    fn delete(&self, endpoint: &str) -> Result<()> {
        let req = self.http.delete(self.url(endpoint));
        self.send(req)?.bytes()?;
        Ok(())
    }

    // -- users --------------------------------------------------------------

    pub fn get_users(&self) -> Result<Vec<User>> {
        self.get("/users", &[])
    }

    pub fn create_user(&self, user: &NewUser) -> Result<User> {
        self.post("/users", user)
    }

    // -- categories ---------------------------------------------------------

    pub fn get_categories(&self) -> Result<Vec<Category>> {
        self.get("/categories", &[])
    }

    pub fn create_category(&self, name: &str) -> Result<Category> {
        self.post("/categories", &serde_json::json!({ "name": name }))
    }

    pub fn rename_category(&self, id: CategoryId, name: &str) -> Result<()> {
        self.put_discard(&format!("/categories/{id}"), &serde_json::json!({ "name": name }))
    }

    pub fn delete_category(&self, id: CategoryId) -> Result<()> {
        self.delete(&format!("/categories/{id}"))
    }

    // -- expenses -----------------------------------------------------------

    pub fn get_expenses(&self) -> Result<Vec<Expense>> {
        self.get("/expenses", &[])
    }

    pub fn create_expense(&self, expense: &NewExpense) -> Result<Expense> {
        self.post("/expenses", expense)
    }

    pub fn update_expense(&self, id: i64, expense: &NewExpense) -> Result<()> {
        self.put_discard(&format!("/expenses/{id}"), expense)
    }

    pub fn delete_expense(&self, id: i64) -> Result<()> {
        self.delete(&format!("/expenses/{id}"))
    }

    // -- subscriptions ------------------------------------------------------

    pub fn get_subscriptions(&self) -> Result<Vec<Subscription>> {
        self.get("/subscriptions", &[])
    }

    pub fn create_subscription(&self, sub: &NewSubscription) -> Result<Subscription> {
        self.post("/subscriptions", sub)
    }

    pub fn update_subscription(&self, id: i64, sub: &NewSubscription) -> Result<()> {
        self.put_discard(&format!("/subscriptions/{id}"), sub)
    }

    pub fn delete_subscription(&self, id: i64) -> Result<()> {
        self.delete(&format!("/subscriptions/{id}"))
    }

    // -- public utilities ---------------------------------------------------

    pub fn get_public_utilities(&self, filter: UtilityFilter) -> Result<Vec<PublicUtility>> {
        let mut query = Vec::new();
        if let Some(user_id) = filter.user_id {
            query.push(("user_id", user_id.to_string()));
        }
        if let Some(category_id) = filter.category_id {
            query.push(("category_id", category_id.to_string()));
        }
        self.get("/public-utilities", &query)
    }

    pub fn create_public_utility(&self, utility: &NewPublicUtility) -> Result<PublicUtility> {
        self.post("/public-utilities", utility)
    }

    pub fn update_public_utility(
        &self,
        id: i64,
        patch: &PublicUtilityPatch,
    ) -> Result<PublicUtility> {
        self.put(&format!("/public-utilities/{id}"), patch)
    }

    pub fn delete_public_utility(&self, id: i64) -> Result<()> {
        self.delete(&format!("/public-utilities/{id}"))
    }
}

impl ExpenseSource for ApiClient {
    fn expenses_by_day(&self, date: NaiveDate) -> Result<Vec<Expense>> {
        self.get("/expenses/day", &[("date", date_param(date))])
    }

    fn expenses_by_week(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Expense>> {
        self.get(
            "/expenses/week",
            &[("start_date", date_param(start)), ("end_date", date_param(end))],
        )
    }

    fn expenses_by_month(&self, year: i32, month: u32) -> Result<Vec<Expense>> {
        self.get(
            "/expenses/month",
            &[("year", year.to_string()), ("month", month.to_string())],
        )
    }

    fn expenses_by_year(&self, year: i32) -> Result<Vec<Expense>> {
        self.get("/expenses/year", &[("year", year.to_string())])
    }

    fn expenses_by_category(&self, category_id: CategoryId) -> Result<Vec<Expense>> {
        self.get("/expenses/category", &[("category_id", category_id.to_string())])
    }
}
