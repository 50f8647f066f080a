//! Subscription plan CRUD endpoints

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use crate::auth::Authenticated;
use crate::db::plans::{self, NewPlan, PlanChanges, SubscriptionPlan};
use crate::error::{ApiResult, AppError, AppJson};
use crate::state::AppState;
use crate::validation::{
    MAX_NAME_LEN, check_currency, check_details, check_price, check_required_text,
};

/// POST /api/v1/subscriptions
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreatePlanRequest {
    pub name: String,
    pub price: f64,
    pub currency: String,
    pub details: Vec<String>,
}

/// PUT /api/v1/subscriptions/{id} — absent fields keep their stored value
#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct UpdatePlanRequest {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub details: Option<Vec<String>>,
}

impl CreatePlanRequest {
    fn validate(&self) -> Result<(), AppError> {
        let mut issues = Vec::new();
        check_required_text(&mut issues, &self.name, "name", MAX_NAME_LEN);
        check_price(&mut issues, self.price, "price");
        check_currency(&mut issues, &self.currency, "currency");
        check_details(&mut issues, &self.details, "details");
        if issues.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(issues))
        }
    }
}

impl UpdatePlanRequest {
    fn validate(&self) -> Result<(), AppError> {
        let mut issues = Vec::new();
        if let Some(name) = &self.name {
            check_required_text(&mut issues, name, "name", MAX_NAME_LEN);
        }
        if let Some(price) = self.price {
            check_price(&mut issues, price, "price");
        }
        if let Some(currency) = &self.currency {
            check_currency(&mut issues, currency, "currency");
        }
        if let Some(details) = &self.details {
            check_details(&mut issues, details, "details");
        }
        if issues.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(issues))
        }
    }
}

fn plan_not_found(id: &str) -> AppError {
    AppError::not_found(format!("Subscription plan with id {id} not found"))
}

pub async fn list_plans(State(state): State<AppState>) -> ApiResult<Json<Vec<SubscriptionPlan>>> {
    let plans = plans::list(&state.pool).await?;
    Ok(Json(plans))
}

pub async fn create_plan(
    State(state): State<AppState>,
    Extension(identity): Extension<Authenticated>,
    AppJson(req): AppJson<CreatePlanRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;

    let plan = plans::create(
        &state.pool,
        NewPlan {
            name: req.name,
            price: req.price,
            currency: req.currency,
            details: req.details,
        },
    )
    .await?;

    tracing::info!(admin = %identity.email, plan = %plan.id, "Subscription plan created");

    Ok((StatusCode::CREATED, Json(plan)))
}

pub async fn get_plan(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SubscriptionPlan>> {
    let plan = plans::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| plan_not_found(&id))?;
    Ok(Json(plan))
}

pub async fn update_plan(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(req): AppJson<UpdatePlanRequest>,
) -> ApiResult<Json<SubscriptionPlan>> {
    req.validate()?;

    let changes = PlanChanges {
        name: req.name,
        price: req.price,
        currency: req.currency,
        details: req.details,
    };
    let plan = plans::update(&state.pool, &id, changes)
        .await?
        .ok_or_else(|| plan_not_found(&id))?;
    Ok(Json(plan))
}

pub async fn delete_plan(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SubscriptionPlan>> {
    let plan = plans::delete(&state.pool, &id)
        .await?
        .ok_or_else(|| plan_not_found(&id))?;

    tracing::info!(plan = %plan.id, "Subscription plan deleted");

    Ok(Json(plan))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_collects_every_issue() {
        let req = CreatePlanRequest {
            name: "  ".into(),
            price: -1.0,
            currency: "EUR".into(),
            details: vec!["ok".into()],
        };
        let Err(AppError::Validation(issues)) = req.validate() else {
            panic!("expected validation error");
        };
        let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "price", "currency"]);
    }

    #[test]
    fn create_request_accepts_a_valid_plan() {
        let req = CreatePlanRequest {
            name: "Monthly".into(),
            price: 149.99,
            currency: "RON".into(),
            details: vec!["Unlimited entries".into()],
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn update_request_only_checks_present_fields() {
        let req = UpdatePlanRequest {
            price: Some(99.0),
            ..Default::default()
        };
        assert!(req.validate().is_ok());

        let req = UpdatePlanRequest {
            currency: Some("USD".into()),
            ..Default::default()
        };
        let Err(AppError::Validation(issues)) = req.validate() else {
            panic!("expected validation error");
        };
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "currency");
    }

    #[test]
    fn empty_update_request_is_valid() {
        assert!(UpdatePlanRequest::default().validate().is_ok());
    }
}
